// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::Deserialize;
use serde::Serialize;

use crate::types::review::ReviewResult;
use crate::types::timestamp::Timestamp;

/// A question/answer pair as produced by an import source, before it is
/// assigned an identity or any learning progress.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CardInput {
    pub front: String,
    pub back: String,
}

impl CardInput {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }
}

/// A card as stored in the persisted document.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    pub front: String,
    pub back: String,
    /// The card's Leitner box. Zero means the card is new.
    #[serde(rename = "box")]
    pub leitner_box: u8,
    /// The card is due once this moment has passed.
    pub due_at: Timestamp,
    #[serde(default)]
    pub last_reviewed_at: Option<Timestamp>,
    #[serde(default)]
    pub last_result: Option<ReviewResult>,
    /// How many times the card has fallen back to box zero.
    #[serde(default)]
    pub lapses: u32,
}

impl CardRecord {
    /// A card that has never been reviewed, due immediately.
    pub fn new(front: String, back: String, now: Timestamp) -> Self {
        Self {
            front,
            back,
            leitner_box: 0,
            due_at: now,
            last_reviewed_at: None,
            last_result: None,
            lapses: 0,
        }
    }

    pub fn is_due(&self, now: Timestamp) -> bool {
        self.due_at <= now
    }

    pub fn is_new(&self) -> bool {
        self.leitner_box == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;

    #[test]
    fn test_new_card_is_due() {
        let now = Timestamp::from_millis(1_000);
        let card = CardRecord::new("Q".to_string(), "A".to_string(), now);
        assert!(card.is_new());
        assert!(card.is_due(now));
        assert!(!card.is_due(Timestamp::from_millis(999)));
    }

    #[test]
    fn test_serialized_shape() -> Fallible<()> {
        let card = CardRecord::new("Q".to_string(), "A".to_string(), Timestamp::from_millis(5));
        let value = serde_json::to_value(&card)?;
        assert_eq!(
            value,
            serde_json::json!({
                "front": "Q",
                "back": "A",
                "box": 0,
                "dueAt": 5,
                "lastReviewedAt": null,
                "lastResult": null,
                "lapses": 0,
            })
        );
        Ok(())
    }

    #[test]
    fn test_missing_lapses_defaults_to_zero() -> Fallible<()> {
        let json = r#"{"front":"Q","back":"A","box":2,"dueAt":7,"lastReviewedAt":3,"lastResult":"correct"}"#;
        let card: CardRecord = serde_json::from_str(json)?;
        assert_eq!(card.lapses, 0);
        assert_eq!(card.leitner_box, 2);
        assert_eq!(card.last_result, Some(ReviewResult::Correct));
        Ok(())
    }
}
