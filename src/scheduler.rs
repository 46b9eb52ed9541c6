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

use crate::types::card::CardRecord;
use crate::types::review::Grade;
use crate::types::review::ReviewResult;
use crate::types::timestamp::Timestamp;

/// Review interval in days, indexed by box. Boxes past the end of the table
/// reuse the last interval.
pub const BOX_INTERVALS: [i64; 5] = [0, 1, 3, 7, 14];

/// The highest box a card can reach. Cards in this box count as learned.
pub const MAX_BOX: u8 = 4;

/// When a card in the given box should next be reviewed.
pub fn next_due_date(leitner_box: u8, now: Timestamp) -> Timestamp {
    let index = usize::from(leitner_box).min(BOX_INTERVALS.len() - 1);
    now.plus_days(BOX_INTERVALS[index])
}

/// Apply a review to a card. A correct answer moves the card up one box, a
/// wrong answer sends it back to box zero and counts as a lapse. The due
/// date is computed from the card's new box.
pub fn review(card: &mut CardRecord, grade: Grade, now: Timestamp) -> ReviewResult {
    let result = grade.result();
    match result {
        ReviewResult::Correct => {
            card.leitner_box = card.leitner_box.saturating_add(1).min(MAX_BOX);
        }
        ReviewResult::Wrong => {
            card.lapses = card.lapses.saturating_add(1);
            card.leitner_box = 0;
        }
    }
    card.last_result = Some(result);
    card.last_reviewed_at = Some(now);
    card.due_at = next_due_date(card.leitner_box, now);
    result
}

/// Forget all progress on a card. Unlike a failed review, this does not
/// count as a lapse: the lapse counter is cleared too.
pub fn reset_progress(card: &mut CardRecord, now: Timestamp) {
    card.leitner_box = 0;
    card.due_at = now;
    card.last_reviewed_at = None;
    card.last_result = None;
    card.lapses = 0;
}
