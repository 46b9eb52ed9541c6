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

use crate::types::card::CardRecord;
use crate::types::card_id::CardId;
use crate::types::timestamp::Timestamp;

/// Deck metadata as stored in the persisted document. The deck's ID is the
/// key it is stored under.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckRecord {
    pub name: String,
    /// Where a bundled deck was loaded from. `None` for user uploads.
    #[serde(default)]
    pub source_url: Option<String>,
    /// The deck's cards, in import order.
    #[serde(default)]
    pub card_order: Vec<CardId>,
    pub imported_at: Timestamp,
}

/// A card together with its identifier within a deck.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DeckCard {
    pub card_id: CardId,
    pub card: CardRecord,
}

/// A deck's metadata joined with its card records, in deck order.
#[derive(Clone, Debug)]
pub struct Deck {
    pub id: String,
    pub name: String,
    pub source_url: Option<String>,
    pub imported_at: Timestamp,
    pub cards: Vec<DeckCard>,
}

/// The storage key of a card: cards are scoped to their deck.
pub fn card_key(deck_id: &str, card_id: &CardId) -> String {
    format!("{deck_id}:{card_id}")
}
