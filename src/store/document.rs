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

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::store::BlobStore;
use crate::types::card::CardRecord;
use crate::types::deck::DeckRecord;

pub const SCHEMA_VERSION: u32 = 1;

/// The persisted document: every deck and every card, keyed by
/// `deckId:cardId`.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub schema_version: u32,
    #[serde(default)]
    pub decks: BTreeMap<String, DeckRecord>,
    #[serde(default)]
    pub cards: BTreeMap<String, CardRecord>,
}

impl Store {
    pub fn empty() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            decks: BTreeMap::new(),
            cards: BTreeMap::new(),
        }
    }
}

/// Reads and writes the persisted document as a whole. There is no partial
/// update: callers load, mutate, and save.
pub struct Repository<S: BlobStore> {
    blobs: S,
    key: String,
}

impl<S: BlobStore> Repository<S> {
    pub fn new(blobs: S, key: impl Into<String>) -> Self {
        Self {
            blobs,
            key: key.into(),
        }
    }

    /// Load the document. A missing, unreadable, or corrupt document is
    /// treated as an empty one.
    pub fn load(&self) -> Store {
        let raw = match self.blobs.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::debug!("No document under {:?}, starting empty.", self.key);
                return Store::empty();
            }
            Err(e) => {
                log::warn!("Failed to read document, starting empty: {e}");
                return Store::empty();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(store) => store,
            Err(e) => {
                log::warn!("Stored document is corrupt, starting empty: {e}");
                Store::empty()
            }
        }
    }

    /// Overwrite the stored document.
    pub fn save(&mut self, store: &Store) -> Fallible<()> {
        let json = serde_json::to_string(store)?;
        self.blobs.put(&self.key, &json)
    }
}
