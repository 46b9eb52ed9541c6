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

//! Persistence of the scheduling state.

mod document;
mod sqlite;

use std::collections::HashMap;

use crate::error::Fallible;

pub use document::Repository;
pub use document::Store;
pub use sqlite::SqliteStore;

/// A key-value store of text blobs. The whole scheduling state lives under
/// a single key.
pub trait BlobStore {
    fn get(&self, key: &str) -> Fallible<Option<String>>;
    fn put(&mut self, key: &str, value: &str) -> Fallible<()>;
}

/// A blob store that lives in memory.
#[derive(Default)]
pub struct MemoryStore {
    blobs: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Fallible<Option<String>> {
        Ok(self.blobs.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Fallible<()> {
        self.blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A memory store whose writes start failing once it is broken.
#[cfg(test)]
pub struct BreakableStore {
    inner: MemoryStore,
    broken: std::rc::Rc<std::cell::Cell<bool>>,
}

#[cfg(test)]
impl BreakableStore {
    /// The store, and the switch that breaks it.
    pub fn new() -> (Self, std::rc::Rc<std::cell::Cell<bool>>) {
        let broken = std::rc::Rc::new(std::cell::Cell::new(false));
        let store = Self {
            inner: MemoryStore::new(),
            broken: broken.clone(),
        };
        (store, broken)
    }
}

#[cfg(test)]
impl BlobStore for BreakableStore {
    fn get(&self, key: &str) -> Fallible<Option<String>> {
        self.inner.get(key)
    }

    fn put(&mut self, key: &str, value: &str) -> Fallible<()> {
        if self.broken.get() {
            return crate::error::fail("disk full");
        }
        self.inner.put(key, value)
    }
}
