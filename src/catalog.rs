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

use std::fs::read_to_string;
use std::path::Path;

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;
use percent_encoding::utf8_percent_encode;
use serde::Deserialize;
use serde::Serialize;

use crate::collection::Collection;
use crate::collection::ImportSummary;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::parser::parse_csv;
use crate::store::BlobStore;
use crate::types::timestamp::Timestamp;

/// Characters left as-is in a deck's source URL.
const FILENAME_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'.').remove(b'_').remove(b'-');

/// A bundled deck, as listed in the catalog.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// The deck's CSV file, relative to the catalog.
    pub filename: String,
}

pub fn load_catalog(path: &Path) -> Fallible<Vec<CatalogEntry>> {
    let content = read_to_string(path).map_err(|e| {
        ErrorReport::new(format!("failed to read catalog {}: {e}", path.display()))
    })?;
    let entries: Vec<CatalogEntry> = serde_json::from_str(&content)?;
    Ok(entries)
}

/// The URL a bundled deck is recorded as coming from.
pub fn source_url(filename: &str) -> String {
    format!("decks/{}", utf8_percent_encode(filename, FILENAME_SET))
}

/// Import a bundled deck. The CSV file is looked up next to the catalog.
/// Loading a deck that was loaded before only adds cards that are new to it.
pub fn load_bundled_deck<S: BlobStore>(
    coll: &mut Collection<S>,
    catalog_dir: &Path,
    entry: &CatalogEntry,
    now: Timestamp,
) -> Fallible<Option<ImportSummary>> {
    let path = catalog_dir.join(&entry.filename);
    log::debug!("Loading bundled deck {} from {}.", entry.id, path.display());
    let text = read_to_string(&path).map_err(|e| {
        ErrorReport::new(format!("failed to read deck {}: {e}", path.display()))
    })?;
    let cards = parse_csv(&text)?;
    let url = source_url(&entry.filename);
    coll.import_cards(&cards, &entry.id, &entry.name, Some(&url), now)
}
