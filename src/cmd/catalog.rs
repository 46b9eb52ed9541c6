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

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use crate::catalog::load_bundled_deck;
use crate::catalog::load_catalog;
use crate::collection::Collection;
use crate::collection::Stats;
use crate::error::Fallible;
use crate::error::fail;
use crate::store::BlobStore;
use crate::types::timestamp::Timestamp;

/// List the bundled decks and whether each has been loaded.
pub fn list_catalog<S: BlobStore>(
    coll: &Collection<S>,
    catalog_path: &Path,
    now: Timestamp,
    out: &mut impl Write,
) -> Fallible<()> {
    let entries = load_catalog(catalog_path)?;
    let loaded: HashMap<String, Stats> = coll
        .list_decks_with_stats(now)
        .into_iter()
        .map(|(summary, stats)| (summary.id, stats))
        .collect();
    for entry in entries.iter() {
        let status = match loaded.get(&entry.id) {
            Some(stats) => format!("{} cards, {} due", stats.total, stats.due),
            None => "not loaded".to_string(),
        };
        writeln!(out, "{}\t{}\t{status}", entry.id, entry.name)?;
        if let Some(description) = &entry.description {
            writeln!(out, "\t{description}")?;
        }
    }
    Ok(())
}

/// Load a bundled deck by its catalog ID.
pub fn load_deck<S: BlobStore>(
    coll: &mut Collection<S>,
    catalog_path: &Path,
    deck_id: &str,
    now: Timestamp,
    out: &mut impl Write,
) -> Fallible<()> {
    let entries = load_catalog(catalog_path)?;
    let Some(entry) = entries.iter().find(|e| e.id == deck_id) else {
        return fail(format!("no bundled deck with ID {deck_id}"));
    };
    let catalog_dir = catalog_path.parent().unwrap_or(Path::new("."));
    match load_bundled_deck(coll, catalog_dir, entry, now)? {
        Some(summary) => writeln!(
            out,
            "Loaded \"{}\": {} cards, {} new.",
            entry.name, summary.total, summary.added
        )?,
        None => writeln!(out, "The deck \"{}\" has no cards.", entry.name)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;
    use crate::store::MemoryStore;
    use crate::store::Repository;

    #[test]
    fn test_list_and_load() -> Fallible<()> {
        let dir = tempdir()?;
        let catalog = dir.path().join("index.json");
        write(
            &catalog,
            r#"[{"id": "flashcards-a", "name": "A", "description": "First", "filename": "a.csv"}]"#,
        )?;
        write(dir.path().join("a.csv"), "q,a\n")?;
        let mut coll = Collection::new(Repository::new(MemoryStore::new(), "k"));
        let now = Timestamp::from_millis(0);

        let mut out = Vec::new();
        list_catalog(&coll, &catalog, now, &mut out)?;
        assert_eq!(
            String::from_utf8_lossy(&out),
            "flashcards-a\tA\tnot loaded\n\tFirst\n"
        );

        let mut out = Vec::new();
        load_deck(&mut coll, &catalog, "flashcards-a", now, &mut out)?;
        assert_eq!(String::from_utf8_lossy(&out), "Loaded \"A\": 1 cards, 1 new.\n");

        let mut out = Vec::new();
        list_catalog(&coll, &catalog, now, &mut out)?;
        assert!(String::from_utf8_lossy(&out).contains("1 cards, 1 due"));

        assert!(load_deck(&mut coll, &catalog, "nope", now, &mut out).is_err());
        Ok(())
    }
}
