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
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use walkdir::WalkDir;

use crate::collection::Collection;
use crate::collection::user_deck_id;
use crate::error::Fallible;
use crate::error::fail;
use crate::parser::parse_csv;
use crate::store::BlobStore;
use crate::types::timestamp::Timestamp;

/// Import a CSV file as a new deck, or every CSV file under a directory as
/// one deck each. Returns the IDs of the decks created.
pub fn import_path<S: BlobStore>(
    coll: &mut Collection<S>,
    path: &Path,
    name: Option<String>,
    now: Timestamp,
    out: &mut impl Write,
) -> Fallible<Vec<String>> {
    if !path.exists() {
        return fail(format!("no such file: {}", path.display()));
    }
    let files: Vec<PathBuf> = if path.is_dir() {
        if name.is_some() {
            return fail("a deck name can only be given when importing a single file.");
        }
        let mut files = Vec::new();
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "csv") {
                files.push(path.to_path_buf());
            }
        }
        files
    } else {
        vec![path.to_path_buf()]
    };

    let mut imported = Vec::new();
    for (i, file) in files.iter().enumerate() {
        // Decks created in one run get distinct creation times, and so
        // distinct IDs.
        let created_at = Timestamp::from_millis(now.as_millis() + i as i64);
        let deck_name = match &name {
            Some(name) => name.clone(),
            None => deck_name_from_path(file),
        };
        let text = read_to_string(file)?;
        let cards = parse_csv(&text)?;
        let deck_id = user_deck_id(created_at);
        match coll.import_cards(&cards, &deck_id, &deck_name, None, created_at)? {
            Some(summary) => {
                writeln!(
                    out,
                    "Imported deck \"{deck_name}\" ({} cards) as {}.",
                    summary.total, summary.deck_id
                )?;
                imported.push(summary.deck_id);
            }
            None => {
                writeln!(
                    out,
                    "No valid cards found in {} (two columns are needed).",
                    file.display()
                )?;
            }
        }
    }
    Ok(imported)
}

fn deck_name_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "Untitled".to_string())
}

#[cfg(test)]
mod tests {
    use std::fs::create_dir;
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;
    use crate::store::MemoryStore;
    use crate::store::Repository;

    fn collection() -> Collection<MemoryStore> {
        Collection::new(Repository::new(MemoryStore::new(), "k"))
    }

    #[test]
    fn test_import_file() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("Animals.csv");
        write(&path, "cat,кіт\ndog,пес\n")?;
        let mut coll = collection();
        let mut out = Vec::new();
        let ids = import_path(&mut coll, &path, None, Timestamp::from_millis(42), &mut out)?;
        assert_eq!(ids, vec!["deck-42"]);
        let deck = coll.get_deck("deck-42").unwrap();
        assert_eq!(deck.name, "Animals");
        assert_eq!(deck.source_url, None);
        assert_eq!(deck.cards.len(), 2);
        Ok(())
    }

    #[test]
    fn test_import_with_name() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("a.csv");
        write(&path, "cat,кіт\n")?;
        let mut coll = collection();
        let mut out = Vec::new();
        let ids = import_path(
            &mut coll,
            &path,
            Some("Pets".to_string()),
            Timestamp::from_millis(1),
            &mut out,
        )?;
        assert_eq!(coll.get_deck(&ids[0]).unwrap().name, "Pets");
        Ok(())
    }

    #[test]
    fn test_import_invalid_file() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("bad.csv");
        write(&path, "only one column\nanother\n")?;
        let mut coll = collection();
        let mut out = Vec::new();
        let ids = import_path(&mut coll, &path, None, Timestamp::from_millis(1), &mut out)?;
        assert!(ids.is_empty());
        assert!(coll.list_decks().is_empty());
        assert!(String::from_utf8_lossy(&out).contains("No valid cards"));
        Ok(())
    }

    #[test]
    fn test_import_directory() -> Fallible<()> {
        let dir = tempdir()?;
        write(dir.path().join("b.csv"), "x,1\n")?;
        write(dir.path().join("notes.txt"), "x,1\n")?;
        create_dir(dir.path().join("sub"))?;
        write(dir.path().join("sub").join("c.csv"), "y,2\nz,3\n")?;
        let mut coll = collection();
        let mut out = Vec::new();
        let ids = import_path(&mut coll, dir.path(), None, Timestamp::from_millis(100), &mut out)?;
        assert_eq!(ids, vec!["deck-100", "deck-101"]);
        let names: Vec<String> = coll.list_decks().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["b", "c"]);
        Ok(())
    }

    #[test]
    fn test_import_missing_path() {
        let mut coll = collection();
        let mut out = Vec::new();
        let result = import_path(
            &mut coll,
            Path::new("./derpherp.csv"),
            None,
            Timestamp::now(),
            &mut out,
        );
        assert!(result.is_err());
    }
}
