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

use std::io::BufRead;
use std::io::Write;

use crate::cmd::confirm;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::error::fail;
use crate::store::BlobStore;
use crate::types::timestamp::Timestamp;

/// Reset all progress in a deck, after asking unless `yes` is set.
pub fn reset_deck<S: BlobStore>(
    coll: &mut Collection<S>,
    deck_id: &str,
    yes: bool,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Fallible<()> {
    if coll.get_deck(deck_id).is_none() {
        return fail(format!("deck not found: {deck_id}"));
    }
    if !yes && !confirm("Reset all progress for this deck?", input, out)? {
        return Ok(());
    }
    coll.reset_deck(deck_id, Timestamp::now())?;
    writeln!(out, "Progress reset.")?;
    Ok(())
}

/// Delete a deck and its cards, after asking unless `yes` is set.
pub fn delete_deck<S: BlobStore>(
    coll: &mut Collection<S>,
    deck_id: &str,
    yes: bool,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Fallible<()> {
    if coll.get_deck(deck_id).is_none() {
        return fail(format!("deck not found: {deck_id}"));
    }
    if !yes && !confirm("Delete this deck permanently?", input, out)? {
        return Ok(());
    }
    coll.delete_deck(deck_id)?;
    writeln!(out, "Deck deleted.")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::store::Repository;
    use crate::types::card::CardInput;
    use crate::types::card_id::CardId;
    use crate::types::review::Grade;

    fn collection() -> Fallible<Collection<MemoryStore>> {
        let mut coll = Collection::new(Repository::new(MemoryStore::new(), "k"));
        let now = Timestamp::from_millis(0);
        coll.import_cards(&[CardInput::new("a", "1")], "d", "Deck", None, now)?;
        coll.review_card("d", &CardId::derive("a", "1"), Grade::GOOD, now)?;
        Ok(coll)
    }

    #[test]
    fn test_reset_declined() -> Fallible<()> {
        let mut coll = collection()?;
        let mut out = Vec::new();
        reset_deck(&mut coll, "d", false, &mut "n\n".as_bytes(), &mut out)?;
        assert_eq!(coll.get_deck("d").unwrap().cards[0].card.leitner_box, 1);
        Ok(())
    }

    #[test]
    fn test_reset_confirmed() -> Fallible<()> {
        let mut coll = collection()?;
        let mut out = Vec::new();
        reset_deck(&mut coll, "d", false, &mut "y\n".as_bytes(), &mut out)?;
        assert_eq!(coll.get_deck("d").unwrap().cards[0].card.leitner_box, 0);
        Ok(())
    }

    #[test]
    fn test_delete() -> Fallible<()> {
        let mut coll = collection()?;
        let mut out = Vec::new();
        delete_deck(&mut coll, "d", true, &mut "".as_bytes(), &mut out)?;
        assert!(coll.get_deck("d").is_none());
        assert!(delete_deck(&mut coll, "d", true, &mut "".as_bytes(), &mut out).is_err());
        Ok(())
    }
}
