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

use rand::Rng;

use crate::cmd::read_line;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::error::fail;
use crate::session::Session;
use crate::session::Start;
use crate::session::start_browse;
use crate::store::BlobStore;

/// Flip through every card in a deck without affecting its progress.
pub fn browse<S: BlobStore, R: Rng + ?Sized>(
    coll: &Collection<S>,
    deck_id: &str,
    rng: &mut R,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Fallible<Option<Session>> {
    let mut session = match start_browse(coll, deck_id) {
        Start::Started(session) => session,
        Start::Empty => {
            writeln!(out, "There are no cards in this deck.")?;
            return Ok(None);
        }
        Start::DeckNotFound => return fail(format!("deck not found: {deck_id}")),
    };
    writeln!(out, "Browsing \"{}\".", session.deck_name())?;

    while let Some(current) = session.current() {
        let (shown, total) = session.progress();
        writeln!(out)?;
        writeln!(out, "[{shown}/{total}]")?;
        if session.is_revealed() {
            writeln!(out, "A: {}", current.card.back)?;
        } else {
            writeln!(out, "Q: {}", current.card.front)?;
        }
        write!(out, "[enter] flip, [n]ext, [p]revious, [s]huffle, [q]uit: ")?;
        out.flush()?;

        let Some(line) = read_line(input)? else {
            session = session.abandon();
            break;
        };
        session = match line.as_str() {
            "" => session.reveal(),
            "n" => session.next_card(),
            "p" => session.previous_card(),
            "s" => session.shuffle(rng),
            "q" => session.abandon(),
            _ => session,
        };
    }
    Ok(Some(session))
}
