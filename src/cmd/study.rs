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
use crate::session::GradeError;
use crate::session::Session;
use crate::session::Start;
use crate::session::State;
use crate::session::start_study;
use crate::store::BlobStore;
use crate::types::review::Grade;
use crate::types::timestamp::Timestamp;

/// Study the cards due in a deck. Returns the finished session, or `None`
/// if nothing was due.
pub fn study<S: BlobStore, R: Rng + ?Sized>(
    coll: &mut Collection<S>,
    deck_id: &str,
    rng: &mut R,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Fallible<Option<Session>> {
    let mut session = match start_study(coll, deck_id, Timestamp::now(), rng) {
        Start::Started(session) => session,
        Start::Empty => {
            writeln!(out, "No cards due for review today!")?;
            return Ok(None);
        }
        Start::DeckNotFound => return fail(format!("deck not found: {deck_id}")),
    };
    writeln!(out, "Studying \"{}\".", session.deck_name())?;

    while let Some(current) = session.current() {
        let (shown, total) = session.progress();
        let tally = session.tally();
        writeln!(out)?;
        writeln!(
            out,
            "[{shown}/{total}]  correct {}  wrong {}",
            tally.correct, tally.wrong
        )?;
        writeln!(out, "Q: {}", current.card.front)?;
        if session.is_revealed() {
            writeln!(out, "A: {}", current.card.back)?;
            write!(out, "Grade (1 = again, 2 = hard, 3 = good, 4 = easy, q = quit): ")?;
        } else {
            write!(out, "[enter] reveal, [s] shuffle, [q] quit: ")?;
        }
        out.flush()?;

        let Some(line) = read_line(input)? else {
            session = session.abandon();
            break;
        };
        session = match (session.is_revealed(), line.as_str()) {
            (_, "q") => session.abandon(),
            (false, "") => session.reveal(),
            (false, "s") => session.shuffle(rng),
            (true, key) => match key_grade(key) {
                Some(grade) => match session.grade(coll, grade, Timestamp::now()) {
                    Ok(next) => next,
                    Err(GradeError { session, error }) => {
                        writeln!(out, "{error}")?;
                        writeln!(out, "The review was not saved. Grade the card again or quit.")?;
                        session
                    }
                },
                None => {
                    writeln!(out, "Invalid input. Please enter a number between 1 and 4.")?;
                    session
                }
            },
            (false, _) => session,
        };
    }

    let tally = session.tally();
    writeln!(out)?;
    match session.state() {
        State::Complete => writeln!(out, "Session complete!")?,
        State::Abandoned | State::Active => writeln!(out, "Session ended.")?,
    }
    writeln!(out, "Correct: {}", tally.correct)?;
    writeln!(out, "Wrong: {}", tally.wrong)?;
    Ok(Some(session))
}

/// Maps the number keys onto grades.
fn key_grade(key: &str) -> Option<Grade> {
    match key {
        "1" => Some(Grade::AGAIN),
        "2" => Some(Grade::HARD),
        "3" => Some(Grade::GOOD),
        "4" => Some(Grade::EASY),
        _ => None,
    }
}
