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

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::collection::Collection;
use crate::error::ErrorReport;
use crate::store::BlobStore;
use crate::types::deck::DeckCard;
use crate::types::review::Grade;
use crate::types::timestamp::Timestamp;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    /// Due cards, graded, with scheduling side effects.
    Study,
    /// Every card in deck order, navigated freely. Nothing is graded.
    Browse,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum State {
    Active,
    /// Every card has been graded.
    Complete,
    /// The user left before the end.
    Abandoned,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize)]
pub struct Tally {
    pub correct: usize,
    pub wrong: usize,
}

/// A grade that could not be applied. Carries the session exactly as it was
/// before grading, so the caller can retry or end it.
#[derive(Debug)]
pub struct GradeError {
    pub session: Session,
    pub error: ErrorReport,
}

impl From<GradeError> for ErrorReport {
    fn from(value: GradeError) -> Self {
        value.error
    }
}

/// A study or browse session. Sessions are plain values: every transition
/// consumes the session and returns its successor.
#[derive(Clone, Debug)]
pub struct Session {
    deck_id: String,
    deck_name: String,
    mode: Mode,
    cards: Vec<DeckCard>,
    position: usize,
    tally: Tally,
    revealed: bool,
    state: State,
}

/// The outcome of trying to start a session.
#[derive(Debug)]
pub enum Start {
    Started(Session),
    /// The deck exists but there is nothing to show: no cards are due, or
    /// the deck has no cards.
    Empty,
    DeckNotFound,
}

/// Start a study session over the deck's due cards, in random order.
pub fn start_study<S: BlobStore, R: Rng + ?Sized>(
    coll: &Collection<S>,
    deck_id: &str,
    now: Timestamp,
    rng: &mut R,
) -> Start {
    let Some(deck) = coll.get_deck(deck_id) else {
        return Start::DeckNotFound;
    };
    let mut cards: Vec<DeckCard> = deck
        .cards
        .into_iter()
        .filter(|c| c.card.is_due(now))
        .collect();
    if cards.is_empty() {
        return Start::Empty;
    }
    cards.shuffle(rng);
    log::debug!("Study session on {deck_id} with {} due cards.", cards.len());
    Start::Started(Session::new(deck.id, deck.name, Mode::Study, cards))
}

/// Start a browse session over every card in the deck, in deck order.
pub fn start_browse<S: BlobStore>(coll: &Collection<S>, deck_id: &str) -> Start {
    let Some(deck) = coll.get_deck(deck_id) else {
        return Start::DeckNotFound;
    };
    if deck.cards.is_empty() {
        return Start::Empty;
    }
    log::debug!("Browse session on {deck_id} with {} cards.", deck.cards.len());
    Start::Started(Session::new(deck.id, deck.name, Mode::Browse, deck.cards))
}

impl Session {
    fn new(deck_id: String, deck_name: String, mode: Mode, cards: Vec<DeckCard>) -> Self {
        Self {
            deck_id,
            deck_name,
            mode,
            cards,
            position: 0,
            tally: Tally::default(),
            revealed: false,
            state: State::Active,
        }
    }

    pub fn deck_id(&self) -> &str {
        &self.deck_id
    }

    pub fn deck_name(&self) -> &str {
        &self.deck_name
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn cards(&self) -> &[DeckCard] {
        &self.cards
    }

    /// The card being shown, if the session is still active.
    pub fn current(&self) -> Option<&DeckCard> {
        match self.state {
            State::Active => self.cards.get(self.position),
            State::Complete | State::Abandoned => None,
        }
    }

    /// The one-based position of the current card, and the number of cards.
    pub fn progress(&self) -> (usize, usize) {
        let shown = (self.position + 1).min(self.cards.len());
        (shown, self.cards.len())
    }

    /// In a study session, show the answer. In a browse session, flip the
    /// card over.
    pub fn reveal(mut self) -> Self {
        if self.state == State::Active {
            self.revealed = match self.mode {
                Mode::Study => true,
                Mode::Browse => !self.revealed,
            };
        }
        self
    }

    /// Grade the current card, record the review, and move on. The session
    /// is complete once the last card has been graded.
    ///
    /// If the grade cannot be applied, or the review cannot be saved, the
    /// unchanged session comes back inside the error.
    pub fn grade<S: BlobStore>(
        mut self,
        coll: &mut Collection<S>,
        grade: Grade,
        now: Timestamp,
    ) -> Result<Self, GradeError> {
        if self.mode != Mode::Study {
            return Err(self.reject("cards cannot be graded while browsing."));
        }
        if self.state != State::Active {
            return Err(self.reject("the session is over."));
        }
        let Some(card_id) = self.cards.get(self.position).map(|c| c.card_id.clone()) else {
            return Err(self.reject("no card to grade."));
        };
        match coll.review_card(&self.deck_id, &card_id, grade, now) {
            Ok(Some(updated)) => self.cards[self.position].card = updated,
            Ok(None) => log::warn!(
                "Card {card_id} vanished from deck {} during the session.",
                self.deck_id
            ),
            Err(error) => {
                log::error!("Failed to save review of {}:{card_id}.", self.deck_id);
                return Err(GradeError {
                    session: self,
                    error,
                });
            }
        }
        if grade.is_correct() {
            self.tally.correct += 1;
        } else {
            self.tally.wrong += 1;
        }
        self.position += 1;
        self.revealed = false;
        if self.position >= self.cards.len() {
            log::debug!(
                "Session on {} complete: {} correct, {} wrong.",
                self.deck_id,
                self.tally.correct,
                self.tally.wrong
            );
            self.state = State::Complete;
        }
        Ok(self)
    }

    fn reject(self, message: &str) -> GradeError {
        GradeError {
            session: self,
            error: ErrorReport::new(message),
        }
    }

    /// Move to the next card while browsing. Stops at the last card.
    pub fn next_card(mut self) -> Self {
        if self.is_browsing() && self.position + 1 < self.cards.len() {
            self.position += 1;
            self.revealed = false;
        }
        self
    }

    /// Move to the previous card while browsing. Stops at the first card.
    pub fn previous_card(mut self) -> Self {
        if self.is_browsing() && self.position > 0 {
            self.position -= 1;
            self.revealed = false;
        }
        self
    }

    /// Randomize the order of the cards, keeping the current card on
    /// screen. While studying, only cards not yet graded are reordered.
    pub fn shuffle<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        if self.state != State::Active {
            return self;
        }
        let Some(current) = self.cards.get(self.position).map(|c| c.card_id.clone()) else {
            return self;
        };
        let start = match self.mode {
            Mode::Study => self.position,
            Mode::Browse => 0,
        };
        let pending = &mut self.cards[start..];
        pending.shuffle(rng);
        // Bring the current card back into view by identity.
        self.position = match pending.iter().position(|c| c.card_id == current) {
            Some(offset) => match self.mode {
                Mode::Study => {
                    pending.swap(0, offset);
                    start
                }
                Mode::Browse => offset,
            },
            None => start,
        };
        self
    }

    /// End the session early.
    pub fn abandon(mut self) -> Self {
        if self.state == State::Active {
            log::debug!("Session on {} abandoned.", self.deck_id);
            self.state = State::Abandoned;
        }
        self
    }

    fn is_browsing(&self) -> bool {
        self.mode == Mode::Browse && self.state == State::Active
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::error::Fallible;
    use crate::store::BreakableStore;
    use crate::store::MemoryStore;
    use crate::store::Repository;
    use crate::types::card::CardInput;
    use crate::types::card_id::CardId;
    use crate::types::timestamp::MS_PER_DAY;

    fn collection_with(pairs: &[(&str, &str)], now: Timestamp) -> Fallible<Collection<MemoryStore>> {
        let mut coll = Collection::new(Repository::new(MemoryStore::new(), "flashcards:v1"));
        let cards: Vec<CardInput> = pairs.iter().map(|(f, b)| CardInput::new(*f, *b)).collect();
        coll.import_cards(&cards, "d", "Deck", None, now)?;
        Ok(coll)
    }

    fn started(start: Start) -> Session {
        match start {
            Start::Started(session) => session,
            other => panic!("expected a session, got {other:?}"),
        }
    }

    fn ids(session: &Session) -> Vec<CardId> {
        session.cards().iter().map(|c| c.card_id.clone()).collect()
    }

    const PAIRS: [(&str, &str); 6] = [
        ("a", "1"),
        ("b", "2"),
        ("c", "3"),
        ("d", "4"),
        ("e", "5"),
        ("f", "6"),
    ];

    #[test]
    fn test_study_unknown_deck() -> Fallible<()> {
        let now = Timestamp::from_millis(0);
        let coll = collection_with(&PAIRS, now)?;
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            start_study(&coll, "nope", now, &mut rng),
            Start::DeckNotFound
        ));
        assert!(matches!(start_browse(&coll, "nope"), Start::DeckNotFound));
        Ok(())
    }

    #[test]
    fn test_study_selects_due_cards() -> Fallible<()> {
        let now = Timestamp::from_millis(0);
        let mut coll = collection_with(&PAIRS, now)?;
        let a = CardId::derive("a", "1");
        coll.review_card("d", &a, Grade::GOOD, now)?;
        let mut rng = StdRng::seed_from_u64(1);
        let session = started(start_study(&coll, "d", now, &mut rng));
        assert_eq!(session.mode(), Mode::Study);
        assert_eq!(session.cards().len(), 5);
        assert!(!ids(&session).contains(&a));
        Ok(())
    }

    #[test]
    fn test_study_nothing_due() -> Fallible<()> {
        let now = Timestamp::from_millis(0);
        let mut coll = collection_with(&[("a", "1")], now)?;
        coll.review_card("d", &CardId::derive("a", "1"), Grade::GOOD, now)?;
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(start_study(&coll, "d", now, &mut rng), Start::Empty));
        // Browsing still works.
        assert!(matches!(start_browse(&coll, "d"), Start::Started(_)));
        Ok(())
    }

    #[test]
    fn test_study_order_is_randomized() -> Fallible<()> {
        let now = Timestamp::from_millis(0);
        let coll = collection_with(&PAIRS, now)?;
        let mut rng = StdRng::seed_from_u64(7);
        let orders: HashSet<Vec<CardId>> = (0..20)
            .map(|_| ids(&started(start_study(&coll, "d", now, &mut rng))))
            .collect();
        assert!(orders.len() > 1);
        for order in orders.iter() {
            let unique: HashSet<&CardId> = order.iter().collect();
            assert_eq!(unique.len(), PAIRS.len());
        }
        Ok(())
    }

    #[test]
    fn test_session_completeness() -> Fallible<()> {
        let now = Timestamp::from_millis(0);
        let mut coll = collection_with(&PAIRS, now)?;
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = started(start_study(&coll, "d", now, &mut rng));
        let grades = [Grade::EASY, Grade::AGAIN, Grade::HARD, Grade::GOOD];
        let mut i = 0;
        while session.state() == State::Active {
            session = session.reveal();
            session = session.grade(&mut coll, grades[i % grades.len()], now)?;
            i += 1;
        }
        assert_eq!(i, PAIRS.len());
        assert_eq!(session.state(), State::Complete);
        let tally = session.tally();
        assert_eq!(tally.correct + tally.wrong, PAIRS.len());
        assert_eq!(tally, Tally { correct: 3, wrong: 3 });
        assert!(session.current().is_none());
        assert!(session.clone().grade(&mut coll, Grade::GOOD, now).is_err());
        Ok(())
    }

    #[test]
    fn test_two_card_scenario() -> Fallible<()> {
        let now = Timestamp::from_millis(1_000);
        let mut coll = collection_with(&[("card1", "x"), ("card2", "y")], now)?;
        let card1 = CardId::derive("card1", "x");
        let mut rng = StdRng::seed_from_u64(11);
        let mut session = started(start_study(&coll, "d", now, &mut rng));
        while let Some(current) = session.current() {
            let grade = if current.card_id == card1 {
                Grade::EASY
            } else {
                Grade::AGAIN
            };
            session = session.grade(&mut coll, grade, now)?;
        }
        assert_eq!(session.state(), State::Complete);
        assert_eq!(session.tally(), Tally { correct: 1, wrong: 1 });

        let deck = coll.get_deck("d").unwrap();
        let first = &deck.cards[0].card;
        assert_eq!(first.leitner_box, 1);
        assert_eq!(first.due_at.as_millis(), 1_000 + MS_PER_DAY);
        let second = &deck.cards[1].card;
        assert_eq!(second.leitner_box, 0);
        assert_eq!(second.lapses, 1);
        assert_eq!(second.due_at, now);

        let stats = coll.get_stats("d", now).unwrap();
        assert_eq!(stats.new, 1);
        assert_eq!(stats.learned, 0);
        assert_eq!(stats.due, 1);
        Ok(())
    }

    #[test]
    fn test_grading_updates_session_copy() -> Fallible<()> {
        let now = Timestamp::from_millis(0);
        let mut coll = collection_with(&[("a", "1"), ("b", "2")], now)?;
        let mut rng = StdRng::seed_from_u64(5);
        let session = started(start_study(&coll, "d", now, &mut rng));
        let session = session.grade(&mut coll, Grade::GOOD, now)?;
        assert_eq!(session.cards()[0].card.leitner_box, 1);
        assert_eq!(session.progress(), (2, 2));
        Ok(())
    }

    #[test]
    fn test_reveal() -> Fallible<()> {
        let now = Timestamp::from_millis(0);
        let coll = collection_with(&PAIRS, now)?;
        let mut rng = StdRng::seed_from_u64(1);
        let study = started(start_study(&coll, "d", now, &mut rng));
        assert!(!study.is_revealed());
        let study = study.reveal().reveal();
        assert!(study.is_revealed());

        let browse = started(start_browse(&coll, "d"));
        let browse = browse.reveal();
        assert!(browse.is_revealed());
        let browse = browse.reveal();
        assert!(!browse.is_revealed());
        Ok(())
    }

    #[test]
    fn test_browse_navigation() -> Fallible<()> {
        let now = Timestamp::from_millis(0);
        let mut coll = collection_with(&[("a", "1"), ("b", "2"), ("c", "3")], now)?;
        let session = started(start_browse(&coll, "d"));
        assert_eq!(session.mode(), Mode::Browse);
        let front = |s: &Session| s.current().map(|c| c.card.front.clone());
        assert_eq!(front(&session).as_deref(), Some("a"));
        let session = session.previous_card();
        assert_eq!(front(&session).as_deref(), Some("a"));
        let session = session.next_card().next_card();
        assert_eq!(front(&session).as_deref(), Some("c"));
        assert_eq!(session.progress(), (3, 3));
        let session = session.next_card();
        assert_eq!(front(&session).as_deref(), Some("c"));
        let session = session.previous_card();
        assert_eq!(front(&session).as_deref(), Some("b"));

        assert!(session.clone().grade(&mut coll, Grade::GOOD, now).is_err());
        // Browsing never touches progress.
        let stats = coll.get_stats("d", now).unwrap();
        assert_eq!(stats.new, 3);
        Ok(())
    }

    #[test]
    fn test_navigation_is_ignored_while_studying() -> Fallible<()> {
        let now = Timestamp::from_millis(0);
        let coll = collection_with(&PAIRS, now)?;
        let mut rng = StdRng::seed_from_u64(1);
        let session = started(start_study(&coll, "d", now, &mut rng));
        let first = session.current().map(|c| c.card_id.clone());
        let session = session.next_card();
        assert_eq!(session.current().map(|c| c.card_id.clone()), first);
        Ok(())
    }

    #[test]
    fn test_browse_shuffle_keeps_current_card() -> Fallible<()> {
        let now = Timestamp::from_millis(0);
        let coll = collection_with(&PAIRS, now)?;
        let mut rng = StdRng::seed_from_u64(9);
        let mut session = started(start_browse(&coll, "d")).next_card().next_card();
        for _ in 0..10 {
            let before = session.current().map(|c| c.card_id.clone());
            session = session.shuffle(&mut rng);
            assert_eq!(session.current().map(|c| c.card_id.clone()), before);
            assert_eq!(session.cards().len(), PAIRS.len());
        }
        Ok(())
    }

    #[test]
    fn test_study_shuffle_only_reorders_pending_cards() -> Fallible<()> {
        let now = Timestamp::from_millis(0);
        let mut coll = collection_with(&PAIRS, now)?;
        let mut rng = StdRng::seed_from_u64(4);
        let session = started(start_study(&coll, "d", now, &mut rng));
        let session = session.grade(&mut coll, Grade::GOOD, now)?;
        let session = session.grade(&mut coll, Grade::AGAIN, now)?;
        let graded: Vec<CardId> = ids(&session)[..2].to_vec();
        let current = session.current().map(|c| c.card_id.clone());
        let mut session = session.shuffle(&mut rng);
        assert_eq!(ids(&session)[..2], graded[..]);
        assert_eq!(session.current().map(|c| c.card_id.clone()), current);

        let mut graded_count = 2;
        while session.state() == State::Active {
            session = session.grade(&mut coll, Grade::GOOD, now)?;
            graded_count += 1;
        }
        assert_eq!(graded_count, PAIRS.len());
        let tally = session.tally();
        assert_eq!(tally.correct + tally.wrong, PAIRS.len());
        Ok(())
    }

    #[test]
    fn test_failed_save_returns_session() -> Fallible<()> {
        let now = Timestamp::from_millis(0);
        let (blobs, broken) = BreakableStore::new();
        let mut coll = Collection::new(Repository::new(blobs, "flashcards:v1"));
        let cards = [CardInput::new("a", "1"), CardInput::new("b", "2")];
        coll.import_cards(&cards, "d", "Deck", None, now)?;
        let mut rng = StdRng::seed_from_u64(1);
        let session = started(start_study(&coll, "d", now, &mut rng)).reveal();
        let first = session.current().map(|c| c.card_id.clone());

        broken.set(true);
        let GradeError { session, error } = match session.grade(&mut coll, Grade::GOOD, now) {
            Ok(_) => panic!("grading should fail while the store is broken"),
            Err(e) => e,
        };
        assert!(error.to_string().contains("disk full"));
        assert_eq!(session.state(), State::Active);
        assert_eq!(session.progress(), (1, 2));
        assert_eq!(session.tally(), Tally::default());
        assert!(session.is_revealed());
        assert_eq!(session.current().map(|c| c.card_id.clone()), first);
        assert_eq!(coll.get_stats("d", now).unwrap().new, 2);

        // Once the store recovers, the same session carries on.
        broken.set(false);
        let session = session.grade(&mut coll, Grade::GOOD, now)?;
        assert_eq!(session.tally(), Tally { correct: 1, wrong: 0 });
        assert_eq!(session.progress(), (2, 2));
        assert_eq!(coll.get_stats("d", now).unwrap().learning, 1);
        Ok(())
    }

    #[test]
    fn test_abandon() -> Fallible<()> {
        let now = Timestamp::from_millis(0);
        let mut coll = collection_with(&PAIRS, now)?;
        let mut rng = StdRng::seed_from_u64(1);
        let session = started(start_study(&coll, "d", now, &mut rng));
        let session = session.grade(&mut coll, Grade::AGAIN, now)?.abandon();
        assert_eq!(session.state(), State::Abandoned);
        assert_eq!(session.tally(), Tally { correct: 0, wrong: 1 });
        assert!(session.current().is_none());
        // The review made before abandoning was saved.
        let lapses: u32 = coll
            .get_deck("d")
            .unwrap()
            .cards
            .iter()
            .map(|c| c.card.lapses)
            .sum();
        assert_eq!(lapses, 1);
        assert!(session.grade(&mut coll, Grade::GOOD, now).is_err());
        Ok(())
    }
}
