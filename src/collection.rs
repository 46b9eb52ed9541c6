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

use std::collections::HashSet;

use serde::Serialize;

use crate::error::Fallible;
use crate::scheduler::MAX_BOX;
use crate::scheduler::reset_progress;
use crate::scheduler::review;
use crate::store::BlobStore;
use crate::store::Repository;
use crate::store::Store;
use crate::types::card::CardInput;
use crate::types::card::CardRecord;
use crate::types::card_id::CardId;
use crate::types::deck::Deck;
use crate::types::deck::DeckCard;
use crate::types::deck::DeckRecord;
use crate::types::deck::card_key;
use crate::types::review::Grade;
use crate::types::timestamp::Timestamp;

/// All decks and cards, backed by a repository. Every operation that
/// changes state takes `&mut self` and runs a complete load, mutate, save
/// cycle, so no two writes can interleave.
pub struct Collection<S: BlobStore> {
    repo: Repository<S>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: usize,
    /// Cards whose due date has passed. A new card is usually also due.
    pub due: usize,
    pub new: usize,
    /// Cards past box zero but not yet in the last box.
    pub learning: usize,
    pub learned: usize,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSummary {
    pub id: String,
    pub name: String,
    pub source_url: Option<String>,
    pub card_count: usize,
    pub imported_at: Timestamp,
}

impl DeckSummary {
    /// Bundled decks remember where they were loaded from.
    pub fn is_bundled(&self) -> bool {
        self.source_url.is_some()
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ImportSummary {
    pub deck_id: String,
    /// The number of cards that did not exist before this import.
    pub added: usize,
    /// The number of valid cards in the input.
    pub total: usize,
}

/// The identifier given to a deck uploaded by the user.
pub fn user_deck_id(now: Timestamp) -> String {
    format!("deck-{}", now.as_millis())
}

impl<S: BlobStore> Collection<S> {
    pub fn new(repo: Repository<S>) -> Self {
        Self { repo }
    }

    /// Add cards to a deck, creating the deck if needed. Importing a card
    /// that is already in the deck leaves its progress untouched, so
    /// importing the same source twice is harmless.
    ///
    /// Returns `None`, and changes nothing, if the input contains no card
    /// with both a front and a back.
    pub fn import_cards(
        &mut self,
        cards: &[CardInput],
        deck_id: &str,
        deck_name: &str,
        source_url: Option<&str>,
        now: Timestamp,
    ) -> Fallible<Option<ImportSummary>> {
        let cards: Vec<(&str, &str)> = cards
            .iter()
            .map(|c| (c.front.trim(), c.back.trim()))
            .filter(|(front, back)| !front.is_empty() && !back.is_empty())
            .collect();
        if cards.is_empty() {
            log::debug!("Nothing to import into {deck_id}.");
            return Ok(None);
        }

        let mut store = self.repo.load();
        let Store { decks, cards: records, .. } = &mut store;
        let deck = decks.entry(deck_id.to_string()).or_insert_with(|| {
            log::debug!("Creating deck {deck_id} ({deck_name}).");
            DeckRecord {
                name: deck_name.to_string(),
                source_url: source_url.map(str::to_string),
                card_order: Vec::new(),
                imported_at: now,
            }
        });

        let mut seen: HashSet<CardId> = deck.card_order.iter().cloned().collect();
        let mut added = 0;
        for (front, back) in cards.iter() {
            let card_id = CardId::derive(front, back);
            let key = card_key(deck_id, &card_id);
            if !records.contains_key(&key) {
                records.insert(
                    key,
                    CardRecord::new(front.to_string(), back.to_string(), now),
                );
                added += 1;
            }
            if seen.insert(card_id.clone()) {
                deck.card_order.push(card_id);
            }
        }

        self.repo.save(&store)?;
        log::info!(
            "Imported {} cards into {deck_id} ({added} new).",
            cards.len()
        );
        Ok(Some(ImportSummary {
            deck_id: deck_id.to_string(),
            added,
            total: cards.len(),
        }))
    }

    /// The deck with its cards in deck order, or `None` if there is no such
    /// deck.
    pub fn get_deck(&self, deck_id: &str) -> Option<Deck> {
        let store = self.repo.load();
        materialize(&store, deck_id)
    }

    pub fn get_stats(&self, deck_id: &str, now: Timestamp) -> Option<Stats> {
        let deck = self.get_deck(deck_id)?;
        Some(Stats::of(&deck, now))
    }

    /// All decks, oldest first.
    pub fn list_decks(&self) -> Vec<DeckSummary> {
        let store = self.repo.load();
        summaries(&store)
    }

    /// All decks, oldest first, each with its statistics. Reads the
    /// document once.
    pub fn list_decks_with_stats(&self, now: Timestamp) -> Vec<(DeckSummary, Stats)> {
        let store = self.repo.load();
        summaries(&store)
            .into_iter()
            .filter_map(|summary| {
                let deck = materialize(&store, &summary.id)?;
                Some((summary, Stats::of(&deck, now)))
            })
            .collect()
    }

    /// Record a review of a card. Returns the card's updated state, or
    /// `None` if the card does not exist.
    pub fn review_card(
        &mut self,
        deck_id: &str,
        card_id: &CardId,
        grade: Grade,
        now: Timestamp,
    ) -> Fallible<Option<CardRecord>> {
        let mut store = self.repo.load();
        let Some(card) = store.cards.get_mut(&card_key(deck_id, card_id)) else {
            log::warn!("Review of unknown card {deck_id}:{card_id}.");
            return Ok(None);
        };
        let from = card.leitner_box;
        let result = review(card, grade, now);
        log::debug!(
            "{deck_id}:{card_id} {} ({result}) box {from} -> {} due={}",
            grade.as_str(),
            card.leitner_box,
            card.due_at
        );
        let card = card.clone();
        self.repo.save(&store)?;
        Ok(Some(card))
    }

    /// Reset every card in the deck to new. Returns `false` if there is no
    /// such deck.
    pub fn reset_deck(&mut self, deck_id: &str, now: Timestamp) -> Fallible<bool> {
        let mut store = self.repo.load();
        let Some(deck) = store.decks.get(deck_id) else {
            return Ok(false);
        };
        for card_id in deck.card_order.iter() {
            if let Some(card) = store.cards.get_mut(&card_key(deck_id, card_id)) {
                reset_progress(card, now);
            }
        }
        self.repo.save(&store)?;
        log::info!("Reset progress of deck {deck_id}.");
        Ok(true)
    }

    /// Delete a deck and all of its cards. Returns `false` if there is no
    /// such deck.
    pub fn delete_deck(&mut self, deck_id: &str) -> Fallible<bool> {
        let mut store = self.repo.load();
        let Some(deck) = store.decks.remove(deck_id) else {
            return Ok(false);
        };
        for card_id in deck.card_order.iter() {
            store.cards.remove(&card_key(deck_id, card_id));
        }
        self.repo.save(&store)?;
        log::info!("Deleted deck {deck_id}.");
        Ok(true)
    }
}

fn summaries(store: &Store) -> Vec<DeckSummary> {
    let mut decks: Vec<DeckSummary> = store
        .decks
        .iter()
        .map(|(id, deck)| DeckSummary {
            id: id.clone(),
            name: deck.name.clone(),
            source_url: deck.source_url.clone(),
            card_count: deck.card_order.len(),
            imported_at: deck.imported_at,
        })
        .collect();
    decks.sort_by(|a, b| a.imported_at.cmp(&b.imported_at).then(a.id.cmp(&b.id)));
    decks
}

fn materialize(store: &Store, deck_id: &str) -> Option<Deck> {
    let record = store.decks.get(deck_id)?;
    let mut cards = Vec::with_capacity(record.card_order.len());
    for card_id in record.card_order.iter() {
        match store.cards.get(&card_key(deck_id, card_id)) {
            Some(card) => cards.push(DeckCard {
                card_id: card_id.clone(),
                card: card.clone(),
            }),
            None => {
                // Skip dangling references rather than failing the whole deck.
                log::warn!("Deck {deck_id} references missing card {card_id}, skipping.");
            }
        }
    }
    Some(Deck {
        id: deck_id.to_string(),
        name: record.name.clone(),
        source_url: record.source_url.clone(),
        imported_at: record.imported_at,
        cards,
    })
}

impl Stats {
    /// Statistics of an already loaded deck.
    pub fn of(deck: &Deck, now: Timestamp) -> Self {
        let mut stats = Stats {
            total: deck.cards.len(),
            due: 0,
            new: 0,
            learning: 0,
            learned: 0,
        };
        for DeckCard { card, .. } in deck.cards.iter() {
            if card.leitner_box == 0 {
                stats.new += 1;
            } else if card.leitner_box >= MAX_BOX {
                stats.learned += 1;
            } else {
                stats.learning += 1;
            }
            if card.is_due(now) {
                stats.due += 1;
            }
        }
        stats
    }
}
