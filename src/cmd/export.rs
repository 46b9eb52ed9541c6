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

use std::io::Write;

use serde::Serialize;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::error::fail;
use crate::store::BlobStore;
use crate::types::card_id::CardId;
use crate::types::deck::Deck;
use crate::types::review::ReviewResult;
use crate::types::timestamp::Timestamp;

/// Print a deck's cards and their progress as JSON, in deck order.
pub fn export_deck<S: BlobStore>(
    coll: &Collection<S>,
    deck_id: &str,
    out: &mut impl Write,
) -> Fallible<()> {
    let Some(deck) = coll.get_deck(deck_id) else {
        return fail(format!("deck not found: {deck_id}"));
    };
    let export = get_export(deck);
    let json: String = serde_json::to_string_pretty(&export)?;
    writeln!(out, "{json}")?;
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Export {
    id: String,
    name: String,
    source_url: Option<String>,
    imported_at: String,
    cards: Vec<CardExport>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CardExport {
    card_id: CardId,
    front: String,
    back: String,
    #[serde(rename = "box")]
    leitner_box: u8,
    due_at: String,
    last_reviewed_at: Option<String>,
    last_result: Option<ReviewResult>,
    lapses: u32,
}

fn get_export(deck: Deck) -> Export {
    let cards = deck
        .cards
        .into_iter()
        .map(|c| CardExport {
            card_id: c.card_id,
            front: c.card.front,
            back: c.card.back,
            leitner_box: c.card.leitner_box,
            due_at: c.card.due_at.to_string(),
            last_reviewed_at: c.card.last_reviewed_at.map(|ts: Timestamp| ts.to_string()),
            last_result: c.card.last_result,
            lapses: c.card.lapses,
        })
        .collect();
    Export {
        id: deck.id,
        name: deck.name,
        source_url: deck.source_url,
        imported_at: deck.imported_at.to_string(),
        cards,
    }
}
