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

use crate::cmd::OutputFormat;
use crate::collection::Collection;
use crate::collection::DeckSummary;
use crate::collection::Stats;
use crate::error::Fallible;
use crate::store::BlobStore;
use crate::types::timestamp::Timestamp;

/// List every deck with its card counts.
pub fn list_decks<S: BlobStore>(
    coll: &Collection<S>,
    format: OutputFormat,
    now: Timestamp,
    out: &mut impl Write,
) -> Fallible<()> {
    let listing: Vec<DeckListing> = coll
        .list_decks_with_stats(now)
        .into_iter()
        .map(|(summary, stats)| DeckListing { summary, stats })
        .collect();
    match format {
        OutputFormat::Text => {
            if listing.is_empty() {
                writeln!(out, "No decks yet.")?;
            }
            for DeckListing { summary, stats } in listing.iter() {
                let kind = if summary.is_bundled() { "bundled" } else { "mine" };
                writeln!(
                    out,
                    "{}\t{}\t[{kind}]\t{} cards, {} due",
                    summary.id, summary.name, stats.total, stats.due
                )?;
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&listing)?;
            writeln!(out, "{json}")?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct DeckListing {
    #[serde(flatten)]
    summary: DeckSummary,
    stats: Stats,
}
