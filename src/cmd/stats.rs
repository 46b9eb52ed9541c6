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
use crate::collection::Stats;
use crate::error::Fallible;
use crate::error::fail;
use crate::store::BlobStore;
use crate::types::timestamp::Timestamp;

pub fn print_deck_stats<S: BlobStore>(
    coll: &Collection<S>,
    deck_id: &str,
    format: OutputFormat,
    now: Timestamp,
    out: &mut impl Write,
) -> Fallible<()> {
    let Some(deck) = coll.get_deck(deck_id) else {
        return fail(format!("deck not found: {deck_id}"));
    };
    let stats = Stats::of(&deck, now);
    match format {
        OutputFormat::Text => {
            writeln!(out, "{}", deck.name)?;
            if let Some(url) = &deck.source_url {
                writeln!(out, "Source:   {url}")?;
            }
            writeln!(out, "Total:    {}", stats.total)?;
            writeln!(out, "Due:      {}", stats.due)?;
            writeln!(out, "New:      {}", stats.new)?;
            writeln!(out, "Learning: {}", stats.learning)?;
            writeln!(out, "Learned:  {}", stats.learned)?;
        }
        OutputFormat::Json => {
            let report = StatsReport {
                deck_id: deck.id,
                name: deck.name,
                stats,
            };
            let json = serde_json::to_string_pretty(&report)?;
            writeln!(out, "{json}")?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsReport {
    deck_id: String,
    name: String,
    #[serde(flatten)]
    stats: Stats,
}
