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

use csv::ReaderBuilder;
use csv::Trim;

use crate::error::Fallible;
use crate::types::card::CardInput;

/// Parse CSV text with one `front,back` record per line. Fields may be
/// double-quoted, in which case commas inside them are literal and `""`
/// stands for a quote. Records with fewer than two fields are ignored, as
/// are any fields past the second.
pub fn parse_csv(text: &str) -> Fallible<Vec<CardInput>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());
    let mut cards = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let (Some(front), Some(back)) = (record.get(0), record.get(1)) {
            cards.push(CardInput::new(front, back));
        }
    }
    Ok(cards)
}
