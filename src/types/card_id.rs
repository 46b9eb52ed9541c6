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

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;

use crate::error::ErrorReport;
use crate::error::Fallible;

/// Separates the front and back text before hashing, so that `("ab", "c")`
/// and `("a", "bc")` produce different digests. This is the symbol for the
/// unit separator, which does not occur in ordinary text, and matches the
/// IDs found in documents written by the web app.
const FIELD_SEPARATOR: char = '\u{241F}';

/// The number of hex characters kept from the digest (64 bits).
const ID_LENGTH: usize = 16;

/// A content-addressed card identifier: a truncated SHA-256 digest of the
/// card's trimmed front and back text.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CardId {
    hex: String,
}

impl CardId {
    /// Derive the identifier of a card from its text. Surrounding whitespace
    /// is ignored.
    pub fn derive(front: &str, back: &str) -> Self {
        let mut hasher = Hasher::new();
        hasher.update(front.trim().as_bytes());
        hasher.update(FIELD_SEPARATOR.to_string().as_bytes());
        hasher.update(back.trim().as_bytes());
        hasher.finalize()
    }

    pub fn as_str(&self) -> &str {
        &self.hex
    }

    pub fn from_hex(s: &str) -> Fallible<Self> {
        let valid = s.len() == ID_LENGTH
            && s.chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
        if !valid {
            return Err(ErrorReport::new(format!("invalid card id: {s:?}")));
        }
        Ok(Self { hex: s.to_string() })
    }
}

impl TryFrom<String> for CardId {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CardId::from_hex(&value)
    }
}

impl From<CardId> for String {
    fn from(value: CardId) -> Self {
        value.hex
    }
}

impl Display for CardId {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.hex)
    }
}

/// Wrapper around the underlying hash function.
struct Hasher {
    inner: Sha256,
}

impl Hasher {
    fn new() -> Self {
        Self {
            inner: Sha256::new(),
        }
    }

    fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    fn finalize(self) -> CardId {
        let hex = format!("{:x}", self.inner.finalize());
        CardId {
            hex: hex[..ID_LENGTH].to_string(),
        }
    }
}
