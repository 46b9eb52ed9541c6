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

use std::fs::read_to_string;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::Fallible;

/// The name of the optional configuration file in a collection directory.
pub const CONFIG_FILE: &str = "leitner.toml";

#[derive(Clone, PartialEq, Eq, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// The key the document is stored under.
    pub storage_key: String,
    /// The database file, relative to the collection directory.
    pub database: PathBuf,
    /// The bundled deck catalog, relative to the collection directory.
    pub catalog: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: "flashcards:v1".to_string(),
            database: PathBuf::from("leitner.db"),
            catalog: PathBuf::from("decks/index.json"),
        }
    }
}

impl Config {
    /// Read the configuration file in the given directory. If there is none,
    /// the defaults are used.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        log::debug!("Reading configuration from {}.", path.display());
        let content = read_to_string(&path)?;
        Self::parse(&content)
    }

    fn parse(content: &str) -> Fallible<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}
