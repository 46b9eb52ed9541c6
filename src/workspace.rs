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

use std::env::current_dir;
use std::path::PathBuf;

use crate::collection::Collection;
use crate::config::Config;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::store::Repository;
use crate::store::SqliteStore;

/// A collection directory: its configuration and the collection stored in
/// it.
pub struct Workspace {
    pub directory: PathBuf,
    pub config: Config,
    pub collection: Collection<SqliteStore>,
}

impl Workspace {
    pub fn open(directory: Option<String>) -> Fallible<Self> {
        let directory: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => current_dir()?,
        };
        let directory = if directory.exists() {
            directory.canonicalize()?
        } else {
            return fail("directory does not exist.");
        };

        let config = Config::load(&directory)?;

        let db_path: PathBuf = directory.join(&config.database);
        let db_path: &str = db_path
            .to_str()
            .ok_or_else(|| ErrorReport::new("invalid path"))?;
        log::debug!("Opening {db_path}.");
        let blobs = SqliteStore::new(db_path)?;
        let collection = Collection::new(Repository::new(blobs, config.storage_key.clone()));

        Ok(Self {
            directory,
            config,
            collection,
        })
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.directory.join(&self.config.catalog)
    }
}
