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

use std::io::stdin;
use std::io::stdout;
use std::path::PathBuf;

use clap::Parser;

use crate::cmd::OutputFormat;
use crate::cmd::browse::browse;
use crate::cmd::catalog::list_catalog;
use crate::cmd::catalog::load_deck;
use crate::cmd::decks::list_decks;
use crate::cmd::export::export_deck;
use crate::cmd::import::import_path;
use crate::cmd::manage::delete_deck;
use crate::cmd::manage::reset_deck;
use crate::cmd::stats::print_deck_stats;
use crate::cmd::study::study;
use crate::error::Fallible;
use crate::types::timestamp::Timestamp;
use crate::workspace::Workspace;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// List decks.
    Decks {
        /// Path to the collection directory.
        #[arg(short, long)]
        directory: Option<String>,
        /// Output format.
        #[arg(long, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Import a CSV file, or a directory of CSV files, as new decks.
    Import {
        /// The CSV file or directory to import.
        path: String,
        /// The deck name. Defaults to the file name.
        #[arg(long)]
        name: Option<String>,
        /// Path to the collection directory.
        #[arg(short, long)]
        directory: Option<String>,
    },
    /// List the bundled decks.
    Catalog {
        /// Path to the collection directory.
        #[arg(short, long)]
        directory: Option<String>,
    },
    /// Load a bundled deck.
    Load {
        /// The bundled deck's ID.
        deck: String,
        /// Path to the collection directory.
        #[arg(short, long)]
        directory: Option<String>,
    },
    /// Print deck statistics.
    Stats {
        /// The deck's ID.
        deck: String,
        /// Path to the collection directory.
        #[arg(short, long)]
        directory: Option<String>,
        /// Output format.
        #[arg(long, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Study the cards that are due.
    Study {
        /// The deck's ID.
        deck: String,
        /// Path to the collection directory.
        #[arg(short, long)]
        directory: Option<String>,
    },
    /// Flip through every card in a deck.
    Browse {
        /// The deck's ID.
        deck: String,
        /// Path to the collection directory.
        #[arg(short, long)]
        directory: Option<String>,
    },
    /// Reset all progress in a deck.
    Reset {
        /// The deck's ID.
        deck: String,
        /// Don't ask for confirmation.
        #[arg(short, long)]
        yes: bool,
        /// Path to the collection directory.
        #[arg(short, long)]
        directory: Option<String>,
    },
    /// Delete a deck.
    Delete {
        /// The deck's ID.
        deck: String,
        /// Don't ask for confirmation.
        #[arg(short, long)]
        yes: bool,
        /// Path to the collection directory.
        #[arg(short, long)]
        directory: Option<String>,
    },
    /// Export a deck's cards and progress as JSON.
    Export {
        /// The deck's ID.
        deck: String,
        /// Path to the collection directory.
        #[arg(short, long)]
        directory: Option<String>,
    },
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    let mut out = stdout().lock();
    let mut input = stdin().lock();
    match cli {
        Command::Decks { directory, format } => {
            let ws = Workspace::open(directory)?;
            list_decks(&ws.collection, format, Timestamp::now(), &mut out)
        }
        Command::Import {
            path,
            name,
            directory,
        } => {
            let mut ws = Workspace::open(directory)?;
            let path = PathBuf::from(path);
            import_path(&mut ws.collection, &path, name, Timestamp::now(), &mut out)?;
            Ok(())
        }
        Command::Catalog { directory } => {
            let ws = Workspace::open(directory)?;
            list_catalog(&ws.collection, &ws.catalog_path(), Timestamp::now(), &mut out)
        }
        Command::Load { deck, directory } => {
            let mut ws = Workspace::open(directory)?;
            let catalog_path = ws.catalog_path();
            load_deck(
                &mut ws.collection,
                &catalog_path,
                &deck,
                Timestamp::now(),
                &mut out,
            )
        }
        Command::Stats {
            deck,
            directory,
            format,
        } => {
            let ws = Workspace::open(directory)?;
            print_deck_stats(&ws.collection, &deck, format, Timestamp::now(), &mut out)
        }
        Command::Study { deck, directory } => {
            let mut ws = Workspace::open(directory)?;
            let mut rng = rand::thread_rng();
            study(&mut ws.collection, &deck, &mut rng, &mut input, &mut out)?;
            Ok(())
        }
        Command::Browse { deck, directory } => {
            let ws = Workspace::open(directory)?;
            let mut rng = rand::thread_rng();
            browse(&ws.collection, &deck, &mut rng, &mut input, &mut out)?;
            Ok(())
        }
        Command::Reset {
            deck,
            yes,
            directory,
        } => {
            let mut ws = Workspace::open(directory)?;
            reset_deck(&mut ws.collection, &deck, yes, &mut input, &mut out)
        }
        Command::Delete {
            deck,
            yes,
            directory,
        } => {
            let mut ws = Workspace::open(directory)?;
            delete_deck(&mut ws.collection, &deck, yes, &mut input, &mut out)
        }
        Command::Export { deck, directory } => {
            let ws = Workspace::open(directory)?;
            export_deck(&ws.collection, &deck, &mut out)
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Command::command().debug_assert();
    }

    #[test]
    fn test_parse_study() {
        let cli = Command::try_parse_from(["leitner", "study", "deck-1", "-d", "/tmp"]).unwrap();
        match cli {
            Command::Study { deck, directory } => {
                assert_eq!(deck, "deck-1");
                assert_eq!(directory.as_deref(), Some("/tmp"));
            }
            _ => panic!("Expected study command"),
        }
    }

    #[test]
    fn test_parse_stats_format() {
        let cli = Command::try_parse_from(["leitner", "stats", "d", "--format", "json"]).unwrap();
        match cli {
            Command::Stats { format, .. } => assert_eq!(format, OutputFormat::Json),
            _ => panic!("Expected stats command"),
        }
    }
}
