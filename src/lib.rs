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

//! An offline flashcard tool using the Leitner box system.
//!
//! Cards live in decks and move between five boxes as they are reviewed: a
//! correct answer moves a card up one box, a wrong answer sends it back to
//! the first. Each box has a fixed review interval. All state is kept as a
//! single JSON document in a key-value store.

pub mod catalog;
pub mod cli;
pub mod cmd;
pub mod collection;
pub mod config;
pub mod error;
pub mod parser;
pub mod scheduler;
pub mod session;
pub mod store;
pub mod types;
pub mod workspace;
