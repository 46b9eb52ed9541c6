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

/// A review grade. The conventional values are the constants below, but any
/// integer is accepted: grades of 3 or more count as a correct answer,
/// anything lower as a wrong one.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grade(u8);

impl Grade {
    pub const AGAIN: Grade = Grade(0);
    pub const HARD: Grade = Grade(1);
    pub const GOOD: Grade = Grade(3);
    pub const EASY: Grade = Grade(5);

    /// The lowest grade that counts as a correct answer.
    const PASSING: u8 = 3;

    pub fn new(value: u8) -> Self {
        Self(value)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Collapses the grade into a binary outcome. `HARD` is a failure just
    /// like `AGAIN`.
    pub fn is_correct(self) -> bool {
        self.0 >= Self::PASSING
    }

    pub fn result(self) -> ReviewResult {
        if self.is_correct() {
            ReviewResult::Correct
        } else {
            ReviewResult::Wrong
        }
    }

    pub fn as_str(self) -> &'static str {
        match self.0 {
            0 => "again",
            1 => "hard",
            3 => "good",
            5 => "easy",
            _ if self.is_correct() => "pass",
            _ => "fail",
        }
    }
}

/// The outcome of the most recent review of a card.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewResult {
    Correct,
    Wrong,
}

impl Display for ReviewResult {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            ReviewResult::Correct => write!(f, "correct"),
            ReviewResult::Wrong => write!(f, "wrong"),
        }
    }
}
