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

use crate::types::card_id::CardId;

/// How demanding a card is, as labelled by the deck author.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        };
        write!(f, "{name}")
    }
}

/// A flashcard. Cards are reference content: the scheduler only ever reads
/// their id.
#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    id: CardId,
    /// The name of the deck this card belongs to.
    deck_name: String,
    term: String,
    definition: String,
    example: Option<String>,
    category: Option<String>,
    difficulty: Difficulty,
}

impl Card {
    pub fn new(
        id: CardId,
        deck_name: String,
        term: String,
        definition: String,
        example: Option<String>,
        category: Option<String>,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            id,
            deck_name,
            term,
            definition,
            example,
            category,
            difficulty,
        }
    }

    pub fn id(&self) -> &CardId {
        &self.id
    }

    pub fn deck_name(&self) -> &str {
        &self.deck_name
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn definition(&self) -> &str {
        &self.definition
    }

    pub fn example(&self) -> Option<&str> {
        self.example.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}
