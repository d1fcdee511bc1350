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

//! Spaced repetition for financial literacy flashcards.
//!
//! The scheduling core lives in [`scheduler`] and [`sm2`] and is free of
//! I/O. The rest of the crate loads decks, stores review records in SQLite
//! and drives review sessions from the command line.

pub mod cli;
pub mod cmd;
pub mod collection;
pub mod config;
pub mod db;
pub mod deck;
pub mod error;
pub mod scheduler;
pub mod session;
pub mod sm2;
pub mod store;
pub mod types;
