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

use crate::config::Config;
use crate::db::Database;
use crate::deck::parse_deck;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::card::Card;

/// Name of the review database inside a collection directory.
pub const DATABASE_FILE: &str = "moneycards.db";

/// A collection directory, opened: its configuration, its cards and its
/// review database.
pub struct Collection {
    pub directory: PathBuf,
    pub config: Config,
    pub db: Database,
    pub cards: Vec<Card>,
}

impl Collection {
    pub fn new(directory: Option<String>, learner: Option<String>) -> Fallible<Self> {
        let directory: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => current_dir()?,
        };
        let directory = if directory.exists() {
            directory.canonicalize()?
        } else {
            return fail("directory does not exist.");
        };

        let config = Config::load(&directory)?.with_learner(learner)?;

        log::debug!("Loading deck...");
        let cards = parse_deck(&directory)?;

        let db_path: PathBuf = directory.join(DATABASE_FILE);
        let db_path: &str = db_path
            .to_str()
            .ok_or_else(|| ErrorReport::new("invalid path"))?;
        let db: Database = Database::new(db_path)?;

        Ok(Self {
            directory,
            config,
            db,
            cards,
        })
    }

    pub fn learner(&self) -> &str {
        &self.config.learner
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_non_existent_directory() {
        let result = Collection::new(Some("./derpherp".to_string()), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_open() -> Fallible<()> {
        let dir = tempdir()?;
        write(dir.path().join("moneycards.toml"), "learner = \"ana\"\n")?;
        write(
            dir.path().join("credit.toml"),
            "[[cards]]\nid = \"apr\"\nterm = \"APR\"\ndefinition = \"Annual percentage rate.\"\n",
        )?;
        let directory = dir.path().display().to_string();
        let coll = Collection::new(Some(directory.clone()), None)?;
        assert_eq!(coll.learner(), "ana");
        assert_eq!(coll.cards.len(), 1);
        assert!(dir.path().join(DATABASE_FILE).exists());
        let coll = Collection::new(Some(directory), Some("ben".to_string()))?;
        assert_eq!(coll.learner(), "ben");
        Ok(())
    }
}
