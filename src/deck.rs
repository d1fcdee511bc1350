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

use std::collections::HashSet;
use std::fs::read_to_string;
use std::path::Path;
use std::time::Instant;

use serde::Deserialize;
use walkdir::WalkDir;

use crate::config::CONFIG_FILE;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::card::Card;
use crate::types::card::Difficulty;
use crate::types::card_id::CardId;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DeckFile {
    name: Option<String>,
    #[serde(default)]
    cards: Vec<CardEntry>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CardEntry {
    id: Option<String>,
    term: String,
    definition: String,
    example: Option<String>,
    category: Option<String>,
    #[serde(default)]
    difficulty: Difficulty,
}

/// Load every deck file under `directory`, in path order.
pub fn parse_deck(directory: &Path) -> Fallible<Vec<Card>> {
    let start = Instant::now();
    let mut paths = Vec::new();
    for entry in WalkDir::new(directory) {
        let entry = entry?;
        let path = entry.path();
        let is_toml = path.extension().is_some_and(|ext| ext == "toml");
        let is_config = path.file_name().is_some_and(|name| name == CONFIG_FILE);
        if path.is_file() && is_toml && !is_config {
            paths.push(path.to_path_buf());
        }
    }
    paths.sort();

    let mut cards = Vec::new();
    for path in paths {
        let default_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default();
        let text = read_to_string(&path)?;
        let parsed = parse_deck_file(&default_name, &text)
            .map_err(|e| ErrorReport::new(format!("{}: {e}", path.display())))?;
        cards.extend(parsed);
    }

    let mut seen: HashSet<&CardId> = HashSet::new();
    for card in &cards {
        if !seen.insert(card.id()) {
            return fail(format!("duplicate card id: {}", card.id()));
        }
    }
    let duration = start.elapsed().as_millis();
    log::debug!("Loaded {} cards in {duration}ms.", cards.len());
    Ok(cards)
}

/// Parse a single deck file. The deck is named by its `name` key, falling
/// back to `default_name`.
pub fn parse_deck_file(default_name: &str, text: &str) -> Fallible<Vec<Card>> {
    let deck: DeckFile = toml::from_str(text)?;
    let deck_name = deck.name.unwrap_or_else(|| default_name.to_string());
    let mut cards = Vec::with_capacity(deck.cards.len());
    for entry in deck.cards {
        let term = entry.term.trim().to_string();
        let definition = entry.definition.trim().to_string();
        if term.is_empty() {
            return fail("card has an empty term.");
        }
        if definition.is_empty() {
            return fail(format!("card {term:?} has an empty definition."));
        }
        let id = match entry.id {
            Some(id) => CardId::new(id)?,
            None => CardId::from_content(&[term.as_str(), definition.as_str()]),
        };
        cards.push(Card::new(
            id,
            deck_name.clone(),
            term,
            definition,
            entry.example,
            entry.category,
            entry.difficulty,
        ));
    }
    Ok(cards)
}

#[cfg(test)]
mod tests {
    use std::fs::create_dir_all;
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;

    const BUDGETING: &str = r#"
name = "Budgeting"

[[cards]]
id = "budget-50-30-20"
term = "50/30/20 rule"
definition = "Spend 50% on needs, 30% on wants and save 20%."
category = "budgeting"

[[cards]]
term = "Emergency fund"
definition = "Savings set aside to cover three to six months of expenses."
example = "Keeping $9,000 in a savings account when monthly costs are $2,000."
difficulty = "intermediate"
"#;

    #[test]
    fn test_parse_deck_file() -> Fallible<()> {
        let cards = parse_deck_file("budgeting", BUDGETING)?;
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].id().as_str(), "budget-50-30-20");
        assert_eq!(cards[0].deck_name(), "Budgeting");
        assert_eq!(cards[0].category(), Some("budgeting"));
        assert_eq!(cards[0].difficulty(), Difficulty::Beginner);
        assert_eq!(cards[1].difficulty(), Difficulty::Intermediate);
        assert!(cards[1].example().is_some());
        assert_eq!(
            cards[1].id(),
            &CardId::from_content(&[
                "Emergency fund",
                "Savings set aside to cover three to six months of expenses."
            ])
        );
        Ok(())
    }

    #[test]
    fn test_default_deck_name() -> Fallible<()> {
        let text = "[[cards]]\nterm = \"APR\"\ndefinition = \"Annual percentage rate.\"\n";
        let cards = parse_deck_file("credit", text)?;
        assert_eq!(cards[0].deck_name(), "credit");
        Ok(())
    }

    #[test]
    fn test_rejects_empty_fields() {
        let text = "[[cards]]\nterm = \"APR\"\ndefinition = \"  \"\n";
        assert!(parse_deck_file("credit", text).is_err());
        let text = "[[cards]]\nterm = \"\"\ndefinition = \"Annual percentage rate.\"\n";
        assert!(parse_deck_file("credit", text).is_err());
    }

    #[test]
    fn test_rejects_unknown_difficulty() {
        let text = "[[cards]]\nterm = \"APR\"\ndefinition = \"Rate.\"\ndifficulty = \"expert\"\n";
        assert!(parse_deck_file("credit", text).is_err());
    }

    #[test]
    fn test_parse_directory() -> Fallible<()> {
        let dir = tempdir()?;
        create_dir_all(dir.path().join("credit"))?;
        write(dir.path().join("budgeting.toml"), BUDGETING)?;
        write(
            dir.path().join("credit/apr.toml"),
            "[[cards]]\nid = \"apr\"\nterm = \"APR\"\ndefinition = \"Annual percentage rate.\"\n",
        )?;
        write(dir.path().join(CONFIG_FILE), "learner = \"ana\"\n")?;
        write(dir.path().join("notes.txt"), "not a deck")?;
        let cards = parse_deck(dir.path())?;
        let ids: Vec<&str> = cards.iter().map(|c| c.id().as_str()).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids[0], "budget-50-30-20");
        assert_eq!(ids[2], "apr");
        Ok(())
    }

    #[test]
    fn test_duplicate_ids() -> Fallible<()> {
        let dir = tempdir()?;
        let card = "[[cards]]\nid = \"apr\"\nterm = \"APR\"\ndefinition = \"Annual percentage rate.\"\n";
        write(dir.path().join("a.toml"), card)?;
        write(dir.path().join("b.toml"), card)?;
        let result = parse_deck(dir.path());
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn test_demo_collection() -> Fallible<()> {
        let cards = parse_deck(Path::new("./demos/basics"))?;
        assert_eq!(cards.len(), 6);
        Ok(())
    }
}
