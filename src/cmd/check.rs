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

use crate::collection::Collection;
use crate::error::Fallible;

pub fn check_collection(directory: Option<String>) -> Fallible<()> {
    let coll = Collection::new(directory, None)?;
    log::debug!(
        "{} cards, learner {}.",
        coll.cards.len(),
        coll.learner()
    );
    println!("ok");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_non_existent_directory() {
        assert!(check_collection(Some("./derpherp".to_string())).is_err());
    }

    #[test]
    fn test_valid_directory() -> Fallible<()> {
        let dir = tempdir()?;
        write(
            dir.path().join("tax.toml"),
            "[[cards]]\nterm = \"W-2\"\ndefinition = \"Wage and tax statement.\"\n",
        )?;
        assert!(check_collection(Some(dir.path().display().to_string())).is_ok());
        Ok(())
    }

    #[test]
    fn test_invalid_config() -> Fallible<()> {
        let dir = tempdir()?;
        write(dir.path().join("moneycards.toml"), "new_cards_per_session = -1\n")?;
        assert!(check_collection(Some(dir.path().display().to_string())).is_err());
        Ok(())
    }
}
