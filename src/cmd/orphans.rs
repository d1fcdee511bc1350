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

use crate::collection::Collection;
use crate::error::Fallible;
use crate::store::ReviewStore;
use crate::types::card::Card;
use crate::types::card_id::CardId;
use crate::types::review_record::ReviewRecord;

pub fn list_orphans(directory: Option<String>, learner: Option<String>) -> Fallible<()> {
    let coll = Collection::new(directory, learner)?;
    let records = coll.db.all(coll.learner())?;
    for card_id in find_orphans(&coll.cards, &records) {
        println!("{card_id}");
    }
    Ok(())
}

/// Cards the learner has records for that are no longer in the deck, sorted.
fn find_orphans(cards: &[Card], records: &[ReviewRecord]) -> Vec<CardId> {
    let deck_ids: HashSet<&CardId> = cards.iter().map(Card::id).collect();
    let mut orphans: Vec<CardId> = records
        .iter()
        .map(ReviewRecord::card_id)
        .filter(|id| !deck_ids.contains(id))
        .cloned()
        .collect();
    orphans.sort();
    orphans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::card::Difficulty;
    use crate::types::timestamp::Timestamp;

    #[test]
    fn test_find_orphans() -> Fallible<()> {
        let now = Timestamp::parse_rfc3339("2025-06-15T12:00:00Z")?;
        let cards = vec![Card::new(
            CardId::new("roth")?,
            "Retirement".to_string(),
            "Roth IRA".to_string(),
            "A retirement account funded with after-tax money.".to_string(),
            None,
            Some("retirement".to_string()),
            Difficulty::Intermediate,
        )];
        let records = vec![
            ReviewRecord::new(CardId::new("zeta")?, 2.5, 1, 1, 1, now)?,
            ReviewRecord::new(CardId::new("roth")?, 2.5, 1, 1, 1, now)?,
            ReviewRecord::new(CardId::new("alpha")?, 2.5, 1, 1, 1, now)?,
        ];
        let orphans: Vec<String> = find_orphans(&cards, &records)
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(orphans, vec!["alpha", "zeta"]);
        Ok(())
    }
}
