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

use std::collections::HashMap;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::scheduler::days_until_review;
use crate::scheduler::is_due_for_review;
use crate::scheduler::predict_retention;
use crate::scheduler::sort_cards_by_priority;
use crate::store::ReviewStore;
use crate::types::card::Card;
use crate::types::card_id::CardId;
use crate::types::review_record::ReviewRecord;
use crate::types::timestamp::Timestamp;

pub fn list_due(directory: Option<String>, learner: Option<String>) -> Fallible<()> {
    let coll = Collection::new(directory, learner)?;
    let records = coll.db.all(coll.learner())?;
    let rows = due_rows(&coll.cards, &records, Timestamp::now());
    if rows.is_empty() {
        println!("No cards due.");
    }
    for row in rows {
        println!(
            "{}\t{}\t{}d\t{}%",
            row.card_id, row.term, row.days_until_review, row.retention
        );
    }
    Ok(())
}

#[derive(Debug, PartialEq)]
struct DueRow {
    card_id: CardId,
    term: String,
    days_until_review: i64,
    retention: u8,
}

/// The due cards that are still in the deck, in review order.
fn due_rows(cards: &[Card], records: &[ReviewRecord], now: Timestamp) -> Vec<DueRow> {
    let terms: HashMap<&CardId, &str> = cards.iter().map(|c| (c.id(), c.term())).collect();
    let due: Vec<ReviewRecord> = records
        .iter()
        .filter(|r| terms.contains_key(r.card_id()) && is_due_for_review(r, now))
        .cloned()
        .collect();
    let by_id: HashMap<&CardId, &ReviewRecord> = due.iter().map(|r| (r.card_id(), r)).collect();
    let mut rows = Vec::new();
    for card_id in sort_cards_by_priority(&due, now) {
        if let (Some(record), Some(term)) = (by_id.get(&card_id), terms.get(&card_id)) {
            rows.push(DueRow {
                term: term.to_string(),
                days_until_review: days_until_review(record, now),
                retention: predict_retention(record, now),
                card_id,
            });
        }
    }
    rows
}
