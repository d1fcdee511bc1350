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

use std::collections::BTreeMap;

use crate::error::Fallible;
use crate::types::card_id::CardId;
use crate::types::review_record::ReviewRecord;

/// Persistent storage for review records, namespaced by learner.
///
/// The scheduler never touches a store: callers load a record, pass it to
/// the scheduler, and write the result back.
pub trait ReviewStore {
    /// The learner's record for a card, if the card has been reviewed.
    fn get(&self, learner: &str, card_id: &CardId) -> Fallible<Option<ReviewRecord>>;

    /// Insert or replace the learner's record for the record's card.
    fn put(&mut self, learner: &str, record: &ReviewRecord) -> Fallible<()>;

    /// All of the learner's records, ordered by card id.
    fn all(&self, learner: &str) -> Fallible<Vec<ReviewRecord>>;

    /// Delete the learner's record for a card. Returns whether it existed.
    fn remove(&mut self, learner: &str, card_id: &CardId) -> Fallible<bool>;

    /// Write several records at once.
    fn put_all(&mut self, learner: &str, records: &[ReviewRecord]) -> Fallible<()> {
        for record in records {
            self.put(learner, record)?;
        }
        Ok(())
    }
}

/// A store that lives only as long as the process.
#[derive(Default)]
pub struct MemoryStore {
    records: BTreeMap<(String, CardId), ReviewRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReviewStore for MemoryStore {
    fn get(&self, learner: &str, card_id: &CardId) -> Fallible<Option<ReviewRecord>> {
        let key = (learner.to_string(), card_id.clone());
        Ok(self.records.get(&key).cloned())
    }

    fn put(&mut self, learner: &str, record: &ReviewRecord) -> Fallible<()> {
        let key = (learner.to_string(), record.card_id().clone());
        self.records.insert(key, record.clone());
        Ok(())
    }

    fn all(&self, learner: &str) -> Fallible<Vec<ReviewRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|((owner, _), _)| owner == learner)
            .map(|(_, record)| record.clone())
            .collect())
    }

    fn remove(&mut self, learner: &str, card_id: &CardId) -> Fallible<bool> {
        let key = (learner.to_string(), card_id.clone());
        Ok(self.records.remove(&key).is_some())
    }
}
