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
use std::collections::HashMap;
use std::collections::HashSet;
use std::collections::VecDeque;

use crate::error::Fallible;
use crate::error::fail;
use crate::scheduler::is_due_for_review;
use crate::scheduler::record_review;
use crate::scheduler::sort_cards_by_priority;
use crate::store::ReviewStore;
use crate::types::card::Card;
use crate::types::card_id::CardId;
use crate::types::confidence::Confidence;
use crate::types::review_record::ReviewRecord;
use crate::types::timestamp::Timestamp;

/// A drill session.
///
/// Updated records are kept in memory and only written to the store when
/// the session is finished, so an aborted session leaves no trace.
pub struct Session {
    learner: String,
    /// Cards still to be reviewed, front first.
    queue: VecDeque<Card>,
    /// Records as they were when the session started.
    known: HashMap<CardId, ReviewRecord>,
    /// Records updated during this session.
    changes: BTreeMap<CardId, ReviewRecord>,
    review_count: usize,
}

impl Session {
    /// Start a session: the learner's due cards in priority order, followed by
    /// up to `new_card_limit` cards they have never reviewed, in deck order.
    /// Records for cards missing from the deck are ignored.
    pub fn new<S: ReviewStore>(
        store: &S,
        learner: &str,
        cards: &[Card],
        new_card_limit: usize,
        now: Timestamp,
    ) -> Fallible<Self> {
        let by_id: HashMap<&CardId, &Card> = cards.iter().map(|card| (card.id(), card)).collect();
        let known: HashMap<CardId, ReviewRecord> = store
            .all(learner)?
            .into_iter()
            .map(|record| (record.card_id().clone(), record))
            .collect();

        let due: Vec<ReviewRecord> = known
            .values()
            .filter(|record| by_id.contains_key(record.card_id()))
            .filter(|record| is_due_for_review(record, now))
            .cloned()
            .collect();
        let mut queue: VecDeque<Card> = VecDeque::new();
        for card_id in sort_cards_by_priority(&due, now) {
            if let Some(card) = by_id.get(&card_id) {
                queue.push_back((*card).clone());
            }
        }
        let due_count = queue.len();

        let queued: HashSet<CardId> = queue.iter().map(|card| card.id().clone()).collect();
        let new_cards = cards
            .iter()
            .filter(|card| !known.contains_key(card.id()) && !queued.contains(card.id()))
            .take(new_card_limit)
            .cloned();
        queue.extend(new_cards);
        log::debug!(
            "Session for {learner}: {due_count} due, {} new.",
            queue.len() - due_count
        );

        Ok(Self {
            learner: learner.to_string(),
            queue,
            known,
            changes: BTreeMap::new(),
            review_count: 0,
        })
    }

    /// The card to show next.
    pub fn current(&self) -> Option<&Card> {
        self.queue.front()
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn is_done(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of answers given so far, including repeats of failed cards.
    pub fn review_count(&self) -> usize {
        self.review_count
    }

    /// Record the answer to the current card. A failed card goes to the back
    /// of the queue to be seen again in this session.
    pub fn answer(
        &mut self,
        was_correct: bool,
        confidence: Confidence,
        now: Timestamp,
    ) -> Fallible<ReviewRecord> {
        let card = match self.queue.front() {
            Some(card) => card.clone(),
            None => return fail("no cards left to review."),
        };
        let prior = self
            .changes
            .get(card.id())
            .or_else(|| self.known.get(card.id()));
        let record = record_review(card.id(), prior, was_correct, confidence, now)?;
        self.queue.pop_front();
        if record.repetitions() == 0 {
            self.queue.push_back(card);
        }
        self.changes.insert(record.card_id().clone(), record.clone());
        self.review_count += 1;
        Ok(record)
    }

    /// Persist every record changed in this session. Returns how many cards
    /// were updated.
    pub fn finish<S: ReviewStore>(self, store: &mut S) -> Fallible<usize> {
        let records: Vec<ReviewRecord> = self.changes.into_values().collect();
        store.put_all(&self.learner, &records)?;
        log::debug!(
            "Session for {} finished: {} reviews, {} cards updated.",
            self.learner,
            self.review_count,
            records.len()
        );
        Ok(records.len())
    }
}
