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

//! Review scheduling: updating a card's record after a review, and the
//! read-only queries that drive a review session.
//!
//! Everything here is a pure function of its arguments. The current time is
//! always passed in, and persisting an updated record is the caller's job.

use std::cmp::Ordering;

use chrono::TimeDelta;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::sm2::DEFAULT_EASINESS;
use crate::sm2::Quality;
use crate::sm2::failure_interval;
use crate::sm2::next_easiness;
use crate::sm2::next_interval;
use crate::types::card_id::CardId;
use crate::types::confidence::Confidence;
use crate::types::review_record::ReviewRecord;
use crate::types::timestamp::Timestamp;

/// Retention predicted for a default-easiness card at the end of its interval.
const RETENTION_AT_INTERVAL: f64 = 0.9;

/// Cards with an interval at least this long are mature.
const MATURE_INTERVAL: u32 = 21;

/// Cards with fewer repetitions than this are still being learned.
const LEARNING_REPETITIONS: u32 = 3;

/// Upper bound, in days, of the "due this week" bucket.
const WEEK_DAYS: i64 = 7;

const MILLISECONDS_PER_DAY: f64 = 86_400_000.0;

/// Update a card's scheduling state after a review.
///
/// `prior` is `None` the first time the card is reviewed, in which case the
/// SM-2 defaults are used.
pub fn record_review(
    card_id: &CardId,
    prior: Option<&ReviewRecord>,
    was_correct: bool,
    confidence: Confidence,
    now: Timestamp,
) -> Fallible<ReviewRecord> {
    let (easiness, interval, repetitions, total_reviews) = match prior {
        Some(record) => {
            if record.card_id() != card_id {
                return fail(format!(
                    "cannot review card {card_id} using the record of card {}.",
                    record.card_id()
                ));
            }
            (
                record.easiness_factor(),
                record.interval(),
                record.repetitions(),
                record.total_reviews(),
            )
        }
        None => (DEFAULT_EASINESS, 0, 0, 0),
    };
    let total_reviews = total_reviews
        .checked_add(1)
        .ok_or_else(|| ErrorReport::new(format!("card {card_id}: review count overflowed.")))?;
    let quality = Quality::from_response(was_correct, confidence);
    let easiness = next_easiness(easiness, quality);
    let (repetitions, interval) = if quality.is_passing() {
        let repetitions = repetitions.checked_add(1).ok_or_else(|| {
            ErrorReport::new(format!("card {card_id}: repetition count overflowed."))
        })?;
        (repetitions, next_interval(repetitions, interval, easiness)?)
    } else {
        (0, failure_interval())
    };
    log::debug!(
        "Reviewed card {card_id}: quality={} easiness={easiness:.3} interval={interval}d",
        quality.value()
    );
    ReviewRecord::new(
        card_id.clone(),
        easiness,
        interval,
        repetitions,
        total_reviews,
        now,
    )
}

/// Whether the card's next review date has arrived.
pub fn is_due_for_review(record: &ReviewRecord, now: Timestamp) -> bool {
    record.next_review_date() <= now
}

/// Whole days until the card is due. Negative when overdue, zero when due
/// within the past day.
///
/// Partial days round toward the future, so that a card is due exactly when
/// this is at most zero.
pub fn days_until_review(record: &ReviewRecord, now: Timestamp) -> i64 {
    let delta: TimeDelta = record.next_review_date().since(now);
    if delta <= TimeDelta::zero() {
        -(-delta).num_days()
    } else {
        let whole = delta.num_days();
        if delta > TimeDelta::days(whole) {
            whole + 1
        } else {
            whole
        }
    }
}

/// Predicted probability of recall, as a percentage.
///
/// Retention decays exponentially from 100% at the last review. A card with
/// the default easiness is at 90% when its interval elapses; easier cards
/// decay more slowly.
pub fn predict_retention(record: &ReviewRecord, now: Timestamp) -> u8 {
    let elapsed = now.since(record.last_review_date());
    // A clock that went backwards counts as no time elapsed.
    let elapsed_days = elapsed.num_milliseconds().max(0) as f64 / MILLISECONDS_PER_DAY;
    let stability = f64::from(record.interval()) * record.easiness_factor() / DEFAULT_EASINESS;
    let retention = RETENTION_AT_INTERVAL.powf(elapsed_days / stability);
    (retention * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Order cards for review: overdue cards first (most overdue first), then
/// cards due today, then the rest by how soon they are due. Ties go to the
/// harder card, then the earlier due date, then the card id.
pub fn sort_cards_by_priority(records: &[ReviewRecord], now: Timestamp) -> Vec<CardId> {
    let mut keyed: Vec<(i64, &ReviewRecord)> = records
        .iter()
        .map(|record| (days_until_review(record, now), record))
        .collect();
    keyed.sort_by(|(a_days, a), (b_days, b)| compare_priority(*a_days, a, *b_days, b));
    keyed
        .into_iter()
        .map(|(_, record)| record.card_id().clone())
        .collect()
}

fn compare_priority(a_days: i64, a: &ReviewRecord, b_days: i64, b: &ReviewRecord) -> Ordering {
    a_days
        .cmp(&b_days)
        .then_with(|| a.easiness_factor().total_cmp(&b.easiness_factor()))
        .then_with(|| a.next_review_date().cmp(&b.next_review_date()))
        .then_with(|| a.card_id().cmp(b.card_id()))
}

/// Aggregate statistics over a learner's records.
#[derive(Serialize, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total: usize,
    /// Overdue by at least a day.
    pub due_now: usize,
    pub due_today: usize,
    /// Due in one to seven days.
    pub due_this_week: usize,
    pub learning: usize,
    pub young: usize,
    pub mature: usize,
    pub average_easiness: f64,
    pub average_retention: f64,
}

pub fn review_stats(records: &[ReviewRecord], now: Timestamp) -> ReviewStats {
    let mut stats = ReviewStats {
        total: records.len(),
        ..ReviewStats::default()
    };
    if records.is_empty() {
        return stats;
    }
    let mut easiness_sum = 0.0;
    let mut retention_sum = 0.0;
    for record in records {
        match days_until_review(record, now) {
            days if days < 0 => stats.due_now += 1,
            0 => stats.due_today += 1,
            1..=WEEK_DAYS => stats.due_this_week += 1,
            _ => {}
        }
        if record.repetitions() < LEARNING_REPETITIONS {
            stats.learning += 1;
        }
        if record.interval() < MATURE_INTERVAL && record.repetitions() >= LEARNING_REPETITIONS {
            stats.young += 1;
        }
        if record.interval() >= MATURE_INTERVAL {
            stats.mature += 1;
        }
        easiness_sum += record.easiness_factor();
        retention_sum += f64::from(predict_retention(record, now));
    }
    let count = records.len() as f64;
    stats.average_easiness = easiness_sum / count;
    stats.average_retention = retention_sum / count;
    stats
}
