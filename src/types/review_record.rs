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

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::sm2::MIN_EASINESS;
use crate::sm2::fixed_interval;
use crate::types::card_id::CardId;
use crate::types::timestamp::Timestamp;

/// The scheduling state of one card for one learner. A record exists only
/// once the card has been reviewed; an unseen card has no record.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(try_from = "RecordJson", into = "RecordJson")]
pub struct ReviewRecord {
    card_id: CardId,
    /// The SM-2 easiness factor. Never below `MIN_EASINESS`.
    easiness_factor: f64,
    /// Days between the last review and the next one. At least 1.
    interval: u32,
    /// Consecutive successful reviews since the last failure.
    repetitions: u32,
    /// Lifetime number of reviews.
    total_reviews: u32,
    last_review_date: Timestamp,
    /// Always `last_review_date + interval` days.
    next_review_date: Timestamp,
}

impl ReviewRecord {
    pub fn new(
        card_id: CardId,
        easiness_factor: f64,
        interval: u32,
        repetitions: u32,
        total_reviews: u32,
        last_review_date: Timestamp,
    ) -> Fallible<Self> {
        if !easiness_factor.is_finite() || easiness_factor < MIN_EASINESS {
            return fail(format!(
                "card {card_id}: easiness factor {easiness_factor} is below {MIN_EASINESS}."
            ));
        }
        if interval == 0 {
            return fail(format!("card {card_id}: interval must be at least one day."));
        }
        if total_reviews == 0 {
            return fail(format!("card {card_id}: a record needs at least one review."));
        }
        if repetitions > total_reviews {
            return fail(format!(
                "card {card_id}: {repetitions} repetitions exceed {total_reviews} total reviews."
            ));
        }
        if let Some(expected) = fixed_interval(repetitions) {
            if interval != expected {
                return fail(format!(
                    "card {card_id}: {repetitions} repetitions require an interval of {expected} days, not {interval}."
                ));
            }
        }
        let next_review_date = last_review_date.plus_days(interval).ok_or_else(|| {
            ErrorReport::new(format!(
                "card {card_id}: next review date is out of range (interval {interval} days)."
            ))
        })?;
        Ok(Self {
            card_id,
            easiness_factor,
            interval,
            repetitions,
            total_reviews,
            last_review_date,
            next_review_date,
        })
    }

    pub fn card_id(&self) -> &CardId {
        &self.card_id
    }

    pub fn easiness_factor(&self) -> f64 {
        self.easiness_factor
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn repetitions(&self) -> u32 {
        self.repetitions
    }

    pub fn total_reviews(&self) -> u32 {
        self.total_reviews
    }

    pub fn last_review_date(&self) -> Timestamp {
        self.last_review_date
    }

    pub fn next_review_date(&self) -> Timestamp {
        self.next_review_date
    }
}

/// The serialized shape of a record.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RecordJson {
    card_id: CardId,
    easiness_factor: f64,
    interval: u32,
    repetitions: u32,
    total_reviews: u32,
    last_review_date: Timestamp,
    next_review_date: Timestamp,
}

impl TryFrom<RecordJson> for ReviewRecord {
    type Error = ErrorReport;

    fn try_from(json: RecordJson) -> Result<Self, Self::Error> {
        let record = ReviewRecord::new(
            json.card_id,
            json.easiness_factor,
            json.interval,
            json.repetitions,
            json.total_reviews,
            json.last_review_date,
        )?;
        if record.next_review_date != json.next_review_date {
            return fail(format!(
                "card {}: next review date {} does not match last review {} plus {} days.",
                record.card_id, json.next_review_date, record.last_review_date, record.interval
            ));
        }
        Ok(record)
    }
}

impl From<ReviewRecord> for RecordJson {
    fn from(record: ReviewRecord) -> Self {
        RecordJson {
            card_id: record.card_id,
            easiness_factor: record.easiness_factor,
            interval: record.interval,
            repetitions: record.repetitions,
            total_reviews: record.total_reviews,
            last_review_date: record.last_review_date,
            next_review_date: record.next_review_date,
        }
    }
}
