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

//! The SuperMemo-2 arithmetic: response quality, easiness factor updates and
//! interval growth.

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::confidence::Confidence;

/// Easiness factor of a card that has never been reviewed.
pub const DEFAULT_EASINESS: f64 = 2.5;

/// Easiness factors are never allowed to fall below this.
pub const MIN_EASINESS: f64 = 1.3;

/// Interval after the first successful review, and after any failure.
const FIRST_INTERVAL: u32 = 1;

/// Interval after the second consecutive successful review.
const SECOND_INTERVAL: u32 = 6;

/// Quality of a response on the SM-2 scale from 0 (blackout) to 5 (perfect).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Quality(u8);

impl Quality {
    /// Lowest quality that counts as a successful recall.
    pub const PASSING: Quality = Quality(3);

    /// Map a learner's response onto the SM-2 scale.
    ///
    /// Correct answers land on 3..=5, growing with confidence. Incorrect
    /// answers land on 0..=2, and a confident wrong answer is treated as
    /// worse than a hesitant one.
    pub fn from_response(was_correct: bool, confidence: Confidence) -> Self {
        let q = match (was_correct, confidence.value()) {
            (true, 5) => 5,
            (true, 3..=4) => 4,
            (true, _) => 3,
            (false, 1..=2) => 2,
            (false, 3) => 1,
            (false, _) => 0,
        };
        Quality(q)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_passing(self) -> bool {
        self >= Self::PASSING
    }
}

/// The easiness factor after a response of the given quality.
pub fn next_easiness(easiness: f64, quality: Quality) -> f64 {
    let q = f64::from(quality.value());
    let easiness = easiness + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02));
    easiness.max(MIN_EASINESS)
}

/// The interval after a successful review, given the repetition count that
/// includes this review, the previous interval, and the updated easiness.
pub fn next_interval(repetitions: u32, previous_interval: u32, easiness: f64) -> Fallible<u32> {
    match fixed_interval(repetitions) {
        Some(interval) => Ok(interval),
        None => {
            let interval = (f64::from(previous_interval) * easiness).round();
            if interval > f64::from(u32::MAX) {
                return Err(ErrorReport::new(format!(
                    "interval of {interval} days is too large to schedule."
                )));
            }
            Ok((interval as u32).max(FIRST_INTERVAL))
        }
    }
}

/// The interval every card with this many repetitions has, or `None` once
/// the interval depends on the easiness factor.
pub fn fixed_interval(repetitions: u32) -> Option<u32> {
    match repetitions {
        0 | 1 => Some(FIRST_INTERVAL),
        2 => Some(SECOND_INTERVAL),
        _ => None,
    }
}

/// Interval assigned after a failed review.
pub fn failure_interval() -> u32 {
    FIRST_INTERVAL
}
