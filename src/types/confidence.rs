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

use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::fail;

/// A learner's self-reported confidence in an answer, from 1 (guessing) to
/// 5 (certain).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Confidence(u8);

impl Confidence {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn value(self) -> u8 {
        self.0
    }

    /// Every valid confidence, lowest first.
    pub fn all() -> impl Iterator<Item = Confidence> {
        (Self::MIN..=Self::MAX).map(Confidence)
    }
}

impl TryFrom<u8> for Confidence {
    type Error = ErrorReport;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Confidence(value))
        } else {
            fail(format!(
                "confidence must be between {} and {}, got {value}.",
                Self::MIN,
                Self::MAX
            ))
        }
    }
}

impl From<Confidence> for u8 {
    fn from(value: Confidence) -> Self {
        value.0
    }
}

impl FromStr for Confidence {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| ErrorReport::new(format!("not a confidence rating: {s:?}")))?;
        Confidence::try_from(value)
    }
}

impl Display for Confidence {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range() {
        assert!(Confidence::try_from(0).is_err());
        assert!(Confidence::try_from(6).is_err());
        for value in 1..=5 {
            assert_eq!(Confidence::try_from(value).map(u8::from), Ok(value));
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!(" 4\n".parse::<Confidence>().map(Confidence::value), Ok(4));
        assert!("four".parse::<Confidence>().is_err());
        assert!("9".parse::<Confidence>().is_err());
    }

    #[test]
    fn test_all() {
        let values: Vec<u8> = Confidence::all().map(Confidence::value).collect();
        assert_eq!(values, vec![1, 2, 3, 4, 5]);
    }
}
