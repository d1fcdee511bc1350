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

use chrono::DateTime;
use chrono::TimeDelta;
use chrono::Utc;
use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlError;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use crate::error::Fallible;

/// A point in time, always in UTC.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn parse_rfc3339(s: &str) -> Fallible<Self> {
        let ts = DateTime::parse_from_rfc3339(s)?;
        Ok(Self(ts.with_timezone(&Utc)))
    }

    pub fn to_rfc3339(self) -> String {
        self.0.to_rfc3339()
    }

    /// The timestamp `days` days later, or `None` if it is out of range.
    pub fn plus_days(self, days: u32) -> Option<Self> {
        let delta = TimeDelta::try_days(i64::from(days))?;
        self.0.checked_add_signed(delta).map(Self)
    }

    /// The signed time elapsed from `earlier` to `self`.
    pub fn since(self, earlier: Timestamp) -> TimeDelta {
        self.0.signed_duration_since(earlier.0)
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_rfc3339())
    }
}

impl ToSql for Timestamp {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_rfc3339()))
    }
}

impl FromSql for Timestamp {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let string: String = FromSql::column_result(value)?;
        Timestamp::parse_rfc3339(&string).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        Timestamp::parse_rfc3339(&string).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc3339_keeps_subseconds() -> Fallible<()> {
        let ts = Timestamp::parse_rfc3339("2025-03-01T08:30:15.123456789Z")?;
        assert_eq!(Timestamp::parse_rfc3339(&ts.to_rfc3339())?, ts);
        Ok(())
    }

    #[test]
    fn test_offsets_are_normalized() -> Fallible<()> {
        let a = Timestamp::parse_rfc3339("2025-03-01T10:00:00+02:00")?;
        let b = Timestamp::parse_rfc3339("2025-03-01T08:00:00Z")?;
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn test_plus_days() -> Fallible<()> {
        let ts = Timestamp::parse_rfc3339("2025-02-27T12:00:00Z")?;
        let later = ts.plus_days(2);
        assert_eq!(later, Some(Timestamp::parse_rfc3339("2025-03-01T12:00:00Z")?));
        assert_eq!(ts.plus_days(u32::MAX), None);
        Ok(())
    }

    #[test]
    fn test_invalid() {
        assert!(Timestamp::parse_rfc3339("yesterday").is_err());
    }
}
