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

use rusqlite::Connection;
use rusqlite::Row;
use rusqlite::Transaction;
use rusqlite::config::DbConfig;

use crate::error::Fallible;
use crate::store::ReviewStore;
use crate::types::card_id::CardId;
use crate::types::review_record::ReviewRecord;
use crate::types::timestamp::Timestamp;

/// SQLite-backed review store.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        log::debug!("Opening database at {database_path}");
        let mut conn = Connection::open(database_path)?;
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, true)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                log::debug!("Creating schema.");
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        Ok(Self { conn })
    }
}

impl ReviewStore for Database {
    fn get(&self, learner: &str, card_id: &CardId) -> Fallible<Option<ReviewRecord>> {
        let sql = "select card_id, easiness_factor, interval, repetitions, total_reviews, last_review_date from reviews where learner = ? and card_id = ?;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query((learner, card_id))?;
        match rows.next()? {
            Some(row) => Ok(Some(read_record(row)?)),
            None => Ok(None),
        }
    }

    fn put(&mut self, learner: &str, record: &ReviewRecord) -> Fallible<()> {
        let tx = self.conn.transaction()?;
        upsert_record(&tx, learner, record)?;
        tx.commit()?;
        Ok(())
    }

    fn all(&self, learner: &str) -> Fallible<Vec<ReviewRecord>> {
        let sql = "select card_id, easiness_factor, interval, repetitions, total_reviews, last_review_date from reviews where learner = ? order by card_id;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([learner])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(read_record(row)?);
        }
        Ok(records)
    }

    fn remove(&mut self, learner: &str, card_id: &CardId) -> Fallible<bool> {
        let sql = "delete from reviews where learner = ? and card_id = ?;";
        let count = self.conn.execute(sql, (learner, card_id))?;
        Ok(count > 0)
    }

    fn put_all(&mut self, learner: &str, records: &[ReviewRecord]) -> Fallible<()> {
        let tx = self.conn.transaction()?;
        for record in records {
            upsert_record(&tx, learner, record)?;
        }
        tx.commit()?;
        log::debug!("Saved {} records for {learner}.", records.len());
        Ok(())
    }
}

/// Rows go back through `ReviewRecord::new`, so a corrupted row is an error
/// rather than a silently invalid record.
fn read_record(row: &Row) -> Fallible<ReviewRecord> {
    let card_id: CardId = row.get(0)?;
    let easiness_factor: f64 = row.get(1)?;
    let interval: u32 = row.get(2)?;
    let repetitions: u32 = row.get(3)?;
    let total_reviews: u32 = row.get(4)?;
    let last_review_date: Timestamp = row.get(5)?;
    ReviewRecord::new(
        card_id,
        easiness_factor,
        interval,
        repetitions,
        total_reviews,
        last_review_date,
    )
}

fn upsert_record(tx: &Transaction, learner: &str, record: &ReviewRecord) -> Fallible<()> {
    let sql = "insert into reviews (learner, card_id, easiness_factor, interval, repetitions, total_reviews, last_review_date) values (?, ?, ?, ?, ?, ?, ?) on conflict (learner, card_id) do update set easiness_factor = excluded.easiness_factor, interval = excluded.interval, repetitions = excluded.repetitions, total_reviews = excluded.total_reviews, last_review_date = excluded.last_review_date;";
    tx.execute(
        sql,
        (
            learner,
            record.card_id(),
            record.easiness_factor(),
            record.interval(),
            record.repetitions(),
            record.total_reviews(),
            record.last_review_date(),
        ),
    )?;
    Ok(())
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["reviews"], |row| row.get(0))?;
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn record(card: &str, ef: f64, interval: u32) -> Fallible<ReviewRecord> {
        let now = Timestamp::parse_rfc3339("2025-06-01T08:15:30.25Z")?;
        ReviewRecord::new(CardId::new(card)?, ef, interval, 3, 4, now)
    }

    #[test]
    fn test_round_trip() -> Fallible<()> {
        let mut db = Database::new(":memory:")?;
        let ef = 2.5 - 0.32 + 0.1;
        let r = record("mortgage", ef, 6)?;
        db.put("ana", &r)?;
        let back = db.get("ana", r.card_id())?;
        assert_eq!(back, Some(r.clone()));
        assert_eq!(back.map(|b| b.easiness_factor().to_bits()), Some(ef.to_bits()));
        Ok(())
    }

    #[test]
    fn test_upsert_replaces() -> Fallible<()> {
        let mut db = Database::new(":memory:")?;
        db.put("ana", &record("mortgage", 2.5, 6)?)?;
        db.put("ana", &record("mortgage", 2.6, 15)?)?;
        let all = db.all("ana")?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].interval(), 15);
        Ok(())
    }

    #[test]
    fn test_learners_are_separate() -> Fallible<()> {
        let mut db = Database::new(":memory:")?;
        db.put_all("ana", &[record("b", 2.5, 1)?, record("a", 2.5, 1)?])?;
        db.put("ben", &record("a", 1.9, 1)?)?;
        let ana: Vec<String> = db.all("ana")?.iter().map(|r| r.card_id().to_string()).collect();
        assert_eq!(ana, vec!["a", "b"]);
        assert_eq!(db.all("ben")?.len(), 1);
        assert!(db.remove("ben", &CardId::new("a")?)?);
        assert!(db.all("ben")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_reopen_existing_file() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("moneycards.db");
        let path = path.to_str().unwrap();
        {
            let mut db = Database::new(path)?;
            db.put("ana", &record("budget", 2.5, 1)?)?;
        }
        let db = Database::new(path)?;
        assert_eq!(db.all("ana")?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_corrupted_row_is_rejected() -> Fallible<()> {
        let db = Database::new(":memory:")?;
        // Bypass the schema's checks to simulate a bad row written by an older version.
        db.conn.execute_batch(
            "create table bad as select * from reviews; drop table reviews; create table reviews as select * from bad;",
        )?;
        db.conn.execute(
            "insert into reviews values ('ana', 'budget', 2.5, 0, 0, 1, '2025-06-01T00:00:00Z');",
            [],
        )?;
        assert!(db.get("ana", &CardId::new("budget")?).is_err());
        db.conn.execute(
            "insert into reviews values ('ana', 'escrow', 2.5, 30, 0, 6, '2025-06-01T00:00:00Z');",
            [],
        )?;
        assert!(db.get("ana", &CardId::new("escrow")?).is_err());
        Ok(())
    }
}
