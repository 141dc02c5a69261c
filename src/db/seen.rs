use crate::db::connection::{init_db, Database};
use crate::domain::SeenMap;
use crate::errors::StoreError;
use chrono::{DateTime, Utc};
use rusqlite::params;

/// Remembers which listing ids earlier runs have seen, and since when.
pub struct SeenStore {
    db: Database,
}

impl SeenStore {
    /// Opens the store and makes sure its table exists.
    pub fn open(db: Database) -> Result<Self, StoreError> {
        init_db(&db)?;
        Ok(Self { db })
    }

    pub fn load(&self) -> Result<SeenMap, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, last_seen FROM seen_listings")?;
            let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?;

            let mut seen = SeenMap::new();
            for r in rows {
                let (id, secs) = r?;
                let at = DateTime::<Utc>::from_timestamp(secs, 0).ok_or(StoreError::BadTimestamp(secs))?;
                seen.insert(id, at);
            }
            Ok(seen)
        })
    }

    /// Replaces the stored set with `seen` in a single transaction.
    pub fn save(&self, seen: &SeenMap) -> Result<(), StoreError> {
        self.db.with_conn(|conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM seen_listings", [])?;
            {
                let mut stmt = tx.prepare("INSERT INTO seen_listings (id, last_seen) VALUES (?1, ?2)")?;
                for (id, at) in seen {
                    stmt.execute(params![id, at.timestamp()])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
    }
}
