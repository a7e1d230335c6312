//! SQLite-backed key-value store.
//!
//! One table, one row per key. This is the single durable resource in the
//! process: price cache, provider cooldowns, and boost baselines all live
//! here under fixed keys.

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::SqliteConnection;

use super::connection::DbPool;
use crate::error::{Error, Result};
use crate::port::outbound::store::KeyValueStore;

type PooledSqlite = PooledConnection<ConnectionManager<SqliteConnection>>;

mod schema {
    diesel::table! {
        kv_entries (key) {
            key -> Text,
            value -> Text,
        }
    }
}

use schema::kv_entries;

#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = kv_entries)]
struct KvRow {
    key: String,
    value: String,
}

/// [`KeyValueStore`] implementation over the pooled SQLite connection.
pub struct SqliteKeyValueStore {
    pool: DbPool,
}

impl SqliteKeyValueStore {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<PooledSqlite> {
        self.pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn()?;
        kv_entries::table
            .find(key)
            .first::<KvRow>(&mut conn)
            .optional()
            .map(|row| row.map(|r| r.value))
            .map_err(|e| Error::Database(e.to_string()))
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.conn()?;
        let row = KvRow {
            key: key.to_string(),
            value: value.to_string(),
        };
        diesel::replace_into(kv_entries::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.conn()?;
        diesel::delete(kv_entries::table.find(key))
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut conn = self.conn()?;
        diesel::delete(kv_entries::table)
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }
}
