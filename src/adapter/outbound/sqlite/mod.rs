//! SQLite persistence: connection pooling, migrations, and the durable
//! key-value store.

pub mod connection;
pub mod kv;

pub use connection::{create_pool, run_migrations, DbPool};
pub use kv::SqliteKeyValueStore;
