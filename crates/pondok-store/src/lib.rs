//! Document store client for pondok.
//!
//! Documents are JSON objects grouped into named collections, each with a
//! store-assigned identity and creation instant. The [`DocumentStore`] trait
//! is the whole interface: get, get-all, insert, update, delete, a
//! single-field query, and cursor pagination (newest first).
//!
//! Two backends implement it:
//! - [`PgStore`]: one JSONB row per document in Postgres, through a traced
//!   `deadpool-postgres` pool. Run [`MigrationRunner`] once to create the
//!   table.
//! - [`MemoryStore`]: in-process, same semantics, for tests and local runs.
//!
//! ```ignore
//! let pool = pondok_store::connect(&database_url, 16)?;
//! let store = PgStore::new(pool);
//!
//! let id = store.insert("reviews", fields).await?;
//! let page = store.paginate("forumPosts", 10, None).await?;
//! ```

mod document;
mod error;
mod filter;
mod memory;
pub mod migrate;
mod postgres;
mod sql;
mod store;
mod traced;

pub use document::{Cursor, Document, DocumentId, Fields, ID_FIELD, Page, TIMESTAMP_FIELD};
pub use error::{Error, ErrorKind};
pub use filter::{Filter, MAX_DISJUNCTION, Operator, compare, values_equal};
pub use memory::MemoryStore;
pub use migrate::{Migration, MigrationRunner, MigrationStatus, RanMigration};
pub use postgres::{PgStore, connect};
pub use store::{BoxFuture, DocumentStore};
pub use traced::{TracedConn, TracedPool};

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, Error>;
