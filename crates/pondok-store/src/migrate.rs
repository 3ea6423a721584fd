//! Schema migrations for the Postgres backend.
//!
//! Migrations are an ordered, append-only list. Each one runs in its own
//! transaction together with the row that records it in
//! `__pondok_migrations`, so a failed migration leaves no trace.
//!
//! ```ignore
//! let mut conn = pool.get().await?;
//! let ran = MigrationRunner::new(conn.client_mut()).migrate().await?;
//! ```

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A single schema change.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    /// Sortable version, `YYYY_MM_DD_HHMMSS`.
    pub version: &'static str,
    pub name: &'static str,
    pub sql: &'static str,
}

/// Every migration, oldest first.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "2026_10_01_090000",
        name: "create_document",
        sql: r#"
CREATE TABLE document (
    collection TEXT NOT NULL,
    id TEXT COLLATE "C" NOT NULL DEFAULT gen_random_uuid()::text,
    fields JSONB NOT NULL DEFAULT '{}'::jsonb,
    created_at TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp(),
    PRIMARY KEY (collection, id),
    CONSTRAINT document_fields_is_object CHECK (jsonb_typeof(fields) = 'object'),
    CONSTRAINT document_fields_has_no_id CHECK (NOT (fields ? 'id'))
);
"#,
    },
    Migration {
        version: "2026_10_01_090100",
        name: "document_page_index",
        sql: "CREATE INDEX document_page_idx ON document (collection, created_at DESC, id DESC);",
    },
];

const CREATE_META_TABLE: &str = "CREATE TABLE IF NOT EXISTS __pondok_migrations (\
version TEXT PRIMARY KEY, \
name TEXT NOT NULL, \
applied_at TIMESTAMPTZ NOT NULL DEFAULT now())";

/// Whether a known migration has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub version: &'static str,
    pub name: &'static str,
    pub applied_at: Option<DateTime<Utc>>,
}

impl MigrationStatus {
    pub fn applied(&self) -> bool {
        self.applied_at.is_some()
    }
}

/// A migration applied by [`MigrationRunner::migrate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RanMigration {
    pub version: &'static str,
    pub name: &'static str,
}

/// Applies pending migrations to one database.
pub struct MigrationRunner<'a> {
    client: &'a mut tokio_postgres::Client,
    migrations: &'a [Migration],
}

impl<'a> MigrationRunner<'a> {
    pub fn new(client: &'a mut tokio_postgres::Client) -> Self {
        Self::with_migrations(client, MIGRATIONS)
    }

    pub fn with_migrations(
        client: &'a mut tokio_postgres::Client,
        migrations: &'a [Migration],
    ) -> Self {
        Self { client, migrations }
    }

    async fn applied(&mut self) -> Result<HashMap<String, DateTime<Utc>>> {
        self.client.batch_execute(CREATE_META_TABLE).await?;
        let rows = self
            .client
            .query("SELECT version, applied_at FROM __pondok_migrations", &[])
            .await?;
        rows.iter()
            .map(|row| -> Result<(String, DateTime<Utc>)> {
                Ok((row.try_get("version")?, row.try_get("applied_at")?))
            })
            .collect()
    }

    /// Every known migration and when it was applied, if it was.
    pub async fn status(&mut self) -> Result<Vec<MigrationStatus>> {
        let applied = self.applied().await?;
        Ok(self
            .migrations
            .iter()
            .map(|m| MigrationStatus {
                version: m.version,
                name: m.name,
                applied_at: applied.get(m.version).copied(),
            })
            .collect())
    }

    /// Apply every pending migration in version order.
    pub async fn migrate(&mut self) -> Result<Vec<RanMigration>> {
        let applied = self.applied().await?;
        let mut ran = Vec::new();
        for migration in pending(self.migrations, &applied) {
            self.run(&migration).await?;
            ran.push(RanMigration {
                version: migration.version,
                name: migration.name,
            });
        }
        if ran.is_empty() {
            tracing::info!("database schema is up to date");
        }
        Ok(ran)
    }

    /// Apply one migration, refusing if it was applied before.
    pub async fn apply(&mut self, migration: &Migration) -> Result<()> {
        let applied = self.applied().await?;
        if applied.contains_key(migration.version) {
            return Err(Error::AlreadyApplied {
                version: migration.version.to_owned(),
            });
        }
        self.run(migration).await
    }

    async fn run(&mut self, migration: &Migration) -> Result<()> {
        tracing::info!(
            version = migration.version,
            name = migration.name,
            "applying migration"
        );
        let failed = |e: tokio_postgres::Error| Error::Migration {
            version: migration.version.to_owned(),
            message: e.to_string(),
        };
        let tx = self.client.transaction().await?;
        tx.batch_execute(migration.sql).await.map_err(failed)?;
        tx.execute(
            "INSERT INTO __pondok_migrations (version, name) VALUES ($1, $2)",
            &[&migration.version, &migration.name],
        )
        .await?;
        tx.commit().await?;
        Ok(())
    }
}

/// Migrations not yet applied, oldest first.
pub fn pending(
    migrations: &[Migration],
    applied: &HashMap<String, DateTime<Utc>>,
) -> Vec<Migration> {
    let mut pending: Vec<Migration> = migrations
        .iter()
        .filter(|m| !applied.contains_key(m.version))
        .copied()
        .collect();
    pending.sort_by_key(|m| m.version);
    pending
}
