//! Pooled Postgres connections that log every statement.
//!
//! Each call opens a `tracing` debug span carrying the store operation, the
//! SQL, the parameter count and how many rows came back or were affected.

use tokio_postgres::Row;
use tokio_postgres::types::ToSql;
use tracing::Instrument;

/// A connection pool whose connections are traced.
#[derive(Clone)]
pub struct TracedPool {
    inner: deadpool_postgres::Pool,
}

impl TracedPool {
    pub fn new(pool: deadpool_postgres::Pool) -> Self {
        Self { inner: pool }
    }

    /// Check out a connection.
    pub async fn get(&self) -> Result<TracedConn, deadpool_postgres::PoolError> {
        let conn = self.inner.get().await?;
        Ok(TracedConn { inner: conn })
    }

    pub fn inner(&self) -> &deadpool_postgres::Pool {
        &self.inner
    }
}

/// A checked-out connection. Returned to the pool on drop.
pub struct TracedConn {
    inner: deadpool_postgres::Object,
}

impl TracedConn {
    fn client(&self) -> &tokio_postgres::Client {
        &self.inner
    }

    /// The raw client, for work that needs `&mut` such as transactions.
    pub fn client_mut(&mut self) -> &mut tokio_postgres::Client {
        &mut self.inner
    }

    /// Run a statement, returning the number of rows affected.
    pub async fn execute(
        &self,
        op: &'static str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, tokio_postgres::Error> {
        let span = tracing::debug_span!(
            "db.execute",
            op,
            sql = %sql,
            params = params.len(),
            affected = tracing::field::Empty,
        );
        let affected = self
            .client()
            .execute(sql, params)
            .instrument(span.clone())
            .await?;
        span.record("affected", affected);
        Ok(affected)
    }

    /// Run a query, returning all rows.
    pub async fn query(
        &self,
        op: &'static str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, tokio_postgres::Error> {
        let span = tracing::debug_span!(
            "db.query",
            op,
            sql = %sql,
            params = params.len(),
            rows = tracing::field::Empty,
        );
        let rows = self
            .client()
            .query(sql, params)
            .instrument(span.clone())
            .await?;
        span.record("rows", rows.len());
        Ok(rows)
    }

    /// Run a query that yields at most one row.
    pub async fn query_opt(
        &self,
        op: &'static str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, tokio_postgres::Error> {
        let span = tracing::debug_span!(
            "db.query",
            op,
            sql = %sql,
            params = params.len(),
            rows = tracing::field::Empty,
        );
        let row = self
            .client()
            .query_opt(sql, params)
            .instrument(span.clone())
            .await?;
        span.record("rows", u64::from(row.is_some()));
        Ok(row)
    }

    /// Run a query that yields exactly one row.
    pub async fn query_one(
        &self,
        op: &'static str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Row, tokio_postgres::Error> {
        let span = tracing::debug_span!(
            "db.query",
            op,
            sql = %sql,
            params = params.len(),
            rows = 1u64,
        );
        self.client().query_one(sql, params).instrument(span).await
    }
}
