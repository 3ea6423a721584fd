//! Postgres backend: one JSONB document per row of the `document` table.

use crate::document::{Cursor, Document, DocumentId, Fields, Page};
use crate::filter::Filter;
use crate::sql;
use crate::store::{BoxFuture, DocumentStore, check_collection, check_page_size, check_writable};
use crate::traced::TracedPool;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use serde_json::Value;
use tokio_postgres::{NoTls, Row};

/// Build a traced connection pool for `database_url`.
///
/// No connection is opened until the first checkout.
pub fn connect(database_url: &str, max_size: usize) -> Result<TracedPool> {
    let pg_config: tokio_postgres::Config = database_url.parse()?;
    let manager = Manager::from_config(
        pg_config,
        NoTls,
        ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        },
    );
    let pool = Pool::builder(manager)
        .max_size(max_size)
        .build()
        .map_err(|e| Error::PoolBuild(e.to_string()))?;
    Ok(TracedPool::new(pool))
}

/// Document store backed by Postgres.
#[derive(Clone)]
pub struct PgStore {
    pool: TracedPool,
}

impl PgStore {
    pub fn new(pool: TracedPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &TracedPool {
        &self.pool
    }

    async fn get_impl(&self, collection: &str, id: &DocumentId) -> Result<Option<Document>> {
        check_collection(collection)?;
        let conn = self.pool.get().await?;
        let row = conn
            .query_opt("get", sql::GET, &[&collection, &id.as_str()])
            .await?;
        row.map(|row| document_from_row(collection, &row))
            .transpose()
    }

    async fn get_all_impl(&self, collection: &str) -> Result<Vec<Document>> {
        check_collection(collection)?;
        let conn = self.pool.get().await?;
        let rows = conn.query("get_all", sql::GET_ALL, &[&collection]).await?;
        documents_from_rows(collection, &rows)
    }

    async fn insert_impl(&self, collection: &str, fields: Fields) -> Result<DocumentId> {
        check_collection(collection)?;
        check_writable(&fields)?;
        let body = Value::Object(fields);
        let conn = self.pool.get().await?;
        let row = conn
            .query_one("insert", sql::INSERT, &[&collection, &body])
            .await?;
        let id: String = row.try_get("id")?;
        Ok(DocumentId::new(id))
    }

    async fn update_impl(&self, collection: &str, id: &DocumentId, fields: Fields) -> Result<()> {
        check_collection(collection)?;
        check_writable(&fields)?;
        let patch = Value::Object(fields);
        let conn = self.pool.get().await?;
        let affected = conn
            .execute("update", sql::UPDATE, &[&collection, &id.as_str(), &patch])
            .await?;
        if affected == 0 {
            return Err(Error::not_found(collection, id.as_str()));
        }
        Ok(())
    }

    async fn delete_impl(&self, collection: &str, id: &DocumentId) -> Result<()> {
        check_collection(collection)?;
        let conn = self.pool.get().await?;
        let affected = conn
            .execute("delete", sql::DELETE, &[&collection, &id.as_str()])
            .await?;
        if affected == 0 {
            return Err(Error::not_found(collection, id.as_str()));
        }
        Ok(())
    }

    async fn query_impl(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>> {
        check_collection(collection)?;
        filter.validate()?;
        let statement = sql::query(filter.op);
        let conn = self.pool.get().await?;
        let rows = conn
            .query(
                "query",
                &statement,
                &[&collection, &filter.field, &filter.value],
            )
            .await?;
        documents_from_rows(collection, &rows)
    }

    async fn paginate_impl(
        &self,
        collection: &str,
        page_size: usize,
        cursor: Option<&Cursor>,
    ) -> Result<Page> {
        check_collection(collection)?;
        check_page_size(page_size)?;
        let limit = i64::try_from(page_size).unwrap_or(i64::MAX);
        let conn = self.pool.get().await?;
        let rows = match cursor {
            None => {
                conn.query("paginate", sql::FIRST_PAGE, &[&collection, &limit])
                    .await?
            }
            Some(cursor) => {
                conn.query(
                    "paginate",
                    sql::NEXT_PAGE,
                    &[&collection, &cursor.created_at, &cursor.id.as_str(), &limit],
                )
                .await?
            }
        };
        let documents = documents_from_rows(collection, &rows)?;
        Ok(Page::from_documents(documents, page_size))
    }

    async fn count_impl(&self, collection: &str) -> Result<u64> {
        check_collection(collection)?;
        let conn = self.pool.get().await?;
        let row = conn.query_one("count", sql::COUNT, &[&collection]).await?;
        let count: i64 = row.try_get(0)?;
        Ok(count.max(0) as u64)
    }
}

fn documents_from_rows(collection: &str, rows: &[Row]) -> Result<Vec<Document>> {
    rows.iter()
        .map(|row| document_from_row(collection, row))
        .collect()
}

fn document_from_row(collection: &str, row: &Row) -> Result<Document> {
    let id: String = row.try_get("id")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let fields = match row.try_get::<_, Value>("fields")? {
        Value::Object(fields) => fields,
        other => {
            return Err(Error::Schema {
                collection: collection.to_owned(),
                id,
                message: format!("document body is not an object: {other}"),
            });
        }
    };
    Ok(Document {
        id: DocumentId::new(id),
        created_at,
        fields,
    })
}

impl DocumentStore for PgStore {
    fn get<'a>(
        &'a self,
        collection: &'a str,
        id: &'a DocumentId,
    ) -> BoxFuture<'a, Result<Option<Document>>> {
        Box::pin(self.get_impl(collection, id))
    }

    fn get_all<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Result<Vec<Document>>> {
        Box::pin(self.get_all_impl(collection))
    }

    fn insert<'a>(
        &'a self,
        collection: &'a str,
        fields: Fields,
    ) -> BoxFuture<'a, Result<DocumentId>> {
        Box::pin(self.insert_impl(collection, fields))
    }

    fn update<'a>(
        &'a self,
        collection: &'a str,
        id: &'a DocumentId,
        fields: Fields,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.update_impl(collection, id, fields))
    }

    fn delete<'a>(&'a self, collection: &'a str, id: &'a DocumentId) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.delete_impl(collection, id))
    }

    fn query<'a>(
        &'a self,
        collection: &'a str,
        filter: &'a Filter,
    ) -> BoxFuture<'a, Result<Vec<Document>>> {
        Box::pin(self.query_impl(collection, filter))
    }

    fn paginate<'a>(
        &'a self,
        collection: &'a str,
        page_size: usize,
        cursor: Option<&'a Cursor>,
    ) -> BoxFuture<'a, Result<Page>> {
        Box::pin(self.paginate_impl(collection, page_size, cursor))
    }

    fn count<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Result<u64>> {
        Box::pin(self.count_impl(collection))
    }
}
