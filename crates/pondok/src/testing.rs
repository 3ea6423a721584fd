//! Store doubles for flow tests.

use pondok_store::{
    BoxFuture, Cursor, Document, DocumentId, DocumentStore, Error, Fields, Filter, MemoryStore,
    Page, Result,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use tokio::sync::Notify;

/// One write that reached the store.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Write {
    pub op: &'static str,
    pub collection: String,
    pub fields: Fields,
}

/// A [`MemoryStore`] that records writes, can be made to fail them, and can
/// hold them at a gate until the test releases it.
#[derive(Default)]
pub(crate) struct TestStore {
    inner: MemoryStore,
    writes: Mutex<Vec<Write>>,
    fail_writes: AtomicBool,
    hold_writes: AtomicBool,
    /// Notified when a held write reaches the gate.
    pub entered: Notify,
    /// Notify to let a held write through.
    pub release: Notify,
}

impl TestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> Vec<Write> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn hold_writes(&self, hold: bool) {
        self.hold_writes.store(hold, Ordering::SeqCst);
    }

    async fn before_write(
        &self,
        op: &'static str,
        collection: &str,
        fields: &Fields,
    ) -> Result<()> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Write {
                op,
                collection: collection.to_owned(),
                fields: fields.clone(),
            });
        if self.hold_writes.load(Ordering::SeqCst) {
            self.entered.notify_one();
            self.release.notified().await;
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Pool(deadpool_postgres::PoolError::Closed));
        }
        Ok(())
    }
}

impl DocumentStore for TestStore {
    fn get<'a>(
        &'a self,
        collection: &'a str,
        id: &'a DocumentId,
    ) -> BoxFuture<'a, Result<Option<Document>>> {
        self.inner.get(collection, id)
    }

    fn get_all<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Result<Vec<Document>>> {
        self.inner.get_all(collection)
    }

    fn insert<'a>(
        &'a self,
        collection: &'a str,
        fields: Fields,
    ) -> BoxFuture<'a, Result<DocumentId>> {
        Box::pin(async move {
            self.before_write("insert", collection, &fields).await?;
            self.inner.insert(collection, fields).await
        })
    }

    fn update<'a>(
        &'a self,
        collection: &'a str,
        id: &'a DocumentId,
        fields: Fields,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            self.before_write("update", collection, &fields).await?;
            self.inner.update(collection, id, fields).await
        })
    }

    fn delete<'a>(&'a self, collection: &'a str, id: &'a DocumentId) -> BoxFuture<'a, Result<()>> {
        self.inner.delete(collection, id)
    }

    fn query<'a>(
        &'a self,
        collection: &'a str,
        filter: &'a Filter,
    ) -> BoxFuture<'a, Result<Vec<Document>>> {
        self.inner.query(collection, filter)
    }

    fn paginate<'a>(
        &'a self,
        collection: &'a str,
        page_size: usize,
        cursor: Option<&'a Cursor>,
    ) -> BoxFuture<'a, Result<Page>> {
        self.inner.paginate(collection, page_size, cursor)
    }

    fn count<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Result<u64>> {
        self.inner.count(collection)
    }
}
