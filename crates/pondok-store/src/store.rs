//! The document store interface shared by every backend.

use crate::document::{Cursor, Document, DocumentId, Fields, ID_FIELD, Page};
use crate::filter::Filter;
use crate::{Error, Result};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A boxed future, so the trait stays usable as `dyn DocumentStore`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Typed access to named collections of documents.
///
/// Every call is a full round trip to the backing store; there is no local
/// cache, and nothing groups several calls into one transaction. Callers
/// build one store at startup and share it by reference.
pub trait DocumentStore: Send + Sync {
    /// Fetch one document. A missing identity is `Ok(None)`, not an error.
    fn get<'a>(
        &'a self,
        collection: &'a str,
        id: &'a DocumentId,
    ) -> BoxFuture<'a, Result<Option<Document>>>;

    /// Every document of a collection, in no particular order.
    fn get_all<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Result<Vec<Document>>>;

    /// Write a new document and return its store-assigned identity.
    ///
    /// `fields` must not carry an `id`. A missing or null `timestamp` is
    /// filled from the store's clock at write time.
    fn insert<'a>(
        &'a self,
        collection: &'a str,
        fields: Fields,
    ) -> BoxFuture<'a, Result<DocumentId>>;

    /// Merge `fields` into an existing document, leaving other fields alone.
    fn update<'a>(
        &'a self,
        collection: &'a str,
        id: &'a DocumentId,
        fields: Fields,
    ) -> BoxFuture<'a, Result<()>>;

    /// Physically remove a document.
    fn delete<'a>(&'a self, collection: &'a str, id: &'a DocumentId) -> BoxFuture<'a, Result<()>>;

    /// Documents matching a single-field filter.
    fn query<'a>(
        &'a self,
        collection: &'a str,
        filter: &'a Filter,
    ) -> BoxFuture<'a, Result<Vec<Document>>>;

    /// At most `page_size` documents, newest first, strictly after `cursor`.
    fn paginate<'a>(
        &'a self,
        collection: &'a str,
        page_size: usize,
        cursor: Option<&'a Cursor>,
    ) -> BoxFuture<'a, Result<Page>>;

    /// Number of documents in a collection.
    fn count<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Result<u64>>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    fn get<'a>(
        &'a self,
        collection: &'a str,
        id: &'a DocumentId,
    ) -> BoxFuture<'a, Result<Option<Document>>> {
        (**self).get(collection, id)
    }

    fn get_all<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Result<Vec<Document>>> {
        (**self).get_all(collection)
    }

    fn insert<'a>(
        &'a self,
        collection: &'a str,
        fields: Fields,
    ) -> BoxFuture<'a, Result<DocumentId>> {
        (**self).insert(collection, fields)
    }

    fn update<'a>(
        &'a self,
        collection: &'a str,
        id: &'a DocumentId,
        fields: Fields,
    ) -> BoxFuture<'a, Result<()>> {
        (**self).update(collection, id, fields)
    }

    fn delete<'a>(&'a self, collection: &'a str, id: &'a DocumentId) -> BoxFuture<'a, Result<()>> {
        (**self).delete(collection, id)
    }

    fn query<'a>(
        &'a self,
        collection: &'a str,
        filter: &'a Filter,
    ) -> BoxFuture<'a, Result<Vec<Document>>> {
        (**self).query(collection, filter)
    }

    fn paginate<'a>(
        &'a self,
        collection: &'a str,
        page_size: usize,
        cursor: Option<&'a Cursor>,
    ) -> BoxFuture<'a, Result<Page>> {
        (**self).paginate(collection, page_size, cursor)
    }

    fn count<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Result<u64>> {
        (**self).count(collection)
    }
}

/// Checks shared by every backend, run before any round trip.
pub(crate) fn check_collection(collection: &str) -> Result<()> {
    if collection.is_empty() {
        return Err(Error::validation("collection name is empty"));
    }
    Ok(())
}

pub(crate) fn check_writable(fields: &Fields) -> Result<()> {
    if fields.contains_key(ID_FIELD) {
        return Err(Error::validation(
            "the `id` field is assigned by the store and cannot be written",
        ));
    }
    Ok(())
}

pub(crate) fn check_page_size(page_size: usize) -> Result<()> {
    if page_size == 0 {
        return Err(Error::validation("page size must be at least 1"));
    }
    Ok(())
}
