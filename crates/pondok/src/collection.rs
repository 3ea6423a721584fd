//! Typed access to one collection.
//!
//! Records are encoded to document fields with serde on the way in and
//! decoded and validated on the way out. A stored document that does not
//! match its record type surfaces as [`pondok_store::Error::Schema`] rather
//! than being silently skipped.

use crate::models::{Record, Stored};
use pondok_store::{Cursor, Document, DocumentId, DocumentStore, Error, Fields, Filter, Result};
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;

/// One page of typed records, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordPage<T> {
    pub items: Vec<Stored<T>>,
    pub next_cursor: Option<Cursor>,
}

pub struct Collection<'s, T> {
    store: &'s dyn DocumentStore,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Collection<'_, T> {}

impl<'s, T: Record> Collection<'s, T> {
    pub fn new(store: &'s dyn DocumentStore) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        T::COLLECTION
    }

    pub async fn get(&self, id: &DocumentId) -> Result<Option<Stored<T>>> {
        self.store
            .get(T::COLLECTION, id)
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn all(&self) -> Result<Vec<Stored<T>>> {
        decode_all(self.store.get_all(T::COLLECTION).await?)
    }

    /// Validate and write a new record, returning its id.
    pub async fn insert(&self, record: &T) -> Result<DocumentId> {
        record.validate().map_err(Error::Validation)?;
        let fields = encode(record)?;
        let id = self.store.insert(T::COLLECTION, fields).await?;
        tracing::debug!(collection = T::COLLECTION, %id, "inserted record");
        Ok(id)
    }

    /// Merge the fields `patch` serializes to into an existing record.
    ///
    /// The merged document must still decode and validate as `T`; otherwise
    /// nothing is written and the error is [`Error::Validation`].
    pub async fn update<P: Serialize + ?Sized>(&self, id: &DocumentId, patch: &P) -> Result<()> {
        let fields = encode(patch)?;
        let Some(current) = self.store.get(T::COLLECTION, id).await? else {
            return Err(Error::NotFound {
                collection: T::COLLECTION.to_owned(),
                id: id.to_string(),
            });
        };

        let mut merged = current.fields;
        merged.extend(fields.clone());
        let record: T = serde_json::from_value(Value::Object(merged))
            .map_err(|e| Error::Validation(e.to_string()))?;
        record.validate().map_err(Error::Validation)?;

        self.store.update(T::COLLECTION, id, fields).await
    }

    pub async fn delete(&self, id: &DocumentId) -> Result<()> {
        self.store.delete(T::COLLECTION, id).await
    }

    pub async fn query(&self, filter: &Filter) -> Result<Vec<Stored<T>>> {
        decode_all(self.store.query(T::COLLECTION, filter).await?)
    }

    pub async fn page(&self, page_size: usize, cursor: Option<&Cursor>) -> Result<RecordPage<T>> {
        let page = self
            .store
            .paginate(T::COLLECTION, page_size, cursor)
            .await?;
        Ok(RecordPage {
            items: decode_all(page.documents)?,
            next_cursor: page.next_cursor,
        })
    }

    pub async fn count(&self) -> Result<u64> {
        self.store.count(T::COLLECTION).await
    }
}

fn encode<P: Serialize + ?Sized>(value: &P) -> Result<Fields> {
    match serde_json::to_value(value) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(Error::Validation(format!(
            "a document must be an object, got {other}"
        ))),
        Err(e) => Err(Error::Validation(e.to_string())),
    }
}

fn decode<T: Record>(doc: Document) -> Result<Stored<T>> {
    let schema_error = |id: &DocumentId, message: String| Error::Schema {
        collection: T::COLLECTION.to_owned(),
        id: id.to_string(),
        message,
    };
    let record: T = serde_json::from_value(Value::Object(doc.fields))
        .map_err(|e| schema_error(&doc.id, e.to_string()))?;
    record
        .validate()
        .map_err(|message| schema_error(&doc.id, message))?;
    Ok(Stored {
        id: doc.id,
        created_at: doc.created_at,
        record,
    })
}

fn decode_all<T: Record>(docs: Vec<Document>) -> Result<Vec<Stored<T>>> {
    docs.into_iter().map(decode).collect()
}
