//! In-process document store.
//!
//! Same semantics as the Postgres backend, minus the network. Useful for
//! tests and for running the app without a database.

use crate::document::{Cursor, Document, DocumentId, Fields, Page, TIMESTAMP_FIELD};
use crate::filter::Filter;
use crate::store::{BoxFuture, DocumentStore, check_collection, check_page_size, check_writable};
use crate::{Error, Result};
use chrono::{SecondsFormat, Utc};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

type Collection = IndexMap<DocumentId, Document>;

#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Collection>> {
        self.collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn get_sync(&self, collection: &str, id: &DocumentId) -> Option<Document> {
        self.lock().get(collection)?.get(id).cloned()
    }

    fn get_all_sync(&self, collection: &str) -> Vec<Document> {
        self.lock()
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default()
    }

    fn insert_sync(&self, collection: &str, mut fields: Fields) -> DocumentId {
        let now = Utc::now();
        if fields.get(TIMESTAMP_FIELD).is_none_or(Value::is_null) {
            fields.insert(
                TIMESTAMP_FIELD.to_owned(),
                Value::String(now.to_rfc3339_opts(SecondsFormat::Micros, true)),
            );
        }
        let id = DocumentId::new(uuid::Uuid::new_v4().to_string());
        let doc = Document {
            id: id.clone(),
            created_at: now,
            fields,
        };
        self.lock()
            .entry(collection.to_owned())
            .or_default()
            .insert(id.clone(), doc);
        id
    }

    fn update_sync(&self, collection: &str, id: &DocumentId, fields: Fields) -> Result<()> {
        let mut collections = self.lock();
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| Error::not_found(collection, id.as_str()))?;
        doc.fields.extend(fields);
        Ok(())
    }

    fn delete_sync(&self, collection: &str, id: &DocumentId) -> Result<()> {
        self.lock()
            .get_mut(collection)
            .and_then(|docs| docs.shift_remove(id))
            .map(|_| ())
            .ok_or_else(|| Error::not_found(collection, id.as_str()))
    }

    fn query_sync(&self, collection: &str, filter: &Filter) -> Vec<Document> {
        self.lock()
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| filter.matches(&doc.fields))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn paginate_sync(&self, collection: &str, page_size: usize, cursor: Option<&Cursor>) -> Page {
        let mut docs: Vec<Document> = self
            .lock()
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| cursor.is_none_or(|c| c.precedes(doc)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        docs.sort_by(|a, b| (b.created_at, &b.id).cmp(&(a.created_at, &a.id)));
        docs.truncate(page_size);
        Page::from_documents(docs, page_size)
    }
}

impl DocumentStore for MemoryStore {
    fn get<'a>(
        &'a self,
        collection: &'a str,
        id: &'a DocumentId,
    ) -> BoxFuture<'a, Result<Option<Document>>> {
        Box::pin(async move {
            check_collection(collection)?;
            Ok(self.get_sync(collection, id))
        })
    }

    fn get_all<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Result<Vec<Document>>> {
        Box::pin(async move {
            check_collection(collection)?;
            Ok(self.get_all_sync(collection))
        })
    }

    fn insert<'a>(
        &'a self,
        collection: &'a str,
        fields: Fields,
    ) -> BoxFuture<'a, Result<DocumentId>> {
        Box::pin(async move {
            check_collection(collection)?;
            check_writable(&fields)?;
            let id = self.insert_sync(collection, fields);
            tracing::debug!(collection, %id, "inserted document");
            Ok(id)
        })
    }

    fn update<'a>(
        &'a self,
        collection: &'a str,
        id: &'a DocumentId,
        fields: Fields,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            check_collection(collection)?;
            check_writable(&fields)?;
            self.update_sync(collection, id, fields)
        })
    }

    fn delete<'a>(&'a self, collection: &'a str, id: &'a DocumentId) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            check_collection(collection)?;
            self.delete_sync(collection, id)
        })
    }

    fn query<'a>(
        &'a self,
        collection: &'a str,
        filter: &'a Filter,
    ) -> BoxFuture<'a, Result<Vec<Document>>> {
        Box::pin(async move {
            check_collection(collection)?;
            filter.validate()?;
            Ok(self.query_sync(collection, filter))
        })
    }

    fn paginate<'a>(
        &'a self,
        collection: &'a str,
        page_size: usize,
        cursor: Option<&'a Cursor>,
    ) -> BoxFuture<'a, Result<Page>> {
        Box::pin(async move {
            check_collection(collection)?;
            check_page_size(page_size)?;
            Ok(self.paginate_sync(collection, page_size, cursor))
        })
    }

    fn count<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Result<u64>> {
        Box::pin(async move {
            check_collection(collection)?;
            Ok(self
                .lock()
                .get(collection)
                .map_or(0, |docs| docs.len() as u64))
        })
    }
}

#[cfg(test)]
mod tests;
