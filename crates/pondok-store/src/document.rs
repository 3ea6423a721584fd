//! Documents, identities and pagination cursors.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;

/// Field name → value mapping making up a document's body.
pub type Fields = serde_json::Map<String, Value>;

/// Reserved field names that callers may not write.
pub const ID_FIELD: &str = "id";

/// Field filled with the store's clock on insert when the caller omits it.
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// An opaque, store-assigned document identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        DocumentId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        DocumentId(id)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        DocumentId(id.to_owned())
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A stored document: its identity, when the store created it, and its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub created_at: DateTime<Utc>,
    pub fields: Fields,
}

impl Document {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// The cursor that resumes pagination right after this document.
    pub fn cursor(&self) -> Cursor {
        Cursor {
            created_at: self.created_at,
            id: self.id.clone(),
        }
    }
}

/// Position of the last document of a page.
///
/// Pages are ordered by creation time descending, then id descending, so
/// `(created_at, id)` identifies a position even when two documents were
/// created in the same instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    pub created_at: DateTime<Utc>,
    pub id: DocumentId,
}

impl Cursor {
    /// Whether `doc` sorts strictly after this cursor in page order.
    pub fn precedes(&self, doc: &Document) -> bool {
        (doc.created_at, &doc.id) < (self.created_at, &self.id)
    }
}

/// One page of documents.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub documents: Vec<Document>,
    /// `None` when this was the last page.
    pub next_cursor: Option<Cursor>,
}

impl Page {
    pub(crate) fn from_documents(documents: Vec<Document>, page_size: usize) -> Self {
        let next_cursor = if documents.len() < page_size {
            None
        } else {
            documents.last().map(Document::cursor)
        };
        Page {
            documents,
            next_cursor,
        }
    }

    pub fn is_last(&self) -> bool {
        self.next_cursor.is_none()
    }
}
