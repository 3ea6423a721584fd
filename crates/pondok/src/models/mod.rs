//! Typed records, one per collection.
//!
//! Stored documents are JSON objects with camelCase field names. Each record
//! type knows its collection and checks its own invariants; documents that
//! fail to decode or validate are rejected at the store boundary.

mod course;
mod forum;
mod kos;
mod review;
mod user;

pub use course::CourseInstitution;
pub use forum::{ForumPost, ForumReply};
pub use kos::KosHomestay;
pub use review::{Review, TargetKind};
pub use user::UserProfile;

use chrono::{DateTime, Utc};
use pondok_store::DocumentId;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::ops::Deref;

/// A record stored in one named collection.
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;

    /// Check invariants serde cannot express. The message names the field.
    fn validate(&self) -> Result<(), String>;
}

/// A record together with its store-assigned identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Stored<T> {
    pub id: DocumentId,
    pub created_at: DateTime<Utc>,
    pub record: T,
}

impl<T> Deref for Stored<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.record
    }
}

/// A signed-in user. The uid is the id of their `users` document.
pub type User = Stored<UserProfile>;

impl User {
    pub fn uid(&self) -> &DocumentId {
        &self.id
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(format!("`{field}` must be a non-negative number, got {value}"))
    }
}

fn non_blank(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("`{field}` must not be empty"))
    } else {
        Ok(())
    }
}
