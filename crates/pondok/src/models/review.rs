use super::{CourseInstitution, KosHomestay, Record, non_blank};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a review is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Course,
    Kos,
}

impl TargetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetKind::Course => "course",
            TargetKind::Kos => "kos",
        }
    }

    /// The collection holding targets of this kind.
    pub fn collection(self) -> &'static str {
        match self {
            TargetKind::Course => CourseInstitution::COLLECTION,
            TargetKind::Kos => KosHomestay::COLLECTION,
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's rating and comment on a course or a kos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub target_id: String,
    pub target_type: TargetKind,
    pub author_id: String,
    pub author_name: String,
    /// 1 to 5.
    pub rating: u8,
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Record for Review {
    const COLLECTION: &'static str = "reviews";

    fn validate(&self) -> Result<(), String> {
        if !(1..=5).contains(&self.rating) {
            return Err(format!("`rating` must be between 1 and 5, got {}", self.rating));
        }
        non_blank("comment", &self.comment)
    }
}
