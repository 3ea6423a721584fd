use super::{Record, non_blank};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A post on the community forum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumPost {
    pub author_id: String,
    pub author_name: String,
    #[serde(
        rename = "authorPhotoURL",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub author_photo_url: Option<String>,
    pub content: String,
    /// Left empty on write; the store fills it with its own clock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub replies_count: u32,
    #[serde(default)]
    pub likes_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<String>,
}

impl Record for ForumPost {
    const COLLECTION: &'static str = "forumPosts";

    fn validate(&self) -> Result<(), String> {
        non_blank("content", &self.content)
    }
}

/// A reply to a [`ForumPost`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumReply {
    pub post_id: String,
    pub author_id: String,
    pub author_name: String,
    #[serde(
        rename = "authorPhotoURL",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub author_photo_url: Option<String>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Record for ForumReply {
    const COLLECTION: &'static str = "forumReplies";

    fn validate(&self) -> Result<(), String> {
        non_blank("content", &self.content)
    }
}
