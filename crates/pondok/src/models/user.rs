use super::Record;
use serde::{Deserialize, Serialize};

/// Profile fields of a user. The uid is the document id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(rename = "photoURL", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_student: Option<bool>,
}

impl Record for UserProfile {
    const COLLECTION: &'static str = "users";

    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}
