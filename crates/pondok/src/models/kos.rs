use super::{Record, non_negative};
use serde::{Deserialize, Serialize};

/// A boarding house or homestay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KosHomestay {
    pub name: String,
    pub address: String,
    pub owner_contact: String,
    pub price_per_month: f64,
    /// Tags such as "WiFi" or "AC".
    #[serde(default)]
    pub facilities: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub is_verified: bool,
    /// Minutes by bicycle to the town center.
    pub distance_to_center: f64,
}

impl Record for KosHomestay {
    const COLLECTION: &'static str = "kosHomestays";

    fn validate(&self) -> Result<(), String> {
        non_negative("pricePerMonth", self.price_per_month)?;
        non_negative("distanceToCenter", self.distance_to_center)
    }
}
