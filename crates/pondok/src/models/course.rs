use super::{Record, non_negative};
use serde::{Deserialize, Serialize};

/// A language-course institution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseInstitution {
    pub name: String,
    pub address: String,
    pub contact: String,
    #[serde(default)]
    pub programs: Vec<String>,
    /// Fee per month or package, in rupiah.
    pub cost: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub photos: Vec<String>,
    /// Average review rating, 0 to 5. Maintained outside this crate.
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
}

impl Record for CourseInstitution {
    const COLLECTION: &'static str = "courseInstitutions";

    fn validate(&self) -> Result<(), String> {
        non_negative("cost", self.cost)?;
        if !(0.0..=5.0).contains(&self.rating) {
            return Err(format!("`rating` must be between 0 and 5, got {}", self.rating));
        }
        Ok(())
    }
}
