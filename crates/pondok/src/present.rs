//! Values the listing and detail pages render.

use crate::models::{CourseInstitution, KosHomestay, Stored};
use pondok_store::DocumentId;

/// Which of five stars are filled for `rating`. Star `i` is filled when
/// `i < rating`, so 3.5 fills four.
pub fn star_states(rating: f64) -> [bool; 5] {
    std::array::from_fn(|i| (i as f64) < rating)
}

/// Rupiah with dot thousands separators, rounded to the whole rupiah:
/// `1500000.0` becomes `"Rp 1.500.000"`.
pub fn format_rupiah(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    format!("{sign}Rp {grouped}")
}

/// Summary of a course shown in listings.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseCard {
    pub id: DocumentId,
    pub name: String,
    pub address: String,
    pub cover_photo: Option<String>,
    pub programs: String,
    pub stars: [bool; 5],
    pub review_count: String,
    pub price: String,
}

impl From<&Stored<CourseInstitution>> for CourseCard {
    fn from(course: &Stored<CourseInstitution>) -> Self {
        Self {
            id: course.id.clone(),
            name: course.name.clone(),
            address: course.address.clone(),
            cover_photo: course.photos.first().cloned(),
            programs: format!("Program: {}", course.programs.join(", ")),
            stars: star_states(course.rating),
            review_count: format!("({} ulasan)", course.review_count),
            price: format_rupiah(course.cost),
        }
    }
}

/// Summary of a kos shown in listings.
#[derive(Debug, Clone, PartialEq)]
pub struct KosCard {
    pub id: DocumentId,
    pub name: String,
    pub address: String,
    pub cover_photo: Option<String>,
    pub facilities: String,
    pub verified: bool,
    pub price: String,
    pub distance: String,
}

impl From<&Stored<KosHomestay>> for KosCard {
    fn from(kos: &Stored<KosHomestay>) -> Self {
        Self {
            id: kos.id.clone(),
            name: kos.name.clone(),
            address: kos.address.clone(),
            cover_photo: kos.photos.first().cloned(),
            facilities: kos.facilities.join(" · "),
            verified: kos.is_verified,
            price: format!("{} / bulan", format_rupiah(kos.price_per_month)),
            distance: format!("{} menit bersepeda", kos.distance_to_center.round()),
        }
    }
}
