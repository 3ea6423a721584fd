//! Posting a review on a course or a kos.

use super::{FormMessage, lock};
use crate::collection::Collection;
use crate::error::FlowError;
use crate::flight::SingleFlight;
use crate::models::{Review, Stored, TargetKind, User};
use pondok_store::{DocumentId, DocumentStore, Filter};
use std::sync::Mutex;

/// Author name used when the user has neither a display name nor an email.
pub const ANONYMOUS_AUTHOR: &str = "Anonim";

const MISSING_INPUT: &str = "Rating dan komentar harus diisi.";
const RATING_OUT_OF_RANGE: &str = "Rating harus antara 1 dan 5.";
const SUBMITTED: &str = "Ulasan Anda berhasil ditambahkan!";

/// What the user has typed so far. A rating of 0 means none was picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewDraft {
    pub rating: u8,
    pub comment: String,
}

/// The review form on one course or kos page.
#[derive(Debug)]
pub struct ReviewForm {
    kind: TargetKind,
    target_id: String,
    draft: Mutex<ReviewDraft>,
    message: Mutex<Option<FormMessage>>,
    flight: SingleFlight,
}

impl ReviewForm {
    pub fn new(kind: TargetKind, target_id: impl Into<String>) -> Self {
        Self {
            kind,
            target_id: target_id.into(),
            draft: Mutex::default(),
            message: Mutex::default(),
            flight: SingleFlight::new(),
        }
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn set_rating(&self, rating: u8) {
        lock(&self.draft).rating = rating;
    }

    pub fn set_comment(&self, comment: impl Into<String>) {
        lock(&self.draft).comment = comment.into();
    }

    pub fn draft(&self) -> ReviewDraft {
        lock(&self.draft).clone()
    }

    pub fn message(&self) -> Option<FormMessage> {
        lock(&self.message).clone()
    }

    /// Whether the submit control should be disabled.
    pub fn is_submitting(&self) -> bool {
        self.flight.is_busy()
    }

    /// Post the draft as `user`.
    ///
    /// On success the draft is cleared. On failure it is kept so the user can
    /// try again, and the error's message is recorded. The target's
    /// aggregate rating is not touched.
    pub async fn submit(
        &self,
        store: &dyn DocumentStore,
        user: Option<&User>,
    ) -> Result<DocumentId, FlowError> {
        let result = self.try_submit(store, user).await;
        match &result {
            Err(FlowError::Busy) => {}
            Err(err) => {
                tracing::warn!(
                    target_id = %self.target_id,
                    kind = %self.kind,
                    %err,
                    "review not submitted"
                );
                *lock(&self.message) = Some(FormMessage::Error(err.user_message()));
            }
            Ok(_) => {}
        }
        result
    }

    async fn try_submit(
        &self,
        store: &dyn DocumentStore,
        user: Option<&User>,
    ) -> Result<DocumentId, FlowError> {
        let user = user.ok_or(FlowError::Unauthenticated)?;
        let draft = self.draft();
        let comment = draft.comment.trim();
        if draft.rating == 0 || comment.is_empty() {
            return Err(FlowError::Validation(MISSING_INPUT.to_owned()));
        }
        if draft.rating > 5 {
            return Err(FlowError::Validation(RATING_OUT_OF_RANGE.to_owned()));
        }
        let _guard = self.flight.try_begin().ok_or(FlowError::Busy)?;
        *lock(&self.message) = None;

        let review = Review {
            target_id: self.target_id.clone(),
            target_type: self.kind,
            author_id: user.uid().to_string(),
            author_name: author_name(user),
            rating: draft.rating,
            comment: comment.to_owned(),
            timestamp: None,
        };
        let id = Collection::<Review>::new(store).insert(&review).await?;
        tracing::info!(%id, target_id = %self.target_id, kind = %self.kind, "review submitted");

        *lock(&self.draft) = ReviewDraft::default();
        *lock(&self.message) = Some(FormMessage::Success(SUBMITTED.to_owned()));
        Ok(id)
    }
}

/// Display name, else email, else [`ANONYMOUS_AUTHOR`].
pub fn author_name(user: &User) -> String {
    [user.display_name.as_deref(), user.email.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|name| !name.is_empty())
        .unwrap_or(ANONYMOUS_AUTHOR)
        .to_owned()
}

/// Reviews of one target, newest first.
pub async fn reviews_for(
    store: &dyn DocumentStore,
    kind: TargetKind,
    target_id: &str,
) -> Result<Vec<Stored<Review>>, FlowError> {
    let mut reviews = Collection::<Review>::new(store)
        .query(&Filter::eq("targetId", target_id))
        .await?;
    reviews.retain(|review| review.target_type == kind);
    reviews.sort_by(|a, b| (b.created_at, &b.id).cmp(&(a.created_at, &a.id)));
    Ok(reviews)
}

/// Average rating and count, computed for display. Never written back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewSummary {
    pub count: usize,
    /// `None` when there are no reviews.
    pub average: Option<f64>,
}

impl ReviewSummary {
    pub fn from_reviews(reviews: &[Stored<Review>]) -> Self {
        let count = reviews.len();
        let total: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
        let average = (count > 0).then(|| f64::from(total) / count as f64);
        Self { count, average }
    }
}
