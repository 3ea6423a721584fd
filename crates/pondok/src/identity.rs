//! Who is signed in, and changes to their profile.

use crate::collection::Collection;
use crate::error::FlowError;
use crate::models::{Record, Stored, User, UserProfile};
use pondok_store::{BoxFuture, DocumentId, DocumentStore, Error};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A partial profile change. Only the fields that are set are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl ProfileUpdate {
    pub fn display_name(name: impl Into<String>) -> Self {
        Self {
            display_name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.photo_url.is_none()
    }

    fn apply(&self, profile: &mut UserProfile) {
        if let Some(name) = &self.display_name {
            profile.display_name = Some(name.clone());
        }
        if let Some(url) = &self.photo_url {
            profile.photo_url = Some(url.clone());
        }
    }
}

/// The authentication service, as seen by the flows.
pub trait IdentityService: Send + Sync {
    /// The signed-in user, if any.
    fn current_user(&self) -> Option<User>;

    /// Write `update` to the current user's profile and return the result.
    fn update_profile<'a>(
        &'a self,
        update: ProfileUpdate,
    ) -> BoxFuture<'a, Result<User, FlowError>>;

    /// End the session.
    fn sign_out(&self);
}

/// Identity kept in the `users` collection of a document store.
pub struct StoreIdentity<S> {
    store: S,
    session: Mutex<Option<User>>,
}

impl<S: DocumentStore> StoreIdentity<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            session: Mutex::new(None),
        }
    }

    fn session(&self) -> MutexGuard<'_, Option<User>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn users(&self) -> Collection<'_, UserProfile> {
        Collection::new(&self.store)
    }

    /// Create a user document and sign in as it.
    pub async fn register(
        &self,
        email: &str,
        display_name: Option<&str>,
    ) -> Result<User, FlowError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(FlowError::Validation("Email wajib diisi.".to_owned()));
        }
        let profile = UserProfile {
            email: Some(email.to_owned()),
            display_name: display_name
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_owned),
            ..UserProfile::default()
        };
        let uid = self.users().insert(&profile).await?;
        tracing::info!(%uid, "registered user");
        self.sign_in(&uid).await
    }

    /// Load the user with `uid` and make them the current user.
    pub async fn sign_in(&self, uid: &DocumentId) -> Result<User, FlowError> {
        let user = self
            .users()
            .get(uid)
            .await?
            .ok_or_else(|| Error::NotFound {
                collection: UserProfile::COLLECTION.to_owned(),
                id: uid.to_string(),
            })?;
        *self.session() = Some(user.clone());
        Ok(user)
    }

    async fn update_profile_impl(&self, update: ProfileUpdate) -> Result<User, FlowError> {
        let current = self.current_user().ok_or(FlowError::Unauthenticated)?;
        if update.is_empty() {
            return Ok(current);
        }
        self.users().update(current.uid(), &update).await?;

        let mut record = current.record;
        update.apply(&mut record);
        let updated = Stored { record, ..current };
        let mut session = self.session();
        if session.as_ref().is_some_and(|u| u.id == updated.id) {
            *session = Some(updated.clone());
        }
        Ok(updated)
    }
}

impl<S: DocumentStore> IdentityService for StoreIdentity<S> {
    fn current_user(&self) -> Option<User> {
        self.session().clone()
    }

    fn update_profile<'a>(
        &'a self,
        update: ProfileUpdate,
    ) -> BoxFuture<'a, Result<User, FlowError>> {
        Box::pin(self.update_profile_impl(update))
    }

    fn sign_out(&self) {
        if let Some(user) = self.session().take() {
            tracing::info!(uid = %user.id, "signed out");
        }
    }
}
