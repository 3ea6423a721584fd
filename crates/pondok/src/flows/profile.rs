//! Changing the signed-in user's display name.

use super::{FormMessage, lock};
use crate::avatar::avatar_url;
use crate::error::FlowError;
use crate::flight::SingleFlight;
use crate::identity::{IdentityService, ProfileUpdate};
use crate::models::User;
use std::sync::Mutex;

const BLANK_NAME: &str = "Nama tampilan tidak boleh kosong.";
const UPDATED: &str = "Nama profil berhasil diperbarui!";
const NO_CHANGES: &str = "Tidak ada perubahan yang dilakukan.";

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileOutcome {
    /// The new name was written. Carries the refreshed user.
    Updated(User),
    /// The name was already current; nothing was written.
    NoChanges,
}

/// The profile page form. Only the display name is editable.
#[derive(Debug)]
pub struct ProfileForm {
    display_name: Mutex<String>,
    message: Mutex<Option<FormMessage>>,
    flight: SingleFlight,
}

impl ProfileForm {
    /// A form pre-filled with `user`'s current display name.
    pub fn new(user: Option<&User>) -> Self {
        let name = user
            .and_then(|u| u.display_name.clone())
            .unwrap_or_default();
        Self {
            display_name: Mutex::new(name),
            message: Mutex::default(),
            flight: SingleFlight::new(),
        }
    }

    pub fn set_display_name(&self, name: impl Into<String>) {
        *lock(&self.display_name) = name.into();
    }

    pub fn display_name(&self) -> String {
        lock(&self.display_name).clone()
    }

    pub fn message(&self) -> Option<FormMessage> {
        lock(&self.message).clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.flight.is_busy()
    }

    /// The avatar shown next to the form.
    pub fn avatar(user: &User) -> Option<String> {
        avatar_url(user)
    }

    /// Save the draft name through `identity`.
    ///
    /// Writes nothing when the trimmed name equals the current one. When a
    /// write happens it carries the display name and nothing else.
    pub async fn submit(
        &self,
        identity: &dyn IdentityService,
    ) -> Result<ProfileOutcome, FlowError> {
        let result = self.try_submit(identity).await;
        let message = match &result {
            Err(FlowError::Busy) => return result,
            Err(err) => {
                tracing::warn!(%err, "profile not updated");
                FormMessage::Error(err.user_message())
            }
            Ok(ProfileOutcome::Updated(_)) => FormMessage::Success(UPDATED.to_owned()),
            Ok(ProfileOutcome::NoChanges) => FormMessage::Success(NO_CHANGES.to_owned()),
        };
        *lock(&self.message) = Some(message);
        result
    }

    async fn try_submit(
        &self,
        identity: &dyn IdentityService,
    ) -> Result<ProfileOutcome, FlowError> {
        let user = identity.current_user().ok_or(FlowError::Unauthenticated)?;
        let draft = self.display_name();
        let name = draft.trim();
        if name.is_empty() {
            return Err(FlowError::Validation(BLANK_NAME.to_owned()));
        }
        let _guard = self.flight.try_begin().ok_or(FlowError::Busy)?;

        if user.display_name.as_deref() == Some(name) {
            tracing::debug!(uid = %user.id, "display name unchanged");
            return Ok(ProfileOutcome::NoChanges);
        }
        let updated = identity
            .update_profile(ProfileUpdate::display_name(name))
            .await?;
        tracing::info!(uid = %updated.id, "display name updated");
        Ok(ProfileOutcome::Updated(updated))
    }
}
