//! Placeholder avatars derived from an email address.

use crate::models::UserProfile;

const GRAVATAR_BASE: &str = "https://www.gravatar.com/avatar/";

/// The avatar to show for a user.
///
/// An explicit photo URL wins. Otherwise the email is hashed into an
/// identicon URL, so the same address always gets the same picture without
/// storing anything.
pub fn avatar_url(profile: &UserProfile) -> Option<String> {
    if let Some(photo) = profile.photo_url.as_deref().filter(|url| !url.is_empty()) {
        return Some(photo.to_owned());
    }
    profile.email.as_deref().map(gravatar_url)
}

pub fn gravatar_url(email: &str) -> String {
    let digest = md5::compute(email.trim().to_lowercase());
    format!("{GRAVATAR_BASE}{digest:x}?d=identicon&s=128")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(email: Option<&str>, photo: Option<&str>) -> UserProfile {
        UserProfile {
            email: email.map(str::to_owned),
            photo_url: photo.map(str::to_owned),
            ..UserProfile::default()
        }
    }

    #[test]
    fn test_photo_url_wins() {
        let p = profile(Some("a@b.com"), Some("https://img.example/me.png"));
        assert_eq!(
            avatar_url(&p).as_deref(),
            Some("https://img.example/me.png")
        );
    }

    #[test]
    fn test_email_is_normalized() {
        assert_eq!(gravatar_url(" A@B.com "), gravatar_url("a@b.com"));
    }

    #[test]
    fn test_gravatar_shape() {
        // md5("test@example.com")
        insta::assert_snapshot!(
            gravatar_url("Test@Example.com"),
            @"https://www.gravatar.com/avatar/55502f40dc8b7c769880b10874abc9d0?d=identicon&s=128"
        );
    }

    #[test]
    fn test_no_email_no_photo() {
        assert_eq!(avatar_url(&profile(None, None)), None);
        assert!(avatar_url(&profile(Some("a@b.com"), Some(""))).is_some());
    }
}
