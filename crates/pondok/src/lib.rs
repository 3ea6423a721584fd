//! Course and homestay listings, reviews and user profiles.
//!
//! Everything is stored through a [`pondok_store::DocumentStore`] built once
//! at startup and passed by reference. [`Collection`] gives typed access per
//! record type; the [`flows`] turn user input into at most one write each.
//!
//! ```ignore
//! let config = pondok::Config::from_env()?;
//! pondok::logging::init();
//! let store = PgStore::new(pondok_store::connect(&config.database_url, config.pool_size)?);
//!
//! let courses = Collection::<CourseInstitution>::new(&store);
//! let page = courses.page(config.page_size, None).await?;
//!
//! let form = ReviewForm::new(TargetKind::Course, course_id);
//! form.set_rating(5);
//! form.set_comment("Tutornya sabar");
//! form.submit(&store, identity.current_user().as_ref()).await?;
//! ```

pub mod avatar;
mod collection;
pub mod config;
mod error;
pub mod flight;
pub mod flows;
pub mod identity;
pub mod logging;
pub mod models;
pub mod present;

#[cfg(test)]
mod testing;

pub use collection::{Collection, RecordPage};
pub use config::Config;
pub use error::{ConfigError, FlowError};
pub use identity::{IdentityService, ProfileUpdate, StoreIdentity};
pub use models::{Record, Stored, TargetKind, User};
