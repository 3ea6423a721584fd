use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("document {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("document {collection}/{id} does not match its schema: {message}")]
    Schema {
        collection: String,
        id: String,
        message: String,
    },

    #[error("postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error("failed to build connection pool: {0}")]
    PoolBuild(String),

    #[error("migration {version} failed: {message}")]
    Migration { version: String, message: String },

    #[error("migration {version} has already been applied")]
    AlreadyApplied { version: String },
}

/// How a failure should be treated by whoever surfaces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The identity does not exist. Rendered as a "not found" state.
    NotFound,
    /// Bad input, rejected before any round trip.
    Validation,
    /// Network, permission or database failure. The operation is abandoned.
    Remote,
}

impl Error {
    pub(crate) fn not_found(collection: &str, id: impl Into<String>) -> Self {
        Error::NotFound {
            collection: collection.to_owned(),
            id: id.into(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Validation(_) => ErrorKind::Validation,
            Error::Schema { .. }
            | Error::Postgres(_)
            | Error::Pool(_)
            | Error::PoolBuild(_)
            | Error::Migration { .. }
            | Error::AlreadyApplied { .. } => ErrorKind::Remote,
        }
    }

    /// Text suitable for showing to an end user.
    ///
    /// Validation and not-found messages are specific; anything remote
    /// collapses to a generic message so connection details never leak.
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::NotFound => "The requested item could not be found.".to_owned(),
            ErrorKind::Validation => self.to_string(),
            ErrorKind::Remote => {
                "Something went wrong while talking to the server. Please try again.".to_owned()
            }
        }
    }
}
