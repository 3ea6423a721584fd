use pondok_store::ErrorKind;
use thiserror::Error;

/// Why a user-initiated flow did not complete.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("no signed-in user")]
    Unauthenticated,

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("a previous submission is still in flight")]
    Busy,

    #[error(transparent)]
    Store(#[from] pondok_store::Error),
}

impl FlowError {
    /// Text shown inline next to the form.
    pub fn user_message(&self) -> String {
        match self {
            FlowError::Unauthenticated => "Anda harus login terlebih dahulu.".to_owned(),
            FlowError::Validation(message) => message.clone(),
            FlowError::Busy => "Permintaan sebelumnya masih diproses.".to_owned(),
            FlowError::Store(pondok_store::Error::Validation(message)) => message.clone(),
            FlowError::Store(err) => match err.kind() {
                ErrorKind::NotFound => "Data tidak ditemukan.".to_owned(),
                ErrorKind::Validation => "Data yang dikirim tidak valid.".to_owned(),
                ErrorKind::Remote => "Terjadi kesalahan pada server. Silakan coba lagi.".to_owned(),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    #[error("invalid {key}={value:?}: {message}")]
    Invalid {
        key: &'static str,
        value: String,
        message: String,
    },
}
