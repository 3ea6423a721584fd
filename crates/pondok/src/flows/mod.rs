//! User-initiated mutations.
//!
//! Each form validates its draft locally, allows one submission in flight at
//! a time, issues at most one write, and keeps the outcome as a message the
//! page can render. Nothing here aborts the caller: every failure ends up as
//! a [`FlowError`](crate::FlowError) and a [`FormMessage`].

pub mod profile;
pub mod review;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// The last outcome of a form, shown inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMessage {
    Success(String),
    Error(String),
}

impl FormMessage {
    pub fn text(&self) -> &str {
        match self {
            FormMessage::Success(text) | FormMessage::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FormMessage::Error(_))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
