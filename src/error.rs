// src/error.rs
//! Error types for the watcher.
//!
//! Only a failed index fetch and local file trouble ever leave [`crate::runner::run`];
//! everything per-candidate or per-field is absorbed where it happens.

use thiserror::Error;

/// Errors raised by the watcher.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport failure or non-success status on a GET.
    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// Webhook create/update rejected or unreachable.
    #[error("delivery failed: {0}")]
    Delivery(String),

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        Error::Fetch { url: url.into(), reason: reason.to_string() }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|u| u.to_string()).unwrap_or_default();
        Error::Fetch { url, reason: err.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
