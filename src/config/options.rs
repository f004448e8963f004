// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use super::consts::*;
use crate::error::{Error, Result};
use crate::specs::index::packed_year;

/// Process-wide settings, built once at start and passed down the pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Observatory code the roster must mention, e.g. `D65`.
    pub facility_code: String,
    pub index_url: String,
    /// Prefix the per-circular URLs are derived from; must end with `/`.
    pub circular_base_url: String,
    /// `None` disables delivery entirely.
    pub webhook_url: Option<String>,
    pub username: String,
    pub store_dir: PathBuf,
    /// Optional copy of the rendered digest written on every run.
    pub digest_path: Option<PathBuf>,
    pub timeout: Duration,
    pub request_pause: Duration,
    pub message_limit: usize,
    /// Year directories to walk in addition to the recent index (archive backfill).
    pub backfill_years: Vec<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            facility_code: s!(FACILITY_CODE),
            index_url: s!(INDEX_URL),
            circular_base_url: s!(CIRCULAR_BASE_URL),
            webhook_url: None,
            username: s!(BOT_USERNAME),
            store_dir: PathBuf::from(STORE_DIR),
            digest_path: None,
            timeout: Duration::from_secs(TIMEOUT_SECS),
            request_pause: Duration::from_millis(REQUEST_PAUSE_MS),
            message_limit: MESSAGE_LIMIT,
            backfill_years: Vec::new(),
        }
    }
}

impl Config {
    pub fn with_facility(mut self, code: &str) -> Self {
        self.facility_code = code.trim().to_string();
        self
    }

    pub fn with_webhook(mut self, url: Option<String>) -> Self {
        // An empty env var means "not configured".
        self.webhook_url = url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty());
        self
    }

    pub fn with_store_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.store_dir = dir.into();
        self
    }

    pub fn with_circular_base(mut self, base: &str) -> Self {
        self.circular_base_url = if base.ends_with('/') { s!(base) } else { join!(base, "/") };
        self
    }

    pub fn with_backfill_years(mut self, years: &[u32]) -> Self {
        self.backfill_years = years.to_vec();
        self.backfill_years.sort_unstable();
        self.backfill_years.dedup();
        self
    }

    pub fn archive_path(&self) -> PathBuf {
        self.store_dir.join(ARCHIVE_FILE)
    }

    pub fn handle_path(&self) -> PathBuf {
        self.store_dir.join(HANDLE_FILE)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.facility_code.is_empty() {
            return Err(Error::Config(s!("facility code is empty")));
        }
        if self.facility_code.chars().any(char::is_whitespace) {
            return Err(Error::Config(format!(
                "facility code must be a single token, got {:?}",
                self.facility_code
            )));
        }
        if self.index_url.is_empty() {
            return Err(Error::Config(s!("index URL is empty")));
        }
        if let Some(year) = self.backfill_years.iter().find(|y| packed_year(**y).is_none()) {
            return Err(Error::Config(format!("backfill year {year} is out of range")));
        }
        if self.message_limit <= TRUNCATION_MARKER.chars().count() {
            return Err(Error::Config(format!(
                "message limit {} leaves no room for content",
                self.message_limit
            )));
        }
        Ok(())
    }
}
