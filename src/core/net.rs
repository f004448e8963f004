// src/core/net.rs
// Blocking HTTP GET. One request at a time, bounded by the configured timeout.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use crate::config::consts::USER_AGENT;
use crate::error::{Error, Result};

/// Anything that can turn a URL into a response body.
///
/// The pipeline only ever needs "GET, success-class or error", so tests swap in
/// an in-memory map instead of a live server.
pub trait Fetch {
    fn get(&self, url: &str) -> Result<String>;
}

/// Live fetcher over `reqwest`.
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpClient {
    fn get(&self, url: &str) -> Result<String> {
        let resp = self.client.get(url).send().map_err(|e| Error::fetch(url, e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::fetch(url, format!("HTTP {status}")));
        }
        let body = resp.text().map_err(|e| Error::fetch(url, e))?;
        debug!(url, bytes = body.len(), "fetched");
        Ok(body)
    }
}
