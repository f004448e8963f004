// src/notify/webhook.rs
//! Discord-style webhook endpoint.
//!
//! - `POST {url}?wait=true` with `{"username", "content"}` returns the created message (we keep `id`).
//! - `PATCH {url}/messages/{id}` with `{"content"}` edits it.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{MessageEndpoint, MessageId, truncate};
use crate::config::consts::USER_AGENT;
use crate::error::{Error, Result};

#[derive(Debug, Serialize)]
struct CreateBody<'a> {
    username: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct EditBody<'a> {
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    id: String,
}

pub struct WebhookEndpoint {
    client: Client,
    url: String,
    username: String,
    limit: usize,
}

impl WebhookEndpoint {
    pub fn new(url: &str, username: &str, limit: usize, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Delivery(e.to_string()))?;
        Ok(Self {
            client,
            url: tidy_url(url.trim()),
            username: s!(username),
            limit,
        })
    }

    /// URL of the message edit route, with any query string on the webhook URL kept at the end.
    pub fn message_url(&self, id: &MessageId) -> String {
        match self.url.split_once('?') {
            Some((base, query)) => format!("{base}/messages/{id}?{query}"),
            None => format!("{}/messages/{id}", self.url),
        }
    }

    fn create_url(&self) -> String {
        if self.url.contains('?') { join!(&self.url, "&wait=true") } else { join!(&self.url, "?wait=true") }
    }
}

/// Drop trailing slashes from the path part, keeping any query string.
fn tidy_url(url: &str) -> String {
    match url.split_once('?') {
        Some((path, query)) => format!("{}?{query}", path.trim_end_matches('/')),
        None => url.trim_end_matches('/').to_string(),
    }
}

fn delivery_error(e: reqwest::Error) -> Error {
    Error::Delivery(e.to_string())
}

impl MessageEndpoint for WebhookEndpoint {
    fn create(&self, content: &str) -> Result<MessageId> {
        let content = truncate(content, self.limit);
        let resp = self
            .client
            .post(self.create_url())
            .json(&CreateBody { username: &self.username, content: &content })
            .send()
            .map_err(delivery_error)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Delivery(format!("create returned HTTP {status}")));
        }
        let msg: MessageResponse = resp.json().map_err(delivery_error)?;
        debug!(id = %msg.id, "webhook message created");
        Ok(MessageId::new(msg.id))
    }

    fn update(&self, id: &MessageId, content: &str) -> Result<()> {
        let content = truncate(content, self.limit);
        let resp = self
            .client
            .patch(self.message_url(id))
            .json(&EditBody { content: &content })
            .send()
            .map_err(delivery_error)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Delivery(format!("update of {id} returned HTTP {status}")));
        }
        Ok(())
    }
}
