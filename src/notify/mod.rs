// src/notify/mod.rs
//! Create-or-update delivery of the digest.
//!
//! One chat message per deployment, edited in place on every run. The only state is the
//! [`Handle`]: `Absent` until a message has been created, then `Active(id)`.
//!
//! ```text
//!   Absent ──create ok──────────────────────────▶ Active(new)
//!   Active(id) ──update ok──────────────────────▶ Active(id)
//!   Active(id) ──update failed, create ok───────▶ Active(new)
//!   any ──both failed / endpoint unconfigured───▶ unchanged
//! ```

pub mod digest;
pub mod webhook;

use std::fmt;

use tracing::{info, warn};

use crate::error::Result;

pub use digest::{render, truncate};
pub use webhook::WebhookEndpoint;

/// Identifier the endpoint returned for the message we own.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Handle {
    #[default]
    Absent,
    Active(MessageId),
}

/// What the dispatcher did this run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// No endpoint configured; not a failure.
    Skipped,
    /// Existing message edited in place.
    Updated(MessageId),
    /// New message posted; supersedes any previous handle.
    Created(MessageId),
    Failed(String),
}

/// First move for a given handle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Create,
    Update(MessageId),
}

impl Handle {
    pub fn first_step(&self) -> Step {
        match self {
            Handle::Absent => Step::Create,
            Handle::Active(id) => Step::Update(id.clone()),
        }
    }

    /// Handle to persist after `outcome`.
    pub fn apply(self, outcome: &Delivery) -> Handle {
        match outcome {
            Delivery::Created(id) => Handle::Active(id.clone()),
            Delivery::Updated(_) | Delivery::Skipped | Delivery::Failed(_) => self,
        }
    }
}

impl Delivery {
    pub fn is_failure(&self) -> bool {
        matches!(self, Delivery::Failed(_))
    }
}

/// A place that can post a message and edit it later.
pub trait MessageEndpoint {
    fn create(&self, content: &str) -> Result<MessageId>;
    fn update(&self, id: &MessageId, content: &str) -> Result<()>;
}

/// Run the create-or-update protocol for `digest`.
/// Errors never escape: they come back as [`Delivery::Failed`].
pub fn deliver(endpoint: Option<&dyn MessageEndpoint>, digest: &str, handle: &Handle) -> Delivery {
    let Some(endpoint) = endpoint else {
        info!("no notification endpoint configured; delivery skipped");
        return Delivery::Skipped;
    };

    if let Step::Update(id) = handle.first_step() {
        match endpoint.update(&id, digest) {
            Ok(()) => {
                info!(id = %id, "digest message updated");
                return Delivery::Updated(id);
            }
            Err(e) => warn!(id = %id, error = %e, "update failed; posting a new message"),
        }
    }

    match endpoint.create(digest) {
        Ok(id) => {
            info!(id = %id, "digest message created");
            Delivery::Created(id)
        }
        Err(e) => {
            warn!(error = %e, "digest delivery failed");
            Delivery::Failed(e.to_string())
        }
    }
}
