// src/store.rs
//! Durable state: the record archive and the delivered-message handle.
//!
//! The archive is a pretty-printed JSON array, oldest first. It only grows: `merge` never
//! replaces or drops an existing record, and the key is the circular's designation (several
//! circulars may concern the same object).

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info};

use crate::error::Result;
use crate::file::{read_optional, write_atomic};
use crate::model::Record;
use crate::notify::{Handle, MessageId};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Archive {
    records: Vec<Record>,
    keys: HashSet<String>,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the archive at `path`; a missing file is an empty archive.
    /// Duplicate keys in a hand-edited file keep their first occurrence.
    pub fn load(path: &Path) -> Result<Self> {
        let Some(text) = read_optional(path)? else {
            debug!(path = %path.display(), "no archive yet");
            return Ok(Self::new());
        };
        let records: Vec<Record> = serde_json::from_str(&text)?;
        let mut archive = Self::new();
        archive.merge(records);
        info!(path = %path.display(), records = archive.len(), "archive loaded");
        Ok(archive)
    }

    /// Write the full collection, replacing the previous file atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut json = serde_json::to_string_pretty(&self.records)?;
        json.push('\n');
        write_atomic(path, json.as_bytes())?;
        info!(path = %path.display(), records = self.len(), "archive saved");
        Ok(())
    }

    /// Append `new_records` in order, skipping designations already present.
    /// Returns how many were added.
    pub fn merge(&mut self, new_records: impl IntoIterator<Item = Record>) -> usize {
        let mut added = 0;
        for rec in new_records {
            if self.keys.insert(rec.designation.clone()) {
                self.records.push(rec);
                added += 1;
            } else {
                debug!(circular = %rec.designation, "already archived");
            }
        }
        added
    }

    pub fn contains(&self, designation: &str) -> bool {
        self.keys.contains(designation)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Read the persisted handle; missing or blank file means no message yet.
pub fn load_handle(path: &Path) -> Result<Handle> {
    let handle = match read_optional(path)? {
        Some(text) if !text.trim().is_empty() => Handle::Active(MessageId::new(text.trim())),
        _ => Handle::Absent,
    };
    Ok(handle)
}

/// Persist the handle; `Absent` leaves the file untouched.
pub fn save_handle(path: &Path, handle: &Handle) -> Result<()> {
    if let Handle::Active(id) = handle {
        write_atomic(path, join!(id.as_str(), "\n").as_bytes())?;
        debug!(path = %path.display(), id = %id, "message handle saved");
    }
    Ok(())
}
