// src/specs/circular.rs
//! Scraping *spec* for a single circular.
//!
//! The circular body is one `<pre>` block of fixed-layout text. Only the observer roster
//! decides whether the circular is ours; the code showing up in an observation line,
//! a residual table or the boilerplate is ignored. Everything else is best-effort.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::{elements, roster, sections};
use crate::core::html;
use crate::model::{Descriptor, Record};

static OBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4} [A-Z]{2}\d*)\b").expect("valid object regex"));
static OWN_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"M\.P\.E\.C\.\s+(\d{4}-[A-Z]\d+)").expect("valid circular id regex"));
static ISSUED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Issued\s+([^\n]+)").expect("valid issued regex"));

/// Build a record from a fetched circular, or `None` if the roster does not credit `code`.
pub fn parse_circular(doc: &str, desc: &Descriptor, code: &str) -> Option<Record> {
    let text = html::to_text(doc);

    let roster_block = sections::ROSTER.slice(&text)?;
    if !roster::mentions(roster_block, code) {
        debug!(circular = %desc.designation, code, "code not in observer roster");
        return None;
    }

    let designation = OWN_ID_RE
        .captures(&text)
        .map(|c| c[1].to_string())
        .unwrap_or_else(|| desc.designation.clone());

    let issued = ISSUED_RE
        .captures(&text)
        .map(|c| c[1].trim().to_string())
        .filter(|s| !s.is_empty());

    let object = object_designation(&text).or_else(|| object_designation(&desc.title));

    let orbital_elements = match sections::ELEMENTS.slice(&text) {
        Some(block) => elements::extract_elements(block, &designation),
        None => {
            debug!(circular = %designation, "no orbital elements block");
            elements::extract_elements("", &designation)
        }
    };

    let observations = sections::OBSERVATIONS
        .slice(&text)
        .map(|block| observation_lines(block, code))
        .unwrap_or_default();

    let facility = roster::facility_entry(roster_block, code)
        .map(|entry| roster::extract_details(&entry))
        .unwrap_or_default();

    Some(Record {
        designation,
        title: desc.title.clone(),
        object,
        orbital_elements,
        observations,
        facility,
        issued,
        url: desc.url.clone(),
    })
}

/// First `YYYY XXn` provisional designation in `text`.
pub fn object_designation(text: &str) -> Option<String> {
    OBJECT_RE.captures(text).map(|c| c[1].to_string())
}

/// Raw lines carrying `code`, in order, right-trimmed.
pub fn observation_lines(block: &str, code: &str) -> Vec<String> {
    block
        .lines()
        .filter(|l| l.contains(code))
        .map(|l| l.trim_end().to_string())
        .collect()
}
