// src/specs/roster.rs
//! Observer-roster helpers: the facility filter and the facility's own entry.
//!
//! A roster entry is one line starting with the station code, plus indented continuation lines:
//! ```text
//! D65 Observatorio Astronomico, Somewhere.  Observers A. Rossi, B. Bianchi.
//!   Measurer C. Verdi.  0.35-m f/7.0 reflector + CCD.
//! ```
//! Sentences are separated by two spaces, which is what the field patterns key on.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::sanitize::tidy_field;
use crate::model::FacilityDetails;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RosterField {
    Instrument,
    Observers,
    Measurers,
}

pub struct FieldPattern {
    pub field: RosterField,
    pub anchor: &'static str,
}

pub const ROSTER_FIELDS: &[FieldPattern] = &[
    FieldPattern { field: RosterField::Observers,  anchor: r"\bObservers?\s+(.+?)\.(?:\s{2,}|\s*$)" },
    FieldPattern { field: RosterField::Measurers,  anchor: r"\bMeasurers?\s+(.+?)\.(?:\s{2,}|\s*$)" },
    FieldPattern { field: RosterField::Instrument, anchor: r"\b(\d+(?:\.\d+)?-m\s.+?)(?:\.\s{2,}|\.?\s*$)" },
];

static COMPILED: LazyLock<Vec<(RosterField, Regex)>> = LazyLock::new(|| {
    ROSTER_FIELDS
        .iter()
        .map(|p| (p.field, Regex::new(p.anchor).expect("valid roster regex")))
        .collect()
});

/// The roster filter: the code must appear verbatim inside the roster block.
pub fn mentions(roster: &str, code: &str) -> bool {
    !code.is_empty() && roster.contains(code)
}

/// The facility's entry, continuation lines joined with a sentence gap.
/// Falls back to every roster line that mentions the code.
pub fn facility_entry(roster: &str, code: &str) -> Option<String> {
    let lines: Vec<&str> = roster.lines().collect();

    let head = lines.iter().position(|l| {
        l.trim_start()
            .strip_prefix(code)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
    });

    let parts: Vec<&str> = match head {
        Some(i) => {
            let mut parts = vec![lines[i].trim()];
            parts.extend(
                lines[i + 1..]
                    .iter()
                    .take_while(|l| !l.trim().is_empty() && l.starts_with(char::is_whitespace))
                    .map(|l| l.trim()),
            );
            parts
        }
        None => lines.iter().filter(|l| l.contains(code)).map(|l| l.trim()).collect(),
    };

    if parts.is_empty() { None } else { Some(parts.join("  ")) }
}

/// Apply the field table to a facility entry; unmatched fields stay unset.
pub fn extract_details(entry: &str) -> FacilityDetails {
    let mut details = FacilityDetails::default();
    for (field, re) in COMPILED.iter() {
        let Some(value) = re.captures(entry).and_then(|c| c.get(1)).and_then(|m| tidy_field(m.as_str()))
        else {
            continue;
        };
        match field {
            RosterField::Instrument => details.instrument = Some(value),
            RosterField::Observers => details.observers = Some(value),
            RosterField::Measurers => details.measurers = Some(value),
        }
    }
    details
}
