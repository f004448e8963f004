// src/specs/sections.rs
// Labeled blocks inside a circular's plain text.

/// A block that starts after `start` and stops at the nearest of `ends` (or end of text).
#[derive(Clone, Copy, Debug)]
pub struct Section {
    pub start: &'static str,
    pub ends: &'static [&'static str],
}

pub const OBSERVATIONS: Section = Section {
    start: "Observations:",
    ends: &["Observer details:", "Orbital elements:"],
};

/// The observer roster; the only place the facility code is trusted.
pub const ROSTER: Section = Section {
    start: "Observer details:",
    ends: &["Orbital elements:", "Residuals in seconds of arc", "Ephemeris:"],
};

pub const ELEMENTS: Section = Section {
    start: "Orbital elements:",
    ends: &["Residuals in seconds of arc", "Ephemeris:", "Observations:", "Observer details:"],
};

impl Section {
    /// Text between the start label and the nearest end label.
    /// `None` if the start label is absent.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        let from = text.find(self.start)? + self.start.len();
        let rest = &text[from..];
        let end = self
            .ends
            .iter()
            .filter_map(|label| rest.find(label))
            .min()
            .unwrap_or(rest.len());
        Some(&rest[..end])
    }
}
