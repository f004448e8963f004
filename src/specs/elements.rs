// src/specs/elements.rs
//! Orbital-element table.
//!
//! Each row pairs an [`Element`] with a label-anchored pattern (capture group 1 is the raw
//! token) and a parser. Rows are evaluated independently against the pre-sliced
//! `Orbital elements:` block, so adding a field is a one-line table edit.
//!
//! The block looks like:
//! ```text
//! 2024 UA5                                                 Earth MOID = 0.0123 AU
//! Epoch 2024 Oct. 17.0 TT = JDT 2460600.5                 MPC
//! M 355.12345              (2000.0)            P               Q
//! n   0.41658214     Peri.  124.12345     +0.12345678     -0.23456789
//! a   1.7971234      Node    12.34567     +0.34567890     +0.45678901
//! e   0.4512345      Incl.    5.67890     +0.56789012     +0.67890123
//! P   2.41           H   21.3           G   0.15           U   6
//! q   0.9862345      Q    2.6080123
//! ```

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::model::{Element, ElementValue};

pub type Parser = fn(&str) -> Option<f64>;

pub struct ElementPattern {
    pub element: Element,
    pub anchor: &'static str,
    pub parse: Parser,
}

/// Anchors accept `H   21.3`, `H = 21.3` and `H=21.3` alike.
pub const ELEMENT_PATTERNS: &[ElementPattern] = &[
    ElementPattern { element: Element::SemiMajorAxis,      anchor: r"(?m)^a\b\s*=?\s*(\S+)",  parse: parse_float },
    ElementPattern { element: Element::Eccentricity,       anchor: r"(?m)^e\b\s*=?\s*(\S+)",  parse: parse_float },
    ElementPattern { element: Element::Inclination,        anchor: r"\bIncl\.\s*=?\s*(\S+)",  parse: parse_float },
    ElementPattern { element: Element::AscendingNode,      anchor: r"\bNode\b\s*=?\s*(\S+)", parse: parse_float },
    ElementPattern { element: Element::ArgPerihelion,      anchor: r"\bPeri\.\s*=?\s*(\S+)",  parse: parse_float },
    ElementPattern { element: Element::PerihelionDistance, anchor: r"(?m)^q\b\s*=?\s*(\S+)",  parse: parse_float },
    ElementPattern { element: Element::Period,             anchor: r"(?m)^P\b\s*=?\s*(\S+)",  parse: parse_float },
    ElementPattern { element: Element::AbsoluteMagnitude,  anchor: r"\bH\b\s*=?\s*(\S+)",    parse: parse_float },
    ElementPattern { element: Element::Slope,              anchor: r"\bG\b\s*=?\s*(\S+)",    parse: parse_float },
    ElementPattern { element: Element::Uncertainty,        anchor: r"\bU\b\s*=?\s*(\S+)",    parse: parse_float },
    ElementPattern { element: Element::Moid,               anchor: r"\bMOID\b\s*=?\s*(\S+)", parse: parse_float },
];

static COMPILED: LazyLock<Vec<(Element, Regex, Parser)>> = LazyLock::new(|| {
    ELEMENT_PATTERNS
        .iter()
        .map(|p| (p.element, Regex::new(p.anchor).expect("valid element regex"), p.parse))
        .collect()
});

/// Finite float, tolerating trailing list punctuation.
pub fn parse_float(token: &str) -> Option<f64> {
    token
        .trim_end_matches([',', ';'])
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Run every row of the table; every element ends up in the map, known or not.
/// `context` only labels log lines.
pub fn extract_elements(section: &str, context: &str) -> BTreeMap<Element, ElementValue> {
    let mut out = BTreeMap::new();
    for (element, re, parse) in COMPILED.iter() {
        let value = match re.captures(section).and_then(|c| c.get(1)) {
            None => {
                debug!(circular = context, element = element.label(), "element not found");
                ElementValue::Unknown
            }
            Some(m) => match parse(m.as_str()) {
                Some(v) => ElementValue::from_f64(v),
                None => {
                    warn!(
                        circular = context,
                        element = element.label(),
                        token = m.as_str(),
                        "malformed numeric, recorded as unknown"
                    );
                    ElementValue::Unknown
                }
            },
        };
        out.insert(*element, value);
    }
    out
}
