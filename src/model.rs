// src/model.rs
//! Shapes shared by the scanner, extractor, archive and digest.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A circular found on the index page, before its body is fetched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Descriptor {
    /// Circular code, e.g. `2024-U45`.
    pub designation: String,
    pub title: String,
    pub url: String,
}

/// Orbital element names, in the order the archive writes them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Element {
    #[serde(rename = "a")]
    SemiMajorAxis,
    #[serde(rename = "e")]
    Eccentricity,
    #[serde(rename = "i")]
    Inclination,
    #[serde(rename = "node")]
    AscendingNode,
    #[serde(rename = "peri")]
    ArgPerihelion,
    #[serde(rename = "q")]
    PerihelionDistance,
    #[serde(rename = "P")]
    Period,
    #[serde(rename = "H")]
    AbsoluteMagnitude,
    #[serde(rename = "G")]
    Slope,
    #[serde(rename = "U")]
    Uncertainty,
    #[serde(rename = "moid")]
    Moid,
}

impl Element {
    pub const ALL: [Element; 11] = [
        Element::SemiMajorAxis,
        Element::Eccentricity,
        Element::Inclination,
        Element::AscendingNode,
        Element::ArgPerihelion,
        Element::PerihelionDistance,
        Element::Period,
        Element::AbsoluteMagnitude,
        Element::Slope,
        Element::Uncertainty,
        Element::Moid,
    ];

    /// Short label as printed in circulars and the digest.
    pub fn label(self) -> &'static str {
        match self {
            Element::SemiMajorAxis => "a",
            Element::Eccentricity => "e",
            Element::Inclination => "i",
            Element::AscendingNode => "node",
            Element::ArgPerihelion => "peri",
            Element::PerihelionDistance => "q",
            Element::Period => "P",
            Element::AbsoluteMagnitude => "H",
            Element::Slope => "G",
            Element::Uncertainty => "U",
            Element::Moid => "moid",
        }
    }
}

/// A finite number, or explicitly unknown.
///
/// Build values with [`ElementValue::from_f64`]; a non-finite `Known` is treated as unknown
/// wherever it is read or written.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ElementValue {
    Known(f64),
    #[default]
    Unknown,
}

impl ElementValue {
    /// `Known` only when `v` is finite.
    pub fn from_f64(v: f64) -> Self {
        if v.is_finite() { ElementValue::Known(v) } else { ElementValue::Unknown }
    }

    pub fn known(self) -> Option<f64> {
        match self {
            ElementValue::Known(v) if v.is_finite() => Some(v),
            _ => None,
        }
    }

    pub fn is_known(self) -> bool {
        self.known().is_some()
    }
}

impl fmt::Display for ElementValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementValue::Known(v) if v.is_finite() => write!(f, "{v}"),
            _ => f.write_str(UNKNOWN),
        }
    }
}

const UNKNOWN: &str = "unknown";

impl Serialize for ElementValue {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        match self {
            ElementValue::Known(v) if v.is_finite() => ser.serialize_f64(*v),
            // a hand-built `Known(NaN)` is written as "unknown", never `null`
            _ => ser.serialize_str(UNKNOWN),
        }
    }
}

impl<'de> Deserialize<'de> for ElementValue {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(f64),
            Other(serde_json::Value),
        }
        // Anything that is not a finite number reads back as unknown.
        Ok(match Repr::deserialize(de)? {
            Repr::Num(v) => ElementValue::from_f64(v),
            Repr::Other(_) => ElementValue::Unknown,
        })
    }
}

/// Free text the roster gives for the watched facility.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrument: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observers: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurers: Option<String>,
}

/// One archived circular that credits the watched facility.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Circular code; the archive key.
    pub designation: String,
    #[serde(default)]
    pub title: String,
    /// Provisional designation of the object, e.g. `2024 UA5`.
    #[serde(default)]
    pub object: Option<String>,
    pub orbital_elements: BTreeMap<Element, ElementValue>,
    #[serde(default)]
    pub observations: Vec<String>,
    #[serde(default)]
    pub facility: FacilityDetails,
    #[serde(default)]
    pub issued: Option<String>,
    pub url: String,
}

impl Record {
    /// Value for `el`; `Unknown` if the key is missing from an older archive.
    pub fn element(&self, el: Element) -> ElementValue {
        self.orbital_elements.get(&el).copied().unwrap_or_default()
    }
}
