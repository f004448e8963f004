// src/specs/index.rs
//! Scraping *spec* for the MPEC index pages: the recent list and the per-year directories.
//!
//! Purpose:
//! - Find `MPEC <YYYY-Lnn> (<title>)` entries in the tag-stripped recent index.
//! - Find `K24U45.html`-style links on a year directory page (backfill).
//! - Drop circular classes that can never carry an asteroid orbit (comets, satellites,
//!   editorial notices, retractions, ephemeris-only notices, corrections).
//! - Derive the per-circular URL from the designation alone, in MPC's packed form:
//!   `2024-U45` → `K24/K24U45.html`, `2024-U145` → `K24/K24UE5.html`.
//!
//! Non-Responsibilities:
//! - **No networking** (see `scrape::scan`).
//! - **No archive lookups**; skipping known circulars is the runner's call.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::core::{html, sanitize::normalize_ws};
use crate::model::Descriptor;

static ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"MPEC\s+(\d{4}-[A-Z]\d{2,3})\s*\(([^)\n]*)\)").expect("valid index regex")
});

// Links on a year directory page; groups: era, half-month letter, packed number, anchor text.
static LISTING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<(?i:a)\s[^>]*?(?i:href)\s*=\s*["']?[^"'\s>]*?([A-Z]\d{2})([A-Z])([0-9A-Za-z]\d)\.html["']?[^>]*>(.*?)</(?i:a)>"#,
    )
    .expect("valid listing regex")
});

/// Title keywords (upper-case) that mark a circular as not worth fetching.
pub const REJECT_TITLES: &[&str] = &[
    "COMET", "C/", "P/",
    "SATELLITE", "S/",
    "DAILY ORBIT UPDATE", "EDITORIAL", "NOTICE",
    "RETRACTION", "DELETION",
    "EPHEMERIS", "EPHEMERIDES",
    "CORRECTION",
];

pub fn is_rejected(title: &str) -> bool {
    let up = title.to_ascii_uppercase();
    REJECT_TITLES.iter().any(|k| up.contains(k))
}

/// Packed era code for a 4-digit year: century letter + two digits (2024 → `K24`).
pub fn packed_year(year: u32) -> Option<String> {
    let century = year / 100;
    if !(10..=35).contains(&century) {
        return None;
    }
    let letter = (b'A' + (century - 10) as u8) as char;
    Some(format!("{letter}{:02}", year % 100))
}

/// Circular number in filename form: two digits below 100, otherwise a tens letter
/// (`A`=10 … `Z`=35, `a`=36 … `z`=61) followed by the units digit. `145` → `E5`.
pub fn packed_number(n: u32) -> Option<String> {
    if n < 100 {
        return Some(format!("{n:02}"));
    }
    let tens = n / 10;
    let letter = match tens {
        10..=35 => (b'A' + (tens - 10) as u8) as char,
        36..=61 => (b'a' + (tens - 36) as u8) as char,
        _ => return None,
    };
    Some(format!("{letter}{}", n % 10))
}

/// Inverse of [`packed_number`]: `E5` → 145, `45` → 45.
pub fn unpack_number(packed: &str) -> Option<u32> {
    let mut chars = packed.chars();
    let (first, units) = (chars.next()?, chars.next()?.to_digit(10)?);
    if chars.next().is_some() {
        return None;
    }
    let tens = match first {
        '0'..='9' => first.to_digit(10)?,
        'A'..='Z' => first as u32 - 'A' as u32 + 10,
        'a'..='z' => first as u32 - 'a' as u32 + 36,
        _ => return None,
    };
    Some(tens * 10 + units)
}

/// Directory listing every circular of `year`: `{base}K24/`.
pub fn year_listing_url(base: &str, year: u32) -> Option<String> {
    packed_year(year).map(|era| format!("{base}{era}/"))
}

/// `2024-U45` → `{base}K24/K24U45.html`. `base` must end with `/`.
pub fn circular_url(base: &str, designation: &str) -> Option<String> {
    let (year, suffix) = designation.split_once('-')?;
    if year.len() != 4 {
        return None;
    }
    let mut chars = suffix.chars();
    let half_month = chars.next().filter(char::is_ascii_uppercase)?;
    let digits = chars.as_str();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let era = packed_year(year.parse().ok()?)?;
    let number = packed_number(digits.parse().ok()?)?;
    Some(format!("{base}{era}/{era}{half_month}{number}.html"))
}

/// All acceptable candidates on the index, in page order, first occurrence wins.
pub fn parse_index(doc: &str, base: &str) -> Vec<Descriptor> {
    let text = html::to_text(doc);
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for cap in ENTRY_RE.captures_iter(&text) {
        let designation = cap[1].to_string();
        let title = cap[2].trim().to_string();

        if is_rejected(&title) {
            debug!(%designation, %title, "rejected by title");
            continue;
        }
        if !seen.insert(designation.clone()) {
            continue;
        }
        let Some(url) = circular_url(base, &designation) else {
            warn!(%designation, "cannot derive circular URL; skipped");
            continue;
        };
        out.push(Descriptor { designation, title, url });
    }
    out
}

/// Circulars linked from the directory page of `year`, in page order, first occurrence wins.
/// Links into other years' directories (navigation) are ignored.
pub fn parse_year_listing(doc: &str, base: &str, year: u32) -> Vec<Descriptor> {
    let Some(era) = packed_year(year) else {
        return Vec::new();
    };
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for cap in LISTING_RE.captures_iter(doc) {
        if cap[1] != *era {
            continue;
        }
        let Some(number) = unpack_number(&cap[3]) else {
            continue;
        };
        let designation = format!("{year}-{}{number:02}", &cap[2]);

        let text = normalize_ws(&html::to_text(&cap[4]));
        let title = ENTRY_RE
            .captures(&text)
            .map(|c| c[2].trim().to_string())
            .unwrap_or_else(|| text.clone());
        if is_rejected(&title) {
            debug!(%designation, %title, "rejected by title");
            continue;
        }
        if !seen.insert(designation.clone()) {
            continue;
        }
        let Some(url) = circular_url(base, &designation) else {
            warn!(%designation, "cannot derive circular URL; skipped");
            continue;
        };
        out.push(Descriptor { designation, title, url });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.minorplanetcenter.net/mpec/";

    #[test]
    fn packs_years_by_century() {
        assert_eq!(packed_year(2024).as_deref(), Some("K24"));
        assert_eq!(packed_year(1999).as_deref(), Some("J99"));
        assert_eq!(packed_year(2005).as_deref(), Some("K05"));
        assert_eq!(packed_year(999), None);
    }

    #[test]
    fn url_from_designation() {
        assert_eq!(
            circular_url(BASE, "2024-U45").as_deref(),
            Some("https://www.minorplanetcenter.net/mpec/K24/K24U45.html")
        );
        assert_eq!(circular_url(BASE, "24-U45"), None);
        assert_eq!(circular_url(BASE, "2024-"), None);
        assert_eq!(circular_url(BASE, "2024-UX5"), None);
    }

    #[test]
    fn numbers_from_100_use_a_tens_letter() {
        assert_eq!(
            circular_url(BASE, "2024-U145").as_deref(),
            Some("https://www.minorplanetcenter.net/mpec/K24/K24UE5.html")
        );
        assert_eq!(circular_url(BASE, "2024-U100").as_deref(), Some(&*format!("{BASE}K24/K24UA0.html")));
        assert_eq!(circular_url(BASE, "2024-U05").as_deref(), Some(&*format!("{BASE}K24/K24U05.html")));
        assert_eq!(packed_number(361).as_deref(), Some("a1"));
        assert_eq!(packed_number(620), None);
    }

    #[test]
    fn number_packing_inverts() {
        for n in [0, 7, 45, 99, 100, 145, 359, 360, 619] {
            assert_eq!(unpack_number(&packed_number(n).unwrap()), Some(n), "{n}");
        }
        assert_eq!(unpack_number("E"), None);
        assert_eq!(unpack_number("E55"), None);
        assert_eq!(unpack_number("-5"), None);
    }

    #[test]
    fn year_listing_yields_this_years_circulars() {
        let doc = r#"<html><body>
<a href="../K23/">2023</a>
<a href="/mpec/K24/K24U45.html">MPEC 2024-U45 (2024 UA5)</a>
<a href="/mpec/K24/K24UE5.html">MPEC 2024-U145 (2024 UZ31)</a>
<a href="/mpec/K24/K24U47.html">MPEC 2024-U47 (COMET C/2024 U3 (ATLAS))</a>
<a href="/mpec/K23/K23Y02.html">MPEC 2023-Y02 (2023 YA1)</a>
<a href='/mpec/K24/K24A01.html'>2024 AA</a>
<a href="/mpec/K24/K24U45.html">again</a>
</body></html>"#;
        let got = parse_year_listing(doc, BASE, 2024);
        let ids: Vec<&str> = got.iter().map(|d| d.designation.as_str()).collect();
        assert_eq!(ids, vec!["2024-U45", "2024-U145", "2024-A01"]);
        assert_eq!(got[0].title, "2024 UA5");
        assert_eq!(got[1].url, format!("{BASE}K24/K24UE5.html"));
        assert_eq!(got[2].title, "2024 AA");
        assert_eq!(year_listing_url(BASE, 2024), Some(format!("{BASE}K24/")));
    }

    #[test]
    fn rejects_non_asteroid_classes() {
        assert!(is_rejected("COMET C/2024 S1 (ATLAS)"));
        assert!(is_rejected("Daily Orbit Update (26 Oct. UT"));
        assert!(is_rejected("RETRACTION OF MPEC 2024-U10"));
        assert!(is_rejected("S/2024 J 1"));
        assert!(is_rejected("Editorial Notice"));
        assert!(!is_rejected("2024 UA5"));
    }

    #[test]
    fn parses_entries_in_order_without_duplicates() {
        let doc = r#"<ul>
<li><a href="K24/K24U45.html"><i>MPEC</i> 2024-U45</a> (2024 UA5)</li>
<li><a href="K24/K24U44.html"><i>MPEC</i> 2024-U44</a> (COMET C/2024 U1 (PANSTARRS))</li>
<li><a href="K24/K24U43.html"><i>MPEC</i> 2024-U43</a> (DAILY ORBIT UPDATE (26 Oct. UT))</li>
<li><a href="K24/K24U42.html"><i>MPEC</i> 2024-U42</a> (2024 TZ12)</li>
<li><a href="K24/K24U45.html"><i>MPEC</i> 2024-U45</a> (2024 UA5)</li>
</ul>"#;
        let got = parse_index(doc, BASE);
        let ids: Vec<&str> = got.iter().map(|d| d.designation.as_str()).collect();
        assert_eq!(ids, vec!["2024-U45", "2024-U42"]);
        assert_eq!(got[1].title, "2024 TZ12");
        assert_eq!(got[1].url, format!("{BASE}K24/K24U42.html"));
    }
}
