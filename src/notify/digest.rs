// src/notify/digest.rs
// Digest rendering. A pure function of the record set: no clocks, no randomness.

use std::cmp::Ordering;
use std::fmt::Write;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::config::consts::TRUNCATION_MARKER;
use crate::model::{Element, Record};

static ISSUED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4})\s+([A-Za-z]{3,})\.?\s+(\d{1,2})(?:,\s*(\d{1,2}):(\d{2}))?")
        .expect("valid issued-date regex")
});

/// Parse the circular's `Issued 2024 Oct. 26, 15:08 UT` text. Time defaults to midnight.
pub fn parse_issued(text: &str) -> Option<NaiveDateTime> {
    let c = ISSUED_RE.captures(text)?;
    let year: i32 = c[1].parse().ok()?;
    let month = month_number(&c[2])?;
    let day: u32 = c[3].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = match (c.get(4), c.get(5)) {
        (Some(h), Some(m)) => NaiveTime::from_hms_opt(h.as_str().parse().ok()?, m.as_str().parse().ok()?, 0)?,
        _ => NaiveTime::from_hms_opt(0, 0, 0)?,
    };
    Some(date.and_time(time))
}

fn month_number(name: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = ["jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec"];
    let key = name.get(..3)?.to_ascii_lowercase();
    MONTHS.iter().position(|m| *m == key).map(|i| i as u32 + 1)
}

/// Newest first; undated records after dated ones; designation ascending breaks ties.
pub fn digest_order(a: &Record, b: &Record) -> Ordering {
    let da = a.issued.as_deref().and_then(parse_issued);
    let db = b.issued.as_deref().and_then(parse_issued);
    let by_date = match (da, db) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_date.then_with(|| a.designation.cmp(&b.designation))
}

/// Markdown digest of `records` for the watched facility.
pub fn render(records: &[Record], facility_code: &str) -> String {
    let mut sorted: Vec<&Record> = records.iter().collect();
    sorted.sort_by(|a, b| digest_order(a, b));

    let mut out = String::new();
    let _ = writeln!(out, "**MPEC archive: observations by {facility_code}** ({} circulars)", sorted.len());
    out.push('\n');
    out.push_str("| Issued | MPEC | Object | H | MOID | Link |\n");
    out.push_str("|---|---|---|---|---|---|\n");

    for r in sorted {
        let issued = r
            .issued
            .as_deref()
            .and_then(parse_issued)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| s!("n/d"));
        let object = r.object.as_deref().unwrap_or("n/d");
        let _ = writeln!(
            out,
            "| {issued} | {} | {object} | {} | {} | [open]({}) |",
            r.designation,
            cell(r, Element::AbsoluteMagnitude),
            cell(r, Element::Moid),
            r.url,
        );
    }
    out
}

fn cell(r: &Record, el: Element) -> String {
    r.element(el).known().map(|v| v.to_string()).unwrap_or_else(|| s!("n/d"))
}

/// Cut `content` to at most `limit` characters, ending with the truncation marker when cut.
pub fn truncate(content: &str, limit: usize) -> String {
    if content.chars().count() <= limit {
        return s!(content);
    }
    let keep = limit.saturating_sub(TRUNCATION_MARKER.chars().count());
    let cut: String = content.chars().take(keep).collect();
    // Prefer to end on a whole table row.
    let cut = match cut.rfind('\n') {
        Some(i) if i > 0 => &cut[..i],
        _ => cut.as_str(),
    };
    join!(cut, TRUNCATION_MARKER)
}
