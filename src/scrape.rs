// src/scrape.rs
use std::collections::HashSet;

use tracing::{info, warn};

use crate::{
    config::Config,
    core::Fetch,
    error::{Error, Result},
    model::{Descriptor, Record},
    specs,
};

/// Fetch the recent index, then any backfill year directories, and list the candidates.
/// A failed recent-index fetch is fatal: there is nothing to work on without it.
/// A failed year directory is logged and skipped. Designations seen twice keep the first.
pub fn scan(fetch: &dyn Fetch, config: &Config) -> Result<Vec<Descriptor>> {
    let doc = fetch.get(&config.index_url)?;
    let mut found = specs::index::parse_index(&doc, &config.circular_base_url);
    info!(url = %config.index_url, candidates = found.len(), "index scanned");

    for &year in &config.backfill_years {
        match scan_year(fetch, config, year) {
            Ok(listed) => found.extend(listed),
            Err(e) => warn!(year, error = %e, "year directory unavailable; skipped"),
        }
    }

    let mut seen = HashSet::new();
    found.retain(|d| seen.insert(d.designation.clone()));
    Ok(found)
}

/// Candidates listed in one year's directory.
pub fn scan_year(fetch: &dyn Fetch, config: &Config, year: u32) -> Result<Vec<Descriptor>> {
    let base = &config.circular_base_url;
    let url = specs::index::year_listing_url(base, year)
        .ok_or_else(|| Error::Config(format!("backfill year {year} is out of range")))?;
    let doc = fetch.get(&url)?;
    let found = specs::index::parse_year_listing(&doc, base, year);
    info!(%url, year, candidates = found.len(), "year directory scanned");
    Ok(found)
}

/// Fetch one circular and parse it.
/// Any fetch failure is logged and turned into "no record"; the batch carries on.
pub fn extract(fetch: &dyn Fetch, desc: &Descriptor, facility_code: &str) -> Option<Record> {
    let doc = match fetch.get(&desc.url) {
        Ok(doc) => doc,
        Err(e) => {
            warn!(circular = %desc.designation, error = %e, "circular fetch failed; skipped");
            return None;
        }
    };
    specs::circular::parse_circular(&doc, desc, facility_code)
}
