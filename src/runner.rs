// src/runner.rs
use std::thread;

use tracing::info;

use crate::{
    config::Config,
    core::Fetch,
    error::Result,
    file::write_atomic,
    notify::{self, Delivery, MessageEndpoint},
    progress::Progress,
    scrape,
    store::{self, Archive},
};

/// What one run did.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    /// Candidates left after the title filter.
    pub candidates: usize,
    /// Candidates not fetched because the archive already has them.
    pub already_archived: usize,
    /// Circulars fetched and parsed (successfully or not).
    pub fetched: usize,
    /// Circulars whose roster credits the facility.
    pub matched: usize,
    /// Records new to the archive.
    pub added: usize,
    pub archive_size: usize,
    pub delivery: Delivery,
}

/// One full pass: scan → extract → merge → save → digest → deliver.
///
/// Strictly sequential. Only a failed index fetch or a local file error comes back as `Err`;
/// the archive is saved before delivery is attempted, so a delivery failure never loses records.
pub fn run(
    config: &Config,
    fetch: &dyn Fetch,
    endpoint: Option<&dyn MessageEndpoint>,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary> {
    config.validate()?;

    let archive_path = config.archive_path();
    let mut archive = Archive::load(&archive_path)?;

    let candidates = scrape::scan(fetch, config)?;
    if let Some(p) = progress.as_deref_mut() {
        p.begin(candidates.len());
        p.log(&format!("{} candidate circulars listed", candidates.len()));
    }

    let mut already_archived = 0;
    let mut fetched = 0;
    let mut found = Vec::new();

    for desc in &candidates {
        if archive.contains(&desc.designation) {
            already_archived += 1;
            if let Some(p) = progress.as_deref_mut() {
                p.item_done(&desc.designation, false);
            }
            continue;
        }

        if fetched > 0 && !config.request_pause.is_zero() {
            thread::sleep(config.request_pause); // be polite
        }
        fetched += 1;

        let record = scrape::extract(fetch, desc, &config.facility_code);
        let matched = record.is_some();
        if let Some(rec) = record {
            info!(circular = %rec.designation, object = ?rec.object, "facility credited");
            found.push(rec);
        }
        if let Some(p) = progress.as_deref_mut() {
            p.item_done(&desc.designation, matched);
        }
    }

    let matched = found.len();
    let added = archive.merge(found);
    archive.save(&archive_path)?;

    if let Some(p) = progress.as_deref_mut() {
        p.log(&format!(
            "{added} new circular(s) crediting {}; archive holds {}",
            config.facility_code,
            archive.len()
        ));
    }

    let digest = notify::render(archive.records(), &config.facility_code);
    if let Some(path) = &config.digest_path {
        write_atomic(path, digest.as_bytes())?;
        info!(path = %path.display(), "digest written");
    }

    let handle_path = config.handle_path();
    let handle = store::load_handle(&handle_path)?;
    let delivery = notify::deliver(endpoint, &digest, &handle);
    let next = handle.clone().apply(&delivery);
    if next != handle {
        store::save_handle(&handle_path, &next)?;
    }

    if let Some(p) = progress.as_deref_mut() {
        p.log(&match &delivery {
            Delivery::Skipped => s!("Notification disabled"),
            Delivery::Updated(id) => format!("Digest message {id} updated"),
            Delivery::Created(id) => format!("Digest message {id} created"),
            Delivery::Failed(e) => format!("Digest delivery failed: {e}"),
        });
        p.finish();
    }

    Ok(RunSummary {
        candidates: candidates.len(),
        already_archived,
        fetched,
        matched,
        added,
        archive_size: archive.len(),
        delivery,
    })
}

/// Digest of whatever is archived now; no network.
pub fn render_archived(config: &Config) -> Result<String> {
    let archive = Archive::load(&config.archive_path())?;
    Ok(notify::render(archive.records(), &config.facility_code))
}
