// tests/pipeline.rs
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use mpec_watch::config::Config;
use mpec_watch::core::Fetch;
use mpec_watch::error::{Error, Result};
use mpec_watch::model::{Element, ElementValue};
use mpec_watch::notify::{Delivery, Handle, MessageEndpoint, MessageId};
use mpec_watch::progress::Progress;
use mpec_watch::runner::{self, RunSummary};
use mpec_watch::store::{self, Archive};

const INDEX_URL: &str = "https://mpc.test/mpec/RecentMPECs.html";
const BASE: &str = "https://mpc.test/mpec/";

/// In-memory web: unknown URLs fail like a 404.
struct FakeWeb {
    pages: HashMap<String, String>,
    hits: RefCell<Vec<String>>,
}

impl FakeWeb {
    fn standard() -> Self {
        let mut pages = HashMap::new();
        pages.insert(s(INDEX_URL), s(include_str!("fixtures/index.html")));
        pages.insert(format!("{BASE}K24/K24U45.html"), s(include_str!("fixtures/circular_roster.html")));
        pages.insert(format!("{BASE}K24/K24U46.html"), s(include_str!("fixtures/circular_table_only.html")));
        Self { pages, hits: RefCell::new(Vec::new()) }
    }

    fn hits(&self) -> Vec<String> {
        self.hits.borrow().clone()
    }
}

impl Fetch for FakeWeb {
    fn get(&self, url: &str) -> Result<String> {
        self.hits.borrow_mut().push(s(url));
        self.pages.get(url).cloned().ok_or_else(|| Error::fetch(url, "HTTP 404 Not Found"))
    }
}

/// Records every call; fails updates and/or creates on request.
#[derive(Default)]
struct FakeHook {
    fail_update: bool,
    fail_create: bool,
    next_id: RefCell<u32>,
    creates: RefCell<Vec<String>>,
    updates: RefCell<Vec<(String, String)>>,
}

impl MessageEndpoint for FakeHook {
    fn create(&self, content: &str) -> Result<MessageId> {
        if self.fail_create {
            return Err(Error::Delivery(s("HTTP 500")));
        }
        self.creates.borrow_mut().push(s(content));
        let mut n = self.next_id.borrow_mut();
        *n += 1;
        Ok(MessageId::new(format!("msg-{n}")))
    }

    fn update(&self, id: &MessageId, content: &str) -> Result<()> {
        if self.fail_update {
            return Err(Error::Delivery(s("HTTP 404 Unknown Message")));
        }
        self.updates.borrow_mut().push((id.to_string(), s(content)));
        Ok(())
    }
}

/// Counts progress callbacks so every run can be checked against its summary.
#[derive(Default)]
struct Tally {
    total: usize,
    done: usize,
    credited: usize,
    finished: bool,
}

impl Progress for Tally {
    fn begin(&mut self, total: usize) {
        self.total = total;
    }

    fn item_done(&mut self, _designation: &str, matched: bool) {
        self.done += 1;
        if matched {
            self.credited += 1;
        }
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}

fn s(v: &str) -> String {
    v.to_string()
}

fn config(store: &Path) -> Config {
    let mut cfg = Config::default().with_store_dir(store).with_circular_base(BASE);
    cfg.index_url = s(INDEX_URL);
    cfg.request_pause = Duration::ZERO;
    cfg
}

fn run(cfg: &Config, web: &FakeWeb, hook: Option<&FakeHook>) -> RunSummary {
    let mut progress = Tally::default();
    let summary = runner::run(cfg, web, hook.map(|h| h as &dyn MessageEndpoint), Some(&mut progress)).unwrap();
    assert_eq!(progress.total, summary.candidates);
    assert_eq!(progress.done, summary.candidates);
    assert_eq!(progress.credited, summary.matched);
    assert!(progress.finished);
    summary
}

#[test]
fn only_roster_credited_circulars_are_archived() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    let web = FakeWeb::standard();

    let summary = run(&cfg, &web, None);
    assert_eq!(summary.candidates, 2);
    assert_eq!(summary.fetched, 2);
    assert_eq!(summary.matched, 1);
    assert_eq!(summary.added, 1);
    assert_eq!(summary.delivery, Delivery::Skipped);

    let archive = Archive::load(&cfg.archive_path()).unwrap();
    assert_eq!(archive.len(), 1);
    let rec = &archive.records()[0];
    assert_eq!(rec.designation, "2024-U45");
    assert_eq!(rec.object.as_deref(), Some("2024 UA5"));
    assert_eq!(rec.element(Element::AbsoluteMagnitude), ElementValue::Known(21.3));
    assert_eq!(rec.element(Element::Eccentricity), ElementValue::Known(0.45));
    assert_eq!(rec.element(Element::Moid), ElementValue::Known(0.0123));
    assert_eq!(rec.observations.len(), 2);
    assert!(rec.observations.iter().all(|l| l.contains("D65")));
    assert_eq!(rec.facility.observers.as_deref(), Some("A. Rossi, B. Bianchi"));
    assert_eq!(rec.facility.measurers.as_deref(), Some("C. Verdi"));
    assert_eq!(rec.issued.as_deref(), Some("2024 Oct. 26, 15:08 UT"));
    assert_eq!(rec.url, format!("{BASE}K24/K24U45.html"));

    // Rejected titles are never fetched.
    assert!(!web.hits().iter().any(|u| u.contains("U47") || u.contains("U44")));
}

#[test]
fn second_run_skips_archived_circulars() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    let web = FakeWeb::standard();

    run(&cfg, &web, None);
    let before = fs::read_to_string(cfg.archive_path()).unwrap();

    let again = FakeWeb::standard();
    let summary = run(&cfg, &again, None);
    assert_eq!(summary.added, 0);
    assert_eq!(summary.already_archived, 1);
    assert_eq!(summary.archive_size, 1);
    assert!(!again.hits().iter().any(|u| u.ends_with("K24U45.html")));
    assert_eq!(fs::read_to_string(cfg.archive_path()).unwrap(), before);
}

#[test]
fn unreachable_circular_is_skipped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    let mut web = FakeWeb::standard();
    web.pages.remove(&format!("{BASE}K24/K24U46.html"));

    let summary = run(&cfg, &web, None);
    assert_eq!(summary.fetched, 2);
    assert_eq!(summary.added, 1);
}

#[test]
fn unreachable_index_is_fatal_and_leaves_store_alone() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    let mut web = FakeWeb::standard();
    web.pages.remove(INDEX_URL);

    let err = runner::run(&cfg, &web, None, None).unwrap_err();
    assert!(matches!(err, Error::Fetch { .. }));
    assert!(!cfg.archive_path().exists());
}

#[test]
fn first_delivery_creates_and_persists_the_handle() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    let hook = FakeHook::default();

    let summary = run(&cfg, &FakeWeb::standard(), Some(&hook));
    assert_eq!(summary.delivery, Delivery::Created(MessageId::new("msg-1")));
    assert_eq!(
        store::load_handle(&cfg.handle_path()).unwrap(),
        Handle::Active(MessageId::new("msg-1"))
    );
    assert!(hook.creates.borrow()[0].contains("| 2024-U45 |"));

    // Next run edits the same message.
    let summary = run(&cfg, &FakeWeb::standard(), Some(&hook));
    assert_eq!(summary.delivery, Delivery::Updated(MessageId::new("msg-1")));
    assert_eq!(hook.creates.borrow().len(), 1);
    assert_eq!(hook.updates.borrow()[0].0, "msg-1");
}

#[test]
fn failed_update_falls_back_to_create_and_replaces_the_handle() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    fs::write(cfg.handle_path(), "stale-id\n").unwrap();

    let hook = FakeHook { fail_update: true, ..Default::default() };
    let summary = run(&cfg, &FakeWeb::standard(), Some(&hook));
    assert_eq!(summary.delivery, Delivery::Created(MessageId::new("msg-1")));
    assert_eq!(fs::read_to_string(cfg.handle_path()).unwrap().trim(), "msg-1");
}

#[test]
fn total_delivery_failure_keeps_archive_and_handle() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    fs::write(cfg.handle_path(), "old-id\n").unwrap();

    let hook = FakeHook { fail_update: true, fail_create: true, ..Default::default() };
    let summary = run(&cfg, &FakeWeb::standard(), Some(&hook));
    assert!(summary.delivery.is_failure());
    assert_eq!(fs::read_to_string(cfg.handle_path()).unwrap(), "old-id\n");
    assert_eq!(Archive::load(&cfg.archive_path()).unwrap().len(), 1);
}

#[test]
fn backfill_year_feeds_the_same_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path()).with_backfill_years(&[2024]);
    let mut web = FakeWeb::standard();
    web.pages.insert(format!("{BASE}K24/"), s(include_str!("fixtures/year_K24.html")));
    web.pages.insert(format!("{BASE}K24/K24AE5.html"), s(include_str!("fixtures/circular_backfill.html")));

    let summary = run(&cfg, &web, None);
    // recent: U46, U45; year: A01, A145 (U45 listed twice, comet rejected)
    assert_eq!(summary.candidates, 4);
    assert_eq!(summary.added, 2);

    let archive = Archive::load(&cfg.archive_path()).unwrap();
    assert!(archive.contains("2024-U45"));
    let rec = archive.records().iter().find(|r| r.designation == "2024-A145").unwrap();
    assert_eq!(rec.object.as_deref(), Some("2024 AB12"));
    assert_eq!(rec.url, format!("{BASE}K24/K24AE5.html"));
    assert_eq!(rec.element(Element::AbsoluteMagnitude), ElementValue::Known(22.7));
    assert_eq!(rec.element(Element::Eccentricity), ElementValue::Known(0.31));
    assert_eq!(rec.element(Element::Moid), ElementValue::Known(0.0451));
    assert!(!web.hits().iter().any(|u| u.ends_with("K24A17.html")));
}

#[test]
fn missing_year_directory_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path()).with_backfill_years(&[2023]);

    let summary = run(&cfg, &FakeWeb::standard(), None);
    assert_eq!(summary.candidates, 2);
    assert_eq!(summary.added, 1);
}

#[test]
fn digest_file_and_print_agree() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(dir.path());
    let out = dir.path().join("digest.md");
    cfg.digest_path = Some(out.clone());

    run(&cfg, &FakeWeb::standard(), None);
    let written = fs::read_to_string(&out).unwrap();
    assert!(written.contains("| 2024-10-26 | 2024-U45 | 2024 UA5 | 21.3 | 0.0123 |"));
    assert!(!written.contains("2024-U46"));
    assert_eq!(runner::render_archived(&cfg).unwrap(), written);
}
