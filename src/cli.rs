// src/cli.rs
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::Level;

use crate::config::{Config, consts::*};
use crate::core::HttpClient;
use crate::error::Result;
use crate::log::init_tracing;
use crate::notify::{MessageEndpoint, WebhookEndpoint};
use crate::progress::Progress;
use crate::runner::{self, RunSummary};

#[derive(Debug, Parser)]
#[command(name = "mpec_watch", version, about = "Watch MPECs for an observatory code and keep a webhook digest current")]
pub struct Args {
    /// Observatory code the circular's observer roster must credit
    #[arg(short, long, env = "MPEC_FACILITY", default_value = FACILITY_CODE)]
    pub facility: String,

    /// Page listing the recent circulars
    #[arg(long, env = "MPEC_INDEX_URL", default_value = INDEX_URL)]
    pub index_url: String,

    /// Prefix the circular URLs are built from
    #[arg(long, env = "MPEC_CIRCULAR_BASE", default_value = CIRCULAR_BASE_URL)]
    pub circular_base: String,

    /// Webhook receiving the digest; unset or empty disables delivery
    #[arg(long, env = "DISCORD_WEBHOOK", hide_env_values = true)]
    pub webhook: Option<String>,

    /// Also walk this year's circular directory to backfill the archive (repeatable)
    #[arg(long = "year", value_name = "YYYY")]
    pub years: Vec<u32>,

    /// Directory holding the archive and the message handle
    #[arg(long, env = "MPEC_STORE_DIR", default_value = STORE_DIR)]
    pub store_dir: PathBuf,

    /// Also write the rendered digest here
    #[arg(long, env = "MPEC_DIGEST_OUT")]
    pub digest_out: Option<PathBuf>,

    /// Scan and archive, but do not touch the webhook
    #[arg(long)]
    pub no_notify: bool,

    /// Print the digest of the current archive and exit (no network)
    #[arg(long)]
    pub print: bool,

    #[arg(long, default_value_t = TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Pause between circular fetches
    #[arg(long, default_value_t = REQUEST_PAUSE_MS)]
    pub pause_ms: u64,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// -v for debug, -vv for trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn to_config(&self) -> Config {
        let mut cfg = Config::default()
            .with_facility(&self.facility)
            .with_circular_base(&self.circular_base)
            .with_store_dir(&self.store_dir)
            .with_backfill_years(&self.years)
            .with_webhook(if self.no_notify { None } else { self.webhook.clone() });
        cfg.index_url = self.index_url.trim().to_string();
        cfg.digest_path = self.digest_out.clone();
        cfg.timeout = Duration::from_secs(self.timeout_secs);
        cfg.request_pause = Duration::from_millis(self.pause_ms);
        cfg
    }

    fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

/// Prints one line per credited circular and a running count to stderr.
struct ConsoleProgress {
    total: usize,
    done: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
    }

    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }

    fn item_done(&mut self, designation: &str, matched: bool) {
        self.done += 1;
        if matched {
            eprintln!("[{}/{}] {designation}: credited", self.done, self.total);
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.json_logs, args.log_level());

    let config = args.to_config();
    config.validate()?;

    if args.print {
        print!("{}", runner::render_archived(&config)?);
        return Ok(());
    }

    let http = HttpClient::new(config.timeout)?;
    let webhook = match &config.webhook_url {
        Some(url) => Some(WebhookEndpoint::new(url, &config.username, config.message_limit, config.timeout)?),
        None => None,
    };
    let endpoint = webhook.as_ref().map(|w| w as &dyn MessageEndpoint);

    let mut progress = ConsoleProgress { total: 0, done: 0 };
    let summary = runner::run(&config, &http, endpoint, Some(&mut progress))?;
    report(&summary);

    if summary.delivery.is_failure() {
        // Archive is already saved; the next run retries delivery.
        tracing::warn!("digest delivery failed this run");
    }
    Ok(())
}

fn report(s: &RunSummary) {
    eprintln!(
        "candidates: {} | already archived: {} | fetched: {} | credited: {} | added: {} | archive: {}",
        s.candidates, s.already_archived, s.fetched, s.matched, s.added, s.archive_size
    );
}
