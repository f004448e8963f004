// src/config/consts.rs

// Net config
pub const INDEX_URL: &str = "https://www.minorplanetcenter.net/mpec/RecentMPECs.html";
pub const CIRCULAR_BASE_URL: &str = "https://www.minorplanetcenter.net/mpec/";
pub const USER_AGENT: &str = concat!("mpec_watch/", env!("CARGO_PKG_VERSION"));
pub const TIMEOUT_SECS: u64 = 20;

// Watch
pub const FACILITY_CODE: &str = "D65";

// Local store
pub const STORE_DIR: &str = ".store";
pub const ARCHIVE_FILE: &str = "archive.json";
pub const HANDLE_FILE: &str = "message_id.txt";

// Scrape
pub const REQUEST_PAUSE_MS: u64 = 75; // be polite

// Notify
pub const BOT_USERNAME: &str = "MPC Bot";
pub const MESSAGE_LIMIT: usize = 2000; // Discord content cap, in characters
pub const TRUNCATION_MARKER: &str = "\n… (truncated)";
