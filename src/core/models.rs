// src/core/models.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use strum::{AsRefStr, Display, EnumIter, EnumString};
use url::Url;

// --- Server Models ---

// The closed set of web servers a capability module exists for.
// Parsing is case-insensitive so `--server NGINX` and a `Server: nginx` header
// both land on the same variant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr, EnumString, EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ServerKind {
    Apache,
    Iis,
    Nginx,
}

impl ServerKind {
    /// Guesses the server from the value of a `Server` response header.
    ///
    /// Returns `None` for anything that is not one of the three known servers
    /// (e.g. `cloudflare`, `LiteSpeed`), leaving the fallback to the caller.
    pub fn from_server_header(value: &str) -> Option<Self> {
        let value = value.to_ascii_lowercase();
        if value.contains("apache") {
            Some(ServerKind::Apache)
        } else if value.contains("iis") {
            Some(ServerKind::Iis)
        } else if value.contains("nginx") {
            Some(ServerKind::Nginx)
        } else {
            None
        }
    }
}

// --- Options ---

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_USER_AGENT: &str = concat!("VanguardWP/", env!("CARGO_PKG_VERSION"));

// Immutable snapshot of what the operator asked for on the command line.
// Built once in `cli.rs` and only ever read afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct ScanOptions {
    pub url: Option<Url>,
    // `None` means neither `--update` nor `--no-update` was given.
    pub update: Option<bool>,
    pub server: Option<ServerKind>,
    pub force: bool,
    pub verbose: bool,
    pub interactive: bool,
    pub banner: bool,
    pub db_dir: PathBuf,
    pub db_source: Url,
    pub request_timeout: Duration,
    pub user_agent: String,
    pub ignore_main_redirect: bool,
}

impl ScanOptions {
    /// Options with every flag at its default, pointing at `db_dir`.
    pub fn new(db_dir: impl Into<PathBuf>, db_source: Url) -> Self {
        Self {
            url: None,
            update: None,
            server: None,
            force: false,
            verbose: false,
            interactive: false,
            banner: true,
            db_dir: db_dir.into(),
            db_source,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            ignore_main_redirect: false,
        }
    }
}

// --- Derived Status Snapshots ---

// What the local signature database looks like right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatabaseStatus {
    pub missing_files: bool,
    pub outdated: bool,
    pub last_update: Option<DateTime<Utc>>,
}

// What the detection queries of a target currently report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetStatus {
    pub is_expected_cms: bool,
    pub is_hosted_elsewhere: bool,
    pub homepage_url: String,
    pub detected_server: Option<ServerKind>,
}

// --- Exit Statuses ---

// Process exit statuses. The numeric values are part of the CLI contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ExitStatus {
    Ok = 0,
    CliOptionError = 1,
    Exception = 3,
    Error = 4,
    // The target is reachable but its install wizard is still exposed.
    Vulnerable = 5,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        self as i32
    }
}
