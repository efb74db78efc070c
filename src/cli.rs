// src/cli.rs

use crate::core::models::{DEFAULT_USER_AGENT, ScanOptions, ServerKind};
use crate::logging::default_db_dir;
use clap::{ArgGroup, Parser};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_DB_SOURCE: &str = "https://data.wpscan.org/";

#[derive(Parser, Debug)]
#[command(name = "vanguard-wp", version)]
#[command(about = "Pre-scan gate of the Vanguard WordPress scanner")]
#[command(group(ArgGroup::new("action").required(true).multiple(true).args(["url", "update", "no_update"])))]
pub struct Cli {
    /// The URL of the blog to scan
    #[arg(long, value_name = "URL", value_parser = parse_url)]
    pub url: Option<Url>,

    /// Force the supplied server module to be loaded
    #[arg(long, value_name = "SERVER", value_parser = parse_server)]
    pub server: Option<ServerKind>,

    /// Do not check if the target is running WordPress
    #[arg(long)]
    pub force: bool,

    /// Update the database
    #[arg(long, overrides_with = "no_update")]
    pub update: bool,

    /// Do not update the database
    #[arg(long = "no-update", overrides_with = "update")]
    pub no_update: bool,

    /// Verbose mode
    #[arg(short, long)]
    pub verbose: bool,

    /// Never ask questions, use the default answers
    #[arg(long)]
    pub batch: bool,

    /// Do not show the banner
    #[arg(long)]
    pub no_banner: bool,

    /// Directory of the signature database
    #[arg(long, value_name = "DIR", env = "VANGUARD_WP_DB_DIR")]
    pub db_dir: Option<PathBuf>,

    /// Base URL the database files are downloaded from
    #[arg(long, value_name = "URL", env = "VANGUARD_WP_DB_SOURCE", default_value = DEFAULT_DB_SOURCE)]
    pub db_source: Url,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 60)]
    pub request_timeout: u64,

    /// User-Agent sent with every request
    #[arg(long, value_name = "UA", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Do not fail when the homepage redirects to another host
    #[arg(long)]
    pub ignore_main_redirect: bool,
}

impl Cli {
    /// `Some(true)` for `--update`, `Some(false)` for `--no-update`, `None`
    /// when neither was given. The last one on the command line wins.
    pub fn update_flag(&self) -> Option<bool> {
        match (self.update, self.no_update) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// Freezes the parsed flags into the options the gate reads.
    pub fn into_options(self, terminal_is_interactive: bool) -> ScanOptions {
        let update = self.update_flag();
        let db_dir = self.db_dir.unwrap_or_else(default_db_dir);
        let mut options = ScanOptions::new(db_dir, self.db_source);
        options.url = self.url;
        options.update = update;
        options.server = self.server;
        options.force = self.force;
        options.verbose = self.verbose;
        options.interactive = !self.batch && terminal_is_interactive;
        options.banner = !self.no_banner;
        options.request_timeout = Duration::from_secs(self.request_timeout);
        options.user_agent = self.user_agent;
        options.ignore_main_redirect = self.ignore_main_redirect;
        options
    }
}

static RE_SCHEME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://").unwrap());

// Accepts bare hosts by defaulting to http.
fn parse_url(raw: &str) -> Result<Url, String> {
    let raw = raw.trim();
    let with_scheme = if RE_SCHEME.is_match(raw) { raw.to_string() } else { format!("http://{}", raw) };
    let url = Url::parse(&with_scheme).map_err(|e| format!("invalid URL '{}': {}", raw, e))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme '{}', use http or https", other)),
    }
}

fn parse_server(raw: &str) -> Result<ServerKind, String> {
    ServerKind::from_str(raw.trim()).map_err(|_| format!("'{}' is not one of: apache, iis, nginx", raw))
}
