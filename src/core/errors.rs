// src/core/errors.rs

use crate::core::models::ExitStatus;
use thiserror::Error;

/// Every fatal condition the pre-scan gate can raise.
///
/// Errors are returned at the point of detection and travel unchanged to
/// `main`, which prints the message and exits with [`GateError::exit_status`].
#[derive(Error, Debug)]
pub enum GateError {
    #[error("Update required, you can not run a scan if a database file is missing.")]
    MissingDatabaseFile,

    #[error("The target appears to be hosted on WordPress.com. Scanning such site is not supported.")]
    HostedElsewhere,

    #[error("The remote website is up, but does not seem to be running WordPress.")]
    NotExpectedCms,

    #[error("The url supplied '{url}' seems to be down ({reason})")]
    TargetDown { url: String, reason: String },

    #[error("HTTP authentication required (or was invalid) for {url}")]
    HttpAuthRequired { url: String },

    #[error("Proxy authentication required (or was invalid)")]
    ProxyAuthRequired,

    #[error("The URL supplied redirects to {url}. Use --ignore-main-redirect to ignore the redirection.")]
    Redirected { url: String },

    #[error("Unable to update database file {file}: {reason}")]
    DatabaseUpdate { file: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GateError {
    pub fn exit_status(&self) -> ExitStatus {
        ExitStatus::Error
    }
}
