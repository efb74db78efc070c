// src/core/gate/freshness.rs

use crate::core::errors::GateError;
use crate::core::models::{DatabaseStatus, ScanOptions};
use crate::ui::{Console, Prompt, parse_yes};
use tracing::{debug, warn};

pub const OUTDATED_NOTICE: &str = "It seems like you have not updated the database for some time.";
pub const UPDATE_QUESTION: &str = "Do you want to update now? [Y]es [N]o, default: [N]";

/// Decides whether the signature database must be updated before scanning.
///
/// Missing files force an update unless the operator passed `--no-update`,
/// which is unrecoverable. With all files present an explicit
/// `--update`/`--no-update` is returned as is. Otherwise the operator is only
/// asked when the data is outdated and prompting is possible.
pub fn decide(
    options: &ScanOptions,
    status: &DatabaseStatus,
    console: &mut dyn Console,
    prompt: &mut dyn Prompt,
) -> Result<bool, GateError> {
    if status.missing_files {
        if options.update == Some(false) {
            return Err(GateError::MissingDatabaseFile);
        }
        debug!("Database files missing, update required.");
        return Ok(true);
    }

    if let Some(update) = options.update {
        debug!(update, "Update decision taken from command line.");
        return Ok(update);
    }

    if !options.interactive || !status.outdated {
        return Ok(false);
    }

    console.notice(OUTDATED_NOTICE);
    let answer = match prompt.ask(UPDATE_QUESTION) {
        Ok(answer) => answer,
        Err(e) => {
            warn!(error = %e, "Could not read the answer, using the default.");
            String::new()
        }
    };
    Ok(parse_yes(&answer))
}
