// src/core/gate/mod.rs

//! The pre-scan gate.
//!
//! Runs, in order: the database freshness decision (and the update it may
//! trigger), the target availability check, the server module selection and
//! the target state validation. Nothing is probed before all of them pass.

pub mod freshness;
pub mod selector;
pub mod validator;

#[cfg(test)]
pub(crate) mod testing;

use crate::core::database::LocalDatabase;
use crate::core::errors::GateError;
use crate::core::item::ItemFactory;
use crate::core::models::{ExitStatus, ScanOptions, ServerKind};
use crate::core::target::Target;
use crate::ui::{Console, Prompt};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use self::validator::Validation;

/// Everything the scan needs once the gate is passed.
#[derive(Debug, Clone)]
pub struct GateReport {
    /// Last database update, as it was before the gate ran.
    pub last_update: Option<DateTime<Utc>>,
    pub updated: Option<Vec<String>>,
    pub server: ServerKind,
    pub items: ItemFactory,
}

/// How the gate ended when no error was raised.
#[derive(Debug, Clone)]
pub enum GateOutcome {
    /// Probing may start.
    Proceed(GateReport),
    /// The database was updated and no URL was given.
    UpdateOnly { updated: Vec<String> },
    /// No URL was given and no update was needed.
    NothingToScan,
    /// The target still serves its install wizard.
    NotFullyConfigured { url: String },
}

impl GateOutcome {
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            GateOutcome::Proceed(_) | GateOutcome::UpdateOnly { .. } | GateOutcome::NothingToScan => ExitStatus::Ok,
            GateOutcome::NotFullyConfigured { .. } => ExitStatus::Vulnerable,
        }
    }
}

pub struct ScanGate<'a> {
    options: &'a ScanOptions,
    console: &'a mut dyn Console,
    prompt: &'a mut dyn Prompt,
}

impl<'a> ScanGate<'a> {
    pub fn new(options: &'a ScanOptions, console: &'a mut dyn Console, prompt: &'a mut dyn Prompt) -> Self {
        Self { options, console, prompt }
    }

    /// Runs the gate against `db` and, when a URL was given, `target`.
    ///
    /// Any error aborts the run; the caller maps it to an exit status.
    pub async fn run(
        &mut self,
        db: &dyn LocalDatabase,
        target: Option<&mut dyn Target>,
    ) -> Result<GateOutcome, GateError> {
        let last_update = db.last_update();

        if self.options.banner {
            self.console.banner();
        }

        let status = db.status();
        debug!(?status, "Database status.");

        let mut updated = None;
        if freshness::decide(self.options, &status, &mut *self.console, &mut *self.prompt)? {
            self.console.update_started();
            let files = db.update().await?;
            self.console.update_finished(&files, self.options.verbose);

            if self.options.url.is_none() {
                info!(updated = files.len(), "Update only run finished.");
                return Ok(GateOutcome::UpdateOnly { updated: files });
            }
            updated = Some(files);
        }

        let Some(target) = target else {
            return Ok(GateOutcome::NothingToScan);
        };

        target.check_availability().await?;

        // Selection runs before validation so the module is already bound
        // if validation output ever needs it.
        let (server, module) = selector::select(&mut *target, self.options.server);

        match validator::validate(&*target, self.options.force)? {
            Validation::NotFullyConfigured { url } => {
                self.console.not_fully_configured(&url);
                Ok(GateOutcome::NotFullyConfigured { url })
            }
            Validation::Ready => {
                info!(url = %target.url(), %server, "Pre-scan gate passed.");
                Ok(GateOutcome::Proceed(GateReport {
                    last_update,
                    updated,
                    server,
                    items: ItemFactory::new(module),
                }))
            }
        }
    }
}
