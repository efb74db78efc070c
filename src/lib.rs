// src/lib.rs

pub mod cli;
pub mod core;
pub mod logging;
pub mod ui;

// Re-export key types at the crate root
pub use crate::core::database::{LocalDatabase, SignatureDatabase};
pub use crate::core::errors::GateError;
pub use crate::core::gate::{GateOutcome, GateReport, ScanGate};
pub use crate::core::item::{ItemFactory, ItemKind, ScanItem};
pub use crate::core::models::{DatabaseStatus, ExitStatus, ScanOptions, ServerKind, TargetStatus};
pub use crate::core::server::{ServerCapability, module_for};
pub use crate::core::target::{HttpTarget, Target};
pub use ui::{Console, Prompt};
