// src/core/mod.rs

// The `core` module holds the pre-scan gate and the collaborators it talks to.

/// Data structures shared across the crate: options, status snapshots,
/// server kinds and exit statuses.
pub mod models;

/// The error taxonomy of the gate.
pub mod errors;

/// The local signature database and its freshness queries.
pub mod database;

/// The website under assessment and its detection queries.
pub mod target;

/// Server-specific capability modules (Apache, IIS, Nginx).
pub mod server;

/// Discoverable scan artifacts, bound to the run's server module.
pub mod item;

/// The ordered pre-scan checks.
pub mod gate;
