// src/core/gate/selector.rs

use crate::core::models::ServerKind;
use crate::core::server::{ServerCapability, module_for};
use crate::core::target::Target;
use std::sync::Arc;
use tracing::info;

// Used when neither the operator nor detection names a server.
pub const DEFAULT_SERVER: ServerKind = ServerKind::Apache;

/// Picks the server kind: an explicit `--server` beats detection, and
/// detection beats the Apache default.
pub fn resolve(detected: Option<ServerKind>, requested: Option<ServerKind>) -> ServerKind {
    requested.or(detected).unwrap_or(DEFAULT_SERVER)
}

/// Resolves the server module for this run and binds it to `target`.
///
/// The returned module is the one every scan item of the run must be built
/// with.
pub fn select(target: &mut dyn Target, requested: Option<ServerKind>) -> (ServerKind, Arc<dyn ServerCapability>) {
    let detected = target.detected_server();
    let kind = resolve(detected, requested);
    info!(?detected, ?requested, selected = %kind, "Server module selected.");

    let module = module_for(kind);
    target.bind_server_module(Arc::clone(&module));
    (kind, module)
}
