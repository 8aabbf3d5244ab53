//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into rack inventory operations.
//! - Own unit-of-work boundaries for multi-row mutations.
//! - Classify failures into the caller-facing error taxonomy.

use crate::error::{ErrorKind, InventoryResult};
use log::{error, info, warn};
use std::time::Instant;

pub mod inventory_service;
pub mod rack_service;

/// Runs one service operation and emits a single outcome event for it.
///
/// Business-rule rejections log at `warn`, storage failures at `error`.
fn observed<T, F>(
    event: &'static str,
    module: &'static str,
    fields: String,
    f: F,
) -> InventoryResult<T>
where
    F: FnOnce() -> InventoryResult<T>,
{
    let started_at = Instant::now();
    let result = f();
    let duration_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => info!("event={event} module={module} status=ok {fields} duration_ms={duration_ms}"),
        Err(err) if err.kind() == ErrorKind::Storage => error!(
            "event={event} module={module} status=error {fields} duration_ms={duration_ms} error_kind={} error={err}",
            err.kind()
        ),
        Err(err) => warn!(
            "event={event} module={module} status=rejected {fields} duration_ms={duration_ms} error_kind={} error={err}",
            err.kind()
        ),
    }
    result
}
