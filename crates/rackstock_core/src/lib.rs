//! Core slot-inventory engine for Rackstock.
//! This crate is the single source of truth for rack and slot invariants.

pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use error::{ErrorKind, InventoryError, InventoryResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::grid::RackView;
pub use model::input::{FieldInput, MovePlan, MoveRequest, PlacementInput};
pub use model::rack::{NewRack, Rack, RackId};
pub use model::slot::{row_label, SlotId, SlotOccupancy, SlotRecord};
pub use model::validation::ValidationError;
pub use repo::rack_repo::{RackRepository, SqliteRackRepository};
pub use repo::slot_repo::{SlotRepository, SqliteSlotRepository};
pub use repo::{RepoError, RepoResult};
pub use service::inventory_service::{ConsumeOutcome, InventoryService, MoveOutcome};
pub use service::rack_service::{RackDeletion, RackService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
