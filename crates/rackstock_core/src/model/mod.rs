//! Rack inventory domain model.
//!
//! # Responsibility
//! - Define racks, slot coordinates and slot occupancy payloads.
//! - Derive the dense rack view from persisted sparse occupancy.
//! - Validate caller input before anything reaches storage.
//!
//! # Invariants
//! - Slot coordinates are derived from rack extents, never stored on racks.
//! - A written quantity is always a positive integer.

pub mod grid;
pub mod input;
pub mod rack;
pub mod slot;
pub mod validation;
