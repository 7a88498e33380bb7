//! Warehouse state engine.
//!
//! Owns one state per warehouse behind its own lock, runs every mutation as
//! decide-then-apply across the affected aggregates, and publishes the
//! committed events onto an [`wms_events::EventBus`].

pub mod engine;
pub mod seed;
mod state;

#[cfg(test)]
mod integration_tests;

pub use engine::{WarehouseEngine, WarehouseSnapshot};
pub use seed::{demo_directory, load_demo};
