//! Storage location domain module.
//!
//! Locations are addressed by 3D warehouse coordinates and indexed per
//! warehouse by identity, exact coordinate and `(x, y)` footprint. The index
//! also materializes the sparse location set into a dense grid.

pub mod grid;
pub mod index;
pub mod location;

pub use grid::{Grid, GridCell, GridRow, RowOrder};
pub use index::{LocationIndex, StatusCounts};
pub use location::{
    LocationCommand, LocationEvent, LocationRegistered, LocationStatus, LocationStatusChanged,
    LocationType, RegisterLocation, StorageLocation,
};
