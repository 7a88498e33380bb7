//! `wms-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, coordinates, the tenant directory, the error taxonomy and the
//! aggregate traits every warehouse entity implements.

pub mod aggregate;
pub mod coordinate;
pub mod error;
pub mod id;
pub mod registry;
pub mod tenant;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use coordinate::{Coordinate, CoordinateKey, Footprint};
pub use error::{DomainError, DomainResult, ErrorKind};
pub use id::{ArticleId, LocationId, OrderId, RequestId, StorageUnitId, TenantId, WarehouseId};
pub use registry::Registry;
pub use tenant::{Tenant, TenantDirectory};
pub use value_object::ValueObject;
