//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values:
/// two `Coordinate`s with the same components are the same position, while
/// two `StorageLocation`s with the same id are the same location even if
/// their status differs.
///
/// To "modify" a value object, build a new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
