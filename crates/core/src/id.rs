//! Strongly-typed identifiers used across the domain.
//!
//! Warehouse identifiers are human-assigned codes (`WH-001`, `SL-017`,
//! `ART-003`), so every identifier wraps a validated string instead of a UUID.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of a tenant (multi-tenant boundary).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

/// Identifier of a warehouse; each tenant owns exactly one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WarehouseId(String);

/// Identifier of a storage location, unique within its warehouse.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocationId(String);

/// Identifier of an article.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArticleId(String);

/// Identifier of a transport order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderId(String);

/// Identifier of an inbound/outbound/picking/inventory request.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RequestId(String);

/// Identifier of a storage unit (pallet, bin, tote) moved by transport orders.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StorageUnitId(String);

macro_rules! impl_string_id {
    ($t:ty, $name:literal, $prefix:literal) => {
        impl $t {
            /// Validate and wrap an identifier.
            ///
            /// Surrounding whitespace is trimmed; empty identifiers and
            /// identifiers with inner whitespace are rejected.
            pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::invalid_id(format!("{}: cannot be empty", $name)));
                }
                if trimmed.chars().any(char::is_whitespace) {
                    return Err(DomainError::invalid_id(format!(
                        "{}: must not contain whitespace ({trimmed:?})",
                        $name
                    )));
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Mint a fresh identifier (`<prefix>-<uuid v7>`).
            ///
            /// Time-ordered. Prefer passing IDs explicitly in tests for determinism.
            pub fn generate() -> Self {
                Self(format!("{}-{}", $prefix, Uuid::now_v7().simple()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $t {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $t {
            type Error = DomainError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

impl_string_id!(TenantId, "TenantId", "tenant");
impl_string_id!(WarehouseId, "WarehouseId", "WH");
impl_string_id!(LocationId, "LocationId", "SL");
impl_string_id!(ArticleId, "ArticleId", "ART");
impl_string_id!(OrderId, "OrderId", "TO");
impl_string_id!(RequestId, "RequestId", "REQ");
impl_string_id!(StorageUnitId, "StorageUnitId", "SU");
