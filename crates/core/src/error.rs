//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Coarse classification of a [`DomainError`].
///
/// Callers that only need to know *what kind* of failure happened (an HTTP
/// binding picking a status code, a UI picking a toast style) match on this
/// instead of on the individual variants.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The addressed entity (or tenant) does not exist.
    NotFound,
    /// Duplicate identifier, illegal transition, or threshold violation.
    Conflict,
    /// The operation is well-formed but the current state forbids it.
    PreconditionFailed,
    /// Malformed input.
    Validation,
}

/// Domain-level error.
///
/// Every failure in this core is deterministic and recoverable at the call
/// site. Nothing here is retried internally.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("storage location {0} already exists in this warehouse")]
    DuplicateLocationId(String),

    #[error("coordinate {0} is already taken by location {1}")]
    DuplicateCoordinate(String, String),

    #[error("storage location {0} not found")]
    LocationNotFound(String),

    #[error("article {0} already exists")]
    DuplicateArticleId(String),

    #[error("invalid stock thresholds: {0}")]
    InvalidThresholds(String),

    #[error("article {0} not found")]
    ArticleNotFound(String),

    #[error("stock of article {article_id} cannot go negative (current: {current}, delta: {delta})")]
    NegativeStock {
        article_id: String,
        current: u64,
        delta: i64,
    },

    #[error("invalid transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("transport order {0} not found")]
    OrderNotFound(String),

    #[error("transport order {0} already exists")]
    DuplicateOrderId(String),

    #[error("request {0} not found")]
    RequestNotFound(String),

    #[error("request {0} already exists")]
    DuplicateRequestId(String),

    #[error("destination location {0} is blocked")]
    DestinationBlocked(String),

    #[error("storage location {0} is blocked and cannot be occupied")]
    LocationBlocked(String),

    #[error("source and destination must differ (both are {0})")]
    SameSourceAndDestination(String),

    #[error("unknown tenant {0}")]
    UnknownTenant(String),

    #[error("invalid tenant mapping: {0}")]
    TenantMapping(String),

    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn invalid_transition(from: impl core::fmt::Display, to: impl core::fmt::Display) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::LocationNotFound(_)
            | DomainError::ArticleNotFound(_)
            | DomainError::OrderNotFound(_)
            | DomainError::RequestNotFound(_)
            | DomainError::UnknownTenant(_) => ErrorKind::NotFound,

            DomainError::DuplicateLocationId(_)
            | DomainError::DuplicateCoordinate(..)
            | DomainError::DuplicateArticleId(_)
            | DomainError::DuplicateOrderId(_)
            | DomainError::DuplicateRequestId(_)
            | DomainError::InvalidThresholds(_)
            | DomainError::InvalidTransition { .. }
            | DomainError::TenantMapping(_) => ErrorKind::Conflict,

            DomainError::NegativeStock { .. }
            | DomainError::DestinationBlocked(_)
            | DomainError::LocationBlocked(_)
            | DomainError::SameSourceAndDestination(_) => ErrorKind::PreconditionFailed,

            DomainError::Validation(_) | DomainError::InvalidId(_) => ErrorKind::Validation,
        }
    }

    /// Stable machine-readable code, e.g. `"negative_stock"`.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::DuplicateLocationId(_) => "duplicate_location_id",
            DomainError::DuplicateCoordinate(..) => "duplicate_coordinate",
            DomainError::LocationNotFound(_) => "location_not_found",
            DomainError::DuplicateArticleId(_) => "duplicate_article_id",
            DomainError::InvalidThresholds(_) => "invalid_thresholds",
            DomainError::ArticleNotFound(_) => "article_not_found",
            DomainError::NegativeStock { .. } => "negative_stock",
            DomainError::InvalidTransition { .. } => "invalid_transition",
            DomainError::OrderNotFound(_) => "order_not_found",
            DomainError::DuplicateOrderId(_) => "duplicate_order_id",
            DomainError::RequestNotFound(_) => "request_not_found",
            DomainError::DuplicateRequestId(_) => "duplicate_request_id",
            DomainError::DestinationBlocked(_) => "destination_blocked",
            DomainError::LocationBlocked(_) => "location_blocked",
            DomainError::SameSourceAndDestination(_) => "same_source_and_destination",
            DomainError::UnknownTenant(_) => "unknown_tenant",
            DomainError::TenantMapping(_) => "tenant_mapping",
            DomainError::Validation(_) => "validation_error",
            DomainError::InvalidId(_) => "invalid_id",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_the_taxonomy() {
        assert_eq!(DomainError::LocationNotFound("SL-1".into()).kind(), ErrorKind::NotFound);
        assert_eq!(DomainError::DuplicateArticleId("A".into()).kind(), ErrorKind::Conflict);
        assert_eq!(
            DomainError::invalid_transition("Pending", "Completed").kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            DomainError::NegativeStock {
                article_id: "A".into(),
                current: 1,
                delta: -2,
            }
            .kind(),
            ErrorKind::PreconditionFailed
        );
        assert_eq!(DomainError::DestinationBlocked("SL-1".into()).kind(), ErrorKind::PreconditionFailed);
        assert_eq!(DomainError::validation("x").kind(), ErrorKind::Validation);
    }

    #[test]
    fn display_carries_context() {
        let err = DomainError::NegativeStock {
            article_id: "ART-001".into(),
            current: 15,
            delta: -20,
        };
        assert!(err.to_string().contains("ART-001"));
        assert!(err.to_string().contains("-20"));
        assert_eq!(err.code(), "negative_stock");
    }
}
