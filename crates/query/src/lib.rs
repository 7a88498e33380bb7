//! Read side: conjunctive list filters and dashboard counters.
//!
//! Everything here is a pure function of borrowed state. Callers hold the
//! warehouse read lock while a filter runs, so results never mix two states.

pub mod filter;
pub mod summary;

pub use filter::{
    ArticleFilter, LocationFilter, Matches, OrderFilter, RequestFilter, TextFilter, selection,
};
pub use summary::WarehouseSummary;
