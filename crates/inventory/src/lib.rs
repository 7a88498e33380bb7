//! Inventory domain module.
//!
//! Articles carry a current stock quantity and reorder thresholds. Stock can
//! never go negative; every adjustment is validated before it is applied.

pub mod article;
pub mod ledger;

pub use article::{
    Article, ArticleCommand, ArticleEvent, ArticleRegistered, ArticleType, RegisterArticle,
    StockAdjusted, StockLevel, StockThresholds, classify,
};
pub use ledger::{LevelCounts, StockAdjustment, StockLedger};
