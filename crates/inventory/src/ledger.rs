//! Per-warehouse stock ledger.

use chrono::{DateTime, Utc};

use wms_core::{Aggregate, ArticleId, DomainError, DomainResult, Registry};

use crate::article::{
    Article, ArticleCommand, ArticleEvent, ArticleType, RegisterArticle, StockLevel,
};

/// Outcome of a stock adjustment.
#[derive(Debug, Clone, PartialEq)]
pub struct StockAdjustment {
    pub article_id: ArticleId,
    pub current_stock: u64,
    pub level: StockLevel,
    pub events: Vec<ArticleEvent>,
}

/// Article counts per stock level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelCounts {
    pub critical: usize,
    pub warning: usize,
    pub good: usize,
}

/// Articles of one warehouse with their current stock.
#[derive(Debug, Clone, Default)]
pub struct StockLedger {
    articles: Registry<Article>,
}

impl StockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide a registration without applying it.
    pub fn plan_register(&self, cmd: RegisterArticle) -> DomainResult<ArticleEvent> {
        if self.articles.contains(&cmd.article_id) {
            return Err(DomainError::DuplicateArticleId(cmd.article_id.to_string()));
        }
        Ok(ArticleEvent::ArticleRegistered(cmd.decide()?))
    }

    /// Register a new article (`registerArticle`).
    pub fn register(&mut self, cmd: RegisterArticle) -> DomainResult<ArticleEvent> {
        let event = self.plan_register(cmd)?;
        self.apply(&event);
        Ok(event)
    }

    /// Decide a stock delta without applying it.
    pub fn plan_adjust(
        &self,
        article_id: &ArticleId,
        delta: i64,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Vec<ArticleEvent>> {
        self.require(article_id)?
            .handle(&ArticleCommand::AdjustStock { delta, occurred_at })
    }

    /// Apply a signed delta (`adjustStock`). On error nothing changes.
    pub fn adjust(
        &mut self,
        article_id: &ArticleId,
        delta: i64,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<StockAdjustment> {
        let events = self.plan_adjust(article_id, delta, occurred_at)?;
        for event in &events {
            self.apply(event);
        }
        let article = self.require(article_id)?;
        Ok(StockAdjustment {
            article_id: article_id.clone(),
            current_stock: article.current_stock(),
            level: article.stock_level(),
            events,
        })
    }

    /// Apply a previously planned event.
    pub fn apply(&mut self, event: &ArticleEvent) {
        match event {
            ArticleEvent::ArticleRegistered(e) => {
                // A duplicate id was already refused when planning.
                let _ = self.articles.insert(Article::from_registered(e));
            }
            ArticleEvent::StockAdjusted(e) => {
                if let Some(article) = self.articles.get_mut(&e.article_id) {
                    article.apply(event);
                }
            }
        }
    }

    pub fn get(&self, article_id: &ArticleId) -> Option<&Article> {
        self.articles.get(article_id)
    }

    pub fn require(&self, article_id: &ArticleId) -> DomainResult<&Article> {
        self.get(article_id)
            .ok_or_else(|| DomainError::ArticleNotFound(article_id.to_string()))
    }

    /// Check that `article_id` exists and has the given type.
    pub fn require_typed(
        &self,
        article_id: &ArticleId,
        article_type: ArticleType,
    ) -> DomainResult<&Article> {
        let article = self.require(article_id)?;
        if article.article_type() != article_type {
            return Err(DomainError::validation(format!(
                "article {article_id} is of type {}, not {article_type}",
                article.article_type()
            )));
        }
        Ok(article)
    }

    /// Articles in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Article> {
        self.articles.iter()
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn level_counts(&self) -> LevelCounts {
        self.iter()
            .fold(LevelCounts::default(), |mut counts, article| {
                match article.stock_level() {
                    StockLevel::Critical => counts.critical += 1,
                    StockLevel::Warning => counts.warning += 1,
                    StockLevel::Good => counts.good += 1,
                }
                counts
            })
    }

    /// Articles at or below their reorder point.
    pub fn low_stock(&self) -> impl Iterator<Item = &Article> {
        self.iter().filter(|a| a.is_low_stock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn art(id: &str) -> ArticleId {
        ArticleId::new(id).unwrap()
    }

    fn register_cmd(id: &str, reorder_point: u64, current_stock: u64) -> RegisterArticle {
        RegisterArticle {
            article_id: art(id),
            article_type: ArticleType::Material,
            name: format!("Article {id}"),
            weight: 1.0,
            unit: "pcs".into(),
            min_stock: 10,
            reorder_point,
            max_stock: 200,
            current_stock,
            occurred_at: Utc::now(),
        }
    }

    fn test_ledger() -> StockLedger {
        let mut ledger = StockLedger::new();
        ledger.register(register_cmd("ART-001", 20, 45)).unwrap();
        ledger
    }

    #[test]
    fn adjust_sequence_keeps_stock_on_failure() {
        let mut ledger = test_ledger();
        let id = art("ART-001");

        let outcome = ledger.adjust(&id, -30, Utc::now()).unwrap();
        assert_eq!(outcome.current_stock, 15);
        assert_eq!(outcome.level, StockLevel::Critical);

        let err = ledger.adjust(&id, -20, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::NegativeStock { .. }));
        assert_eq!(ledger.get(&id).unwrap().current_stock(), 15);
    }

    #[test]
    fn duplicate_article_is_rejected() {
        let mut ledger = test_ledger();
        let err = ledger.register(register_cmd("ART-001", 20, 10)).unwrap_err();
        assert_eq!(err, DomainError::DuplicateArticleId("ART-001".into()));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn invalid_thresholds_are_not_registered() {
        let mut ledger = StockLedger::new();
        let err = ledger.register(register_cmd("ART-002", 5, 10)).unwrap_err();
        assert!(matches!(err, DomainError::InvalidThresholds(_)));
        assert!(ledger.is_empty());
    }

    #[test]
    fn unknown_article_is_not_found() {
        let mut ledger = test_ledger();
        let err = ledger.adjust(&art("ART-404"), 1, Utc::now()).unwrap_err();
        assert_eq!(err, DomainError::ArticleNotFound("ART-404".into()));
    }

    #[test]
    fn require_typed_checks_type() {
        let ledger = test_ledger();
        assert!(ledger.require_typed(&art("ART-001"), ArticleType::Material).is_ok());
        assert!(matches!(
            ledger.require_typed(&art("ART-001"), ArticleType::SpareParts),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn level_counts_and_low_stock() {
        let mut ledger = test_ledger();
        ledger.register(register_cmd("ART-002", 20, 20)).unwrap();
        ledger.register(register_cmd("ART-003", 20, 29)).unwrap();

        assert_eq!(
            ledger.level_counts(),
            LevelCounts {
                critical: 1,
                warning: 1,
                good: 1
            }
        );
        let low: Vec<&str> = ledger.low_stock().map(|a| a.id_typed().as_str()).collect();
        assert_eq!(low, vec!["ART-002"]);
    }
}
