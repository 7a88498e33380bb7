use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wms_core::{Aggregate, AggregateRoot, ArticleId, DomainError, DomainResult, ValueObject};
use wms_events::Event;

/// Article category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleType {
    ProductionOrder,
    CompleteTool,
    ToolComponent,
    Material,
    ProductionEquipment,
    TestingEquipment,
    Consumables,
    SpecialMaterial,
    SpareParts,
}

impl ArticleType {
    pub const ALL: [ArticleType; 9] = [
        ArticleType::ProductionOrder,
        ArticleType::CompleteTool,
        ArticleType::ToolComponent,
        ArticleType::Material,
        ArticleType::ProductionEquipment,
        ArticleType::TestingEquipment,
        ArticleType::Consumables,
        ArticleType::SpecialMaterial,
        ArticleType::SpareParts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleType::ProductionOrder => "production_order",
            ArticleType::CompleteTool => "complete_tool",
            ArticleType::ToolComponent => "tool_component",
            ArticleType::Material => "material",
            ArticleType::ProductionEquipment => "production_equipment",
            ArticleType::TestingEquipment => "testing_equipment",
            ArticleType::Consumables => "consumables",
            ArticleType::SpecialMaterial => "special_material",
            ArticleType::SpareParts => "spare_parts",
        }
    }

    /// Display label, e.g. `"Spare Parts"`.
    pub fn label(&self) -> &'static str {
        match self {
            ArticleType::ProductionOrder => "Production Order",
            ArticleType::CompleteTool => "Complete Tool",
            ArticleType::ToolComponent => "Tool Component",
            ArticleType::Material => "Material",
            ArticleType::ProductionEquipment => "Production Equipment",
            ArticleType::TestingEquipment => "Testing Equipment",
            ArticleType::Consumables => "Consumables",
            ArticleType::SpecialMaterial => "Special Material",
            ArticleType::SpareParts => "Spare Parts",
        }
    }
}

impl core::fmt::Display for ArticleType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArticleType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        ArticleType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown article type {s:?}")))
    }
}

/// Derived stock classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockLevel {
    /// At or below the reorder point.
    Critical,
    /// Above the reorder point but at or below 1.5 × the reorder point.
    Warning,
    Good,
}

impl StockLevel {
    pub const ALL: [StockLevel; 3] = [StockLevel::Critical, StockLevel::Warning, StockLevel::Good];

    pub fn of(current_stock: u64, reorder_point: u64) -> Self {
        if current_stock <= reorder_point {
            StockLevel::Critical
        } else if (current_stock as u128) * 2 <= (reorder_point as u128) * 3 {
            StockLevel::Warning
        } else {
            StockLevel::Good
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockLevel::Critical => "critical",
            StockLevel::Warning => "warning",
            StockLevel::Good => "good",
        }
    }
}

impl core::fmt::Display for StockLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StockLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StockLevel::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::validation(format!("unknown stock level {s:?}")))
    }
}

/// `min_stock ≤ reorder_point ≤ max_stock`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockThresholds {
    min_stock: u64,
    reorder_point: u64,
    max_stock: u64,
}

impl ValueObject for StockThresholds {}

impl StockThresholds {
    pub fn new(min_stock: u64, reorder_point: u64, max_stock: u64) -> DomainResult<Self> {
        if min_stock > reorder_point || reorder_point > max_stock {
            return Err(DomainError::InvalidThresholds(format!(
                "expected min ≤ reorder point ≤ max, got {min_stock} / {reorder_point} / {max_stock}"
            )));
        }
        Ok(Self {
            min_stock,
            reorder_point,
            max_stock,
        })
    }

    pub fn min_stock(&self) -> u64 {
        self.min_stock
    }

    pub fn reorder_point(&self) -> u64 {
        self.reorder_point
    }

    pub fn max_stock(&self) -> u64 {
        self.max_stock
    }
}

/// Aggregate root: Article.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(rename = "articleId")]
    id: ArticleId,
    #[serde(rename = "type")]
    article_type: ArticleType,
    name: String,
    weight: f64,
    unit: String,
    #[serde(flatten)]
    thresholds: StockThresholds,
    current_stock: u64,
    version: u64,
}

impl Article {
    pub fn from_registered(event: &ArticleRegistered) -> Self {
        Self {
            id: event.article_id.clone(),
            article_type: event.article_type,
            name: event.name.clone(),
            weight: event.weight,
            unit: event.unit.clone(),
            thresholds: event.thresholds,
            current_stock: event.current_stock,
            version: 1,
        }
    }

    pub fn id_typed(&self) -> &ArticleId {
        &self.id
    }

    pub fn article_type(&self) -> ArticleType {
        self.article_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn thresholds(&self) -> StockThresholds {
        self.thresholds
    }

    pub fn current_stock(&self) -> u64 {
        self.current_stock
    }

    pub fn stock_level(&self) -> StockLevel {
        classify(self)
    }

    /// Current stock as a percentage of `max_stock` (0 when `max_stock` is 0).
    pub fn fill_percent(&self) -> f64 {
        if self.thresholds.max_stock == 0 {
            return 0.0;
        }
        self.current_stock as f64 / self.thresholds.max_stock as f64 * 100.0
    }

    pub fn is_low_stock(&self) -> bool {
        self.current_stock <= self.thresholds.reorder_point
    }
}

/// Classify an article's stock (`classify`). Pure.
pub fn classify(article: &Article) -> StockLevel {
    StockLevel::of(article.current_stock, article.thresholds.reorder_point)
}

impl AggregateRoot for Article {
    type Id = ArticleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: RegisterArticle (inbound registration).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterArticle {
    pub article_id: ArticleId,
    pub article_type: ArticleType,
    pub name: String,
    pub weight: f64,
    pub unit: String,
    pub min_stock: u64,
    pub reorder_point: u64,
    pub max_stock: u64,
    pub current_stock: u64,
    pub occurred_at: DateTime<Utc>,
}

impl RegisterArticle {
    /// Validate fields and thresholds, producing the registration event.
    pub fn decide(self) -> DomainResult<ArticleRegistered> {
        let thresholds = StockThresholds::new(self.min_stock, self.reorder_point, self.max_stock)?;
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if self.unit.trim().is_empty() {
            return Err(DomainError::validation("unit cannot be empty"));
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(DomainError::validation("weight must be a non-negative number"));
        }
        Ok(ArticleRegistered {
            article_id: self.article_id,
            article_type: self.article_type,
            name: self.name.trim().to_string(),
            weight: self.weight,
            unit: self.unit.trim().to_string(),
            thresholds,
            current_stock: self.current_stock,
            occurred_at: self.occurred_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArticleCommand {
    AdjustStock {
        delta: i64,
        occurred_at: DateTime<Utc>,
    },
}

/// Event: ArticleRegistered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRegistered {
    pub article_id: ArticleId,
    pub article_type: ArticleType,
    pub name: String,
    pub weight: f64,
    pub unit: String,
    pub thresholds: StockThresholds,
    pub current_stock: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StockAdjusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdjusted {
    pub article_id: ArticleId,
    pub delta: i64,
    pub previous_stock: u64,
    pub new_stock: u64,
    pub level: StockLevel,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArticleEvent {
    ArticleRegistered(ArticleRegistered),
    StockAdjusted(StockAdjusted),
}

impl ArticleEvent {
    pub fn article_id(&self) -> &ArticleId {
        match self {
            ArticleEvent::ArticleRegistered(e) => &e.article_id,
            ArticleEvent::StockAdjusted(e) => &e.article_id,
        }
    }
}

impl Event for ArticleEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ArticleEvent::ArticleRegistered(_) => "inventory.article.registered",
            ArticleEvent::StockAdjusted(_) => "inventory.article.stock_adjusted",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ArticleEvent::ArticleRegistered(e) => e.occurred_at,
            ArticleEvent::StockAdjusted(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Article {
    type Command = ArticleCommand;
    type Event = ArticleEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            ArticleEvent::ArticleRegistered(e) => {
                *self = Article::from_registered(e);
                return;
            }
            ArticleEvent::StockAdjusted(e) => {
                self.current_stock = e.new_stock;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            ArticleCommand::AdjustStock { delta, occurred_at } => {
                self.handle_adjust(*delta, *occurred_at)
            }
        }
    }
}

impl Article {
    fn handle_adjust(
        &self,
        delta: i64,
        occurred_at: DateTime<Utc>,
    ) -> Result<Vec<ArticleEvent>, DomainError> {
        let new_stock = self.current_stock as i128 + delta as i128;
        if new_stock < 0 {
            return Err(DomainError::NegativeStock {
                article_id: self.id.to_string(),
                current: self.current_stock,
                delta,
            });
        }
        let new_stock = u64::try_from(new_stock)
            .map_err(|_| DomainError::validation("stock quantity overflow"))?;

        if delta == 0 {
            return Ok(vec![]);
        }

        Ok(vec![ArticleEvent::StockAdjusted(StockAdjusted {
            article_id: self.id.clone(),
            delta,
            previous_stock: self.current_stock,
            new_stock,
            level: StockLevel::of(new_stock, self.thresholds.reorder_point),
            occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn test_article(reorder_point: u64, current_stock: u64) -> Article {
        let event = RegisterArticle {
            article_id: ArticleId::new("ART-001").unwrap(),
            article_type: ArticleType::Material,
            name: "Steel Plate 10mm".into(),
            weight: 25.5,
            unit: "kg".into(),
            min_stock: 0,
            reorder_point,
            max_stock: reorder_point.max(100) * 2,
            current_stock,
            occurred_at: test_time(),
        }
        .decide()
        .unwrap();
        Article::from_registered(&event)
    }

    #[test]
    fn classification_boundaries() {
        assert_eq!(classify(&test_article(20, 20)), StockLevel::Critical);
        assert_eq!(classify(&test_article(20, 29)), StockLevel::Warning);
        assert_eq!(classify(&test_article(20, 30)), StockLevel::Warning);
        assert_eq!(classify(&test_article(20, 31)), StockLevel::Good);
        assert_eq!(classify(&test_article(0, 0)), StockLevel::Critical);
        assert_eq!(classify(&test_article(0, 1)), StockLevel::Good);
    }

    #[test]
    fn odd_reorder_point_uses_exact_one_and_a_half() {
        // 1.5 × 15 = 22.5
        assert_eq!(classify(&test_article(15, 22)), StockLevel::Warning);
        assert_eq!(classify(&test_article(15, 23)), StockLevel::Good);
    }

    #[test]
    fn invalid_thresholds_are_rejected() {
        assert!(matches!(
            StockThresholds::new(10, 5, 100),
            Err(DomainError::InvalidThresholds(_))
        ));
        assert!(matches!(
            StockThresholds::new(10, 20, 15),
            Err(DomainError::InvalidThresholds(_))
        ));
        assert!(StockThresholds::new(10, 10, 10).is_ok());
    }

    #[test]
    fn registration_validates_fields() {
        let mut cmd = RegisterArticle {
            article_id: ArticleId::new("ART-009").unwrap(),
            article_type: ArticleType::Consumables,
            name: " ".into(),
            weight: 1.0,
            unit: "L".into(),
            min_stock: 1,
            reorder_point: 2,
            max_stock: 3,
            current_stock: 0,
            occurred_at: test_time(),
        };
        assert!(matches!(cmd.clone().decide(), Err(DomainError::Validation(_))));
        cmd.name = "Cutting Fluid".into();
        cmd.weight = f64::NAN;
        assert!(matches!(cmd.clone().decide(), Err(DomainError::Validation(_))));
        cmd.weight = 5.0;
        assert!(cmd.decide().is_ok());
    }

    #[test]
    fn adjust_below_zero_is_rejected_without_mutation() {
        let article = test_article(20, 15);
        let err = article
            .handle(&ArticleCommand::AdjustStock {
                delta: -20,
                occurred_at: test_time(),
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::NegativeStock { current: 15, delta: -20, .. }));
        assert_eq!(article.current_stock(), 15);
    }

    #[test]
    fn adjust_emits_event_with_new_level() {
        let mut article = test_article(20, 45);
        let events = article
            .execute(&ArticleCommand::AdjustStock {
                delta: -30,
                occurred_at: test_time(),
            })
            .unwrap();
        match &events[..] {
            [ArticleEvent::StockAdjusted(e)] => {
                assert_eq!(e.previous_stock, 45);
                assert_eq!(e.new_stock, 15);
                assert_eq!(e.level, StockLevel::Critical);
            }
            other => panic!("Expected StockAdjusted, got {other:?}"),
        }
        assert_eq!(article.current_stock(), 15);
        assert_eq!(article.version(), 2);
    }

    #[test]
    fn zero_delta_is_a_noop() {
        let article = test_article(20, 45);
        let events = article
            .handle(&ArticleCommand::AdjustStock {
                delta: 0,
                occurred_at: test_time(),
            })
            .unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn fill_percent_is_relative_to_max() {
        let article = test_article(20, 50);
        assert!((article.fill_percent() - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn serializes_flat_camel_case() {
        let json = serde_json::to_value(test_article(20, 45)).unwrap();
        assert_eq!(json["articleId"], "ART-001");
        assert_eq!(json["type"], "material");
        assert_eq!(json["reorderPoint"], 20);
        assert_eq!(json["currentStock"], 45);
    }

    proptest! {
        #[test]
        fn classify_is_pure(reorder in 0u64..10_000, current in 0u64..20_000) {
            let article = test_article(reorder, current);
            let first = classify(&article);
            let second = classify(&article);
            prop_assert_eq!(first, second);
            prop_assert_eq!(first, article.stock_level());
        }

        #[test]
        fn stock_never_goes_negative(
            start in 0u64..1_000,
            deltas in prop::collection::vec(-500i64..500, 0..50)
        ) {
            let mut article = test_article(10, start);
            let mut expected = start as i64;
            for delta in deltas {
                let cmd = ArticleCommand::AdjustStock { delta, occurred_at: test_time() };
                match article.execute(&cmd) {
                    Ok(_) => expected += delta,
                    Err(DomainError::NegativeStock { .. }) => prop_assert!(expected + delta < 0),
                    Err(other) => prop_assert!(false, "unexpected error {other:?}"),
                }
                prop_assert_eq!(article.current_stock() as i64, expected);
            }
        }
    }
}
