use chrono::Utc;
use serde::{Deserialize, Serialize};

use wms_core::{
    ArticleId, Coordinate, DomainResult, LocationId, OrderId, RequestId, StorageUnitId, TenantId,
    WarehouseId,
};
use wms_inventory::{Article, RegisterArticle, StockLevel};
use wms_locations::{LocationStatus, RegisterLocation, StorageLocation};
use wms_transport::{SubmitOrder, SubmitRequest};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocationRequest {
    pub location_id: Option<String>,
    #[serde(rename = "type")]
    pub location_type: String,
    pub sequence_number: u32,
    pub x: u32,
    pub y: u32,
    pub z: u32,
    /// Defaults to `Free`.
    pub status: Option<String>,
}

impl CreateLocationRequest {
    pub fn into_command(self, warehouse_id: WarehouseId) -> DomainResult<RegisterLocation> {
        Ok(RegisterLocation {
            warehouse_id,
            location_id: optional_id(self.location_id, LocationId::new, LocationId::generate)?,
            location_type: self.location_type.parse()?,
            sequence_number: self.sequence_number,
            coordinate: Coordinate::new(self.x, self.y, self.z)?,
            status: match self.status.as_deref() {
                Some(raw) => raw.parse()?,
                None => LocationStatus::Free,
            },
            occurred_at: Utc::now(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleRequest {
    pub article_id: Option<String>,
    #[serde(rename = "type")]
    pub article_type: String,
    pub name: String,
    #[serde(default)]
    pub weight: f64,
    pub unit: String,
    pub min_stock: u64,
    pub reorder_point: u64,
    pub max_stock: u64,
    #[serde(default)]
    pub current_stock: u64,
}

impl CreateArticleRequest {
    pub fn into_command(self) -> DomainResult<RegisterArticle> {
        Ok(RegisterArticle {
            article_id: optional_id(self.article_id, ArticleId::new, ArticleId::generate)?,
            article_type: self.article_type.parse()?,
            name: self.name,
            weight: self.weight,
            unit: self.unit,
            min_stock: self.min_stock,
            reorder_point: self.reorder_point,
            max_stock: self.max_stock,
            current_stock: self.current_stock,
            occurred_at: Utc::now(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct AdjustStockRequest {
    pub delta: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub order_id: Option<String>,
    pub storage_unit_id: String,
    pub source: String,
    pub destination: String,
    #[serde(default = "default_priority")]
    pub priority: u32,
    pub request_id: Option<String>,
}

fn default_priority() -> u32 {
    1
}

impl CreateOrderRequest {
    pub fn into_command(self, warehouse_id: WarehouseId) -> DomainResult<SubmitOrder> {
        Ok(SubmitOrder {
            order_id: optional_id(self.order_id, OrderId::new, OrderId::generate)?,
            warehouse_id,
            storage_unit_id: StorageUnitId::new(self.storage_unit_id)?,
            source: LocationId::new(self.source)?,
            destination: LocationId::new(self.destination)?,
            priority: self.priority,
            request_id: self.request_id.map(RequestId::new).transpose()?,
            occurred_at: Utc::now(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct TargetRequest {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestRequest {
    pub request_id: Option<String>,
    #[serde(rename = "type")]
    pub request_type: String,
    pub article_id: String,
    pub article_type: String,
    pub quantity: u32,
    pub target: TargetRequest,
}

impl CreateRequestRequest {
    /// The client is always the calling tenant.
    pub fn into_command(self, client_id: TenantId) -> DomainResult<SubmitRequest> {
        Ok(SubmitRequest {
            request_id: optional_id(self.request_id, RequestId::new, RequestId::generate)?,
            client_id,
            request_type: self.request_type.parse()?,
            article_id: ArticleId::new(self.article_id)?,
            article_type: self.article_type.parse()?,
            quantity: self.quantity,
            target: Coordinate::new(self.target.x, self.target.y, self.target.z)?,
            occurred_at: Utc::now(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct AdvanceRequest {
    pub status: String,
}

fn optional_id<T>(
    raw: Option<String>,
    parse: fn(String) -> DomainResult<T>,
    generate: fn() -> T,
) -> DomainResult<T> {
    match raw {
        Some(raw) => parse(raw),
        None => Ok(generate()),
    }
}

// -------------------------
// Query DTOs
// -------------------------

/// Shared query string of the list endpoints; each reads the fields it knows.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub level: Option<String>,
    pub priority: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GridQuery {
    pub orientation: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationView {
    #[serde(flatten)]
    pub location: StorageLocation,
    pub bin_label: String,
}

impl From<StorageLocation> for LocationView {
    fn from(location: StorageLocation) -> Self {
        Self {
            bin_label: location.coordinate().bin_label(),
            location,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleView {
    #[serde(flatten)]
    pub article: Article,
    /// Human-readable article type, e.g. `"Spare Parts"`.
    pub type_label: &'static str,
    pub stock_level: StockLevel,
    pub fill_percent: f64,
}

impl From<Article> for ArticleView {
    fn from(article: Article) -> Self {
        Self {
            type_label: article.article_type().label(),
            stock_level: article.stock_level(),
            fill_percent: article.fill_percent(),
            article,
        }
    }
}
