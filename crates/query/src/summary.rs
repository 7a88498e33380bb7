use serde::Serialize;

use wms_inventory::StockLedger;
use wms_locations::LocationIndex;
use wms_transport::{OrderBook, OrderStatus, RequestBook};

/// Dashboard counters of one warehouse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseSummary {
    pub total_locations: usize,
    pub free_locations: usize,
    pub occupied_locations: usize,
    pub blocked_locations: usize,
    /// Pending or InProgress.
    pub active_orders: usize,
    pub pending_orders: usize,
    /// Neither Completed nor Cancelled.
    pub active_requests: usize,
    /// `currentStock ≤ reorderPoint`.
    pub low_stock_articles: usize,
    pub articles_in_stock: usize,
    pub total_articles: usize,
}

impl WarehouseSummary {
    pub fn compute(
        locations: &LocationIndex,
        ledger: &StockLedger,
        orders: &OrderBook,
        requests: &RequestBook,
    ) -> Self {
        let counts = locations.status_counts();
        Self {
            total_locations: counts.total(),
            free_locations: counts.free,
            occupied_locations: counts.occupied,
            blocked_locations: counts.blocked,
            active_orders: orders.active_count(),
            pending_orders: orders.count_status(OrderStatus::Pending),
            active_requests: requests.active_count(),
            low_stock_articles: ledger.low_stock().count(),
            articles_in_stock: ledger.iter().filter(|a| a.current_stock() > 0).count(),
            total_articles: ledger.len(),
        }
    }
}
