//! Per-warehouse state and the changes that evolve it.

use serde_json::Value as JsonValue;

use wms_core::{TenantId, WarehouseId};
use wms_events::EventEnvelope;
use wms_inventory::{ArticleEvent, StockLedger};
use wms_locations::{LocationEvent, LocationIndex};
use wms_transport::{OrderBook, OrderEvent, RequestBook, RequestEvent};

/// Everything one warehouse owns.
#[derive(Debug)]
pub(crate) struct WarehouseState {
    pub tenant_id: TenantId,
    pub warehouse_id: WarehouseId,
    pub locations: LocationIndex,
    pub ledger: StockLedger,
    pub orders: OrderBook,
    pub requests: RequestBook,
    /// Sequence number of the last published envelope.
    pub sequence: u64,
}

impl WarehouseState {
    pub fn new(tenant_id: TenantId, warehouse_id: WarehouseId) -> Self {
        Self {
            locations: LocationIndex::new(warehouse_id.clone()),
            ledger: StockLedger::new(),
            orders: OrderBook::new(),
            requests: RequestBook::new(),
            tenant_id,
            warehouse_id,
            sequence: 0,
        }
    }

    pub fn apply(&mut self, change: &Change) {
        match change {
            Change::Location(e) => self.locations.apply(e),
            Change::Article(e) => self.ledger.apply(e),
            Change::Order(e) => self.orders.apply(e),
            Change::Request(e) => self.requests.apply(e),
        }
    }

    /// Wrap `change` into the next envelope of this warehouse's stream.
    pub fn envelope(
        &mut self,
        change: &Change,
    ) -> Result<EventEnvelope<JsonValue>, serde_json::Error> {
        self.sequence += 1;
        let (tenant, warehouse, seq) =
            (self.tenant_id.clone(), self.warehouse_id.clone(), self.sequence);
        match change {
            Change::Location(e) => EventEnvelope::from_event(
                tenant,
                warehouse,
                e.location_id().as_str(),
                "locations.location",
                seq,
                e,
            ),
            Change::Article(e) => EventEnvelope::from_event(
                tenant,
                warehouse,
                e.article_id().as_str(),
                "inventory.article",
                seq,
                e,
            ),
            Change::Order(e) => EventEnvelope::from_event(
                tenant,
                warehouse,
                e.order_id().as_str(),
                "transport.order",
                seq,
                e,
            ),
            Change::Request(e) => EventEnvelope::from_event(
                tenant,
                warehouse,
                e.request_id().as_str(),
                "transport.request",
                seq,
                e,
            ),
        }
    }
}

/// A decided, not yet applied, change to one aggregate.
#[derive(Debug, Clone)]
pub(crate) enum Change {
    Location(LocationEvent),
    Article(ArticleEvent),
    Order(OrderEvent),
    Request(RequestEvent),
}

impl From<LocationEvent> for Change {
    fn from(e: LocationEvent) -> Self {
        Change::Location(e)
    }
}

impl From<ArticleEvent> for Change {
    fn from(e: ArticleEvent) -> Self {
        Change::Article(e)
    }
}

impl From<OrderEvent> for Change {
    fn from(e: OrderEvent) -> Self {
        Change::Order(e)
    }
}

impl From<RequestEvent> for Change {
    fn from(e: RequestEvent) -> Self {
        Change::Request(e)
    }
}
