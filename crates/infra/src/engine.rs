//! Tenant-scoped warehouse engine.
//!
//! ## Concurrency
//!
//! Each warehouse lives behind its own `RwLock`. Reads take the read lock and
//! copy out what they return, so a caller never sees a torn state. Every
//! mutation takes the write lock once and runs in three steps:
//!
//! ```text
//! 1. decide: ask every affected aggregate for its events (no mutation)
//!   ↓
//! 2. apply:  evolve state with all decided events (infallible)
//!   ↓
//! 3. publish: wrap each event in an envelope and hand it to the bus
//! ```
//!
//! Any failure in step 1 returns before anything changed, which is what makes
//! coupled transitions (order completion, request completion) all-or-nothing.
//! Publication happens under the same lock, so bus order equals commit order
//! within a warehouse. A failed publication is logged; the change stays.
//!
//! Warehouses are fixed at construction from the [`TenantDirectory`], so the
//! outer map is never written after `new` and needs no lock of its own.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use serde::Serialize;
use serde_json::Value as JsonValue;

use wms_core::{
    ArticleId, DomainError, DomainResult, LocationId, OrderId, RequestId, TenantDirectory,
    TenantId, WarehouseId,
};
use wms_events::{EventBus, EventEnvelope};
use wms_inventory::{Article, RegisterArticle};
use wms_locations::{
    Grid, LocationCommand, LocationStatus, RegisterLocation, RowOrder, StorageLocation,
};
use wms_query::{
    ArticleFilter, LocationFilter, Matches, OrderFilter, RequestFilter, WarehouseSummary,
};
use wms_transport::{
    OrderStatus, Request, RequestStatus, SubmitOrder, SubmitRequest, TransportOrder,
};

use crate::state::{Change, WarehouseState};

/// Consistent copy of one warehouse's four collections.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseSnapshot {
    pub tenant_id: TenantId,
    pub warehouse_id: WarehouseId,
    pub locations: Vec<StorageLocation>,
    pub articles: Vec<Article>,
    pub orders: Vec<TransportOrder>,
    pub requests: Vec<Request>,
}

/// Storage locations, stock, transport orders and requests of every
/// provisioned warehouse.
///
/// Every operation takes the caller's tenant explicitly and resolves it to
/// exactly one warehouse; there is no notion of a current tenant.
pub struct WarehouseEngine<B> {
    directory: TenantDirectory,
    warehouses: HashMap<WarehouseId, RwLock<WarehouseState>>,
    bus: B,
}

impl<B> WarehouseEngine<B>
where
    B: EventBus<EventEnvelope<JsonValue>>,
{
    pub fn new(directory: TenantDirectory, bus: B) -> Self {
        let warehouses = directory
            .tenants()
            .map(|t| {
                (
                    t.warehouse_id.clone(),
                    RwLock::new(WarehouseState::new(t.id.clone(), t.warehouse_id.clone())),
                )
            })
            .collect();
        Self {
            directory,
            warehouses,
            bus,
        }
    }

    pub fn directory(&self) -> &TenantDirectory {
        &self.directory
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn warehouse_of(&self, tenant_id: &TenantId) -> DomainResult<&WarehouseId> {
        self.directory.warehouse_of(tenant_id)
    }

    fn slot(&self, tenant_id: &TenantId) -> DomainResult<&RwLock<WarehouseState>> {
        let warehouse_id = self.directory.warehouse_of(tenant_id)?;
        self.warehouses
            .get(warehouse_id)
            .ok_or_else(|| DomainError::UnknownTenant(tenant_id.to_string()))
    }

    // State only changes through infallible `apply` after every check passed,
    // so a poisoned lock still guards a consistent state.
    fn read(&self, tenant_id: &TenantId) -> DomainResult<RwLockReadGuard<'_, WarehouseState>> {
        Ok(self
            .slot(tenant_id)?
            .read()
            .unwrap_or_else(PoisonError::into_inner))
    }

    fn write(&self, tenant_id: &TenantId) -> DomainResult<RwLockWriteGuard<'_, WarehouseState>> {
        Ok(self
            .slot(tenant_id)?
            .write()
            .unwrap_or_else(PoisonError::into_inner))
    }

    fn commit(&self, state: &mut WarehouseState, changes: Vec<Change>) {
        for change in &changes {
            state.apply(change);
        }
        for change in &changes {
            let envelope = match state.envelope(change) {
                Ok(envelope) => envelope,
                Err(e) => {
                    tracing::error!(
                        warehouse_id = %state.warehouse_id,
                        error = %e,
                        "failed to serialize domain event"
                    );
                    continue;
                }
            };
            let sequence = envelope.sequence_number();
            if let Err(e) = self.bus.publish(envelope) {
                tracing::error!(
                    warehouse_id = %state.warehouse_id,
                    sequence,
                    error = ?e,
                    "failed to publish domain event"
                );
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Storage locations
    // ─────────────────────────────────────────────────────────────────────

    /// Register a storage location (`createLocation`).
    pub fn create_location(
        &self,
        tenant_id: &TenantId,
        cmd: RegisterLocation,
    ) -> DomainResult<StorageLocation> {
        let mut state = self.write(tenant_id)?;
        let location_id = cmd.location_id.clone();
        let event = state.locations.plan_register(cmd)?;
        self.commit(&mut state, vec![event.into()]);

        tracing::info!(
            warehouse_id = %state.warehouse_id,
            location_id = %location_id,
            "storage location created"
        );
        state.locations.require(&location_id).cloned()
    }

    /// Unrestricted status change (`setLocationStatus`).
    pub fn set_location_status(
        &self,
        tenant_id: &TenantId,
        location_id: &LocationId,
        status: LocationStatus,
    ) -> DomainResult<StorageLocation> {
        let mut state = self.write(tenant_id)?;
        let events = state.locations.plan(
            location_id,
            &LocationCommand::SetStatus {
                status,
                occurred_at: Utc::now(),
            },
        )?;
        let changed = !events.is_empty();
        self.commit(&mut state, events.into_iter().map(Change::from).collect());

        tracing::info!(
            warehouse_id = %state.warehouse_id,
            location_id = %location_id,
            status = %status,
            changed,
            "storage location status set"
        );
        state.locations.require(location_id).cloned()
    }

    pub fn get_location(
        &self,
        tenant_id: &TenantId,
        location_id: &LocationId,
    ) -> DomainResult<StorageLocation> {
        let state = self.read(tenant_id)?;
        state.locations.require(location_id).cloned()
    }

    /// The vertical stack at `(x, y)` (`locationsAt`).
    pub fn locations_at(
        &self,
        tenant_id: &TenantId,
        x: u32,
        y: u32,
    ) -> DomainResult<Vec<StorageLocation>> {
        let state = self.read(tenant_id)?;
        let stack: Vec<StorageLocation> =
            state.locations.locations_at(x, y).into_iter().cloned().collect();
        tracing::debug!(warehouse_id = %state.warehouse_id, x, y, depth = stack.len(), "stack read");
        Ok(stack)
    }

    pub fn list_locations(
        &self,
        tenant_id: &TenantId,
        filter: &LocationFilter,
    ) -> DomainResult<Vec<StorageLocation>> {
        let state = self.read(tenant_id)?;
        let locations: Vec<StorageLocation> = filter
            .filter(state.locations.iter())
            .into_iter()
            .cloned()
            .collect();
        tracing::debug!(warehouse_id = %state.warehouse_id, count = locations.len(), "locations listed");
        Ok(locations)
    }

    /// Dense grid of the tenant's warehouse (`getGrid`).
    pub fn get_grid(&self, tenant_id: &TenantId, row_order: RowOrder) -> DomainResult<Grid> {
        let state = self.read(tenant_id)?;
        Ok(state.locations.materialize_grid(row_order))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Articles
    // ─────────────────────────────────────────────────────────────────────

    pub fn register_article(
        &self,
        tenant_id: &TenantId,
        cmd: RegisterArticle,
    ) -> DomainResult<Article> {
        let mut state = self.write(tenant_id)?;
        let article_id = cmd.article_id.clone();
        let event = state.ledger.plan_register(cmd)?;
        self.commit(&mut state, vec![event.into()]);

        tracing::info!(
            warehouse_id = %state.warehouse_id,
            article_id = %article_id,
            "article registered"
        );
        state.ledger.require(&article_id).cloned()
    }

    /// Apply a signed stock delta (`adjustStock`).
    ///
    /// The returned article carries the new classification.
    pub fn adjust_stock(
        &self,
        tenant_id: &TenantId,
        article_id: &ArticleId,
        delta: i64,
    ) -> DomainResult<Article> {
        let mut state = self.write(tenant_id)?;
        let events = state.ledger.plan_adjust(article_id, delta, Utc::now())?;
        self.commit(&mut state, events.into_iter().map(Change::from).collect());

        let article = state.ledger.require(article_id)?.clone();
        tracing::info!(
            warehouse_id = %state.warehouse_id,
            article_id = %article_id,
            delta,
            current_stock = article.current_stock(),
            level = %article.stock_level(),
            "stock adjusted"
        );
        Ok(article)
    }

    pub fn get_article(&self, tenant_id: &TenantId, article_id: &ArticleId) -> DomainResult<Article> {
        let state = self.read(tenant_id)?;
        state.ledger.require(article_id).cloned()
    }

    pub fn list_articles(
        &self,
        tenant_id: &TenantId,
        filter: &ArticleFilter,
    ) -> DomainResult<Vec<Article>> {
        let state = self.read(tenant_id)?;
        let articles: Vec<Article> = filter.filter(state.ledger.iter()).into_iter().cloned().collect();
        tracing::debug!(warehouse_id = %state.warehouse_id, count = articles.len(), "articles listed");
        Ok(articles)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Transport orders
    // ─────────────────────────────────────────────────────────────────────

    /// Accept a new transport order in `Pending`.
    pub fn submit_order(&self, tenant_id: &TenantId, cmd: SubmitOrder) -> DomainResult<TransportOrder> {
        self.insert_order(tenant_id, cmd, OrderStatus::Pending, true)
    }

    /// Insert an order with a given status, without coupled side effects.
    ///
    /// References are still checked; the destination may be Blocked since
    /// a historical order can point at a bin that was blocked later.
    pub fn import_order(
        &self,
        tenant_id: &TenantId,
        cmd: SubmitOrder,
        status: OrderStatus,
    ) -> DomainResult<TransportOrder> {
        self.insert_order(tenant_id, cmd, status, false)
    }

    fn insert_order(
        &self,
        tenant_id: &TenantId,
        cmd: SubmitOrder,
        status: OrderStatus,
        check_destination: bool,
    ) -> DomainResult<TransportOrder> {
        let mut state = self.write(tenant_id)?;
        if cmd.warehouse_id != state.warehouse_id {
            return Err(DomainError::validation(format!(
                "order {} targets warehouse {}, not {}",
                cmd.order_id, cmd.warehouse_id, state.warehouse_id
            )));
        }
        let order_id = cmd.order_id.clone();
        let source = cmd.source.clone();
        let destination = cmd.destination.clone();
        let request_id = cmd.request_id.clone();

        let event = state.orders.plan_submit(cmd, status)?;
        state.locations.require(&source)?;
        let dest = state.locations.require(&destination)?;
        if check_destination && dest.is_blocked() {
            return Err(DomainError::DestinationBlocked(destination.to_string()));
        }
        if let Some(request_id) = &request_id {
            state.requests.require(request_id)?;
        }

        self.commit(&mut state, vec![event.into()]);
        tracing::info!(
            warehouse_id = %state.warehouse_id,
            order_id = %order_id,
            source = %source,
            destination = %destination,
            status = %status,
            "transport order accepted"
        );
        state.orders.require(&order_id).cloned()
    }

    /// Move an order to `to` (`advanceOrder`).
    ///
    /// Completion occupies the destination and releases the source in the
    /// same commit; if the destination is Blocked by then, nothing changes.
    pub fn advance_order(
        &self,
        tenant_id: &TenantId,
        order_id: &OrderId,
        to: OrderStatus,
    ) -> DomainResult<TransportOrder> {
        let mut state = self.write(tenant_id)?;
        let occurred_at = Utc::now();
        let mut changes: Vec<Change> = state
            .orders
            .plan_advance(order_id, to, occurred_at)?
            .into_iter()
            .map(Change::from)
            .collect();

        if to == OrderStatus::Completed {
            let order = state.orders.require(order_id)?;
            let coupled = state
                .locations
                .plan(order.destination(), &LocationCommand::Occupy { occurred_at })
                .and_then(|mut events| {
                    events.extend(
                        state
                            .locations
                            .plan(order.source(), &LocationCommand::Release { occurred_at })?,
                    );
                    Ok(events)
                });
            match coupled {
                Ok(events) => changes.extend(events.into_iter().map(Change::from)),
                Err(e) => {
                    tracing::warn!(
                        warehouse_id = %state.warehouse_id,
                        order_id = %order_id,
                        error = %e,
                        "order completion aborted"
                    );
                    return Err(e);
                }
            }
        }

        self.commit(&mut state, changes);
        tracing::info!(
            warehouse_id = %state.warehouse_id,
            order_id = %order_id,
            status = %to,
            "transport order advanced"
        );
        state.orders.require(order_id).cloned()
    }

    pub fn get_order(&self, tenant_id: &TenantId, order_id: &OrderId) -> DomainResult<TransportOrder> {
        let state = self.read(tenant_id)?;
        state.orders.require(order_id).cloned()
    }

    pub fn list_orders(
        &self,
        tenant_id: &TenantId,
        filter: &OrderFilter,
    ) -> DomainResult<Vec<TransportOrder>> {
        let state = self.read(tenant_id)?;
        let orders: Vec<TransportOrder> = filter.filter(state.orders.iter()).into_iter().cloned().collect();
        tracing::debug!(warehouse_id = %state.warehouse_id, count = orders.len(), "orders listed");
        Ok(orders)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Requests
    // ─────────────────────────────────────────────────────────────────────

    /// Accept a new request in `Created`.
    pub fn submit_request(&self, tenant_id: &TenantId, cmd: SubmitRequest) -> DomainResult<Request> {
        self.insert_request(tenant_id, cmd, RequestStatus::Created)
    }

    /// Insert a request with a given status, without touching stock.
    pub fn import_request(
        &self,
        tenant_id: &TenantId,
        cmd: SubmitRequest,
        status: RequestStatus,
    ) -> DomainResult<Request> {
        self.insert_request(tenant_id, cmd, status)
    }

    fn insert_request(
        &self,
        tenant_id: &TenantId,
        cmd: SubmitRequest,
        status: RequestStatus,
    ) -> DomainResult<Request> {
        let mut state = self.write(tenant_id)?;
        if &cmd.client_id != tenant_id {
            return Err(DomainError::validation(format!(
                "request {} belongs to client {}, not {tenant_id}",
                cmd.request_id, cmd.client_id
            )));
        }
        let request_id = cmd.request_id.clone();
        let article_id = cmd.article_id.clone();
        let article_type = cmd.article_type;

        let event = state.requests.plan_submit(cmd, status)?;
        state.ledger.require_typed(&article_id, article_type)?;

        self.commit(&mut state, vec![event.into()]);
        tracing::info!(
            warehouse_id = %state.warehouse_id,
            request_id = %request_id,
            article_id = %article_id,
            status = %status,
            "request accepted"
        );
        state.requests.require(&request_id).cloned()
    }

    /// Move a request to `to` (`advanceRequest`).
    ///
    /// Completion applies the request's stock delta in the same commit. If
    /// that would drive stock negative the request keeps its status.
    pub fn advance_request(
        &self,
        tenant_id: &TenantId,
        request_id: &RequestId,
        to: RequestStatus,
    ) -> DomainResult<Request> {
        let mut state = self.write(tenant_id)?;
        let occurred_at = Utc::now();
        let mut changes: Vec<Change> = state
            .requests
            .plan_advance(request_id, to, occurred_at)?
            .into_iter()
            .map(Change::from)
            .collect();

        if to == RequestStatus::Completed {
            let request = state.requests.require(request_id)?;
            if let Some(delta) = request.stock_delta() {
                match state.ledger.plan_adjust(request.article_id(), delta, occurred_at) {
                    Ok(events) => changes.extend(events.into_iter().map(Change::from)),
                    Err(e) => {
                        tracing::warn!(
                            warehouse_id = %state.warehouse_id,
                            request_id = %request_id,
                            article_id = %request.article_id(),
                            delta,
                            error = %e,
                            "request completion aborted"
                        );
                        return Err(e);
                    }
                }
            }
        }

        self.commit(&mut state, changes);
        tracing::info!(
            warehouse_id = %state.warehouse_id,
            request_id = %request_id,
            status = %to,
            "request advanced"
        );
        state.requests.require(request_id).cloned()
    }

    pub fn get_request(&self, tenant_id: &TenantId, request_id: &RequestId) -> DomainResult<Request> {
        let state = self.read(tenant_id)?;
        state.requests.require(request_id).cloned()
    }

    pub fn list_requests(
        &self,
        tenant_id: &TenantId,
        filter: &RequestFilter,
    ) -> DomainResult<Vec<Request>> {
        let state = self.read(tenant_id)?;
        let requests: Vec<Request> = filter.filter(state.requests.iter()).into_iter().cloned().collect();
        tracing::debug!(warehouse_id = %state.warehouse_id, count = requests.len(), "requests listed");
        Ok(requests)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Dashboards
    // ─────────────────────────────────────────────────────────────────────

    pub fn summary(&self, tenant_id: &TenantId) -> DomainResult<WarehouseSummary> {
        let state = self.read(tenant_id)?;
        Ok(WarehouseSummary::compute(
            &state.locations,
            &state.ledger,
            &state.orders,
            &state.requests,
        ))
    }

    pub fn snapshot(&self, tenant_id: &TenantId) -> DomainResult<WarehouseSnapshot> {
        let state = self.read(tenant_id)?;
        Ok(WarehouseSnapshot {
            tenant_id: state.tenant_id.clone(),
            warehouse_id: state.warehouse_id.clone(),
            locations: state.locations.iter().cloned().collect(),
            articles: state.ledger.iter().cloned().collect(),
            orders: state.orders.iter().cloned().collect(),
            requests: state.requests.iter().cloned().collect(),
        })
    }

    /// Sequence number of the last event published for the tenant.
    pub fn last_sequence(&self, tenant_id: &TenantId) -> DomainResult<u64> {
        Ok(self.read(tenant_id)?.sequence)
    }
}
