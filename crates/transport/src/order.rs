use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wms_core::{
    Aggregate, AggregateRoot, DomainError, DomainResult, LocationId, OrderId, Registry, RequestId,
    StorageUnitId, WarehouseId,
};
use wms_events::Event;

/// Lowercase with `_`, `-` and spaces removed, so `"in_progress"`,
/// `"In Progress"` and `"InProgress"` compare equal.
pub(crate) fn normalize_name(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Lifecycle of a transport order.
///
/// `Pending → InProgress → Completed`, `Pending → Failed`,
/// `InProgress → Failed`. Completed and Failed are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::InProgress,
        OrderStatus::Completed,
        OrderStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::InProgress => "InProgress",
            OrderStatus::Completed => "Completed",
            OrderStatus::Failed => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Failed)
    }

    pub fn can_transition_to(&self, to: OrderStatus) -> bool {
        matches!(
            (self, to),
            (OrderStatus::Pending, OrderStatus::InProgress)
                | (OrderStatus::InProgress, OrderStatus::Completed)
                | (OrderStatus::Pending, OrderStatus::Failed)
                | (OrderStatus::InProgress, OrderStatus::Failed)
        )
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_name(s);
        OrderStatus::ALL
            .into_iter()
            .find(|st| normalize_name(st.as_str()) == key)
            .ok_or_else(|| DomainError::validation(format!("unknown order status {s:?}")))
    }
}

/// Aggregate root: TransportOrder.
///
/// Moves one storage unit from `source` to `destination`. Lower `priority`
/// values are more urgent; 1 is the highest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportOrder {
    #[serde(rename = "orderId")]
    id: OrderId,
    warehouse_id: WarehouseId,
    storage_unit_id: StorageUnitId,
    source: LocationId,
    destination: LocationId,
    priority: u32,
    request_id: Option<RequestId>,
    status: OrderStatus,
    timestamp: DateTime<Utc>,
    version: u64,
}

impl TransportOrder {
    pub fn from_submitted(event: &OrderSubmitted) -> Self {
        Self {
            id: event.order_id.clone(),
            warehouse_id: event.warehouse_id.clone(),
            storage_unit_id: event.storage_unit_id.clone(),
            source: event.source.clone(),
            destination: event.destination.clone(),
            priority: event.priority,
            request_id: event.request_id.clone(),
            status: event.status,
            timestamp: event.occurred_at,
            version: 1,
        }
    }

    pub fn id_typed(&self) -> &OrderId {
        &self.id
    }

    pub fn warehouse_id(&self) -> &WarehouseId {
        &self.warehouse_id
    }

    pub fn storage_unit_id(&self) -> &StorageUnitId {
        &self.storage_unit_id
    }

    pub fn source(&self) -> &LocationId {
        &self.source
    }

    pub fn destination(&self) -> &LocationId {
        &self.destination
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Time of the last status change.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Pending or InProgress.
    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }
}

impl AggregateRoot for TransportOrder {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: SubmitOrder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOrder {
    pub order_id: OrderId,
    pub warehouse_id: WarehouseId,
    pub storage_unit_id: StorageUnitId,
    pub source: LocationId,
    pub destination: LocationId,
    pub priority: u32,
    pub request_id: Option<RequestId>,
    pub occurred_at: DateTime<Utc>,
}

impl SubmitOrder {
    /// Checks that need no other aggregate.
    pub fn validate(&self) -> DomainResult<()> {
        if self.priority == 0 {
            return Err(DomainError::validation("priority must be at least 1"));
        }
        if self.source == self.destination {
            return Err(DomainError::SameSourceAndDestination(self.source.to_string()));
        }
        Ok(())
    }

    pub fn into_event(self, status: OrderStatus) -> OrderSubmitted {
        OrderSubmitted {
            order_id: self.order_id,
            warehouse_id: self.warehouse_id,
            storage_unit_id: self.storage_unit_id,
            source: self.source,
            destination: self.destination,
            priority: self.priority,
            request_id: self.request_id,
            status,
            occurred_at: self.occurred_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderCommand {
    Advance {
        to: OrderStatus,
        occurred_at: DateTime<Utc>,
    },
}

/// Event: OrderSubmitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSubmitted {
    pub order_id: OrderId,
    pub warehouse_id: WarehouseId,
    pub storage_unit_id: StorageUnitId,
    pub source: LocationId,
    pub destination: LocationId,
    pub priority: u32,
    pub request_id: Option<RequestId>,
    pub status: OrderStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderStatusChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusChanged {
    pub order_id: OrderId,
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderEvent {
    OrderSubmitted(OrderSubmitted),
    OrderStatusChanged(OrderStatusChanged),
}

impl OrderEvent {
    pub fn order_id(&self) -> &OrderId {
        match self {
            OrderEvent::OrderSubmitted(e) => &e.order_id,
            OrderEvent::OrderStatusChanged(e) => &e.order_id,
        }
    }
}

impl Event for OrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::OrderSubmitted(_) => "transport.order.submitted",
            OrderEvent::OrderStatusChanged(_) => "transport.order.status_changed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            OrderEvent::OrderSubmitted(e) => e.occurred_at,
            OrderEvent::OrderStatusChanged(e) => e.occurred_at,
        }
    }
}

impl Aggregate for TransportOrder {
    type Command = OrderCommand;
    type Event = OrderEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            OrderEvent::OrderSubmitted(e) => {
                *self = TransportOrder::from_submitted(e);
                return;
            }
            OrderEvent::OrderStatusChanged(e) => {
                self.status = e.to;
                self.timestamp = e.occurred_at;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            OrderCommand::Advance { to, occurred_at } => {
                if !self.status.can_transition_to(*to) {
                    return Err(DomainError::invalid_transition(self.status, to));
                }
                Ok(vec![OrderEvent::OrderStatusChanged(OrderStatusChanged {
                    order_id: self.id.clone(),
                    from: self.status,
                    to: *to,
                    occurred_at: *occurred_at,
                })])
            }
        }
    }
}

/// Transport orders of one warehouse.
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    orders: Registry<TransportOrder>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide an order submission with the given initial status.
    ///
    /// Only local checks run here; location references are checked by the
    /// caller, which owns the location index.
    pub fn plan_submit(&self, cmd: SubmitOrder, status: OrderStatus) -> DomainResult<OrderEvent> {
        if self.orders.contains(&cmd.order_id) {
            return Err(DomainError::DuplicateOrderId(cmd.order_id.to_string()));
        }
        cmd.validate()?;
        Ok(OrderEvent::OrderSubmitted(cmd.into_event(status)))
    }

    /// Decide a status transition without applying it (`advance`).
    pub fn plan_advance(
        &self,
        order_id: &OrderId,
        to: OrderStatus,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Vec<OrderEvent>> {
        self.require(order_id)?
            .handle(&OrderCommand::Advance { to, occurred_at })
    }

    pub fn apply(&mut self, event: &OrderEvent) {
        match event {
            OrderEvent::OrderSubmitted(e) => {
                // Duplicates were refused when planning.
                let _ = self.orders.insert(TransportOrder::from_submitted(e));
            }
            OrderEvent::OrderStatusChanged(e) => {
                if let Some(order) = self.orders.get_mut(&e.order_id) {
                    order.apply(event);
                }
            }
        }
    }

    pub fn get(&self, order_id: &OrderId) -> Option<&TransportOrder> {
        self.orders.get(order_id)
    }

    pub fn require(&self, order_id: &OrderId) -> DomainResult<&TransportOrder> {
        self.get(order_id)
            .ok_or_else(|| DomainError::OrderNotFound(order_id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransportOrder> {
        self.orders.iter()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn count_status(&self, status: OrderStatus) -> usize {
        self.iter().filter(|o| o.status() == status).count()
    }

    pub fn active_count(&self) -> usize {
        self.iter().filter(|o| o.is_active()).count()
    }
}
