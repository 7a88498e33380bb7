//! Demo fixtures: three tenants with their warehouses, storage locations,
//! articles, transport orders and requests.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value as JsonValue;

use wms_core::{
    ArticleId, Coordinate, DomainError, DomainResult, LocationId, OrderId, RequestId,
    StorageUnitId, Tenant, TenantDirectory, TenantId, WarehouseId,
};
use wms_events::{EventBus, EventEnvelope};
use wms_inventory::RegisterArticle;
use wms_locations::RegisterLocation;
use wms_transport::{SubmitOrder, SubmitRequest};

use crate::engine::WarehouseEngine;

const TENANTS: &[(&str, &str, &str)] = &[
    ("tenant-1", "Acme Manufacturing", "WH-001"),
    ("tenant-2", "TechCorp Industries", "WH-002"),
    ("tenant-3", "Global Warehouse Co", "WH-003"),
];

/// `(warehouse, id, type, sequence, x, y, z, status)`
type LocationRow = (&'static str, &'static str, &'static str, u32, u32, u32, u32, &'static str);

const LOCATIONS: &[LocationRow] = &[
    ("WH-001", "SL-001", "standard", 1, 1, 1, 1, "Free"),
    ("WH-001", "SL-002", "standard", 2, 1, 1, 2, "Occupied"),
    ("WH-001", "SL-003", "inbound", 3, 2, 1, 1, "Free"),
    ("WH-001", "SL-004", "outbound", 4, 3, 1, 1, "Occupied"),
    ("WH-001", "SL-005", "picking", 5, 4, 1, 1, "Free"),
    ("WH-001", "SL-006", "rgb", 6, 5, 1, 1, "Blocked"),
    ("WH-001", "SL-007", "standard", 7, 1, 2, 1, "Occupied"),
    ("WH-001", "SL-008", "standard", 8, 1, 2, 2, "Free"),
    ("WH-002", "SL-101", "standard", 1, 1, 1, 1, "Occupied"),
    ("WH-002", "SL-102", "inbound", 2, 2, 1, 1, "Free"),
    ("WH-002", "SL-103", "outbound", 3, 3, 1, 1, "Free"),
    ("WH-002", "SL-104", "picking", 4, 4, 1, 1, "Occupied"),
    ("WH-002", "SL-105", "rgb", 5, 5, 1, 1, "Free"),
    ("WH-002", "SL-106", "standard", 6, 1, 2, 1, "Free"),
    ("WH-002", "SL-107", "standard", 7, 2, 2, 1, "Occupied"),
    ("WH-002", "SL-108", "standard", 8, 3, 2, 1, "Blocked"),
    ("WH-002", "SL-109", "picking", 9, 4, 2, 1, "Free"),
    ("WH-002", "SL-110", "standard", 10, 5, 2, 1, "Occupied"),
    ("WH-002", "SL-111", "standard", 11, 1, 3, 1, "Free"),
    ("WH-002", "SL-112", "standard", 12, 2, 3, 1, "Free"),
    ("WH-002", "SL-113", "removal", 13, 3, 3, 1, "Occupied"),
    ("WH-002", "SL-114", "standard", 14, 4, 3, 1, "Blocked"),
    ("WH-002", "SL-115", "standard", 15, 5, 3, 1, "Free"),
    ("WH-002", "SL-116", "standard", 16, 1, 3, 2, "Occupied"),
    ("WH-002", "SL-117", "standard", 17, 2, 3, 2, "Free"),
    ("WH-003", "SL-201", "standard", 1, 1, 1, 1, "Free"),
    ("WH-003", "SL-202", "standard", 2, 1, 1, 2, "Free"),
    ("WH-003", "SL-203", "inbound", 3, 2, 1, 1, "Occupied"),
    ("WH-003", "SL-204", "outbound", 4, 3, 1, 1, "Blocked"),
    ("WH-003", "SL-205", "picking", 5, 4, 1, 1, "Free"),
    ("WH-003", "SL-206", "rgb", 6, 5, 1, 1, "Occupied"),
    ("WH-003", "SL-207", "standard", 7, 1, 2, 1, "Occupied"),
    ("WH-003", "SL-208", "standard", 8, 2, 2, 1, "Free"),
    ("WH-003", "SL-209", "standard", 9, 3, 2, 1, "Free"),
    ("WH-003", "SL-210", "picking", 10, 4, 2, 1, "Occupied"),
    ("WH-003", "SL-211", "standard", 11, 5, 2, 1, "Blocked"),
    ("WH-003", "SL-212", "standard", 12, 1, 3, 1, "Free"),
    ("WH-003", "SL-213", "removal", 13, 2, 3, 1, "Occupied"),
    ("WH-003", "SL-214", "standard", 14, 3, 3, 1, "Free"),
    ("WH-003", "SL-215", "standard", 15, 4, 3, 1, "Occupied"),
    ("WH-003", "SL-216", "standard", 16, 5, 3, 1, "Free"),
    ("WH-003", "SL-217", "standard", 17, 1, 4, 1, "Blocked"),
    ("WH-003", "SL-218", "standard", 18, 2, 4, 1, "Free"),
    ("WH-003", "SL-219", "standard", 19, 3, 4, 1, "Occupied"),
    ("WH-003", "SL-220", "standard", 20, 4, 4, 1, "Free"),
    ("WH-003", "SL-221", "standard", 21, 5, 4, 1, "Occupied"),
];

/// `(id, type, name, weight, unit, min, reorder point, max, current)`
type ArticleRow = (&'static str, &'static str, &'static str, f64, &'static str, u64, u64, u64, u64);

const ARTICLES: &[ArticleRow] = &[
    ("ART-001", "material", "Steel Plate 10mm", 25.5, "kg", 10, 20, 100, 45),
    ("ART-002", "tool_component", "Drill Bit Set", 2.3, "kg", 5, 10, 50, 15),
    ("ART-003", "consumables", "Cutting Fluid 5L", 5.0, "L", 20, 30, 200, 85),
    ("ART-004", "spare_parts", "Motor Bearing", 0.8, "kg", 15, 25, 80, 30),
    ("ART-005", "production_equipment", "Welding Electrode", 1.2, "kg", 50, 75, 300, 120),
];

/// `(client, request, type, article type, article, quantity, a, b, c, timestamp, status)`
type RequestRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    u32,
    u32,
    u32,
    u32,
    &'static str,
    &'static str,
);

const REQUESTS: &[RequestRow] = &[
    ("tenant-1", "REQ-001", "Inbound", "material", "ART-001", 10, 1, 1, 1, "2025-10-27T10:00:00", "Completed"),
    ("tenant-1", "REQ-002", "Outbound", "tool_component", "ART-002", 5, 2, 1, 1, "2025-10-27T10:45:00", "Processing"),
    ("tenant-1", "REQ-003", "Picking", "consumables", "ART-003", 15, 3, 1, 1, "2025-10-27T11:15:00", "Assigned"),
    ("tenant-1", "REQ-004", "Inbound", "spare_parts", "ART-004", 8, 1, 2, 1, "2025-10-27T09:00:00", "Completed"),
];

/// `(client, order, warehouse, storage unit, source, destination, timestamp, priority, request, status)`
type OrderRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    u32,
    &'static str,
    &'static str,
);

const ORDERS: &[OrderRow] = &[
    ("tenant-1", "TO-001", "WH-001", "SU-001", "SL-001", "SL-003", "2025-10-27T10:30:00", 1, "REQ-001", "Completed"),
    ("tenant-1", "TO-002", "WH-001", "SU-002", "SL-002", "SL-004", "2025-10-27T11:00:00", 2, "REQ-002", "InProgress"),
    ("tenant-1", "TO-003", "WH-001", "SU-003", "SL-005", "SL-007", "2025-10-27T11:30:00", 3, "REQ-003", "Pending"),
    ("tenant-1", "TO-004", "WH-001", "SU-004", "SL-003", "SL-008", "2025-10-27T09:15:00", 1, "REQ-004", "Failed"),
];

/// The demo tenant → warehouse mapping.
pub fn demo_directory() -> DomainResult<TenantDirectory> {
    let tenants = TENANTS
        .iter()
        .map(|(id, name, warehouse)| {
            Ok(Tenant {
                id: TenantId::new(*id)?,
                name: (*name).to_string(),
                warehouse_id: WarehouseId::new(*warehouse)?,
            })
        })
        .collect::<DomainResult<Vec<_>>>()?;
    TenantDirectory::new(tenants)
}

fn timestamp(raw: &str) -> DomainResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .map(|t| t.and_utc())
        .map_err(|e| DomainError::validation(format!("bad fixture timestamp {raw:?}: {e}")))
}

/// Load the demo fixtures into every provisioned tenant.
///
/// Locations, orders and requests only go to the tenant whose warehouse or
/// client id they name; the article catalogue goes to every tenant.
/// Orders and requests are imported with their recorded status, so no
/// stock or occupancy coupling runs.
pub fn load_demo<B>(engine: &WarehouseEngine<B>) -> DomainResult<()>
where
    B: EventBus<EventEnvelope<JsonValue>>,
{
    let now = Utc::now();
    let tenants: Vec<(TenantId, WarehouseId)> = engine
        .directory()
        .tenants()
        .map(|t| (t.id.clone(), t.warehouse_id.clone()))
        .collect();

    for (tenant_id, warehouse_id) in &tenants {
        for (_, id, location_type, seq, x, y, z, status) in LOCATIONS
            .iter()
            .filter(|row| row.0 == warehouse_id.as_str())
        {
            engine.create_location(
                tenant_id,
                RegisterLocation {
                    warehouse_id: warehouse_id.clone(),
                    location_id: LocationId::new(*id)?,
                    location_type: location_type.parse()?,
                    sequence_number: *seq,
                    coordinate: Coordinate::new(*x, *y, *z)?,
                    status: status.parse()?,
                    occurred_at: now,
                },
            )?;
        }

        for (id, article_type, name, weight, unit, min, reorder, max, current) in ARTICLES {
            engine.register_article(
                tenant_id,
                RegisterArticle {
                    article_id: ArticleId::new(*id)?,
                    article_type: article_type.parse()?,
                    name: (*name).to_string(),
                    weight: *weight,
                    unit: (*unit).to_string(),
                    min_stock: *min,
                    reorder_point: *reorder,
                    max_stock: *max,
                    current_stock: *current,
                    occurred_at: now,
                },
            )?;
        }

        for (_, id, request_type, article_type, article, quantity, a, b, c, at, status) in REQUESTS
            .iter()
            .filter(|row| row.0 == tenant_id.as_str())
        {
            engine.import_request(
                tenant_id,
                SubmitRequest {
                    request_id: RequestId::new(*id)?,
                    client_id: tenant_id.clone(),
                    request_type: request_type.parse()?,
                    article_id: ArticleId::new(*article)?,
                    article_type: article_type.parse()?,
                    quantity: *quantity,
                    target: Coordinate::new(*a, *b, *c)?,
                    occurred_at: timestamp(at)?,
                },
                status.parse()?,
            )?;
        }

        for (_, id, warehouse, unit, source, destination, at, priority, request, status) in ORDERS
            .iter()
            .filter(|row| row.0 == tenant_id.as_str())
        {
            engine.import_order(
                tenant_id,
                SubmitOrder {
                    order_id: OrderId::new(*id)?,
                    warehouse_id: WarehouseId::new(*warehouse)?,
                    storage_unit_id: StorageUnitId::new(*unit)?,
                    source: LocationId::new(*source)?,
                    destination: LocationId::new(*destination)?,
                    priority: *priority,
                    request_id: Some(RequestId::new(*request)?),
                    occurred_at: timestamp(at)?,
                },
                status.parse()?,
            )?;
        }

        tracing::info!(tenant_id = %tenant_id, warehouse_id = %warehouse_id, "demo fixtures loaded");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wms_events::NullEventBus;
    use wms_locations::RowOrder;

    #[test]
    fn demo_loads_into_every_tenant() {
        let engine = WarehouseEngine::new(demo_directory().unwrap(), NullEventBus);
        load_demo(&engine).unwrap();

        let t1 = TenantId::new("tenant-1").unwrap();
        let t3 = TenantId::new("tenant-3").unwrap();

        let summary = engine.summary(&t1).unwrap();
        assert_eq!(summary.total_locations, 8);
        assert_eq!(summary.blocked_locations, 1);
        assert_eq!(summary.active_orders, 2);
        assert_eq!(summary.total_articles, 5);

        let grid = engine.get_grid(&t3, RowOrder::TopDown).unwrap();
        assert_eq!((grid.width(), grid.height()), (5, 4));
        assert!(engine.snapshot(&t3).unwrap().orders.is_empty());
    }

    #[test]
    fn loading_twice_is_rejected() {
        let engine = WarehouseEngine::new(demo_directory().unwrap(), NullEventBus);
        load_demo(&engine).unwrap();
        assert!(matches!(
            load_demo(&engine),
            Err(DomainError::DuplicateLocationId(_))
        ));
    }
}
