//! Engine tests: coupled transitions, rollback, tenant isolation and
//! concurrent access.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use chrono::Utc;
    use serde_json::Value as JsonValue;

    use wms_core::{
        ArticleId, Coordinate, DomainError, LocationId, OrderId, RequestId, StorageUnitId,
        TenantId, WarehouseId,
    };
    use wms_events::{EventBus, EventEnvelope, InMemoryEventBus, NullEventBus};
    use wms_inventory::{ArticleType, RegisterArticle, StockLevel};
    use wms_locations::{LocationStatus, LocationType, RegisterLocation, RowOrder};
    use wms_query::{ArticleFilter, LocationFilter, OrderFilter};
    use wms_transport::{
        OrderStatus, RequestStatus, RequestType, SubmitOrder, SubmitRequest,
    };

    use crate::engine::WarehouseEngine;
    use crate::seed::demo_directory;

    type Bus = Arc<InMemoryEventBus<EventEnvelope<JsonValue>>>;

    fn t1() -> TenantId {
        TenantId::new("tenant-1").unwrap()
    }

    fn t2() -> TenantId {
        TenantId::new("tenant-2").unwrap()
    }

    fn loc(id: &str) -> LocationId {
        LocationId::new(id).unwrap()
    }

    fn test_engine() -> (WarehouseEngine<Bus>, Bus) {
        let bus: Bus = Arc::new(InMemoryEventBus::new());
        let engine = WarehouseEngine::new(demo_directory().unwrap(), bus.clone());
        (engine, bus)
    }

    fn add_location<B: EventBus<EventEnvelope<JsonValue>>>(
        engine: &WarehouseEngine<B>,
        tenant: &TenantId,
        id: &str,
        (x, y, z): (u32, u32, u32),
        status: LocationStatus,
    ) {
        let warehouse_id = engine.warehouse_of(tenant).unwrap().clone();
        engine
            .create_location(
                tenant,
                RegisterLocation {
                    warehouse_id,
                    location_id: loc(id),
                    location_type: LocationType::Standard,
                    sequence_number: x * 10 + z,
                    coordinate: Coordinate::new(x, y, z).unwrap(),
                    status,
                    occurred_at: Utc::now(),
                },
            )
            .unwrap();
    }

    fn add_article<B: EventBus<EventEnvelope<JsonValue>>>(
        engine: &WarehouseEngine<B>,
        tenant: &TenantId,
        current_stock: u64,
    ) {
        engine
            .register_article(
                tenant,
                RegisterArticle {
                    article_id: ArticleId::new("ART-001").unwrap(),
                    article_type: ArticleType::Material,
                    name: "Steel Plate 10mm".into(),
                    weight: 25.5,
                    unit: "kg".into(),
                    min_stock: 10,
                    reorder_point: 20,
                    max_stock: 100,
                    current_stock,
                    occurred_at: Utc::now(),
                },
            )
            .unwrap();
    }

    fn submit_order<B: EventBus<EventEnvelope<JsonValue>>>(
        engine: &WarehouseEngine<B>,
        id: &str,
        source: &str,
        destination: &str,
    ) -> Result<(), DomainError> {
        engine
            .submit_order(
                &t1(),
                SubmitOrder {
                    order_id: OrderId::new(id).unwrap(),
                    warehouse_id: WarehouseId::new("WH-001").unwrap(),
                    storage_unit_id: StorageUnitId::new("SU-001").unwrap(),
                    source: loc(source),
                    destination: loc(destination),
                    priority: 1,
                    request_id: None,
                    occurred_at: Utc::now(),
                },
            )
            .map(|_| ())
    }

    fn submit_request<B: EventBus<EventEnvelope<JsonValue>>>(
        engine: &WarehouseEngine<B>,
        id: &str,
        request_type: RequestType,
        quantity: u32,
    ) {
        engine
            .submit_request(
                &t1(),
                SubmitRequest {
                    request_id: RequestId::new(id).unwrap(),
                    client_id: t1(),
                    request_type,
                    article_id: ArticleId::new("ART-001").unwrap(),
                    article_type: ArticleType::Material,
                    quantity,
                    target: Coordinate::new(1, 1, 1).unwrap(),
                    occurred_at: Utc::now(),
                },
            )
            .unwrap();
    }

    fn order_setup() -> (WarehouseEngine<Bus>, Bus) {
        let (engine, bus) = test_engine();
        add_location(&engine, &t1(), "SL-001", (1, 1, 1), LocationStatus::Occupied);
        add_location(&engine, &t1(), "SL-003", (2, 1, 1), LocationStatus::Free);
        submit_order(&engine, "TO-001", "SL-001", "SL-003").unwrap();
        (engine, bus)
    }

    #[test]
    fn snapshot_copies_every_collection_of_one_warehouse() {
        let (engine, _bus) = order_setup();
        add_article(&engine, &t1(), 45);

        let snapshot = engine.snapshot(&t1()).unwrap();
        assert_eq!(snapshot.warehouse_id.as_str(), "WH-001");
        assert_eq!(snapshot.locations.len(), 2);
        assert_eq!(snapshot.articles.len(), 1);
        assert_eq!(snapshot.orders.len(), 1);
        assert!(snapshot.requests.is_empty());
        assert_eq!(engine.last_sequence(&t1()).unwrap(), 4);

        let other = engine.snapshot(&t2()).unwrap();
        assert!(other.locations.is_empty() && other.orders.is_empty());
    }

    #[test]
    fn order_completion_occupies_destination_and_frees_source() {
        let (engine, _bus) = order_setup();
        let id = OrderId::new("TO-001").unwrap();

        let err = engine
            .advance_order(&t1(), &id, OrderStatus::Completed)
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));

        engine.advance_order(&t1(), &id, OrderStatus::InProgress).unwrap();
        let order = engine.advance_order(&t1(), &id, OrderStatus::Completed).unwrap();
        assert_eq!(order.status(), OrderStatus::Completed);

        let dest = engine.get_location(&t1(), &loc("SL-003")).unwrap();
        let source = engine.get_location(&t1(), &loc("SL-001")).unwrap();
        assert_eq!(dest.status(), LocationStatus::Occupied);
        assert_eq!(source.status(), LocationStatus::Free);
    }

    #[test]
    fn blocked_destination_aborts_completion_atomically() {
        let (engine, _bus) = order_setup();
        let id = OrderId::new("TO-001").unwrap();
        engine.advance_order(&t1(), &id, OrderStatus::InProgress).unwrap();
        engine
            .set_location_status(&t1(), &loc("SL-003"), LocationStatus::Blocked)
            .unwrap();

        let err = engine
            .advance_order(&t1(), &id, OrderStatus::Completed)
            .unwrap_err();
        assert_eq!(err, DomainError::LocationBlocked("SL-003".into()));

        assert_eq!(
            engine.get_order(&t1(), &id).unwrap().status(),
            OrderStatus::InProgress
        );
        assert_eq!(
            engine.get_location(&t1(), &loc("SL-001")).unwrap().status(),
            LocationStatus::Occupied
        );
    }

    #[test]
    fn submit_order_checks_references() {
        let (engine, _bus) = order_setup();
        add_location(&engine, &t1(), "SL-006", (5, 1, 1), LocationStatus::Blocked);

        assert_eq!(
            submit_order(&engine, "TO-001", "SL-001", "SL-003").unwrap_err(),
            DomainError::DuplicateOrderId("TO-001".into())
        );
        assert_eq!(
            submit_order(&engine, "TO-002", "SL-001", "SL-404").unwrap_err(),
            DomainError::LocationNotFound("SL-404".into())
        );
        assert_eq!(
            submit_order(&engine, "TO-003", "SL-001", "SL-006").unwrap_err(),
            DomainError::DestinationBlocked("SL-006".into())
        );
        assert!(matches!(
            submit_order(&engine, "TO-004", "SL-001", "SL-001"),
            Err(DomainError::SameSourceAndDestination(_))
        ));
        assert_eq!(engine.list_orders(&t1(), &OrderFilter::default()).unwrap().len(), 1);
    }

    #[test]
    fn outbound_completion_decrements_stock() {
        let (engine, _bus) = test_engine();
        add_article(&engine, &t1(), 45);
        submit_request(&engine, "REQ-001", RequestType::Outbound, 30);

        let id = RequestId::new("REQ-001").unwrap();
        for to in [
            RequestStatus::Assigned,
            RequestStatus::Processing,
            RequestStatus::Completed,
        ] {
            engine.advance_request(&t1(), &id, to).unwrap();
        }

        let article = engine
            .get_article(&t1(), &ArticleId::new("ART-001").unwrap())
            .unwrap();
        assert_eq!(article.current_stock(), 15);
        assert_eq!(article.stock_level(), StockLevel::Critical);
    }

    fn complete_request<B: EventBus<EventEnvelope<JsonValue>>>(
        engine: &WarehouseEngine<B>,
        id: &RequestId,
    ) {
        for status in [
            RequestStatus::Assigned,
            RequestStatus::Processing,
            RequestStatus::Completed,
        ] {
            engine.advance_request(&t1(), id, status).unwrap();
        }
    }

    #[test]
    fn inbound_completion_increments_stock_and_reclassifies() {
        let (engine, bus) = test_engine();
        add_article(&engine, &t1(), 15);
        submit_request(&engine, "REQ-001", RequestType::Inbound, 10);
        let article_id = ArticleId::new("ART-001").unwrap();
        assert_eq!(
            engine.get_article(&t1(), &article_id).unwrap().stock_level(),
            StockLevel::Critical
        );

        let sub = bus.subscribe();
        complete_request(&engine, &RequestId::new("REQ-001").unwrap());

        let article = engine.get_article(&t1(), &article_id).unwrap();
        assert_eq!(article.current_stock(), 25);
        assert_eq!(article.stock_level(), StockLevel::Warning);

        let adjusted: Vec<JsonValue> = sub
            .drain()
            .into_iter()
            .filter(|e| e.event_type() == "inventory.article.stock_adjusted")
            .map(|e| e.into_payload()["StockAdjusted"].clone())
            .collect();
        assert_eq!(adjusted.len(), 1);
        assert_eq!(adjusted[0]["delta"], 10);
        assert_eq!(adjusted[0]["new_stock"], 25);
        assert_eq!(adjusted[0]["level"], "warning");
    }

    #[test]
    fn inventory_completion_leaves_stock_alone() {
        let (engine, bus) = test_engine();
        add_article(&engine, &t1(), 45);
        submit_request(&engine, "REQ-005", RequestType::Inventory, 30);

        let sub = bus.subscribe();
        let id = RequestId::new("REQ-005").unwrap();
        complete_request(&engine, &id);

        assert_eq!(
            engine.get_request(&t1(), &id).unwrap().status(),
            RequestStatus::Completed
        );
        let article = engine
            .get_article(&t1(), &ArticleId::new("ART-001").unwrap())
            .unwrap();
        assert_eq!(article.current_stock(), 45);

        let types: Vec<String> = sub
            .drain()
            .iter()
            .map(|e| e.event_type().to_string())
            .collect();
        assert_eq!(types.len(), 3);
        assert!(types.iter().all(|t| t == "transport.request.status_changed"));
    }

    #[test]
    fn negative_stock_aborts_request_completion() {
        let (engine, _bus) = test_engine();
        add_article(&engine, &t1(), 15);
        submit_request(&engine, "REQ-002", RequestType::Picking, 20);

        let id = RequestId::new("REQ-002").unwrap();
        engine.advance_request(&t1(), &id, RequestStatus::Assigned).unwrap();
        engine.advance_request(&t1(), &id, RequestStatus::Processing).unwrap();

        let err = engine
            .advance_request(&t1(), &id, RequestStatus::Completed)
            .unwrap_err();
        assert!(matches!(err, DomainError::NegativeStock { current: 15, delta: -20, .. }));
        assert_eq!(
            engine.get_request(&t1(), &id).unwrap().status(),
            RequestStatus::Processing
        );
        let article = engine
            .get_article(&t1(), &ArticleId::new("ART-001").unwrap())
            .unwrap();
        assert_eq!(article.current_stock(), 15);

        // Cancelling is still possible and leaves stock alone.
        engine.advance_request(&t1(), &id, RequestStatus::Cancelled).unwrap();
        assert_eq!(
            engine.summary(&t1()).unwrap().active_requests,
            0
        );
    }

    #[test]
    fn request_must_match_registered_article_type() {
        let (engine, _bus) = test_engine();
        add_article(&engine, &t1(), 15);
        let err = engine
            .submit_request(
                &t1(),
                SubmitRequest {
                    request_id: RequestId::new("REQ-003").unwrap(),
                    client_id: t1(),
                    request_type: RequestType::Inbound,
                    article_id: ArticleId::new("ART-001").unwrap(),
                    article_type: ArticleType::SpareParts,
                    quantity: 1,
                    target: Coordinate::new(1, 1, 1).unwrap(),
                    occurred_at: Utc::now(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn tenants_are_isolated() {
        let (engine, _bus) = test_engine();
        add_location(&engine, &t1(), "SL-001", (1, 1, 1), LocationStatus::Free);
        add_article(&engine, &t1(), 45);

        assert!(engine.list_locations(&t2(), &LocationFilter::default()).unwrap().is_empty());
        assert!(engine.list_articles(&t2(), &ArticleFilter::default()).unwrap().is_empty());
        assert!(engine.locations_at(&t2(), 1, 1).unwrap().is_empty());
        assert!(engine.get_grid(&t2(), RowOrder::TopDown).unwrap().is_empty());
        assert_eq!(
            engine.get_location(&t2(), &loc("SL-001")).unwrap_err(),
            DomainError::LocationNotFound("SL-001".into())
        );

        // The same id and coordinate are free to use in another warehouse.
        add_location(&engine, &t2(), "SL-001", (1, 1, 1), LocationStatus::Blocked);
        assert_eq!(
            engine.get_location(&t1(), &loc("SL-001")).unwrap().status(),
            LocationStatus::Free
        );
    }

    #[test]
    fn foreign_warehouse_and_unknown_tenant_are_rejected() {
        let (engine, _bus) = test_engine();
        let err = engine
            .create_location(
                &t1(),
                RegisterLocation {
                    warehouse_id: WarehouseId::new("WH-002").unwrap(),
                    location_id: loc("SL-900"),
                    location_type: LocationType::Standard,
                    sequence_number: 1,
                    coordinate: Coordinate::new(1, 1, 1).unwrap(),
                    status: LocationStatus::Free,
                    occurred_at: Utc::now(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let stranger = TenantId::new("tenant-9").unwrap();
        assert_eq!(
            engine.summary(&stranger).unwrap_err(),
            DomainError::UnknownTenant("tenant-9".into())
        );
    }

    #[test]
    fn duplicate_coordinate_is_rejected() {
        let (engine, _bus) = test_engine();
        add_location(&engine, &t1(), "SL-001", (1, 1, 1), LocationStatus::Free);
        let err = engine
            .create_location(
                &t1(),
                RegisterLocation {
                    warehouse_id: WarehouseId::new("WH-001").unwrap(),
                    location_id: loc("SL-002"),
                    location_type: LocationType::Standard,
                    sequence_number: 2,
                    coordinate: Coordinate::new(1, 1, 1).unwrap(),
                    status: LocationStatus::Free,
                    occurred_at: Utc::now(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateCoordinate(..)));
    }

    #[test]
    fn events_are_published_in_commit_order() {
        let (engine, bus) = order_setup();
        let sub = bus.subscribe();
        let id = OrderId::new("TO-001").unwrap();
        engine.advance_order(&t1(), &id, OrderStatus::InProgress).unwrap();
        engine.advance_order(&t1(), &id, OrderStatus::Completed).unwrap();

        let envelopes = sub.drain();
        let types: Vec<&str> = envelopes.iter().map(|e| e.event_type()).collect();
        assert_eq!(
            types,
            vec![
                "transport.order.status_changed",
                "transport.order.status_changed",
                "locations.location.status_changed",
                "locations.location.status_changed",
            ]
        );
        assert!(envelopes.windows(2).all(|w| w[1].sequence_number() == w[0].sequence_number() + 1));
        assert!(envelopes.iter().all(|e| e.tenant_id() == &t1()));
        assert_eq!(engine.last_sequence(&t1()).unwrap(), envelopes.last().unwrap().sequence_number());
    }

    #[test]
    fn failed_mutation_publishes_nothing() {
        let (engine, bus) = test_engine();
        add_article(&engine, &t1(), 5);
        let sub = bus.subscribe();
        let err = engine
            .adjust_stock(&t1(), &ArticleId::new("ART-001").unwrap(), -6)
            .unwrap_err();
        assert!(matches!(err, DomainError::NegativeStock { .. }));
        assert!(sub.drain().is_empty());
    }

    #[test]
    fn concurrent_adjustments_never_go_negative() {
        let engine = Arc::new(WarehouseEngine::new(demo_directory().unwrap(), NullEventBus));
        add_article(&*engine, &t1(), 100);
        let article_id = ArticleId::new("ART-001").unwrap();

        let writers: Vec<_> = (0..8)
            .map(|_| {
                let engine = engine.clone();
                let article_id = article_id.clone();
                thread::spawn(move || {
                    (0..50)
                        .filter(|_| engine.adjust_stock(&t1(), &article_id, -1).is_ok())
                        .count()
                })
            })
            .collect();
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let engine = engine.clone();
                let article_id = article_id.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        let article = engine.get_article(&t1(), &article_id).unwrap();
                        assert!(article.current_stock() <= 100);
                    }
                })
            })
            .collect();

        let succeeded: usize = writers.into_iter().map(|h| h.join().unwrap()).sum();
        for r in readers {
            r.join().unwrap();
        }

        assert_eq!(succeeded, 100);
        assert_eq!(engine.get_article(&t1(), &article_id).unwrap().current_stock(), 0);
    }

    #[test]
    fn concurrent_tenants_do_not_interfere() {
        let engine = Arc::new(WarehouseEngine::new(demo_directory().unwrap(), NullEventBus));
        let handles: Vec<_> = [t1(), t2()]
            .into_iter()
            .map(|tenant| {
                let engine = engine.clone();
                thread::spawn(move || {
                    for x in 1..=20u32 {
                        add_location(&*engine, &tenant, &format!("SL-{x:03}"), (x, 1, 1), LocationStatus::Free);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        for tenant in [t1(), t2()] {
            let grid = engine.get_grid(&tenant, RowOrder::BottomUp).unwrap();
            assert_eq!((grid.width(), grid.height()), (20, 1));
            assert_eq!(grid.filled_cells(), 20);
        }
    }
}
