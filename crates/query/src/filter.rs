//! List filters.
//!
//! A filter is a conjunction of optional predicates. An absent predicate
//! matches everything, and so does the literal `"all"` when a filter is
//! built from query-string values.

use core::str::FromStr;

use wms_core::DomainResult;
use wms_inventory::{Article, ArticleType, StockLevel};
use wms_locations::{LocationStatus, LocationType, StorageLocation};
use wms_transport::{OrderStatus, Request, RequestStatus, RequestType, TransportOrder};

/// Parse an optional enum predicate; `None`, `""` and `"all"` mean "any".
pub fn selection<T>(raw: Option<&str>) -> DomainResult<Option<T>>
where
    T: FromStr<Err = wms_core::DomainError>,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("all") => Ok(None),
        Some(s) => s.parse().map(Some),
    }
}

/// Case-insensitive substring predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFilter {
    needle: Option<String>,
}

impl TextFilter {
    pub fn new(raw: Option<&str>) -> Self {
        let needle = raw
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        Self { needle }
    }

    pub fn is_any(&self) -> bool {
        self.needle.is_none()
    }

    /// True when any of `haystacks` contains the needle.
    pub fn matches_any<'a>(&self, haystacks: impl IntoIterator<Item = &'a str>) -> bool {
        match &self.needle {
            None => true,
            Some(needle) => haystacks
                .into_iter()
                .any(|h| h.to_lowercase().contains(needle.as_str())),
        }
    }
}

/// Predicate over one entity kind.
pub trait Matches<T> {
    fn matches(&self, item: &T) -> bool;

    /// Keep matching items, preserving input order.
    fn filter<'a, I>(&self, items: I) -> Vec<&'a T>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        items.into_iter().filter(|item| self.matches(item)).collect()
    }
}

fn eq_or_any<T: PartialEq>(wanted: &Option<T>, actual: &T) -> bool {
    wanted.as_ref().is_none_or(|w| w == actual)
}

/// `search` matches location id or warehouse id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationFilter {
    pub search: TextFilter,
    pub status: Option<LocationStatus>,
    pub location_type: Option<LocationType>,
}

impl LocationFilter {
    /// Build from query-string values.
    pub fn parse(
        search: Option<&str>,
        status: Option<&str>,
        location_type: Option<&str>,
    ) -> DomainResult<Self> {
        Ok(Self {
            search: TextFilter::new(search),
            status: selection(status)?,
            location_type: selection(location_type)?,
        })
    }
}

impl Matches<StorageLocation> for LocationFilter {
    fn matches(&self, location: &StorageLocation) -> bool {
        eq_or_any(&self.status, &location.status())
            && eq_or_any(&self.location_type, &location.location_type())
            && self.search.matches_any([
                location.id_typed().as_str(),
                location.warehouse_id().as_str(),
            ])
    }
}

/// `search` matches article id or name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFilter {
    pub search: TextFilter,
    pub article_type: Option<ArticleType>,
    pub level: Option<StockLevel>,
}

impl ArticleFilter {
    pub fn parse(
        search: Option<&str>,
        article_type: Option<&str>,
        level: Option<&str>,
    ) -> DomainResult<Self> {
        Ok(Self {
            search: TextFilter::new(search),
            article_type: selection(article_type)?,
            level: selection(level)?,
        })
    }
}

impl Matches<Article> for ArticleFilter {
    fn matches(&self, article: &Article) -> bool {
        eq_or_any(&self.article_type, &article.article_type())
            && eq_or_any(&self.level, &article.stock_level())
            && self
                .search
                .matches_any([article.id_typed().as_str(), article.name()])
    }
}

/// `search` matches order id, storage unit id, source or destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub search: TextFilter,
    pub status: Option<OrderStatus>,
    pub priority: Option<u32>,
}

impl OrderFilter {
    pub fn parse(
        search: Option<&str>,
        status: Option<&str>,
        priority: Option<u32>,
    ) -> DomainResult<Self> {
        Ok(Self {
            search: TextFilter::new(search),
            status: selection(status)?,
            priority,
        })
    }
}

impl Matches<TransportOrder> for OrderFilter {
    fn matches(&self, order: &TransportOrder) -> bool {
        eq_or_any(&self.status, &order.status())
            && eq_or_any(&self.priority, &order.priority())
            && self.search.matches_any([
                order.id_typed().as_str(),
                order.storage_unit_id().as_str(),
                order.source().as_str(),
                order.destination().as_str(),
            ])
    }
}

/// `search` matches request id or article id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFilter {
    pub search: TextFilter,
    pub status: Option<RequestStatus>,
    pub request_type: Option<RequestType>,
}

impl RequestFilter {
    pub fn parse(
        search: Option<&str>,
        status: Option<&str>,
        request_type: Option<&str>,
    ) -> DomainResult<Self> {
        Ok(Self {
            search: TextFilter::new(search),
            status: selection(status)?,
            request_type: selection(request_type)?,
        })
    }
}

impl Matches<Request> for RequestFilter {
    fn matches(&self, request: &Request) -> bool {
        eq_or_any(&self.status, &request.status())
            && eq_or_any(&self.request_type, &request.request_type())
            && self
                .search
                .matches_any([request.id_typed().as_str(), request.article_id().as_str()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;
    use wms_core::{
        ArticleId, Coordinate, LocationId, OrderId, RequestId, StorageUnitId, TenantId, WarehouseId,
    };
    use wms_inventory::{RegisterArticle, StockLedger};
    use wms_locations::{LocationIndex, RegisterLocation};
    use wms_transport::{OrderBook, RequestBook, SubmitOrder, SubmitRequest};

    fn test_index() -> LocationIndex {
        let wh = WarehouseId::new("WH-001").unwrap();
        let mut index = LocationIndex::new(wh.clone());
        let rows = [
            ("SL-001", LocationType::Standard, LocationStatus::Free, (1, 1, 1)),
            ("SL-002", LocationType::Standard, LocationStatus::Occupied, (1, 1, 2)),
            ("SL-003", LocationType::Inbound, LocationStatus::Free, (2, 1, 1)),
            ("SL-006", LocationType::AutomatedStorage, LocationStatus::Blocked, (5, 1, 1)),
        ];
        for (i, (id, location_type, status, (x, y, z))) in rows.into_iter().enumerate() {
            index
                .add(RegisterLocation {
                    warehouse_id: wh.clone(),
                    location_id: LocationId::new(id).unwrap(),
                    location_type,
                    sequence_number: i as u32 + 1,
                    coordinate: Coordinate::new(x, y, z).unwrap(),
                    status,
                    occurred_at: Utc::now(),
                })
                .unwrap();
        }
        index
    }

    fn test_ledger() -> StockLedger {
        let mut ledger = StockLedger::new();
        let rows = [
            ("ART-001", ArticleType::Material, "Steel Plate 10mm", 20, 45),
            ("ART-002", ArticleType::ToolComponent, "Drill Bit Set", 10, 15),
            ("ART-003", ArticleType::Consumables, "Cutting Fluid 5L", 30, 25),
            ("ART-004", ArticleType::Material, "Steel Rod 8mm", 20, 18),
        ];
        for (id, article_type, name, reorder_point, current_stock) in rows {
            ledger
                .register(RegisterArticle {
                    article_id: ArticleId::new(id).unwrap(),
                    article_type,
                    name: name.into(),
                    weight: 1.0,
                    unit: "kg".into(),
                    min_stock: 0,
                    reorder_point,
                    max_stock: 200,
                    current_stock,
                    occurred_at: Utc::now(),
                })
                .unwrap();
        }
        ledger
    }

    fn test_orders() -> OrderBook {
        let mut book = OrderBook::new();
        let rows = [
            ("TO-001", "SU-001", "SL-001", "SL-003", 1, OrderStatus::Completed),
            ("TO-002", "SU-002", "SL-002", "SL-004", 2, OrderStatus::InProgress),
            ("TO-003", "SU-003", "SL-005", "SL-007", 3, OrderStatus::Pending),
            ("TO-004", "SU-004", "SL-003", "SL-008", 1, OrderStatus::Pending),
        ];
        for (id, unit, source, destination, priority, status) in rows {
            let event = book
                .plan_submit(
                    SubmitOrder {
                        order_id: OrderId::new(id).unwrap(),
                        warehouse_id: WarehouseId::new("WH-001").unwrap(),
                        storage_unit_id: StorageUnitId::new(unit).unwrap(),
                        source: LocationId::new(source).unwrap(),
                        destination: LocationId::new(destination).unwrap(),
                        priority,
                        request_id: None,
                        occurred_at: Utc::now(),
                    },
                    status,
                )
                .unwrap();
            book.apply(&event);
        }
        book
    }

    fn test_requests() -> RequestBook {
        let mut book = RequestBook::new();
        let rows = [
            ("REQ-001", RequestType::Inbound, "ART-001", RequestStatus::Completed),
            ("REQ-002", RequestType::Outbound, "ART-002", RequestStatus::Processing),
            ("REQ-003", RequestType::Picking, "ART-003", RequestStatus::Assigned),
            ("REQ-004", RequestType::Outbound, "BRK-010", RequestStatus::Processing),
        ];
        for (id, request_type, article, status) in rows {
            let event = book
                .plan_submit(
                    SubmitRequest {
                        request_id: RequestId::new(id).unwrap(),
                        client_id: TenantId::new("tenant-1").unwrap(),
                        request_type,
                        article_id: ArticleId::new(article).unwrap(),
                        article_type: ArticleType::Material,
                        quantity: 5,
                        target: Coordinate::new(1, 1, 1).unwrap(),
                        occurred_at: Utc::now(),
                    },
                    status,
                )
                .unwrap();
            book.apply(&event);
        }
        book
    }

    fn ids(locations: Vec<&StorageLocation>) -> Vec<&str> {
        locations.into_iter().map(|l| l.id_typed().as_str()).collect()
    }

    #[test]
    fn all_and_absent_match_everything() {
        let index = test_index();
        let filter = LocationFilter::parse(None, Some("all"), Some("ALL")).unwrap();
        assert_eq!(filter, LocationFilter::default());
        assert_eq!(filter.filter(index.iter()).len(), 4);
    }

    #[test]
    fn predicates_are_conjunctive() {
        let index = test_index();
        let filter = LocationFilter::parse(Some("sl-00"), Some("Free"), Some("standard")).unwrap();
        assert_eq!(ids(filter.filter(index.iter())), vec!["SL-001"]);
    }

    #[test]
    fn search_is_case_insensitive_and_hits_warehouse() {
        let index = test_index();
        let filter = LocationFilter::parse(Some("wh-001"), None, None).unwrap();
        assert_eq!(filter.filter(index.iter()).len(), 4);
        let filter = LocationFilter::parse(Some("  "), None, None).unwrap();
        assert!(filter.search.is_any());
    }

    #[test]
    fn legacy_type_alias_is_accepted() {
        let index = test_index();
        let filter = LocationFilter::parse(None, None, Some("rgb")).unwrap();
        assert_eq!(ids(filter.filter(index.iter())), vec!["SL-006"]);
    }

    #[test]
    fn unknown_enum_value_is_a_validation_error() {
        assert!(LocationFilter::parse(None, Some("Lost"), None).is_err());
        assert!(OrderFilter::parse(None, Some("nope"), None).is_err());
    }

    #[test]
    fn article_search_hits_name_case_insensitively() {
        let ledger = test_ledger();
        let filter = ArticleFilter::parse(Some("steel"), None, None).unwrap();
        let found: Vec<&str> = filter
            .filter(ledger.iter())
            .into_iter()
            .map(|a| a.id_typed().as_str())
            .collect();
        assert_eq!(found, vec!["ART-001", "ART-004"]);

        let filter = ArticleFilter::parse(Some("STEEL"), Some("material"), Some("critical")).unwrap();
        let found: Vec<&str> = filter
            .filter(ledger.iter())
            .into_iter()
            .map(|a| a.id_typed().as_str())
            .collect();
        assert_eq!(found, vec!["ART-004"]);
    }

    #[test]
    fn article_level_and_type_narrow_independently() {
        let ledger = test_ledger();
        let critical = ArticleFilter::parse(None, Some("all"), Some("critical")).unwrap();
        assert_eq!(critical.filter(ledger.iter()).len(), 2);

        let warning = ArticleFilter::parse(None, None, Some("warning")).unwrap();
        let found = warning.filter(ledger.iter());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id_typed().as_str(), "ART-002");

        let by_type = ArticleFilter::parse(None, Some("tool_component"), Some("good")).unwrap();
        assert!(by_type.filter(ledger.iter()).is_empty());
    }

    #[test]
    fn order_status_and_priority_are_conjunctive() {
        let book = test_orders();
        let order_ids = |filter: &OrderFilter| -> Vec<String> {
            filter
                .filter(book.iter())
                .into_iter()
                .map(|o| o.id_typed().to_string())
                .collect()
        };

        let pending = OrderFilter::parse(None, Some("pending"), None).unwrap();
        assert_eq!(order_ids(&pending), vec!["TO-003", "TO-004"]);

        let urgent = OrderFilter::parse(None, None, Some(1)).unwrap();
        assert_eq!(order_ids(&urgent), vec!["TO-001", "TO-004"]);

        let nothing = OrderFilter::parse(None, Some("in_progress"), Some(1)).unwrap();
        assert!(order_ids(&nothing).is_empty());

        let by_location = OrderFilter::parse(Some("sl-003"), Some("Pending"), None).unwrap();
        assert_eq!(order_ids(&by_location), vec!["TO-004"]);
    }

    #[test]
    fn request_status_and_type_are_conjunctive() {
        let book = test_requests();
        let request_ids = |filter: &RequestFilter| -> Vec<String> {
            filter
                .filter(book.iter())
                .into_iter()
                .map(|r| r.id_typed().to_string())
                .collect()
        };

        let outbound = RequestFilter::parse(Some("art-00"), Some("all"), Some("outbound")).unwrap();
        assert_eq!(request_ids(&outbound), vec!["REQ-002"]);

        let processing = RequestFilter::parse(None, Some("PROCESSING"), None).unwrap();
        assert_eq!(request_ids(&processing), vec!["REQ-002", "REQ-004"]);

        let nothing = RequestFilter::parse(None, Some("Created"), Some("Inbound")).unwrap();
        assert!(request_ids(&nothing).is_empty());
    }

    proptest! {
        #[test]
        fn filtering_preserves_order(search in "[a-zA-Z0-9-]{0,4}") {
            let index = test_index();
            let filter = LocationFilter::parse(Some(&search), None, None).unwrap();
            let positions: Vec<usize> = filter
                .filter(index.iter())
                .into_iter()
                .map(|l| index.iter().position(|x| x.id_typed() == l.id_typed()).unwrap())
                .collect();
            prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
