use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use wms_core::OrderId;
use wms_query::OrderFilter;
use wms_transport::OrderStatus;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::TenantContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_orders).post(submit_order))
        .route("/:id", get(get_order))
        .route("/:id/advance", post(advance_order))
}

pub async fn submit_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Json(body): Json<dto::CreateOrderRequest>,
) -> axum::response::Response {
    let engine = services.engine();
    let result = engine
        .warehouse_of(tenant.tenant_id())
        .and_then(|wh| body.into_command(wh.clone()))
        .and_then(|cmd| engine.submit_order(tenant.tenant_id(), cmd));

    match result {
        Ok(order) => (StatusCode::CREATED, Json(order)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Move an order along its lifecycle.
///
/// Completing an order also occupies its destination and frees its source;
/// a Blocked destination rejects the completion with 422 and changes nothing.
pub async fn advance_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::AdvanceRequest>,
) -> axum::response::Response {
    let to: OrderStatus = match errors::parse_field(&body.status) {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    let result = OrderId::new(id)
        .and_then(|id| services.engine().advance_order(tenant.tenant_id(), &id, to));
    match result {
        Ok(order) => Json(order).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let result = OrderId::new(id).and_then(|id| services.engine().get_order(tenant.tenant_id(), &id));
    match result {
        Ok(order) => Json(order).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Query(query): Query<dto::ListQuery>,
) -> axum::response::Response {
    let result = OrderFilter::parse(
        query.search.as_deref(),
        query.status.as_deref(),
        query.priority,
    )
    .and_then(|filter| services.engine().list_orders(tenant.tenant_id(), &filter));

    match result {
        Ok(orders) => Json(orders).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
