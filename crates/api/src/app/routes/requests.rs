use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use wms_core::RequestId;
use wms_query::RequestFilter;
use wms_transport::RequestStatus;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::TenantContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_requests).post(submit_request))
        .route("/:id", get(get_request))
        .route("/:id/advance", post(advance_request))
}

pub async fn submit_request(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Json(body): Json<dto::CreateRequestRequest>,
) -> axum::response::Response {
    let result = body
        .into_command(tenant.tenant_id().clone())
        .and_then(|cmd| services.engine().submit_request(tenant.tenant_id(), cmd));
    match result {
        Ok(request) => (StatusCode::CREATED, Json(request)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Completing an inbound, outbound or picking request also moves stock.
pub async fn advance_request(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::AdvanceRequest>,
) -> axum::response::Response {
    let to: RequestStatus = match errors::parse_field(&body.status) {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    let result = RequestId::new(id)
        .and_then(|id| services.engine().advance_request(tenant.tenant_id(), &id, to));
    match result {
        Ok(request) => Json(request).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_request(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let result =
        RequestId::new(id).and_then(|id| services.engine().get_request(tenant.tenant_id(), &id));
    match result {
        Ok(request) => Json(request).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_requests(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Query(query): Query<dto::ListQuery>,
) -> axum::response::Response {
    let result = RequestFilter::parse(
        query.search.as_deref(),
        query.status.as_deref(),
        query.kind.as_deref(),
    )
    .and_then(|filter| services.engine().list_requests(tenant.tenant_id(), &filter));

    match result {
        Ok(requests) => Json(requests).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
