use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use wms_core::{DomainError, LocationId};
use wms_locations::{LocationStatus, RowOrder};
use wms_query::LocationFilter;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::TenantContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_locations).post(create_location))
        .route("/stack/:x/:y", get(locations_at))
        .route("/:id", get(get_location))
        .route("/:id/status", post(set_location_status))
}

pub async fn create_location(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Json(body): Json<dto::CreateLocationRequest>,
) -> axum::response::Response {
    let engine = services.engine();
    let cmd = match engine
        .warehouse_of(tenant.tenant_id())
        .and_then(|wh| body.into_command(wh.clone()))
    {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match engine.create_location(tenant.tenant_id(), cmd) {
        Ok(location) => (StatusCode::CREATED, Json(dto::LocationView::from(location))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_locations(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Query(query): Query<dto::ListQuery>,
) -> axum::response::Response {
    let filter = match LocationFilter::parse(
        query.search.as_deref(),
        query.status.as_deref(),
        query.kind.as_deref(),
    ) {
        Ok(f) => f,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.engine().list_locations(tenant.tenant_id(), &filter) {
        Ok(locations) => Json(
            locations
                .into_iter()
                .map(dto::LocationView::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_location(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let result = LocationId::new(id)
        .and_then(|id| services.engine().get_location(tenant.tenant_id(), &id));
    match result {
        Ok(location) => Json(dto::LocationView::from(location)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn set_location_status(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::SetStatusRequest>,
) -> axum::response::Response {
    let status: LocationStatus = match errors::parse_field(&body.status) {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    let result = LocationId::new(id).and_then(|id| {
        services
            .engine()
            .set_location_status(tenant.tenant_id(), &id, status)
    });
    match result {
        Ok(location) => Json(dto::LocationView::from(location)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn locations_at(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path((x, y)): Path<(u32, u32)>,
) -> axum::response::Response {
    if x == 0 || y == 0 {
        return errors::domain_error_to_response(DomainError::validation(
            "footprint components must be positive",
        ));
    }

    match services.engine().locations_at(tenant.tenant_id(), x, y) {
        Ok(stack) => Json(
            stack
                .into_iter()
                .map(dto::LocationView::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_grid(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Query(query): Query<dto::GridQuery>,
) -> axum::response::Response {
    let row_order: RowOrder = match query.orientation.as_deref() {
        Some(raw) => match errors::parse_field(raw) {
            Ok(o) => o,
            Err(resp) => return resp,
        },
        None => RowOrder::default(),
    };

    match services.engine().get_grid(tenant.tenant_id(), row_order) {
        Ok(grid) => Json(grid).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
