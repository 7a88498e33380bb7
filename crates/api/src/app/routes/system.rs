use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::app::errors;
use crate::app::services::{self, AppServices};
use crate::context::TenantContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn summary(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
) -> axum::response::Response {
    match services.engine().summary(tenant.tenant_id()) {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn snapshot(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
) -> axum::response::Response {
    match services.engine().snapshot(tenant.tenant_id()) {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn stream(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
) -> axum::response::Response {
    if let Err(e) = services.engine().warehouse_of(tenant.tenant_id()) {
        return errors::domain_error_to_response(e);
    }
    services::tenant_sse_stream(services, tenant.tenant_id().clone()).into_response()
}
