use axum::{
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use wms_core::TenantId;

use crate::context::TenantContext;

/// Header carrying the caller's tenant.
pub const TENANT_HEADER: &str = "x-tenant-id";

/// Mock authentication: any well-formed tenant header is accepted.
///
/// Whether the tenant is provisioned is decided by the engine, which answers
/// `unknown_tenant` for anything outside the directory.
pub async fn tenant_middleware(
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let tenant_id = extract_tenant(req.headers())?;

    req.extensions_mut().insert(TenantContext::new(tenant_id));

    Ok(next.run(req).await)
}

fn extract_tenant(headers: &HeaderMap) -> Result<TenantId, StatusCode> {
    let header = headers
        .get(TENANT_HEADER)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    TenantId::new(header).map_err(|_| StatusCode::UNAUTHORIZED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn missing_or_blank_header_is_unauthorized() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_tenant(&headers), Err(StatusCode::UNAUTHORIZED));

        headers.insert(TENANT_HEADER, HeaderValue::from_static("   "));
        assert_eq!(extract_tenant(&headers), Err(StatusCode::UNAUTHORIZED));

        headers.insert(TENANT_HEADER, HeaderValue::from_static("tenant-1"));
        assert_eq!(extract_tenant(&headers).unwrap().as_str(), "tenant-1");
    }
}
