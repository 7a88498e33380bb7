use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use wms_core::ArticleId;
use wms_query::ArticleFilter;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::TenantContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_articles).post(register_article))
        .route("/:id", get(get_article))
        .route("/:id/adjust", post(adjust_stock))
}

pub async fn register_article(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Json(body): Json<dto::CreateArticleRequest>,
) -> axum::response::Response {
    let result = body
        .into_command()
        .and_then(|cmd| services.engine().register_article(tenant.tenant_id(), cmd));
    match result {
        Ok(article) => (StatusCode::CREATED, Json(dto::ArticleView::from(article))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn adjust_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::AdjustStockRequest>,
) -> axum::response::Response {
    let result = ArticleId::new(id).and_then(|id| {
        services
            .engine()
            .adjust_stock(tenant.tenant_id(), &id, body.delta)
    });
    match result {
        Ok(article) => Json(dto::ArticleView::from(article)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_article(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let result =
        ArticleId::new(id).and_then(|id| services.engine().get_article(tenant.tenant_id(), &id));
    match result {
        Ok(article) => Json(dto::ArticleView::from(article)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_articles(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Query(query): Query<dto::ListQuery>,
) -> axum::response::Response {
    let result = ArticleFilter::parse(
        query.search.as_deref(),
        query.kind.as_deref(),
        query.level.as_deref(),
    )
    .and_then(|filter| services.engine().list_articles(tenant.tenant_id(), &filter));

    match result {
        Ok(articles) => Json(
            articles
                .into_iter()
                .map(dto::ArticleView::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
