use axum::{routing::get, Router};

pub mod articles;
pub mod locations;
pub mod orders;
pub mod requests;
pub mod system;

/// Router for all tenant-scoped endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/summary", get(system::summary))
        .route("/snapshot", get(system::snapshot))
        .route("/stream", get(system::stream))
        .route("/grid", get(locations::get_grid))
        .nest("/locations", locations::router())
        .nest("/articles", articles::router())
        .nest("/orders", orders::router())
        .nest("/requests", requests::router())
}
