use std::sync::Arc;

use anyhow::Context;

use wms_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    wms_observability::init();

    let config = ApiConfig::from_env()?;
    let services = wms_api::app::build_services(config.tenants, config.seed_demo)?;
    let app = wms_api::app::build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
