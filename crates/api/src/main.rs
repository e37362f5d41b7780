use std::sync::Arc;

use anyhow::Context;

use storefront_api::app::{self, AppServices};
use storefront_infra::AppConfig;
use storefront_observability::LogFormat;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    storefront_observability::init(LogFormat::for_debug(config.debug));

    if config.is_production() && config.jwt_secret == "dev-secret" {
        tracing::warn!("APP__JWT_SECRET not set; using insecure dev default");
    }

    let services = AppServices::from_config(&config)
        .await
        .with_context(|| format!("failed to open database {}", config.database_url))?;
    let app = app::build_app(Arc::new(services));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(app = %config.app_name, environment = %config.environment, "listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
