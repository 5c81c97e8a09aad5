use std::sync::Arc;

use stockguard_api::app::{self, services::AppServices};
use stockguard_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env()?;
    stockguard_observability::init_with(config.log_format);

    let services = Arc::new(AppServices::seeded(config.forecast)?);
    let app = app::build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
