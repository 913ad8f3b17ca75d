use anyhow::Context;

use marketstat_infra::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    marketstat_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let services = marketstat_api::app::services::AppServices::from_config(&config).await?;
    let app = marketstat_api::app::build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
