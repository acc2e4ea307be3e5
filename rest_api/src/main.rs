use anyhow::Context;
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;

use backend_api::load_backend_config;
use rest_api::config::load_rest_api_config;
use rest_api::start_server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let rest_config = load_rest_api_config().context("Failed to load admin API configuration")?;
    let backend = load_backend_config(None).context("Failed to load backend configuration")?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(());
        }
    });

    start_server(&rest_config.host, rest_config.port, shutdown_rx, backend).await
}
