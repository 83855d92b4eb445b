mod app;
mod config;
mod db;
mod errors;
mod external;
mod logging;
mod models;
mod money;
mod routes;
mod services;
mod session;
mod state;
#[cfg(test)]
mod test_support;

use tokio::net::TcpListener;
use crate::config::AppConfig;
use crate::logging::LoggingConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    logging::init_logging(LoggingConfig::from_env())?;

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Invalid configuration: {}", e);
        e
    })?;

    let pool = db::connect(&config.database_url, 5).await?;
    let provider = external::provider_from_config(&config);
    let state = AppState::new(pool, provider, &config);
    let app = app::create_app(state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("papertrade running at http://{}/", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
