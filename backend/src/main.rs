#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use landos_site::{booking::BookingApp, config::Config, mailer, AppState};
use tracing::{debug, info};
use tracing_subscriber::filter::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = dotenvy::dotenv() {
        debug!("No .env file loaded: {}", e);
    }

    let config = Config::from_env()?;

    info!("Starting server");

    let mailer = mailer::from_config(&config.mail).context("Building mail transport")?;
    let booker = BookingApp::new(mailer, &config.mail.sender);

    let app = landos_site::app(AppState::new(booker), &config.assets_dir);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    info!("Server running on http://localhost:{}", config.port);
    axum::serve(listener, app).await?;
    Ok(())
}
