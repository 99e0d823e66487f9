use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use mamamia_site::config::Config;
use mamamia_site::{router, AppState};
use tracing_subscriber::fmt::time::ChronoLocal;

#[derive(Parser)]
#[command(version, about = "Serves the MaMaMia Pizza site")]
struct Cli {
    /// Address to listen on, overriding BIND_ADDRESS
    #[arg(long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env().context("Failed to load application configuration")?;
    if let Some(bind) = cli.bind {
        config = config.with_bind_address(bind);
    }

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(ChronoLocal::rfc_3339())
        .init();

    if !config.widget.has_public_key() {
        tracing::warn!("VAPI_PUBLIC_KEY is not set; voice ordering is disabled");
    }

    let state = AppState::new(config.widget.clone(), config.voice.clone())
        .context("Failed to compile page templates")?;
    let app = router(state);

    tracing::info!("Starting MaMaMia Pizza site, listening on {}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
