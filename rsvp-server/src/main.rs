//! RSVP server - JSON API over the spreadsheet guest list.

mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use rsvp::io::config::{SheetCredentials, load_config, load_dotenv};
use rsvp::io::sheets::GoogleSheetsStore;
use rsvp::service::RsvpService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::state::AppState;

#[derive(Parser)]
#[command(name = "rsvp-server")]
#[command(about = "JSON API for fetching and submitting RSVPs stored in a spreadsheet")]
struct Args {
    /// Address to bind the server to
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value = "4500")]
    port: u16,

    /// Optional TOML file with ranges, timeouts and header names
    #[arg(long, env = "RSVP_CONFIG", default_value = "rsvp.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = load_dotenv();
    rsvp::logging::init();
    if let Some(path) = &dotenv {
        debug!(path = %path.display(), "loaded .env");
    }

    let args = Args::parse();

    let config = load_config(&args.config)?;
    let credentials = SheetCredentials::from_env()?;
    info!(
        sheet_id = %credentials.sheet_id,
        page = %credentials.page_name,
        read_range = %config.read_range,
        write_range = %config.write_range,
        "starting rsvp-server"
    );

    let store = GoogleSheetsStore::from_config(&credentials, &config)
        .context("initialise spreadsheet store")?;
    let state = AppState::new(RsvpService::new(Arc::new(store), &config));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::api_router()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
