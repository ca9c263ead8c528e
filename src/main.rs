//! Problems store - read-only problem catalog over HTTP

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

use problems_store::{catalog, config::Args, logging, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    logging::init(&args.log_level, args.log_format);

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  Problems Store");
    info!("======================================");
    info!("Node ID: {}", args.node_id);
    info!("Listen: {}", args.listen);
    info!("Problems file: {}", args.problems_file.display());
    info!("Request timeout: {} ms", args.request_timeout_ms);
    info!("======================================");

    // The catalog must be fully loaded before the listener is bound
    let catalog = match catalog::load_catalog(&args.problems_file) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("Problem catalog failed to load: {}", e);
            std::process::exit(1);
        }
    };

    let state = Arc::new(server::AppState::new(args, catalog));

    if let Err(e) = server::run(state).await {
        error!("Server error: {:?}", e);
        std::process::exit(1);
    }

    Ok(())
}
