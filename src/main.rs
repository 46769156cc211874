//! lastprice - Latest-Value Price Cache
//!
//! Entry point: loads config, initializes logging, and serves the batch
//! ingestion gateway.
//!
//! ```text
//! ┌──────────┐    ┌───────────────┐    ┌──────────────────┐
//! │ Gateway  │───▶│ PriceService  │───▶│ LatestValueStore │
//! │ (axum)   │    │ (batches)     │    │ (readers)        │
//! └──────────┘    └───────────────┘    └──────────────────┘
//! ```

use std::sync::Arc;

use lastprice::config::AppConfig;
use lastprice::gateway;
use lastprice::logging::init_logging;
use lastprice::service::PriceService;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let config = AppConfig::load(&env);
    let _guard = init_logging(&config);

    tracing::info!(env = %env, "lastprice starting");

    let service = Arc::new(PriceService::new(config.ingest.max_chunk_size));
    let port = get_port_override().unwrap_or(config.gateway.port);

    println!("⚙️  Env: {} | max chunk size: {}", env, config.ingest.max_chunk_size);

    gateway::run_server(&config.gateway.host, port, service).await
}
