use std::sync::Arc;

use notes_server::config::{AppState, Config};
use notes_server::{logger, server, store};

/// Config file consulted when no path is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is not an error
    dotenvy::dotenv().ok();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let cfg = Config::load_from(&config_path)?;

    logger::init(&cfg)?;

    // Create the Tokio runtime, sizing it from the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    let note_store = store::open(&cfg.store).await?;
    let backend = note_store.backend();

    let listener = server::create_listener(addr)?;
    logger::log_server_start(&addr, &cfg, backend);

    let state = Arc::new(AppState::new(cfg, Arc::clone(&note_store)));
    server::run(listener, state, server::shutdown_signal()).await;

    note_store.close().await;

    Ok(())
}
