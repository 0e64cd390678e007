use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;

mod config;
mod continent;
mod handler;
mod http;
mod logger;
mod server;

/// Config file looked up when no path is given (extension resolved by the `config` crate)
const DEFAULT_CONFIG_PATH: &str = "config";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Tokio runtime sized by the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        logger::log_info(&format!("Using {workers} worker threads"));
    } else {
        logger::log_info("Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr, cfg.performance.backlog)?;

    // Continent table is built here, before the first connection is accepted
    let state = Arc::new(config::AppState::new(&cfg));
    let active_connections = Arc::new(AtomicUsize::new(0));

    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals))?;

    logger::log_server_start(&addr, &cfg, &state.continents);

    let drain_timeout = Duration::from_secs(cfg.performance.write_timeout);
    let remaining = server::start_server_loop(
        listener,
        state,
        active_connections,
        Arc::clone(&signals.shutdown),
        drain_timeout,
    )
    .await;

    if remaining > 0 {
        logger::log_warning(&format!(
            "{remaining} connection(s) still open after {}s, closing",
            drain_timeout.as_secs()
        ));
    }
    logger::log_shutdown_complete();
    Ok(())
}
