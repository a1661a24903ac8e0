//! Rate Clock - a stopwatch that turns tracked time into earnings
//! 
//! This is the main entry point for the rate-clock daemon.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use rate_clock::{
    api::create_router,
    config::Config,
    state::AppState,
    tasks::lifecycle_task,
    utils::{shutdown_signal, SystemClock},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(config.log_filter())
        .init();

    info!("Starting rate-clock v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, rate={}",
          config.host, config.port, config.rate);

    // Create the tracker; the ticker is spawned on start
    let state = AppState::new(config.port, config.host.clone(), &config.rate, Arc::new(SystemClock));

    // Forward host lifecycle signals to the tracker
    let lifecycle_state = Arc::clone(&state);
    tokio::spawn(async move {
        lifecycle_task(lifecycle_state).await;
    });

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start, /stop, /toggle   - Control the timer");
    info!("  POST /background, /foreground - Host lifecycle events");
    info!("  GET  /elapsed/edit            - Prefill the edit form");
    info!("  PUT  /elapsed                 - Set elapsed time (stopped only)");
    info!("  POST /reset                   - Reset to zero (stopped, confirmed)");
    info!("  PUT  /rate, POST /rate/commit - Hourly rate field");
    info!("  GET  /status                  - Current time and earnings");
    info!("  GET  /health                  - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.shutdown();
    info!("Server shutdown complete");
    Ok(())
}
