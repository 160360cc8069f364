//! Access backend server binary.
//!
//! Sets up the stores, fetches remote configuration, starts the expiry
//! sweeper and the axum web server, then waits for Ctrl+C.

use tracing_subscriber::EnvFilter;

use access_server_lib::app::SharedState;
use access_server_lib::background;
use access_server_lib::server;
use access_server_lib::shutdown;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Step 1: Tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting access server");

    // Steps 2-3: Config and stores (schema + write workers)
    let (stores, config) = access_server_lib::init_foundation()?;
    let state = SharedState::new(stores, config);

    // Step 4: Remote configuration
    access_server_lib::load_remote_config(&state).await;

    // Step 5: Timed limit expiry sweep
    let s = state.clone();
    tokio::spawn(async move { background::timed_limit_sweep_loop(s).await });

    // Step 6: Web server
    let server_state = state.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server::start_server(server_state).await {
            tracing::error!("Server failed: {e}");
        }
    });

    tracing::info!(
        port = state.server_port(),
        "Access server running. Press Ctrl+C to stop."
    );

    tokio::signal::ctrl_c().await?;
    shutdown::graceful_shutdown(&state).await;

    if let Err(e) = server_handle.await {
        tracing::warn!("Server task ended abnormally: {e}");
    }
    Ok(())
}
