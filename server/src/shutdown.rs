use crate::app::SharedState;

pub async fn graceful_shutdown(state: &SharedState) {
    tracing::info!("Shutdown sequence started");

    state.shutdown_token().cancel();
    tracing::info!("Shutdown: background loops and server cancelled");

    let stores = state.stores().clone();
    match tokio::task::spawn_blocking(move || stores.flush_all()).await {
        Ok(Ok(())) => tracing::info!("Shutdown: write queues drained"),
        Ok(Err(e)) => tracing::warn!("Shutdown: failed to drain write queues: {e}"),
        Err(e) => tracing::warn!("Shutdown: drain task panicked: {e}"),
    }

    tracing::info!("Shutdown sequence completed");
}
