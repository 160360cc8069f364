use access_db::Stores;

use crate::app::SharedState;
use crate::config::{AppConfig, remote};

/// Load config and set up every store (fatal on error).
pub fn init_foundation() -> Result<(Stores, AppConfig), anyhow::Error> {
    load_dotenv();
    let config = AppConfig::load();

    tracing::info!("Opening stores in {}", config.data_dir.display());
    let stores = Stores::open(&config.data_dir)?;

    tracing::info!("Settings loaded (port={})", config.server_port);
    Ok((stores, config))
}

/// Fetch the remote settings map into shared state (non-fatal).
pub async fn load_remote_config(state: &SharedState) {
    let (url, timeout) = {
        let config = state.config().await;
        (config.overlord_url.clone(), config.overlord_timeout())
    };
    let settings = remote::fetch_remote_config(&url, timeout).await;
    tracing::info!("Remote config loaded ({} keys)", settings.len());
    state.set_remote_config(settings).await;
}

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env", "../../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}
