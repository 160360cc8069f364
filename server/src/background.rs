//! Background task loops: timed limit expiry sweep.

use std::time::Duration;

use access_db::WriteReceipt;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::app::SharedState;

async fn sleep_or_cancel(token: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        _ = token.cancelled() => true,
        _ = sleep(duration) => false,
    }
}

/// Periodically move timed limits past their expiry to `expired`.
pub async fn timed_limit_sweep_loop(state: SharedState) {
    let shutdown_token = state.shutdown_token().clone();
    let interval = state.config().await.sweep_interval_secs;
    if interval == 0 {
        tracing::info!("Timed limit sweep disabled");
        return;
    }

    loop {
        if sleep_or_cancel(&shutdown_token, Duration::from_secs(interval)).await {
            tracing::info!("Timed limit sweep loop stopped (shutdown)");
            return;
        }
        // Fire-and-forget; failures are logged by the write worker.
        drop(sweep_once(&state));
    }
}

/// Queue one expiry pass at the current time.
pub fn sweep_once(state: &SharedState) -> WriteReceipt {
    let now = chrono::Utc::now().timestamp();
    tracing::debug!(now, "Sweeping expired timed limits");
    state.stores().timed_limit.expire_due(now)
}

#[cfg(test)]
mod tests {
    use access_db::{NewTimedLimit, Stores, TimedLimitStatus};

    use super::*;
    use crate::config::AppConfig;

    #[tokio::test]
    async fn sweep_expires_only_past_rows() {
        let dir = tempfile::tempdir().unwrap();
        let stores = Stores::open(dir.path()).unwrap();
        let state = SharedState::new(stores, AppConfig::default());
        let limits = &state.stores().timed_limit;

        let now = chrono::Utc::now().timestamp();
        limits.create(&NewTimedLimit::active(1, 1, 10, now - 60));
        limits.create(&NewTimedLimit::active(1, 2, 20, now + 3600));
        limits.store().flush().unwrap();

        let changed = sweep_once(&state).wait().unwrap();
        assert_eq!(changed, 1);

        let rows = limits.list_by_owner(1).unwrap();
        assert_eq!(rows[0].status, TimedLimitStatus::Expired);
        assert_eq!(rows[1].status, TimedLimitStatus::Active);
    }

    #[tokio::test]
    async fn zero_interval_returns_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let stores = Stores::open(dir.path()).unwrap();
        let config = AppConfig {
            sweep_interval_secs: 0,
            ..AppConfig::default()
        };
        let state = SharedState::new(stores, config);

        tokio::time::timeout(Duration::from_secs(1), timed_limit_sweep_loop(state))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn loop_stops_on_cancel() {
        let dir = tempfile::tempdir().unwrap();
        let stores = Stores::open(dir.path()).unwrap();
        let state = SharedState::new(stores, AppConfig::default());

        let handle = tokio::spawn(timed_limit_sweep_loop(state.clone()));
        state.shutdown_token().cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
