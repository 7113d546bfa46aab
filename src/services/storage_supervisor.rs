use std::{future::Future, sync::Arc, time::Duration};

use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    dao::{game_store::GameStore, storage::StorageError},
    state::SharedState,
};

const INITIAL_DELAY: Duration = Duration::from_millis(1_000);
const MAX_DELAY: Duration = Duration::from_secs(10);
const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(5);
const MAX_RECONNECT_ATTEMPTS: u32 = 3;

/// Connect to the storage backend and keep the shared state degraded while it is unavailable.
///
/// A healthy store is polled every few seconds. When a poll fails the store gets a few
/// in-place reconnect attempts; once those are exhausted it is dropped and `connect`
/// is called again with exponential backoff.
pub async fn run<F, Fut>(state: SharedState, mut connect: F)
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Arc<dyn GameStore>, StorageError>> + Send,
{
    let mut delay = INITIAL_DELAY;

    loop {
        let store = match connect().await {
            Ok(store) => store,
            Err(err) => {
                warn!(error = %err, "storage connection attempt failed");
                sleep(delay).await;
                delay = (delay * 2).min(MAX_DELAY);
                continue;
            }
        };

        state.set_game_store(store.clone()).await;
        info!("storage connection established; leaving degraded mode");
        delay = INITIAL_DELAY;

        supervise(&state, store.as_ref()).await;

        warn!("exhausted storage reconnect attempts; dropping store");
        state.clear_game_store().await;
        sleep(delay).await;
        delay = (delay * 2).min(MAX_DELAY);
    }
}

/// Poll `store` until it fails and cannot be revived in place.
async fn supervise(state: &SharedState, store: &dyn GameStore) {
    loop {
        match store.health_check().await {
            Ok(()) => {
                if state.is_degraded() {
                    info!("storage healthy again; leaving degraded mode");
                    state.update_degraded(false);
                }
                sleep(HEALTH_POLL_INTERVAL).await;
            }
            Err(err) => {
                warn!(error = %err, "storage health check failed; entering degraded mode");
                state.update_degraded(true);
                if !reconnect(store).await {
                    return;
                }
                info!("storage reconnection succeeded after health check failure");
                state.update_degraded(false);
                sleep(HEALTH_POLL_INTERVAL).await;
            }
        }
    }
}

async fn reconnect(store: &dyn GameStore) -> bool {
    let mut reconnect_delay = INITIAL_DELAY;

    for attempt in 0..MAX_RECONNECT_ATTEMPTS {
        match store.try_reconnect().await {
            Ok(()) => return true,
            Err(err) => {
                warn!(attempt, error = %err, "storage reconnect attempt failed");
                sleep(reconnect_delay).await;
                reconnect_delay = (reconnect_delay * 2).min(MAX_DELAY);
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        dao::game_store::memory::MemoryGameStore,
        services::mailer::LogMailer,
        state::AppState,
    };

    #[tokio::test]
    async fn installs_store_once_connected() {
        let (state, _worker) = AppState::new(AppConfig::default(), Arc::new(LogMailer));
        let mut watcher = state.degraded_watcher();

        let handle = tokio::spawn(run(state.clone(), || async {
            Ok(Arc::new(MemoryGameStore::new()) as Arc<dyn GameStore>)
        }));

        tokio::time::timeout(Duration::from_secs(1), watcher.wait_for(|degraded| !degraded))
            .await
            .expect("store installed in time")
            .unwrap();
        handle.abort();

        assert!(state.game_store().await.is_some());
    }
}
