/// Hangman game and move evaluator.
pub mod game;
/// Registered players.
pub mod user;

use std::sync::Arc;

use tokio::sync::{RwLock, watch};

use crate::{
    config::AppConfig,
    dao::game_store::GameStore,
    error::ServiceError,
    services::{
        mailer::Mailer,
        task_queue::{Task, TaskQueue, TaskWorker},
    },
};

/// State shared by handlers and background tasks.
pub type SharedState = Arc<AppState>;

/// Central application state holding the storage handle and background collaborators.
pub struct AppState {
    config: AppConfig,
    game_store: RwLock<Option<Arc<dyn GameStore>>>,
    degraded: watch::Sender<bool>,
    mailer: Arc<dyn Mailer>,
    tasks: TaskQueue,
    average_attempts: RwLock<Option<f64>>,
}

impl AppState {
    /// Construct the shared state together with the worker draining its task queue.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    /// The returned [`TaskWorker`] must be spawned for enqueued tasks to run.
    pub fn new(config: AppConfig, mailer: Arc<dyn Mailer>) -> (SharedState, TaskWorker) {
        let (degraded_tx, _rx) = watch::channel(true);
        let (tasks, worker) = TaskQueue::channel();
        let state = Arc::new(Self {
            config,
            game_store: RwLock::new(None),
            degraded: degraded_tx,
            mailer,
            tasks,
            average_attempts: RwLock::new(None),
        });
        (state, worker)
    }

    /// Loaded configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Mail delivery backend.
    pub fn mailer(&self) -> &Arc<dyn Mailer> {
        &self.mailer
    }

    /// Queue a background task without waiting for it.
    pub fn enqueue(&self, task: Task) {
        self.tasks.enqueue(task);
    }

    /// Obtain a handle to the current game store, if one is installed.
    pub async fn game_store(&self) -> Option<Arc<dyn GameStore>> {
        let guard = self.game_store.read().await;
        guard.as_ref().cloned()
    }

    /// Game store handle, or [`ServiceError::Degraded`] while running without storage.
    pub async fn require_game_store(&self) -> Result<Arc<dyn GameStore>, ServiceError> {
        if self.is_degraded() {
            return Err(ServiceError::Degraded);
        }
        self.game_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new game store implementation and leave degraded mode.
    pub async fn set_game_store(&self, store: Arc<dyn GameStore>) {
        {
            let mut guard = self.game_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current game store and enter degraded mode.
    pub async fn clear_game_store(&self) {
        {
            let mut guard = self.game_store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        });
    }

    /// Last cached average of attempts remaining across active games.
    pub async fn average_attempts(&self) -> Option<f64> {
        *self.average_attempts.read().await
    }

    /// Overwrite the cached average.
    pub async fn set_average_attempts(&self, average: f64) {
        *self.average_attempts.write().await = Some(average);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dao::game_store::memory::MemoryGameStore, services::mailer::LogMailer};

    fn state() -> SharedState {
        AppState::new(AppConfig::default(), Arc::new(LogMailer)).0
    }

    #[tokio::test]
    async fn starts_degraded_until_store_installed() {
        let state = state();
        assert!(state.is_degraded());
        assert!(matches!(
            state.require_game_store().await,
            Err(ServiceError::Degraded)
        ));

        state
            .set_game_store(Arc::new(MemoryGameStore::new()))
            .await;
        assert!(!state.is_degraded());
        assert!(state.require_game_store().await.is_ok());
    }

    #[tokio::test]
    async fn clearing_store_notifies_watchers() {
        let state = state();
        state
            .set_game_store(Arc::new(MemoryGameStore::new()))
            .await;
        let mut watcher = state.degraded_watcher();

        state.clear_game_store().await;

        assert!(watcher.has_changed().unwrap());
        assert!(*watcher.borrow_and_update());
    }
}
