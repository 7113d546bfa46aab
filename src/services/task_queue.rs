//! In-process queue for work deferred out of the request path.

use std::time::Duration;

use tokio::{sync::mpsc, time::sleep};
use tracing::{debug, warn};

use crate::{error::ServiceError, services::stats_service, state::SharedState};

/// Deferred work items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Recompute the cached average of attempts remaining.
    CacheAverageAttempts,
}

struct RetryPolicy;

impl RetryPolicy {
    const MAX_ATTEMPTS: u32 = 5;
    const INITIAL_DELAY: Duration = Duration::from_millis(250);
    const MAX_DELAY: Duration = Duration::from_secs(5);
}

/// Sending half of the queue, owned by the shared state.
#[derive(Clone)]
pub struct TaskQueue {
    tx: mpsc::UnboundedSender<Task>,
}

/// Receiving half of the queue; runs tasks one at a time.
pub struct TaskWorker {
    rx: mpsc::UnboundedReceiver<Task>,
}

impl TaskQueue {
    /// Create a connected queue and worker.
    pub fn channel() -> (TaskQueue, TaskWorker) {
        let (tx, rx) = mpsc::unbounded_channel();
        (TaskQueue { tx }, TaskWorker { rx })
    }

    /// Queue `task`; never blocks.
    pub fn enqueue(&self, task: Task) {
        if self.tx.send(task).is_err() {
            warn!(?task, "task worker stopped; dropping task");
        }
    }
}

impl TaskWorker {
    /// Drain the queue until every sender is dropped.
    pub async fn run(mut self, state: SharedState) {
        while let Some(task) = self.rx.recv().await {
            run_with_retry(&state, task).await;
        }
        debug!("task queue closed; worker exiting");
    }
}

async fn run_with_retry(state: &SharedState, task: Task) {
    let mut delay = RetryPolicy::INITIAL_DELAY;

    for attempt in 1..=RetryPolicy::MAX_ATTEMPTS {
        match execute(state, task).await {
            Ok(()) => {
                debug!(?task, attempt, "task completed");
                return;
            }
            Err(err) if attempt < RetryPolicy::MAX_ATTEMPTS => {
                debug!(?task, attempt, error = %err, "task failed; retrying");
                sleep(delay).await;
                delay = (delay * 2).min(RetryPolicy::MAX_DELAY);
            }
            Err(err) => {
                warn!(?task, attempt, error = %err, "task failed; giving up");
            }
        }
    }
}

async fn execute(state: &SharedState, task: Task) -> Result<(), ServiceError> {
    match task {
        Task::CacheAverageAttempts => stats_service::cache_average_attempts(state)
            .await
            .map(|_| ()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::{game_store::{GameStore, memory::MemoryGameStore}, models::GameEntity},
        services::mailer::LogMailer,
        state::{AppState, game::HangmanGame},
    };

    #[tokio::test]
    async fn worker_refreshes_average_cache() {
        let (state, worker) = AppState::new(AppConfig::default(), Arc::new(LogMailer));
        let store = MemoryGameStore::new();
        let game = HangmanGame::new(uuid::Uuid::new_v4(), "word", 3).unwrap();
        store.save_game(GameEntity::from(game)).await.unwrap();
        state.set_game_store(Arc::new(store)).await;

        state.enqueue(Task::CacheAverageAttempts);
        let handle = tokio::spawn(worker.run(state.clone()));

        let mut cached = None;
        for _ in 0..50 {
            cached = state.average_attempts().await;
            if cached.is_some() {
                break;
            }
            sleep(Duration::from_millis(10)).await;
        }
        handle.abort();

        assert_eq!(cached, Some(3.0));
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts_while_degraded() {
        let (state, _worker) = AppState::new(AppConfig::default(), Arc::new(LogMailer));

        run_with_retry(&state, Task::CacheAverageAttempts).await;

        assert_eq!(state.average_attempts().await, None);
    }
}
