//! Hangman Back binary entrypoint wiring the REST API, storage supervisor and background jobs.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::{Context, bail};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hangman_back::{
    config::AppConfig,
    dao::{
        game_store::{GameStore, memory::MemoryGameStore},
        storage::StorageError,
    },
    routes,
    services::{
        mailer::{LogMailer, Mailer},
        scheduler, storage_supervisor,
    },
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let backend = StoreBackend::from_env()?;
    let reminder_schedule = if config.reminder.enabled {
        Some(scheduler::parse_schedule(&config.reminder.schedule)?)
    } else {
        None
    };

    let mailer = build_mailer(&config);
    let (app_state, task_worker) = AppState::new(config, mailer);

    tokio::spawn(task_worker.run(app_state.clone()));
    spawn_storage_supervisor(app_state.clone(), backend);
    if let Some(schedule) = reminder_schedule {
        info!(
            schedule = %app_state.config().reminder.schedule,
            "reminder job scheduled"
        );
        tokio::spawn(scheduler::run_reminders(app_state.clone(), schedule));
    }

    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, ?backend, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Storage backend selected with `STORE_BACKEND`.
#[derive(Debug, Clone, Copy)]
enum StoreBackend {
    #[cfg(feature = "mongo-store")]
    Mongo,
    #[cfg(feature = "couch-store")]
    Couch,
    Memory,
}

impl StoreBackend {
    fn from_env() -> anyhow::Result<Self> {
        let value = env::var("STORE_BACKEND").unwrap_or_else(|_| "mongo".into());
        match value.to_ascii_lowercase().as_str() {
            #[cfg(feature = "mongo-store")]
            "mongo" | "mongodb" => Ok(Self::Mongo),
            #[cfg(feature = "couch-store")]
            "couch" | "couchdb" => Ok(Self::Couch),
            "memory" => Ok(Self::Memory),
            other => bail!("unsupported STORE_BACKEND `{other}` for this build"),
        }
    }
}

/// Run the storage supervisor with a connector for the selected backend.
fn spawn_storage_supervisor(state: SharedState, backend: StoreBackend) {
    match backend {
        #[cfg(feature = "mongo-store")]
        StoreBackend::Mongo => {
            use hangman_back::dao::game_store::mongodb::{MongoConfig, MongoGameStore};

            tokio::spawn(storage_supervisor::run(state, || async {
                let config = MongoConfig::from_env().await?;
                let store = MongoGameStore::connect(config).await?;
                Ok::<_, StorageError>(Arc::new(store) as Arc<dyn GameStore>)
            }));
        }
        #[cfg(feature = "couch-store")]
        StoreBackend::Couch => {
            use hangman_back::dao::game_store::couchdb::{CouchConfig, CouchGameStore};

            tokio::spawn(storage_supervisor::run(state, || async {
                let config = CouchConfig::from_env()?;
                let store = CouchGameStore::connect(config).await?;
                Ok::<_, StorageError>(Arc::new(store) as Arc<dyn GameStore>)
            }));
        }
        StoreBackend::Memory => {
            let store = MemoryGameStore::new();
            tokio::spawn(storage_supervisor::run(state, move || {
                let store = store.clone();
                async move { Ok::<_, StorageError>(Arc::new(store) as Arc<dyn GameStore>) }
            }));
        }
    }
}

/// Relay mails over HTTP when a relay is configured, log them otherwise.
fn build_mailer(config: &AppConfig) -> Arc<dyn Mailer> {
    match &config.mail.relay_url {
        #[cfg(feature = "http-mailer")]
        Some(url) => {
            info!(relay_url = %url, "relaying reminder mails over HTTP");
            Arc::new(hangman_back::services::mailer::HttpMailer::new(url.clone()))
        }
        #[cfg(not(feature = "http-mailer"))]
        Some(_) => {
            tracing::warn!("mail relay configured but http-mailer feature disabled; logging mails");
            Arc::new(LogMailer)
        }
        None => Arc::new(LogMailer),
    }
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
