#![forbid(unsafe_code)]

use crate::assets;
use crate::config::ServerConfig;
use crate::demo;
use crate::error::ApiError;
use crate::handlers::{debug, delete, ingest, listing, tail};
use axum::Router;
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::routing::get;
use lt_storage::{LogStore, StoreError};
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Router state. The store is the only state shared between requests.
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<LogStore>>,
    debug_routes: bool,
}

impl AppState {
    pub fn new(store: LogStore, debug_routes: bool) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            debug_routes,
        }
    }

    /// Runs `f` against the store on the blocking pool. `op` names the
    /// operation in logs and in the 500 body.
    pub(crate) async fn with_store<T, F>(&self, op: &'static str, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut LogStore) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let joined = tokio::task::spawn_blocking(move || {
            let mut guard = store.lock().unwrap_or_else(PoisonError::into_inner);
            f(&mut guard)
        })
        .await;

        match joined {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                tracing::error!(op, code = err.code(), error = %err, "store operation failed");
                Err(ApiError::Internal(op))
            }
            Err(err) => {
                tracing::error!(op, error = %err, "store task did not complete");
                Err(ApiError::Internal(op))
            }
        }
    }

    /// Hands the store back once every clone of the state is gone.
    pub fn into_store(self) -> Option<LogStore> {
        Arc::try_unwrap(self.store)
            .ok()
            .map(|mutex| mutex.into_inner().unwrap_or_else(PoisonError::into_inner))
    }
}

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/index.js", get(assets::index_js))
        .route("/style.css", get(assets::style_css))
        .route(
            "/logs",
            get(listing::list_commits).delete(delete::delete_unscoped),
        )
        .route(
            "/logs/{commit}",
            get(listing::list_players).delete(delete::delete_commit),
        )
        .route(
            "/logs/{commit}/{player}",
            get(tail::log_page)
                .post(ingest::ingest)
                .delete(delete::delete_player),
        )
        .route("/logs/{commit}/{player}/new", get(tail::new_logs));

    if state.debug_routes {
        router = router
            .route("/debug", get(debug::dump))
            .route("/logs/{commit}/{player}/fill", get(debug::fill))
            .route("/logs/{commit}/{player}/{msg}", get(debug::ingest_from_path));
    }

    router
        .fallback(not_found)
        .layer(cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Game clients and dashboards on other origins post and read logs directly.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> Redirect {
    Redirect::to("/logs")
}

async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}

/// Opens the store, serves until `shutdown` resolves, drains in-flight
/// requests and closes the store.
pub async fn serve(
    config: ServerConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let mut store = LogStore::open(config.store.clone())?;
    if config.seed_demo {
        let entries = demo::demo_entries(demo::SEED_ROWS);
        let inserted = store.append_batch(&entries)?;
        tracing::info!(rows = inserted, "seeded demo logs");
    }

    let state = AppState::new(store, config.debug_routes);
    let app = build_router(state.clone());
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        store = %config.store,
        debug_routes = config.debug_routes,
        "starting http server"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    match state.into_store() {
        Some(store) => store.close()?,
        None => tracing::warn!("store still referenced after shutdown; dropping without close"),
    }
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown requested");
}
