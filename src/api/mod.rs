//! HTTP record API
//!
//! One read/write pair per table under `/api`, plus a health check. Every
//! other path falls through to the static page assets.

pub mod error;
pub mod handlers;

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

pub use error::ApiError;

use crate::persistence::{self, Store};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
}

impl AppState {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }
}

/// Run a store call on the blocking pool
pub(crate) async fn with_store<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Store) -> persistence::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(&state.store);
    Ok(tokio::task::spawn_blocking(move || f(&store)).await??)
}

/// Build the full application router
pub fn router(state: AppState, public_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route(
            "/api/hearts",
            get(handlers::get_hearts).post(handlers::set_hearts),
        )
        .route(
            "/api/timeline",
            get(handlers::get_timeline).post(handlers::add_timeline_event),
        )
        .route(
            "/api/cart",
            get(handlers::get_cart).post(handlers::add_cart_item),
        )
        .route("/api/highscore", post(handlers::add_high_score))
        .route("/api/highscores", get(handlers::get_high_scores))
        .route("/api/visit", post(handlers::record_visit))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/health", get(handlers::health))
        .fallback_service(ServeDir::new(public_dir.as_ref()))
        .layer(middleware::from_fn(log_requests))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    log::info!(
        "{} {} -> {} ({:.1} ms)",
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_secs_f64() * 1000.0
    );
    response
}
