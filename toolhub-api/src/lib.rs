//! toolhub-api library - AI tools directory content service
//!
//! Public read API for tools, demos, blog posts, news and authors, with
//! token-authenticated staff writes. Uploaded media is served from the
//! root folder's `media/` directory.

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use toolhub_common::config::{ServiceConfig, MEDIA_DIR};
use toolhub_common::LocalMediaStorage;
use tracing::warn;

pub mod api;
pub mod error;
pub mod extract;
pub mod pagination;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Effective service configuration
    pub config: Arc<ServiceConfig>,
    /// Storage used to resolve uploaded media references
    pub storage: Arc<LocalMediaStorage>,
}

impl AppState {
    /// Create state; media lives in `<root_folder>/media`
    pub fn new(db: SqlitePool, config: ServiceConfig) -> Self {
        let storage = LocalMediaStorage::new(config.root_folder.join(MEDIA_DIR), &config.media_url);
        Self {
            db,
            config: Arc::new(config),
            storage: Arc::new(storage),
        }
    }
}

/// Build application router
///
/// `/health` and `/media/*` are plain routes; everything under `/api` runs
/// through the session middleware, which attaches the caller (if any).
pub fn build_router(state: AppState) -> Router {
    let media_mount = format!("/{}", state.storage.url_prefix().trim_matches('/'));
    let media = ServeDir::new(state.storage.root());

    let router = Router::new()
        .merge(api::api_routes(state.clone()))
        .merge(api::health_routes());

    let router = if media_mount == "/" {
        router.fallback_service(media)
    } else {
        router.nest_service(&media_mount, media)
    };

    router
        .layer(cors_layer(&state.config.cors_allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Any origin when none are configured, else the configured list
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}
