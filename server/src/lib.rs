use axum::extract::{Query, State};
use axum::http::{header, HeaderName, Method, StatusCode};
use axum::{routing::get, Json, Router};
use search_core::search::{search, SearchError, SearchResults};
use search_core::store::SledStore;
use search_core::parse_page_number;
use search_core::tokenizer::normalize_query;
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub const DEFAULT_PAGE_SIZE: usize = 50;

#[derive(Deserialize)]
pub struct SearchParams {
    /// Raw query text
    #[serde(default)]
    pub s: String,
    /// 1-based page number, kept raw so bad input falls back to page 1
    pub p: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SledStore>,
    pub page_size: usize,
}

/// Builds the router with CORS origins from `CORS_ALLOW_ORIGIN`.
pub fn build_app(store: Arc<SledStore>) -> Router {
    build_app_with_origins(store, std::env::var("CORS_ALLOW_ORIGIN").ok().as_deref())
}

/// `allow_origin` is a comma-separated origin list; `None` or a list with
/// no valid origin allows any origin.
pub fn build_app_with_origins(store: Arc<SledStore>, allow_origin: Option<&str>) -> Router {
    let page_size = store.page_size().max(1);
    let app_state = AppState { store, page_size };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .with_state(app_state)
        .layer(cors_layer(allow_origin))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(allow_origin: Option<&str>) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::ACCEPT,
            HeaderName::from_static("token"),
        ]);
    let origins: Vec<_> = allow_origin
        .map(|val| val.split(',').filter_map(|s| s.trim().parse().ok()).collect())
        .unwrap_or_default();
    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults>, (StatusCode, String)> {
    let terms = normalize_query(&params.s);
    let page_number = parse_page_number(params.p.as_deref());

    match search(state.store.as_ref(), state.store.as_ref(), &terms, page_number, state.page_size) {
        Ok(results) => Ok(Json(results)),
        Err(err @ SearchError::Metadata(_)) => {
            tracing::error!(error = ?err, "metadata resolution failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Error getting metadata".into()))
        }
        Err(err @ SearchError::Rank(_)) => {
            tracing::error!(error = %err, "ranking failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Error ranking results".into()))
        }
    }
}
