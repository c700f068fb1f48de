use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::{HeaderMap, StatusCode}, routing::{get, post}, Json, Router};
use mixdex_core::corpus::load_corpus;
use mixdex_core::persist::{load_generation, IndexPaths};
use mixdex_core::{DocId, IndexGeneration, IndexHandle, SearchConfig, SearchError, TrackScore};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { 10 }

#[derive(Deserialize)]
pub struct TrackParams {
    #[serde(default)]
    pub q: String,
    /// Playlists folded into the track ranking
    pub k: Option<usize>,
    /// Tracks returned
    pub m: Option<usize>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub external_id: String,
    pub score: f64,
    pub name: String,
}

#[derive(Serialize)]
pub struct TrackResponse {
    pub query: String,
    pub took_s: f64,
    pub results: Vec<TrackScore>,
}

/// Where the server gets its documents from.
#[derive(Clone, Debug, Default)]
pub struct IndexSource {
    /// Directory written by `indexer build`
    pub index_dir: Option<PathBuf>,
    /// Raw playlist JSON/JSONL to build from
    pub corpus: Option<PathBuf>,
}

#[derive(Clone)]
pub struct AppState {
    pub handle: Arc<IndexHandle>,
    pub source: IndexSource,
    pub config: SearchConfig,
    pub admin_token: Option<String>,
}

impl AppState {
    /// State with no generation installed yet. A persisted index, when
    /// configured, is loaded here; corpus builds are left to [`rebuild`].
    pub fn new(source: IndexSource, config: SearchConfig) -> Result<Self> {
        let handle = match &source.index_dir {
            Some(dir) if source.corpus.is_none() => IndexHandle::with_generation(load_generation(&IndexPaths::new(dir))?),
            _ => IndexHandle::new(),
        };
        let admin_token = std::env::var("ADMIN_TOKEN").ok();
        Ok(Self { handle: Arc::new(handle), source, config, admin_token })
    }
}

/// Build a fresh generation from the configured source off the async
/// runtime and swap it in. Queries keep hitting the previous generation
/// until the swap.
pub async fn rebuild(state: &AppState) -> Result<u32> {
    let source = state.source.clone();
    let config = state.config.clone();
    let generation = tokio::task::spawn_blocking(move || -> Result<IndexGeneration> {
        if let Some(corpus) = &source.corpus {
            return Ok(IndexGeneration::build(load_corpus(corpus)?, config));
        }
        if let Some(dir) = &source.index_dir {
            return load_generation(&IndexPaths::new(dir));
        }
        anyhow::bail!("no corpus or index directory configured")
    })
    .await??;
    let num_docs = generation.num_docs();
    state.handle.replace(generation);
    Ok(num_docs)
}

pub fn build_app(state: AppState) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(health_handler))
        .route("/search", get(search_handler))
        .route("/tracks", get(tracks_handler))
        .route("/playlist/:doc_id", get(playlist_handler))
        .route("/index/reload", post(reload_handler))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

fn current(state: &AppState) -> Result<Arc<IndexGeneration>, (StatusCode, String)> {
    state.handle.current().map_err(|e| match e {
        SearchError::NotReady => (StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
        other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    })
}

async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let num_docs = state.handle.current().map(|g| g.num_docs()).ok();
    Json(serde_json::json!({ "status": "ok", "ready": num_docs.is_some(), "num_docs": num_docs }))
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> ApiResult<SearchResponse> {
    let start = std::time::Instant::now();
    let generation = current(&state)?;
    let hits = generation.search(&params.q);
    let total_hits = hits.len();
    let k = params.k.max(1).min(100);

    let mut results = Vec::with_capacity(k.min(total_hits));
    for hit in hits.into_iter().take(k) {
        let Some(doc) = generation.document(hit.doc_id) else {
            tracing::warn!(doc_id = hit.doc_id, "scored document missing from store, skipping");
            continue;
        };
        results.push(SearchHit { doc_id: hit.doc_id, external_id: doc.external_id.clone(), score: hit.score, name: doc.name.clone() });
    }

    let elapsed = start.elapsed();
    Ok(Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits, results }))
}

pub async fn tracks_handler(State(state): State<AppState>, Query(params): Query<TrackParams>) -> ApiResult<TrackResponse> {
    let start = std::time::Instant::now();
    let generation = current(&state)?;
    let k = params.k.unwrap_or(state.config.top_playlists).max(1);
    let m = params.m.unwrap_or(state.config.top_tracks).max(1).min(100);
    let results = generation.top_tracks_with(&params.q, k, m);
    let elapsed = start.elapsed();
    Ok(Json(TrackResponse { query: params.q, took_s: elapsed.as_secs_f64(), results }))
}

pub async fn playlist_handler(State(state): State<AppState>, Path(doc_id): Path<DocId>) -> ApiResult<serde_json::Value> {
    let generation = current(&state)?;
    match generation.document(doc_id) {
        Some(doc) => Ok(Json(serde_json::to_value(doc).map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?)),
        None => Err((StatusCode::NOT_FOUND, format!("playlist {doc_id} not found"))),
    }
}

// --- Admin endpoints ---
async fn reload_handler(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<serde_json::Value> {
    authorize(&state, &headers)?;
    let num_docs = rebuild(&state).await.map_err(|e| {
        tracing::error!(error = %e, "reindex failed");
        (StatusCode::INTERNAL_SERVER_ERROR, format!("reindex failed: {e}"))
    })?;
    Ok(Json(serde_json::json!({ "num_docs": num_docs })))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
