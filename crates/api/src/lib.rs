use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::{Json, Query, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use globalbot_agents::{ChatInput, TravelAssistant};
use globalbot_catalog::{source_for, CatalogStore};
use globalbot_core::GREETING;
use globalbot_observability::{AppMetrics, MetricsSnapshot};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

const MAX_BODY_BYTES: usize = 16 * 1024;
const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEFAULT_ORIGINS: &[&str] = &["http://localhost:5173", "http://127.0.0.1:5173"];
const DEFAULT_SESSION_IDLE_SECS: i64 = 24 * 60 * 60;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 10 * 60;
const MAX_SESSION_IDLE_SECS: i64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind: String,
    pub catalog_path: Option<PathBuf>,
    pub allowed_origins: Vec<String>,
    pub session_idle_secs: i64,
    pub sweep_interval_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            catalog_path: None,
            allowed_origins: DEFAULT_ORIGINS.iter().map(ToString::to_string).collect(),
            session_idle_secs: DEFAULT_SESSION_IDLE_SECS,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            bind: env::var("GLOBALBOT_BIND").unwrap_or(defaults.bind),
            catalog_path: env::var("GLOBALBOT_CATALOG")
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .map(PathBuf::from),
            allowed_origins: env::var("GLOBALBOT_ALLOWED_ORIGINS")
                .ok()
                .map(|value| parse_origins(&value))
                .unwrap_or(defaults.allowed_origins),
            session_idle_secs: env::var("GLOBALBOT_SESSION_IDLE_SECS")
                .ok()
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(defaults.session_idle_secs),
            sweep_interval_secs: env::var("GLOBALBOT_SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(defaults.sweep_interval_secs),
        }
    }

    pub fn session_idle(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.session_idle_secs.clamp(0, MAX_SESSION_IDLE_SECS))
    }

    /// Never zero; `tokio::time::interval` rejects a zero period.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

#[derive(Clone)]
pub struct ApiState {
    pub assistant: Arc<TravelAssistant>,
    pub metrics: Arc<AppMetrics>,
    pub allowed_origins: Arc<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    metrics: MetricsSnapshot,
    catalog: CatalogHealth,
}

#[derive(Debug, Serialize)]
struct CatalogHealth {
    source: String,
    destinations: usize,
    skipped: usize,
    loaded_at: String,
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    text: String,
    session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SessionQuery {
    session_id: String,
}

#[derive(Debug, Deserialize)]
struct DestinationQuery {
    id: u32,
}

#[derive(Debug, Deserialize)]
struct DestinationsQuery {
    region: Option<String>,
}

#[derive(Debug, Serialize)]
struct PromptsResponse {
    greeting: &'static str,
    prompts: Vec<String>,
}

pub async fn build_app(config: &ApiConfig) -> Result<Router> {
    Ok(build_router(build_state(config)?))
}

pub fn build_state(config: &ApiConfig) -> Result<ApiState> {
    let metrics = AppMetrics::shared();
    let source = source_for(config.catalog_path.as_deref());
    let catalog = Arc::new(
        CatalogStore::from_source(source.as_ref())
            .with_context(|| format!("failed to load catalog from {}", source.describe()))?,
    );

    let state = ApiState {
        assistant: Arc::new(TravelAssistant::new(catalog, metrics.clone())),
        metrics,
        allowed_origins: Arc::new(config.allowed_origins.clone()),
    };

    Ok(state)
}

/// Periodically drops chat sessions that have been idle for `max_idle`.
pub fn spawn_session_sweeper(
    assistant: Arc<TravelAssistant>,
    every: Duration,
    max_idle: chrono::Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let purged = assistant.purge_idle(max_idle);
            if purged > 0 {
                info!(purged, "idle sessions purged");
            }
        }
    })
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/chat", post(chat))
        .route("/v1/session", get(session_transcript))
        .route("/v1/prompts", get(prompts))
        .route("/v1/destinations", get(destinations))
        .route("/v1/destination", get(destination))
        .route("/v1/regions", get(regions))
        .layer(build_cors_layer(&state.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let snapshot = state.assistant.catalog().snapshot();
    let payload = HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        metrics: state.metrics.snapshot(),
        catalog: CatalogHealth {
            source: snapshot.source.clone(),
            destinations: snapshot.destinations.len(),
            skipped: snapshot.skipped.len(),
            loaded_at: snapshot.loaded_at.to_rfc3339(),
        },
    };
    (StatusCode::OK, Json(payload))
}

async fn chat(State(state): State<ApiState>, Json(request): Json<ChatRequest>) -> Response {
    let input = ChatInput {
        session_id: request.session_id,
        text: request.text,
    };

    match state.assistant.handle_chat(input) {
        Some(reply) => (StatusCode::OK, Json(reply)).into_response(),
        None => error_response(
            StatusCode::BAD_REQUEST,
            "empty_message",
            "text must contain at least one non-whitespace character",
        ),
    }
}

async fn session_transcript(
    State(state): State<ApiState>,
    Query(query): Query<SessionQuery>,
) -> Response {
    match state.assistant.transcript(&query.session_id) {
        Some(session) => (StatusCode::OK, Json(session)).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            "session_not_found",
            "no conversation exists for this session_id",
        ),
    }
}

async fn prompts(State(state): State<ApiState>) -> impl IntoResponse {
    Json(PromptsResponse {
        greeting: GREETING,
        prompts: state.assistant.quick_prompts(),
    })
}

async fn destinations(
    State(state): State<ApiState>,
    Query(query): Query<DestinationsQuery>,
) -> impl IntoResponse {
    let region = query
        .region
        .as_deref()
        .map(str::trim)
        .filter(|region| !region.is_empty());
    Json(serde_json::json!({
        "destinations": state.assistant.destinations(region)
    }))
}

async fn destination(
    State(state): State<ApiState>,
    Query(query): Query<DestinationQuery>,
) -> Response {
    match state.assistant.destination(query.id) {
        Some(destination) => (StatusCode::OK, Json(destination)).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            "destination_not_found",
            "no destination has this id",
        ),
    }
}

async fn regions(State(state): State<ApiState>) -> impl IntoResponse {
    Json(serde_json::json!({ "regions": state.assistant.regions() }))
}

fn error_response(status: StatusCode, error: &str, message: &str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": error,
            "message": message
        })),
    )
        .into_response()
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|origin| origin.trim().trim_end_matches('/').to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}

fn build_cors_layer(allowed_origins: &Arc<Vec<String>>) -> CorsLayer {
    let origins = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect::<Vec<_>>();
    let origins = if origins.is_empty() {
        vec![HeaderValue::from_static(DEFAULT_ORIGINS[0])]
    } else {
        origins
    };

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
