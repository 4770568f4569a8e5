//! HTTP JSON API.
//!
//! - `POST /api/predict`: validated yield prediction
//! - `GET /api/areas`, `GET /api/crops`: known labels
//! - `GET /api/stats`: dataset summary
//! - `GET /health`: liveness probe

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use yieldcast_core::{InputBounds, YieldError, YieldQuery, YieldResult};
use yieldcast_engine::YieldPredictor;
use yieldcast_store::{DataSource, RecordStore};

use crate::config::ServerConfig;
use crate::validation::{PredictRequest, validate_request};

/// Value reported as `model_type` by `/api/stats`.
pub const MODEL_TYPE: &str = "Similarity-based prediction";

// ─── State ────────────────────────────────────────────────────────────────────

/// Shared, read-only state behind every handler.
#[derive(Debug)]
pub struct AppState {
    pub predictor: YieldPredictor,
    pub bounds: InputBounds,
    pub started: Instant,
}

impl AppState {
    #[must_use]
    pub fn new(predictor: YieldPredictor, bounds: InputBounds) -> Self {
        Self {
            predictor,
            bounds,
            started: Instant::now(),
        }
    }

    /// Load the dataset named by `config` (or synthesize one) and build the predictor.
    ///
    /// # Errors
    ///
    /// Returns `YieldError::InvalidConfig` if the engine settings are invalid.
    pub fn from_config(config: &ServerConfig) -> YieldResult<Self> {
        let store = RecordStore::load_or_synthesize(
            &config.data_path,
            &config.defaults,
            config.synthetic_seed,
        );
        let predictor = YieldPredictor::new(store, config.engine.clone())?;
        Ok(Self::new(predictor, config.bounds))
    }

    fn store(&self) -> &RecordStore {
        self.predictor.store()
    }
}

// ─── Wire types ───────────────────────────────────────────────────────────────

/// Echo of the validated query, with display-cased labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputEcho {
    pub area: String,
    pub item: String,
    pub year: i32,
    pub rainfall: f64,
    pub pesticides: f64,
    pub temperature: f64,
}

impl From<&YieldQuery> for InputEcho {
    fn from(query: &YieldQuery) -> Self {
        Self {
            area: title_case(&query.area),
            item: title_case(&query.crop),
            year: query.year,
            rainfall: query.rainfall,
            pesticides: query.pesticides,
            temperature: query.temperature,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    /// hg/ha, rounded to 2 decimals.
    pub prediction: f64,
    /// Display heuristic, rounded to 1 decimal.
    pub confidence: f64,
    pub insights: Vec<String>,
    pub input_data: InputEcho,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreasResponse {
    pub areas: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropsResponse {
    pub crops: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_areas: usize,
    pub total_crops: usize,
    pub total_data_points: usize,
    pub model_type: String,
    pub data_source: DataSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// ─── Errors ───────────────────────────────────────────────────────────────────

/// Failure of a request, rendered as `{"error": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The body was not a JSON object of the expected shape.
    #[error("Invalid request body: {0}")]
    MalformedBody(String),

    #[error(transparent)]
    Yield(#[from] YieldError),
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
            Self::Yield(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Yield(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the `error` field.
    #[must_use]
    pub fn message(&self) -> String {
        if self.status().is_server_error() {
            format!("Prediction failed: {self}")
        } else {
            self.to_string()
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            debug!(error = %self, "request rejected");
        }
        (status, Json(ErrorBody { error: self.message() })).into_response()
    }
}

// ─── Handlers ─────────────────────────────────────────────────────────────────

/// `POST /api/predict`
///
/// # Errors
///
/// Returns `ApiError` (400) for a malformed body, an unknown area/crop, or
/// an out-of-range number.
pub async fn predict_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) = payload?;
    let query = validate_request(&request, state.store(), &state.bounds)?;
    let prediction = state.predictor.predict(&query);

    debug!(
        area = %query.area,
        crop = %query.crop,
        tier = %prediction.diagnostics.tier,
        candidate_count = prediction.diagnostics.candidate_count,
        estimate = prediction.estimate,
        "served prediction"
    );

    Ok(Json(PredictResponse {
        prediction: round_to(prediction.estimate, 2),
        confidence: round_to(prediction.confidence, 1),
        insights: prediction.insights,
        input_data: InputEcho::from(&query),
    }))
}

/// `GET /api/areas`
pub async fn areas_handler(State(state): State<Arc<AppState>>) -> Json<AreasResponse> {
    Json(AreasResponse {
        areas: state.store().all_areas().to_vec(),
    })
}

/// `GET /api/crops`
pub async fn crops_handler(State(state): State<Arc<AppState>>) -> Json<CropsResponse> {
    Json(CropsResponse {
        crops: state.store().all_crops().to_vec(),
    })
}

/// `GET /api/stats`
pub async fn stats_handler(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    let store = state.store();
    Json(StatsResponse {
        total_areas: store.all_areas().len(),
        total_crops: store.all_crops().len(),
        total_data_points: store.len(),
        model_type: MODEL_TYPE.to_owned(),
        data_source: store.source().clone(),
    })
}

/// `GET /health`
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_owned(),
        uptime_secs: state.started.elapsed().as_secs(),
    })
}

/// The full route table.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/predict", post(predict_handler))
        .route("/api/areas", get(areas_handler))
        .route("/api/crops", get(crops_handler))
        .route("/api/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

// ─── Server ───────────────────────────────────────────────────────────────────

/// Bind `config.bind_addr` and serve until Ctrl-C.
///
/// # Errors
///
/// Returns `YieldError::InvalidConfig` for invalid engine settings and
/// `YieldError::Io` if the listener cannot be bound.
pub async fn run_server(config: ServerConfig) -> YieldResult<()> {
    let state = Arc::new(AppState::from_config(&config)?);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;

    let store = state.store();
    info!(
        addr = %listener.local_addr()?,
        records = store.len(),
        areas = store.all_areas().len(),
        crops = store.all_crops().len(),
        source = %store.source(),
        "yieldcast server listening"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("yieldcast server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
}

// ─── Formatting helpers ───────────────────────────────────────────────────────

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

/// Capitalize the first letter of every word; a word starts after any
/// non-alphabetic character (`"rice, paddy"` → `"Rice, Paddy"`).
#[must_use]
pub fn title_case(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut at_word_start = true;
    for c in label.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        at_word_start = !c.is_alphabetic();
    }
    out
}
