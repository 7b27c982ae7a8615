use crate::api::get_embedded_asset;
use crate::config::Config;
use crate::intake::{IntakeError, ReportDraft};
use crate::model::{AgeGroup, EnvironmentIssue, Report, SymptomCategory};
use crate::stats::{self, StatsSummary};
use crate::store::ReportStore;
use anyhow::{Result, anyhow};
use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

const MAX_REPORTS_LIMIT: usize = 100;

#[derive(Clone)]
pub struct ApiState {
    pub config: Arc<Config>,
    pub store: Arc<Mutex<ReportStore>>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/v1/status", get(status))
        .route("/api/v1/stats", get(stats_summary))
        .route("/api/v1/reports", get(report_list).post(report_create))
        .route("/api/v1/options", get(options))
        .fallback(get(static_assets))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ReportsQuery {
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ReportsPayload {
    total: usize,
    reports: Vec<Report>,
}

#[derive(Debug, Serialize)]
struct StatusPayload {
    reports: usize,
    db_path: String,
    day_boundary: String,
    recent_limit: usize,
    api_port: u16,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OptionsPayload {
    age_groups: Vec<&'static str>,
    symptom_categories: Vec<&'static str>,
    environment_issues: Vec<&'static str>,
}

async fn status(State(state): State<ApiState>) -> ApiResult<Json<StatusPayload>> {
    let store = lock_store(&state)?;

    Ok(Json(StatusPayload {
        reports: store.len(),
        db_path: store.slot().path().display().to_string(),
        day_boundary: state.config.day_boundary.to_string(),
        recent_limit: state.config.recent_limit,
        api_port: state.config.api_port,
    }))
}

async fn stats_summary(State(state): State<ApiState>) -> ApiResult<Json<StatsSummary>> {
    let store = lock_store(&state)?;
    let summary = stats::compute_stats_now(store.snapshot(), state.config.day_boundary);

    Ok(Json(summary))
}

async fn report_list(
    State(state): State<ApiState>,
    Query(query): Query<ReportsQuery>,
) -> ApiResult<Json<ReportsPayload>> {
    let limit = reports_limit(query.limit, state.config.recent_limit);
    let store = lock_store(&state)?;

    Ok(Json(ReportsPayload {
        total: store.len(),
        reports: store.recent(limit).to_vec(),
    }))
}

async fn report_create(
    State(state): State<ApiState>,
    Json(draft): Json<ReportDraft>,
) -> ApiResult<(StatusCode, Json<Report>)> {
    let mut store = lock_store(&state)?;
    let report = store.submit(&draft, Utc::now())?.clone();
    info!(total = store.len(), "check-in submitted from dashboard");

    Ok((StatusCode::CREATED, Json(report)))
}

async fn options() -> Json<OptionsPayload> {
    Json(OptionsPayload {
        age_groups: AgeGroup::ALL.iter().map(|value| value.label()).collect(),
        symptom_categories: SymptomCategory::ALL
            .iter()
            .map(|value| value.label())
            .collect(),
        environment_issues: EnvironmentIssue::ALL
            .iter()
            .map(|value| value.label())
            .collect(),
    })
}

async fn static_assets(uri: Uri) -> ApiResult<Response> {
    let path = uri.path();

    match get_embedded_asset(path) {
        Some((bytes, mime)) => {
            let mut response = Response::new(bytes.into_response().into_body());
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, HeaderValue::from_str(&mime)?);
            Ok(response)
        }
        None => Err(ApiError::NotFound("Static asset not found".to_string())),
    }
}

fn reports_limit(requested: Option<usize>, default_limit: usize) -> usize {
    requested
        .unwrap_or(default_limit)
        .clamp(1, MAX_REPORTS_LIMIT)
}

fn lock_store(state: &ApiState) -> Result<MutexGuard<'_, ReportStore>> {
    state
        .store
        .lock()
        .map_err(|_| anyhow!("report store lock poisoned"))
}

type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug)]
enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self::Internal(value)
    }
}

impl From<IntakeError> for ApiError {
    fn from(value: IntakeError) -> Self {
        Self::BadRequest(value.to_string())
    }
}

impl From<axum::http::header::InvalidHeaderValue> for ApiError {
    fn from(value: axum::http::header::InvalidHeaderValue) -> Self {
        Self::Internal(value.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Internal(error) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": error.to_string() })),
            )
                .into_response(),
        }
    }
}
