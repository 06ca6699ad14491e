//! HTTP surface: `GET /analysis` and `GET /health`

use crate::analysis::AnalysisService;
use crate::error::ServiceError;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use stockrank_engine::AnalysisResult;
use tower_http::trace::TraceLayer;
use tracing::error;

/// Shared handler state
#[derive(Debug, Clone)]
pub struct AppState {
    pub analysis: AnalysisService,
}

impl AppState {
    pub fn new(analysis: AnalysisService) -> Self {
        Self { analysis }
    }
}

/// Failures surface as a generic 500; details go to the log only
#[derive(Debug)]
pub struct ApiError(ServiceError);

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "analysis error");
        let body = Json(ErrorBody {
            error: "internal server error",
        });
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

async fn get_analysis(State(state): State<AppState>) -> Result<Json<AnalysisResult>, ApiError> {
    let result = state.analysis.analyze().await?;
    Ok(Json(result))
}

async fn get_health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/analysis", get(get_analysis))
        .route("/health", get(get_health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
