use super::AppState;
use crate::analysis::pipeline::timestamp_now;
use crate::analysis::AnalysisResponse;
use crate::models::{AnalysisFailure, AnalysisRequest, HealthStatus};
use crate::Error;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

impl IntoResponse for AnalysisResponse {
    fn into_response(self) -> Response {
        match self {
            AnalysisResponse::Success(success) => (StatusCode::OK, Json(success)).into_response(),
            AnalysisResponse::Failure { status, body } => {
                let status =
                    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, Json(body)).into_response()
            }
        }
    }
}

/// `POST /api/analyze`
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return handle_json_rejection(rejection),
    };

    state.pipeline.analyze(&request).await.into_response()
}

fn handle_json_rejection(rejection: JsonRejection) -> Response {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!("Request body exceeded the configured limit");
        let body = AnalysisFailure {
            error: "Request body too large".to_string(),
            details: None,
            fallback: None,
        };
        return (StatusCode::PAYLOAD_TOO_LARGE, Json(body)).into_response();
    }

    let err = Error::MalformedRequest(rejection.body_text());
    tracing::warn!("Rejected analysis request: {}", err);
    AnalysisResponse::from_error(&err).into_response()
}

/// `GET /api/health`
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "OK".to_string(),
        timestamp: timestamp_now(),
        gemini_configured: state.pipeline.is_configured(),
    })
}
