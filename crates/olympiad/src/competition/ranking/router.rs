//! HTTP surface for score recording, rankings, and certificates.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::certificates::CertificateIndex;
use super::recorder::{MarksSubmission, ScoreError, ScoreRecorder};
use crate::competition::store::StudentDirectory;

/// Router builder exposing HTTP endpoints for score recording and lookups.
pub fn ranking_router<S, C>(recorder: Arc<ScoreRecorder<S, C>>) -> Router
where
    S: StudentDirectory + 'static,
    C: CertificateIndex + 'static,
{
    Router::new()
        .route(
            "/api/v1/students/:uid/marks",
            post(record_marks_handler::<S, C>),
        )
        .route(
            "/api/v1/students/:uid/rankings",
            get(student_rankings_handler::<S, C>),
        )
        .route(
            "/api/v1/certificates/:code",
            get(certificate_handler::<S, C>),
        )
        .with_state(recorder)
}

pub(crate) async fn record_marks_handler<S, C>(
    State(recorder): State<Arc<ScoreRecorder<S, C>>>,
    Path(uid): Path<String>,
    axum::Json(submission): axum::Json<MarksSubmission>,
) -> Response
where
    S: StudentDirectory + 'static,
    C: CertificateIndex + 'static,
{
    match recorder.record(&uid, submission) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(
            error @ (ScoreError::ScoreAboveTotal { .. } | ScoreError::TotalAboveMaximum { .. }),
        ) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(error @ ScoreError::StudentNotFound(_)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn student_rankings_handler<S, C>(
    State(recorder): State<Arc<ScoreRecorder<S, C>>>,
    Path(uid): Path<String>,
) -> Response
where
    S: StudentDirectory + 'static,
    C: CertificateIndex + 'static,
{
    match recorder.rank_profiles(&uid) {
        Ok(profiles) => (StatusCode::OK, axum::Json(profiles)).into_response(),
        Err(error @ ScoreError::StudentNotFound(_)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn certificate_handler<S, C>(
    State(recorder): State<Arc<ScoreRecorder<S, C>>>,
    Path(code): Path<String>,
) -> Response
where
    S: StudentDirectory + 'static,
    C: CertificateIndex + 'static,
{
    match recorder.certificate(&code) {
        Ok(certificate) => (StatusCode::OK, axum::Json(certificate)).into_response(),
        Err(error @ ScoreError::CertificateNotFound(_)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
