//! HTTP surface for coordinator incentives.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::engine::{IncentiveEngine, IncentiveError};
use crate::competition::roster::domain::PaymentStatus;
use crate::competition::store::{CoordinatorDirectory, StudentDirectory};

/// Router builder exposing HTTP endpoints for the incentive engine.
pub fn incentive_router<S, C>(engine: Arc<IncentiveEngine<S, C>>) -> Router
where
    S: StudentDirectory + 'static,
    C: CoordinatorDirectory + 'static,
{
    Router::new()
        .route(
            "/api/v1/coordinators/leaderboard",
            get(leaderboard_handler::<S, C>),
        )
        .route(
            "/api/v1/coordinators/:uid/incentives",
            post(calculate_handler::<S, C>),
        )
        .route(
            "/api/v1/coordinators/:uid/rank",
            get(partner_rank_handler::<S, C>),
        )
        .route(
            "/api/v1/coordinators/:uid/students/:student_uid/payment",
            post(payment_status_handler::<S, C>),
        )
        .with_state(engine)
}

#[derive(Debug, Deserialize)]
pub(crate) struct LeaderboardQuery {
    #[serde(default)]
    approved: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaymentUpdateRequest {
    payment_status: PaymentStatus,
}

pub(crate) async fn calculate_handler<S, C>(
    State(engine): State<Arc<IncentiveEngine<S, C>>>,
    Path(uid): Path<String>,
) -> Response
where
    S: StudentDirectory + 'static,
    C: CoordinatorDirectory + 'static,
{
    match engine.calculate(&uid) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error @ IncentiveError::CoordinatorNotFound(_)) => {
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

pub(crate) async fn partner_rank_handler<S, C>(
    State(engine): State<Arc<IncentiveEngine<S, C>>>,
    Path(uid): Path<String>,
) -> Response
where
    S: StudentDirectory + 'static,
    C: CoordinatorDirectory + 'static,
{
    match engine.partner_rank(&uid) {
        Ok(rank) => (StatusCode::OK, axum::Json(rank)).into_response(),
        Err(error @ IncentiveError::CoordinatorNotFound(_)) => {
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

pub(crate) async fn leaderboard_handler<S, C>(
    State(engine): State<Arc<IncentiveEngine<S, C>>>,
    Query(query): Query<LeaderboardQuery>,
) -> Response
where
    S: StudentDirectory + 'static,
    C: CoordinatorDirectory + 'static,
{
    match engine.leaderboard(query.approved) {
        Ok(entries) => (StatusCode::OK, axum::Json(entries)).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn payment_status_handler<S, C>(
    State(engine): State<Arc<IncentiveEngine<S, C>>>,
    Path((uid, student_uid)): Path<(String, String)>,
    axum::Json(request): axum::Json<PaymentUpdateRequest>,
) -> Response
where
    S: StudentDirectory + 'static,
    C: CoordinatorDirectory + 'static,
{
    match engine.update_payment_status(&uid, &student_uid, request.payment_status) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error @ IncentiveError::NotManagedBy { .. }) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::FORBIDDEN, axum::Json(payload)).into_response()
        }
        Err(
            error @ (IncentiveError::StudentNotFound(_) | IncentiveError::CoordinatorNotFound(_)),
        ) => {
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
