//! HTTP surface for standings boards.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::{StandingsBoard, StandingsError};
use crate::competition::roster::domain::Scope;
use crate::competition::store::StudentDirectory;

/// Router builder exposing HTTP endpoints for the standings board.
pub fn standings_router<S>(board: Arc<StandingsBoard<S>>) -> Router
where
    S: StudentDirectory + 'static,
{
    Router::new()
        .route("/api/v1/standings", get(board_handler::<S>))
        .route(
            "/api/v1/students/:uid/standings",
            get(student_standings_handler::<S>),
        )
        .with_state(board)
}

#[derive(Debug, Deserialize)]
pub(crate) struct StandingsQuery {
    #[serde(default)]
    scope: Option<Scope>,
    name: Option<String>,
}

pub(crate) async fn board_handler<S>(
    State(board): State<Arc<StandingsBoard<S>>>,
    Query(query): Query<StandingsQuery>,
) -> Response
where
    S: StudentDirectory + 'static,
{
    let scope = query.scope.unwrap_or(Scope::Global);
    match board.board(scope, query.name.as_deref()) {
        Ok(entries) => (StatusCode::OK, axum::Json(entries)).into_response(),
        Err(error @ StandingsError::MissingPartition(_)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn student_standings_handler<S>(
    State(board): State<Arc<StandingsBoard<S>>>,
    Path(uid): Path<String>,
) -> Response
where
    S: StudentDirectory + 'static,
{
    match board.for_student(&uid) {
        Ok(standings) => (StatusCode::OK, axum::Json(standings)).into_response(),
        Err(error @ StandingsError::StudentNotFound(_)) => {
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
