use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use olympiad::competition::incentives::{incentive_router, IncentiveEngine};
use olympiad::competition::ranking::{ranking_router, CertificateIndex, ScoreRecorder};
use olympiad::competition::roster::{roster_router, RosterImporter};
use olympiad::competition::standings::{standings_router, StandingsBoard};
use olympiad::competition::store::{CoordinatorDirectory, StudentDirectory};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_competition_routes<S, C, K>(
    recorder: Arc<ScoreRecorder<S, C>>,
    engine: Arc<IncentiveEngine<S, K>>,
    board: Arc<StandingsBoard<S>>,
    importer: Arc<RosterImporter<S>>,
) -> axum::Router
where
    S: StudentDirectory + 'static,
    C: CertificateIndex + 'static,
    K: CoordinatorDirectory + 'static,
{
    ranking_router(recorder)
        .merge(incentive_router(engine))
        .merge(standings_router(board))
        .merge(roster_router(importer))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
