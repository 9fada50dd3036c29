//! HTTP surface for roster uploads.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;

use super::intake::RosterImporter;
use crate::competition::store::StudentDirectory;

/// Wire payload for a roster upload: the raw CSV text plus the coordinator
/// the enrolled students are attributed to.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RosterUploadRequest {
    csv: String,
    #[serde(default)]
    added_by: Option<String>,
}

/// Router builder exposing the roster import endpoint.
pub fn roster_router<S>(importer: Arc<RosterImporter<S>>) -> Router
where
    S: StudentDirectory + 'static,
{
    Router::new()
        .route("/api/v1/roster/import", post(import_handler::<S>))
        .with_state(importer)
}

pub(crate) async fn import_handler<S>(
    State(importer): State<Arc<RosterImporter<S>>>,
    axum::Json(request): axum::Json<RosterUploadRequest>,
) -> Response
where
    S: StudentDirectory + 'static,
{
    let summary = importer.import_reader(request.added_by.as_deref(), request.csv.as_bytes());
    (StatusCode::OK, axum::Json(summary)).into_response()
}
