//! Application-level error type shared by the service binaries.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::competition::ranking::tables::RankBookError;
use crate::competition::roster::intake::RosterImportError;
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;

/// Top-level failure for startup and request handling paths that sit above
/// the competition services.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Tables(RankBookError),
    Roster(RosterImportError),
    Io(std::io::Error),
    Server(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {err}"),
            AppError::Telemetry(err) => write!(f, "telemetry error: {err}"),
            AppError::Tables(err) => write!(f, "rank table error: {err}"),
            AppError::Roster(err) => write!(f, "roster import error: {err}"),
            AppError::Io(err) => write!(f, "io error: {err}"),
            AppError::Server(message) => write!(f, "server error: {message}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Tables(err) => Some(err),
            AppError::Roster(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(_) => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<TelemetryError> for AppError {
    fn from(err: TelemetryError) -> Self {
        AppError::Telemetry(err)
    }
}

impl From<RankBookError> for AppError {
    fn from(err: RankBookError) -> Self {
        AppError::Tables(err)
    }
}

impl From<RosterImportError> for AppError {
    fn from(err: RosterImportError) -> Self {
        AppError::Roster(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Roster(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}
