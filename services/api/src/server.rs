use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryCertificateIndex, InMemoryCoordinatorDirectory, InMemoryStudentDirectory,
};
use crate::routes::with_competition_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use olympiad::competition::clock::{Clock, SystemClock};
use olympiad::competition::incentives::{IncentiveEngine, IncentiveSchedule};
use olympiad::competition::random::{RandomSource, ThreadRngSource};
use olympiad::competition::ranking::{RankBook, ScoreRecorder};
use olympiad::competition::roster::RosterImporter;
use olympiad::competition::standings::{StandingsBoard, StandingsPolicy};
use olympiad::config::{AppConfig, RankingConfig};
use olympiad::error::AppError;
use olympiad::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let book = Arc::new(load_rank_book(&config.ranking)?);
    let students = Arc::new(InMemoryStudentDirectory::default());
    let coordinators = Arc::new(InMemoryCoordinatorDirectory::default());
    let certificates = Arc::new(InMemoryCertificateIndex::default());
    let random: Arc<dyn RandomSource> = Arc::new(ThreadRngSource);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let recorder = Arc::new(ScoreRecorder::new(
        students.clone(),
        certificates,
        book.clone(),
        random.clone(),
        clock.clone(),
    ));
    let engine = Arc::new(IncentiveEngine::new(
        students.clone(),
        coordinators,
        IncentiveSchedule::standard(),
        clock.clone(),
    ));
    let board = Arc::new(StandingsBoard::new(
        students.clone(),
        StandingsPolicy::standard(),
    ));
    let importer = Arc::new(RosterImporter::new(students, book, random, clock));

    let app = with_competition_routes(recorder, engine, board, importer)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "competition backend ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn load_rank_book(config: &RankingConfig) -> Result<RankBook, AppError> {
    match &config.tables_path {
        Some(path) => Ok(RankBook::from_path(path)?),
        None => Ok(RankBook::standard()),
    }
}
