use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryAccountRepository, InMemoryAssessmentCatalog, InMemoryLinkRepository,
};
use crate::routes::with_access_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use skillgate::access::{AccessService, CodeGenerator};
use skillgate::config::AppConfig;
use skillgate::error::AppError;
use skillgate::telemetry;
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

    let accounts = Arc::new(InMemoryAccountRepository::default());
    let links = Arc::new(InMemoryLinkRepository::default());
    let catalog = Arc::new(InMemoryAssessmentCatalog::default());
    let access_service = Arc::new(AccessService::new(
        accounts,
        links,
        catalog,
        CodeGenerator::new(config.codes.max_attempts),
    ));

    let app = with_access_routes(access_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "recruiter access service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
