use crate::cli::ServeArgs;
use crate::infra::{candidate_service, AppState};
use crate::routes::with_candidate_routes;
use axum::extract::DefaultBodyLimit;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use talent_shortlist::config::AppConfig;
use talent_shortlist::error::AppError;
use talent_shortlist::telemetry;
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

    let service = candidate_service(&config.shortlist);

    let app = with_candidate_routes(service)
        .layer(DefaultBodyLimit::max(config.shortlist.upload_limit_bytes))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        upload_limit_bytes = config.shortlist.upload_limit_bytes,
        "talent shortlist service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
