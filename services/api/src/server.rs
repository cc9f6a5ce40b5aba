use crate::cli::ServeArgs;
use crate::infra::{build_planner, AppState};
use crate::routes::with_planning_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use clean_route::config::AppConfig;
use clean_route::error::AppError;
use clean_route::telemetry;
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

    let planner = Arc::new(build_planner(&config.collaborators)?);

    let app = with_planning_routes(planner)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        geocoder = %config.collaborators.geocoder_url,
        router = %config.collaborators.router_url,
        remote_scoring = config.collaborators.scoring_url.is_some(),
        "clean route planner ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
