use crate::cli::ServeArgs;
use crate::infra::{build_service, AppState};
use crate::routes::with_food_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use food_lens::config::AppConfig;
use food_lens::error::AppError;
use food_lens::telemetry;
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
    if let Some(catalog) = args.catalog.take() {
        config.catalog.path = Some(catalog);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let food_service = Arc::new(build_service(&config.catalog)?);

    let app = with_food_routes(food_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        environment = config.environment.label(),
        %addr,
        search_limit = config.catalog.search_limit,
        "food lens service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
