use crate::cli::ServeArgs;
use crate::infra::{AppState, Services};
use crate::routes::with_application_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use reliefmap::config::AppConfig;
use reliefmap::error::AppError;
use reliefmap::http;
use reliefmap::locations::GooglePlacesClient;
use reliefmap::store::SqliteStore;
use reliefmap::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;
    http::expose_error_detail(config.environment.exposes_error_detail());

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = SqliteStore::from_config(&config.database)?;
    if config.places.api_key.is_none() {
        warn!("GOOGLE_MAPS_API_KEY is not set; place search requests will fail");
    }
    let places = GooglePlacesClient::new(&config.places);

    let app = with_application_routes(Services::new(store, places))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        database = %config.database.path.display(),
        "reliefmap api ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
