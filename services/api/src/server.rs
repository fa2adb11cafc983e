use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryReviewRepository, TracingEventPublisher};
use crate::routes::with_review_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use order_reviews::config::AppConfig;
use order_reviews::error::AppError;
use order_reviews::reviews::ReviewService;
use order_reviews::telemetry;
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

    let repository = Arc::new(InMemoryReviewRepository::default());
    let mut review_service = ReviewService::new(repository);
    if config.events.enabled {
        let topic = config.events.topic.clone();
        review_service = review_service.with_events(Arc::new(TracingEventPublisher), topic);
    }

    let app = with_review_routes(Arc::new(review_service))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        events = config.events.enabled,
        "review service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
