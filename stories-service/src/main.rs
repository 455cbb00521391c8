use service_core::observability::init_tracing;
use stories_service::config::StoriesConfig;
use stories_service::services::init_metrics;
use stories_service::startup::Application;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Tracing is not up yet, so config errors go straight to stderr
    let config = StoriesConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    let otlp_endpoint = std::env::var("OTLP_ENDPOINT").ok();
    init_tracing(
        "stories-service",
        &config.common.log_level,
        otlp_endpoint.as_deref(),
    );

    init_metrics().map_err(|e| {
        tracing::error!("Failed to initialize metrics: {}", e);
        std::io::Error::other(format!("Metrics error: {}", e))
    })?;

    let application = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to start application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    application.run_until_stopped().await
}
