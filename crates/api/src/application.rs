use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use thiserror::Error;

use leadboard_domain::config::{
    ConfigError, ServerConfig, SettingsResolver, MONGODB_URI, OPENAI_API_KEY,
};
use leadboard_domain::services::{init_telemetry, StatsCache, TelemetryConfig, TelemetryError};
use leadboard_probe::OpenAiTarget;
use leadboard_storage::MongoStore;

use crate::{
    handlers::{
        analytics_handler, emails_handler, leads_handler, metrics_handler, overview_handler,
        settings_handler, test_database_handler, test_openai_handler,
    },
    state::AppState,
};

pub async fn run() -> Result<(), BootstrapError> {
    let server_config = ServerConfig::load_from_env()?;
    let telemetry_config = TelemetryConfig::from_env("DASHBOARD");
    let telemetry = init_telemetry(&telemetry_config)?;

    let resolver = Arc::new(SettingsResolver::detect()?);

    // Adapters are bound to whatever resolves at boot. When a required key is
    // absent the per-request gate keeps every view blocked, so the
    // empty-handed adapters are never consulted.
    let store = Arc::new(MongoStore::new(
        resolver.resolve(MONGODB_URI).unwrap_or_default(),
    ));
    let liveness = Arc::new(OpenAiTarget::new(
        resolver.resolve(OPENAI_API_KEY).unwrap_or_default(),
    ));

    let state = AppState::new(
        resolver,
        store,
        liveness,
        Arc::new(StatsCache::default()),
        telemetry,
    );

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .route("/api/v1/overview", web::get().to(overview_handler))
            .route("/api/v1/leads", web::get().to(leads_handler))
            .route("/api/v1/emails", web::get().to(emails_handler))
            .route("/api/v1/analytics", web::get().to(analytics_handler))
            .route("/api/v1/settings", web::get().to(settings_handler))
            .route("/api/v1/test/database", web::post().to(test_database_handler))
            .route("/api/v1/test/openai", web::post().to(test_openai_handler))
            .route("/metrics", web::get().to(metrics_handler))
    })
    .bind(server_config.bind_address())?;

    server.run().await?;

    Ok(())
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
