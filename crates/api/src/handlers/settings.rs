use actix_web::{web, HttpResponse};
use chrono::{SecondsFormat, Utc};
use metrics::counter;
use serde::{Deserialize, Serialize};

use leadboard_domain::config::{
    DEBUG, DEFAULT_DEBUG, DEFAULT_ENVIRONMENT, ENVIRONMENT, MONGODB_URI, OPENAI_API_KEY,
    TELEGRAM_BOT_TOKEN, TELEGRAM_USER_ID,
};

use crate::state::AppState;

use super::{require_rendering, ApiError};

/// Integration keys listed on the Settings view, with operator-facing names.
const INTEGRATIONS: [(&str, &str); 4] = [
    (OPENAI_API_KEY, "OpenAI API"),
    (MONGODB_URI, "MongoDB Database"),
    (TELEGRAM_BOT_TOKEN, "Telegram Bot"),
    (TELEGRAM_USER_ID, "Telegram User ID"),
];

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SettingsResponse {
    pub integrations: Vec<IntegrationStatus>,
    pub platform: String,
    pub config_surface: String,
    pub environment: String,
    pub debug: String,
    pub generated_at: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct IntegrationStatus {
    pub key: String,
    pub name: String,
    pub configured: bool,
}

pub async fn settings_handler(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    require_rendering(&state)?;
    counter!("dashboard_view_requests_total", "view" => "settings").increment(1);

    let resolver = state.resolver();
    let context = resolver.context();

    let integrations = INTEGRATIONS
        .iter()
        .map(|(key, name)| IntegrationStatus {
            key: key.to_string(),
            name: name.to_string(),
            configured: resolver.is_configured(key),
        })
        .collect();

    Ok(HttpResponse::Ok().json(SettingsResponse {
        integrations,
        platform: context.label().to_string(),
        config_surface: context.config_surface().to_string(),
        environment: resolver.resolve_or(ENVIRONMENT, DEFAULT_ENVIRONMENT),
        debug: resolver.resolve_or(DEBUG, DEFAULT_DEBUG),
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    }))
}
