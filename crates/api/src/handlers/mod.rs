pub mod analytics;
pub mod emails;
pub mod leads;
pub mod metrics;
pub mod overview;
pub mod probes;
pub mod settings;

pub use analytics::analytics_handler;
pub use emails::emails_handler;
pub use leads::leads_handler;
pub use overview::overview_handler;
pub use probes::{test_database_handler, test_openai_handler};
pub use self::metrics::metrics_handler;
pub use settings::settings_handler;

use ::metrics::counter;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use strum_macros::AsRefStr;
use thiserror::Error;

use leadboard_domain::model::{CollectionStats, PageGate, ProbeResult};

use crate::state::AppState;

/// The only error that crosses the HTTP boundary: required configuration is
/// missing, so the whole page is blocked. Dependency failures never reach
/// this type; they degrade their own section inline at 200.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing required configuration: {}", missing.join(", "))]
    ConfigurationMissing {
        missing: Vec<&'static str>,
        hint: &'static str,
    },
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ConfigurationMissing { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::ConfigurationMissing { missing, hint } => HttpResponse::build(
                self.status_code(),
            )
            .json(BlockedBody {
                error: self.to_string(),
                missing: missing.iter().map(ToString::to_string).collect(),
                hint: hint.to_string(),
            }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BlockedBody {
    pub error: String,
    pub missing: Vec<String>,
    pub hint: String,
}

/// Evaluates the page gate for this request. `Blocked` halts the view before
/// any probe runs.
pub(crate) fn require_rendering(state: &AppState) -> Result<(), ApiError> {
    match PageGate::evaluate(state.resolver()) {
        PageGate::Rendering => Ok(()),
        PageGate::Blocked { missing } => {
            counter!("dashboard_gate_blocked_total").increment(1);
            Err(ApiError::ConfigurationMissing {
                missing,
                hint: state.resolver().context().remediation_hint(),
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SectionStatus {
    Ok,
    NoData,
    Error,
}

/// Body of one dashboard section. A failed dependency maps to
/// `status = "error"` with the caught message, and an empty result to
/// `status = "no_data"`; either way the section answers 200 so its outage
/// never blocks a sibling section.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Section<T> {
    pub status: SectionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Section<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: SectionStatus::Ok,
            message: None,
            data: Some(data),
        }
    }

    pub fn no_data(message: impl Into<String>) -> Self {
        Self {
            status: SectionStatus::NoData,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: SectionStatus::Error,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Fetches collection counts through the single-slot memo: a fresh slot is
/// served as-is, otherwise the store is probed and only a success refills the
/// slot.
pub(crate) async fn cached_collection_stats(state: &AppState) -> ProbeResult<CollectionStats> {
    if let Some(stats) = state.stats_cache().get() {
        counter!("dashboard_probe_total", "dependency" => "mongodb", "result" => "cached")
            .increment(1);
        return Ok(stats);
    }

    let result = state.store().collection_stats().await;
    match &result {
        Ok(stats) => {
            state.stats_cache().store(stats.clone());
            counter!("dashboard_probe_total", "dependency" => "mongodb", "result" => "ok")
                .increment(1);
        }
        Err(_) => {
            counter!("dashboard_probe_total", "dependency" => "mongodb", "result" => "error")
                .increment(1);
        }
    }
    result
}
