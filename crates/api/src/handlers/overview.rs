use actix_web::{web, HttpResponse};
use metrics::counter;
use serde::{Deserialize, Serialize};

use leadboard_domain::config::TELEGRAM_BOT_TOKEN;
use leadboard_domain::model::{
    HealthStatus, COLLECTION_CAMPAIGNS, COLLECTION_EMAILS, COLLECTION_LEADS,
};
use leadboard_probe::check_liveness;

use crate::state::AppState;

use super::{cached_collection_stats, require_rendering, ApiError};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct OverviewResponse {
    pub metrics: OverviewMetrics,
    pub system: SystemStatus,
    /// Per-collection counts backing the activity chart; empty when the
    /// store could not be reached.
    pub activity: Vec<CollectionCount>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct OverviewMetrics {
    pub total_leads: u64,
    pub active_campaigns: u64,
    pub total_emails: u64,
    /// Reads the `demos` collection, which is not tracked by the count
    /// probe; it defaults to zero instead of failing the page.
    pub demo_requests: u64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SystemStatus {
    pub database: HealthStatus,
    pub openai_api: bool,
    pub telegram_configured: bool,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CollectionCount {
    pub collection: String,
    pub count: u64,
}

pub async fn overview_handler(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    require_rendering(&state)?;
    counter!("dashboard_view_requests_total", "view" => "overview").increment(1);

    let stats_result = cached_collection_stats(&state).await;
    let openai_live = check_liveness(state.liveness()).await;
    counter!(
        "dashboard_probe_total",
        "dependency" => "openai",
        "result" => if openai_live { "ok" } else { "error" }
    )
    .increment(1);

    // Connected needs both a reachable store and at least one tracked
    // collection; a reachable but empty database reads as disconnected, the
    // same way the operator would see it.
    let database = match &stats_result {
        Ok(stats) if stats.is_empty() => HealthStatus::Disconnected,
        other => HealthStatus::from_result(other),
    };

    let stats = stats_result.unwrap_or_default();
    let response = OverviewResponse {
        metrics: OverviewMetrics {
            total_leads: stats.count(COLLECTION_LEADS),
            active_campaigns: stats.count(COLLECTION_CAMPAIGNS),
            total_emails: stats.count(COLLECTION_EMAILS),
            demo_requests: stats.count("demos"),
        },
        system: SystemStatus {
            database,
            openai_api: openai_live,
            telegram_configured: state.resolver().is_configured(TELEGRAM_BOT_TOKEN),
        },
        activity: stats
            .iter()
            .map(|(collection, count)| CollectionCount {
                collection: collection.to_string(),
                count,
            })
            .collect(),
    };

    Ok(HttpResponse::Ok().json(response))
}
