use actix_web::{web, HttpResponse};
use metrics::counter;
use serde::{Deserialize, Serialize};

use leadboard_domain::model::CollectionStats;

use crate::state::AppState;

use super::{require_rendering, ApiError, Section};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsData {
    pub collections: CollectionStats,
}

/// Queries the store directly rather than through the stats memo: the
/// Analytics view is the operator's "what is it right now" check, so it
/// always pays for a fresh count.
pub async fn analytics_handler(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    require_rendering(&state)?;
    counter!("dashboard_view_requests_total", "view" => "analytics").increment(1);

    let section = match state.store().collection_stats().await {
        Ok(stats) if stats.is_empty() => Section::no_data("No analytics data available yet."),
        Ok(collections) => Section::ok(AnalyticsData { collections }),
        Err(err) => Section::error(format!("Error loading analytics: {err}")),
    };

    Ok(HttpResponse::Ok().json(section))
}
