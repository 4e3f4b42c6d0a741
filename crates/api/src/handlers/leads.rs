use actix_web::{web, HttpResponse};
use metrics::counter;
use serde::{Deserialize, Serialize};

use leadboard_domain::model::LeadSummary;

use crate::state::AppState;

use super::{require_rendering, ApiError, Section};

/// Newest leads shown by the Lead Management view.
pub const RECENT_LEAD_LIMIT: i64 = 10;

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct LeadsData {
    pub leads: Vec<LeadSummary>,
}

pub async fn leads_handler(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    require_rendering(&state)?;
    counter!("dashboard_view_requests_total", "view" => "leads").increment(1);

    let section = match state.store().recent_leads(RECENT_LEAD_LIMIT).await {
        Ok(leads) if leads.is_empty() => {
            Section::no_data("No leads found. Start processing leads to see them here.")
        }
        Ok(leads) => Section::ok(LeadsData { leads }),
        Err(err) => Section::error(format!("Error loading leads: {err}")),
    };

    Ok(HttpResponse::Ok().json(section))
}
