use actix_web::{web, HttpResponse};
use metrics::counter;
use serde::{Deserialize, Serialize};

use leadboard_domain::model::EmailSummary;

use crate::state::AppState;

use super::{require_rendering, ApiError, Section};

/// Newest emails shown by the Email Campaigns view.
pub const RECENT_EMAIL_LIMIT: i64 = 5;

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct EmailsData {
    pub total: u64,
    pub sent: u64,
    pub failed: u64,
    /// Share of sent emails, or "N/A" before anything has gone out.
    pub success_rate: String,
    pub recent: Vec<EmailSummary>,
}

pub async fn emails_handler(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    require_rendering(&state)?;
    counter!("dashboard_view_requests_total", "view" => "emails").increment(1);

    let section = match state.store().email_report(RECENT_EMAIL_LIMIT).await {
        Ok(report) => {
            let success_rate = if report.total > 0 {
                format!("{:.0}%", report.sent as f64 * 100.0 / report.total as f64)
            } else {
                "N/A".to_string()
            };
            Section::ok(EmailsData {
                total: report.total,
                sent: report.sent,
                failed: report.failed,
                success_rate,
                recent: report.recent,
            })
        }
        Err(err) => Section::error(format!("Error loading email data: {err}")),
    };

    Ok(HttpResponse::Ok().json(section))
}
