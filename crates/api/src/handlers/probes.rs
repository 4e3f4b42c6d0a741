//! Operator-triggered connection tests from the Settings view. Both simply
//! re-run the probes on demand and report the outcome inline.

use actix_web::{web, HttpResponse};
use metrics::counter;
use serde::{Deserialize, Serialize};

use leadboard_probe::check_liveness;

use crate::state::AppState;

use super::{require_rendering, ApiError, SectionStatus};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ConnectionTestResponse {
    pub status: SectionStatus,
    pub message: String,
}

pub async fn test_database_handler(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    require_rendering(&state)?;

    let response = match state.store().list_collections().await {
        Ok(collections) => {
            counter!("dashboard_probe_total", "dependency" => "mongodb", "result" => "ok")
                .increment(1);
            ConnectionTestResponse {
                status: SectionStatus::Ok,
                message: format!(
                    "Database connected. Found {} collections.",
                    collections.len()
                ),
            }
        }
        Err(err) => {
            counter!("dashboard_probe_total", "dependency" => "mongodb", "result" => "error")
                .increment(1);
            ConnectionTestResponse {
                status: SectionStatus::Error,
                message: format!("Database connection failed: {err}"),
            }
        }
    };

    Ok(HttpResponse::Ok().json(response))
}

pub async fn test_openai_handler(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    require_rendering(&state)?;

    let live = check_liveness(state.liveness()).await;
    counter!(
        "dashboard_probe_total",
        "dependency" => "openai",
        "result" => if live { "ok" } else { "error" }
    )
    .increment(1);

    let response = if live {
        ConnectionTestResponse {
            status: SectionStatus::Ok,
            message: "OpenAI API is working.".to_string(),
        }
    } else {
        ConnectionTestResponse {
            status: SectionStatus::Error,
            message: "OpenAI API connection failed.".to_string(),
        }
    };

    Ok(HttpResponse::Ok().json(response))
}
