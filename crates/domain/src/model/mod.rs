//! Data structures shared across the dashboard HTTP surface and the probe
//! and storage adapter crates.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::AsRefStr;
use thiserror::Error;

use crate::config::{SettingsResolver, REQUIRED_SETTINGS};

/// Collections the aggregate-count probe is allowed to report on. Anything
/// else in the database is ignored, not an error.
pub const TRACKED_COLLECTIONS: [&str; 3] = [COLLECTION_LEADS, COLLECTION_EMAILS, COLLECTION_CAMPAIGNS];

pub const COLLECTION_LEADS: &str = "leads";
pub const COLLECTION_EMAILS: &str = "emails";
pub const COLLECTION_CAMPAIGNS: &str = "campaigns";

/// Common result alias for dependency probes.
pub type ProbeResult<T> = Result<T, DependencyError>;

/// A dependency call failed. Probes flatten every underlying driver or
/// transport error into this type so one section's outage can never take the
/// whole page down.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DependencyError {
    #[error("{0}")]
    Unreachable(String),
}

impl DependencyError {
    pub fn unreachable(err: impl std::fmt::Display) -> Self {
        Self::Unreachable(err.to_string())
    }
}

/// Reachability of one external dependency, recomputed on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case", tag = "state", content = "message")]
#[strum(serialize_all = "snake_case")]
pub enum HealthStatus {
    Connected,
    Disconnected,
    Error(String),
}

impl HealthStatus {
    pub fn from_result<T>(result: &ProbeResult<T>) -> Self {
        match result {
            Ok(_) => Self::Connected,
            Err(DependencyError::Unreachable(message)) => Self::Error(message.clone()),
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

/// Document counts per tracked collection. Missing collections read as zero
/// so a metric over an absent collection can never fail the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionStats {
    counts: BTreeMap<String, u64>,
}

impl CollectionStats {
    pub fn insert(&mut self, collection: impl Into<String>, count: u64) {
        self.counts.insert(collection.into(), count);
    }

    pub fn count(&self, collection: &str) -> u64 {
        self.counts.get(collection).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(name, count)| (name.as_str(), *count))
    }
}

impl FromIterator<(String, u64)> for CollectionStats {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

/// One lead as displayed in the Lead Management view. Fields the source
/// document lacks are already substituted with display defaults; the schema
/// is read, never validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadSummary {
    pub name: String,
    pub email: String,
    pub institution: String,
    pub status: String,
    pub score: String,
}

impl LeadSummary {
    pub const DEFAULT_NAME: &'static str = "Unknown";
    pub const DEFAULT_STATUS: &'static str = "New";
    pub const FIELD_FALLBACK: &'static str = "N/A";
}

/// One outbound email as displayed in the Email Campaigns view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailSummary {
    pub recipient: String,
    pub subject: String,
    pub status: String,
}

/// Delivery totals plus the newest entries for the Email Campaigns view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailReport {
    pub total: u64,
    pub sent: u64,
    pub failed: u64,
    pub recent: Vec<EmailSummary>,
}

/// Read-only view of the document store. The production implementation lives
/// in `leadboard_storage`; tests substitute in-memory fakes.
#[async_trait]
pub trait DashboardStore: Send + Sync {
    /// Collection names, for the operator connection test.
    async fn list_collections(&self) -> ProbeResult<Vec<String>>;

    /// Document counts for the tracked collections only.
    async fn collection_stats(&self) -> ProbeResult<CollectionStats>;

    /// Newest leads, most recent first.
    async fn recent_leads(&self, limit: i64) -> ProbeResult<Vec<LeadSummary>>;

    /// Delivery totals plus the newest emails, most recent first.
    async fn email_report(&self, recent_limit: i64) -> ProbeResult<EmailReport>;
}

/// Per-request gate over the required settings. Each page load evaluates the
/// gate fresh; nothing carries over between loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageGate {
    Blocked { missing: Vec<&'static str> },
    Rendering,
}

impl PageGate {
    pub fn evaluate(resolver: &SettingsResolver) -> Self {
        let missing = resolver.check_required(&REQUIRED_SETTINGS);
        if missing.is_empty() {
            Self::Rendering
        } else {
            Self::Blocked { missing }
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }
}
