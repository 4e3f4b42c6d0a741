use std::sync::Arc;

use leadboard_domain::config::SettingsResolver;
use leadboard_domain::model::DashboardStore;
use leadboard_domain::services::{StatsCache, TelemetryGuard};
use leadboard_probe::LivenessTarget;

/// Shared per-worker handles. The store and liveness target sit behind trait
/// objects so the endpoint tests can substitute in-memory fakes.
#[derive(Clone)]
pub struct AppState {
    resolver: Arc<SettingsResolver>,
    store: Arc<dyn DashboardStore>,
    liveness: Arc<dyn LivenessTarget>,
    stats_cache: Arc<StatsCache>,
    telemetry: TelemetryGuard,
}

impl AppState {
    pub fn new(
        resolver: Arc<SettingsResolver>,
        store: Arc<dyn DashboardStore>,
        liveness: Arc<dyn LivenessTarget>,
        stats_cache: Arc<StatsCache>,
        telemetry: TelemetryGuard,
    ) -> Self {
        Self {
            resolver,
            store,
            liveness,
            stats_cache,
            telemetry,
        }
    }

    pub fn resolver(&self) -> &SettingsResolver {
        self.resolver.as_ref()
    }

    pub fn store(&self) -> &dyn DashboardStore {
        self.store.as_ref()
    }

    pub fn liveness(&self) -> &dyn LivenessTarget {
        self.liveness.as_ref()
    }

    pub fn stats_cache(&self) -> &StatsCache {
        self.stats_cache.as_ref()
    }

    pub fn telemetry(&self) -> &TelemetryGuard {
        &self.telemetry
    }
}
