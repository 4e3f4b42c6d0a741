//! Domain-level building blocks shared by the dashboard HTTP surface and the
//! probe/storage adapter crates: configuration resolution, the page gate,
//! the health/status model, and the aggregate-stats cache.

pub mod config;
pub mod model;
pub mod services;

pub use config::{
    DeploymentContext, EnvSource, SecretsFile, SettingSource, SettingsResolver,
};
pub use model::{
    CollectionStats, DashboardStore, DependencyError, HealthStatus, PageGate,
};
