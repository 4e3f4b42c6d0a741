//! Shared service helpers: the aggregate-stats cache and telemetry wiring.

pub mod cache;
pub mod telemetry;

pub use cache::*;
pub use telemetry::*;
