//! telemetry-chart: time-series telemetry engine for dashboard chart widgets.
//!
//! The crate samples numeric readings on host ticks, keeps a bounded and
//! persisted history per series, and turns it into backend-agnostic render
//! frames with pan, zoom, hover and series-swipe interaction.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartStyle, TelemetryConfig, TelemetryEngine};
pub use error::{ChartError, ChartResult};
