mod axis_ticks;
mod chart_frame_builder;
mod chart_layout;
mod engine;
mod engine_config;
mod engine_init;
mod interaction_controller;
mod label_format;
mod redraw;
mod render_coordinator;
mod render_style;
mod sampling_controller;

pub use chart_frame_builder::PLACEHOLDER_TEXT;
pub use chart_layout::{ChartLayout, PlotRect};
pub use engine::TelemetryEngine;
pub use engine_config::TelemetryConfig;
pub use redraw::RedrawScheduler;
pub use render_style::ChartStyle;
