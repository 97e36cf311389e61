use serde::{Deserialize, Serialize};

use crate::core::catalog::DEFAULT_MAX_AUTO_SERIES;
use crate::core::decimation::MAX_SMOOTHING_FACTOR;
use crate::core::sampler::MIN_SAMPLE_INTERVAL_MS;
use crate::core::{
    HistoryLimits, SensorSources, SeriesCatalog, SeriesDeclaration, storage_identity, storage_key,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{DEFAULT_SWIPE_THRESHOLD_PX, MAX_ZOOM_SCALE};

/// Public engine configuration.
///
/// The type is serializable so hosts can persist and reload their setup
/// without inventing their own format. Every field has a default, so `{}`
/// is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_widget_name")]
    pub widget_name: String,
    /// Source id that identifies this widget instance for persisted history.
    /// Falls back to the first configured series source.
    #[serde(default)]
    pub primary_source: Option<String>,
    /// Explicit series list; when absent or empty, sensors are auto-detected.
    #[serde(default)]
    pub series: Option<Vec<SeriesDeclaration>>,
    #[serde(default)]
    pub sensors: SensorSources,
    #[serde(default = "default_max_auto_series")]
    pub max_auto_series: usize,
    #[serde(default = "default_sample_interval_seconds")]
    pub sample_interval_seconds: f64,
    #[serde(default = "default_history_retention_hours")]
    pub history_retention_hours: f64,
    #[serde(default = "default_max_samples")]
    pub max_samples: usize,
    /// Point budget per drawn series after decimation.
    #[serde(default = "default_max_points")]
    pub max_points: usize,
    #[serde(default = "default_smoothing_factor")]
    pub smoothing_factor: f64,
    /// Visible window at zoom scale 1. Defaults to retention / 8 so the
    /// widest zoom shows the full retention window.
    #[serde(default)]
    pub base_window_minutes: Option<f64>,
    #[serde(default = "default_swipe_threshold_px")]
    pub swipe_threshold_px: f64,
    /// Offset applied to time-of-day labels.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            widget_name: default_widget_name(),
            primary_source: None,
            series: None,
            sensors: SensorSources::default(),
            max_auto_series: default_max_auto_series(),
            sample_interval_seconds: default_sample_interval_seconds(),
            history_retention_hours: default_history_retention_hours(),
            max_samples: default_max_samples(),
            max_points: default_max_points(),
            smoothing_factor: default_smoothing_factor(),
            base_window_minutes: None,
            swipe_threshold_px: default_swipe_threshold_px(),
            utc_offset_minutes: 0,
        }
    }
}

impl TelemetryConfig {
    pub fn from_json(json: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> ChartResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Sets an explicit series list.
    #[must_use]
    pub fn with_series(mut self, series: Vec<SeriesDeclaration>) -> Self {
        self.series = Some(series);
        self
    }

    /// Sets station sensors used by auto-detection.
    #[must_use]
    pub fn with_sensors(mut self, sensors: SensorSources) -> Self {
        self.sensors = sensors;
        self
    }

    #[must_use]
    pub fn with_sample_interval_seconds(mut self, seconds: f64) -> Self {
        self.sample_interval_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_history_retention_hours(mut self, hours: f64) -> Self {
        self.history_retention_hours = hours;
        self
    }

    #[must_use]
    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = max_samples;
        self
    }

    #[must_use]
    pub fn with_max_points(mut self, max_points: usize) -> Self {
        self.max_points = max_points;
        self
    }

    #[must_use]
    pub fn with_smoothing_factor(mut self, smoothing_factor: f64) -> Self {
        self.smoothing_factor = smoothing_factor;
        self
    }

    #[must_use]
    pub fn with_base_window_minutes(mut self, minutes: f64) -> Self {
        self.base_window_minutes = Some(minutes);
        self
    }

    #[must_use]
    pub fn with_primary_source(mut self, source: impl Into<String>) -> Self {
        self.primary_source = Some(source.into());
        self
    }

    /// Rejects settings that cannot be degraded into something usable.
    ///
    /// Values that are merely out of range (interval below the floor,
    /// smoothing above 0.5) are clamped where they are used instead.
    pub fn validate(&self) -> ChartResult<()> {
        if !self.history_retention_hours.is_finite() || self.history_retention_hours <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "history_retention_hours must be finite and > 0".to_owned(),
            ));
        }
        if self.max_samples == 0 {
            return Err(ChartError::InvalidConfig(
                "max_samples must be > 0".to_owned(),
            ));
        }
        if !self.sample_interval_seconds.is_finite() {
            return Err(ChartError::InvalidConfig(
                "sample_interval_seconds must be finite".to_owned(),
            ));
        }
        if let Some(minutes) = self.base_window_minutes {
            if !minutes.is_finite() || minutes <= 0.0 {
                return Err(ChartError::InvalidConfig(
                    "base_window_minutes must be finite and > 0".to_owned(),
                ));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn sample_interval_ms(&self) -> i64 {
        let requested = (self.sample_interval_seconds * 1_000.0).round();
        if requested.is_finite() {
            (requested as i64).max(MIN_SAMPLE_INTERVAL_MS)
        } else {
            MIN_SAMPLE_INTERVAL_MS
        }
    }

    #[must_use]
    pub fn retention_ms(&self) -> i64 {
        (self.history_retention_hours * 3_600_000.0).round() as i64
    }

    pub fn history_limits(&self) -> ChartResult<HistoryLimits> {
        HistoryLimits::new(self.retention_ms(), self.max_samples)
    }

    #[must_use]
    pub fn base_window_ms(&self) -> f64 {
        match self.base_window_minutes {
            Some(minutes) => minutes * 60_000.0,
            None => self.retention_ms() as f64 / MAX_ZOOM_SCALE,
        }
    }

    #[must_use]
    pub fn clamped_smoothing_factor(&self) -> f64 {
        if self.smoothing_factor.is_finite() {
            self.smoothing_factor.clamp(0.0, MAX_SMOOTHING_FACTOR)
        } else {
            0.0
        }
    }

    #[must_use]
    pub fn effective_swipe_threshold_px(&self) -> f64 {
        if self.swipe_threshold_px.is_finite() && self.swipe_threshold_px > 0.0 {
            self.swipe_threshold_px
        } else {
            DEFAULT_SWIPE_THRESHOLD_PX
        }
    }

    #[must_use]
    pub fn catalog(&self) -> SeriesCatalog {
        SeriesCatalog::from_parts(self.series.as_deref(), &self.sensors, self.max_auto_series)
    }

    /// Storage key of this configuration's persisted history.
    #[must_use]
    pub fn history_storage_key(&self) -> String {
        let catalog = self.catalog();
        let primary = self
            .primary_source
            .as_deref()
            .or_else(|| catalog.primary_source())
            .unwrap_or_default();
        storage_key(&storage_identity(&self.widget_name, primary))
    }
}

fn default_widget_name() -> String {
    "telemetry".to_owned()
}

fn default_max_auto_series() -> usize {
    DEFAULT_MAX_AUTO_SERIES
}

fn default_sample_interval_seconds() -> f64 {
    60.0
}

fn default_history_retention_hours() -> f64 {
    24.0
}

fn default_max_samples() -> usize {
    5_000
}

fn default_max_points() -> usize {
    240
}

fn default_smoothing_factor() -> f64 {
    0.2
}

fn default_swipe_threshold_px() -> f64 {
    DEFAULT_SWIPE_THRESHOLD_PX
}
