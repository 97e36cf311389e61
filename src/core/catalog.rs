use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::core::source::NumericSource;

pub const DEFAULT_MAX_AUTO_SERIES: usize = 6;

/// Series entry as written in host configuration.
///
/// Fields are optional so one malformed entry can be dropped without
/// rejecting the whole configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesDeclaration {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
}

impl SeriesDeclaration {
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        source: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            key: Some(key.into()),
            label: Some(label.into()),
            source: Some(source.into()),
            unit: Some(unit.into()),
        }
    }

    fn resolve(&self) -> Option<SeriesDescriptor> {
        let present = |field: &Option<String>| {
            field
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
        };
        Some(SeriesDescriptor {
            key: present(&self.key)?,
            label: present(&self.label)?,
            source: present(&self.source)?,
            unit: self.unit.clone().unwrap_or_default(),
        })
    }
}

/// Resolved logical series with display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesDescriptor {
    pub key: String,
    pub label: String,
    pub source: String,
    pub unit: String,
}

/// Optional station sensors considered by auto-detection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorSources {
    #[serde(default)]
    pub temperature: Option<String>,
    #[serde(default)]
    pub humidity: Option<String>,
    #[serde(default)]
    pub wind_speed: Option<String>,
    #[serde(default)]
    pub wind_gust: Option<String>,
    #[serde(default)]
    pub pressure: Option<String>,
    #[serde(default)]
    pub rain_rate: Option<String>,
}

impl SensorSources {
    /// Candidate series in fixed priority order, skipping unset sensors.
    #[must_use]
    pub fn candidates(&self) -> Vec<SeriesDescriptor> {
        [
            ("temperature", "Temperature", "°C", &self.temperature),
            ("humidity", "Humidity", "%", &self.humidity),
            ("wind_speed", "Wind", "km/h", &self.wind_speed),
            ("wind_gust", "Gust", "km/h", &self.wind_gust),
            ("pressure", "Pressure", "hPa", &self.pressure),
            ("rain_rate", "Rain rate", "mm/h", &self.rain_rate),
        ]
        .into_iter()
        .filter_map(|(key, label, unit, source)| {
            let source = source.as_deref()?.trim();
            (!source.is_empty()).then(|| SeriesDescriptor {
                key: key.to_owned(),
                label: label.to_owned(),
                source: source.to_owned(),
                unit: unit.to_owned(),
            })
        })
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CatalogMode {
    Declared(Vec<SeriesDescriptor>),
    AutoDetect {
        candidates: Vec<SeriesDescriptor>,
        max_series: usize,
    },
}

/// Resolves which series exist right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesCatalog {
    mode: CatalogMode,
}

impl SeriesCatalog {
    /// Builds a catalog from an explicit declaration list.
    ///
    /// Entries missing a key, label or source are dropped; order is kept.
    #[must_use]
    pub fn declared(declarations: &[SeriesDeclaration]) -> Self {
        let series = declarations
            .iter()
            .enumerate()
            .filter_map(|(index, declaration)| {
                let resolved = declaration.resolve();
                if resolved.is_none() {
                    warn!(index, "dropping series declaration missing key, label or source");
                }
                resolved
            })
            .collect();
        Self {
            mode: CatalogMode::Declared(series),
        }
    }

    /// Builds an auto-detecting catalog over the configured sensors.
    #[must_use]
    pub fn auto_detect(sensors: &SensorSources, max_series: usize) -> Self {
        Self {
            mode: CatalogMode::AutoDetect {
                candidates: sensors.candidates(),
                max_series,
            },
        }
    }

    /// Declared list when one is given and non-empty, auto-detection otherwise.
    #[must_use]
    pub fn from_parts(
        declarations: Option<&[SeriesDeclaration]>,
        sensors: &SensorSources,
        max_auto_series: usize,
    ) -> Self {
        match declarations {
            Some(declarations) if !declarations.is_empty() => Self::declared(declarations),
            _ => Self::auto_detect(sensors, max_auto_series),
        }
    }

    #[must_use]
    pub fn is_declared(&self) -> bool {
        matches!(self.mode, CatalogMode::Declared(_))
    }

    /// Source id identifying this configuration for storage keys.
    #[must_use]
    pub fn primary_source(&self) -> Option<&str> {
        match &self.mode {
            CatalogMode::Declared(series) => series.first(),
            CatalogMode::AutoDetect { candidates, .. } => candidates.first(),
        }
        .map(|series| series.source.as_str())
    }

    /// Configured series with `key`, whether or not its sensor reads right now.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&SeriesDescriptor> {
        match &self.mode {
            CatalogMode::Declared(series) => series.iter().find(|series| series.key == key),
            CatalogMode::AutoDetect { candidates, .. } => {
                candidates.iter().find(|series| series.key == key)
            }
        }
    }

    /// Series available for this tick, in declared or priority order.
    ///
    /// Auto-detection reads every candidate again on each call so series
    /// follow sensors going online or offline.
    pub fn resolve<S: NumericSource + ?Sized>(&self, source: &S) -> Vec<SeriesDescriptor> {
        match &self.mode {
            CatalogMode::Declared(series) => series.clone(),
            CatalogMode::AutoDetect {
                candidates,
                max_series,
            } => {
                let available: Vec<SeriesDescriptor> = candidates
                    .iter()
                    .filter(|candidate| source.read_numeric(&candidate.source).is_some())
                    .take(*max_series)
                    .cloned()
                    .collect();
                trace!(
                    candidates = candidates.len(),
                    available = available.len(),
                    "auto-detected series"
                );
                available
            }
        }
    }
}
