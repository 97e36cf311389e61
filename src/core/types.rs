use serde::{Deserialize, Serialize};

/// One timestamped reading.
///
/// `value` is finite for every sample held by the history store; constructors
/// do not enforce it so callers can probe with [`Sample::is_valid`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    #[serde(rename = "t")]
    pub timestamp_ms: i64,
    #[serde(rename = "v")]
    pub value: f64,
}

impl Sample {
    #[must_use]
    pub const fn new(timestamp_ms: i64, value: f64) -> Self {
        Self {
            timestamp_ms,
            value,
        }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.value.is_finite()
    }
}

/// Logical (CSS-like) pixel size of a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Render target description: logical size plus device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub viewport: Viewport,
    pub device_pixel_ratio: f64,
}

impl Surface {
    #[must_use]
    pub fn new(width: u32, height: u32, device_pixel_ratio: f64) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            device_pixel_ratio,
        }
    }

    /// Device pixel ratio with non-finite or non-positive values treated as 1.
    #[must_use]
    pub fn effective_pixel_ratio(self) -> f64 {
        if self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0 {
            self.device_pixel_ratio
        } else {
            1.0
        }
    }

    /// Size of the backing raster in device pixels.
    #[must_use]
    pub fn backing_size(self) -> (u32, u32) {
        let ratio = self.effective_pixel_ratio();
        let scale = |logical: u32| ((f64::from(logical) * ratio).round() as u32).max(1);
        (scale(self.viewport.width), scale(self.viewport.height))
    }

    #[must_use]
    pub fn width(self) -> f64 {
        f64::from(self.viewport.width)
    }

    #[must_use]
    pub fn height(self) -> f64 {
        f64::from(self.viewport.height)
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.viewport.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::{Sample, Surface};

    #[test]
    fn backing_size_scales_by_pixel_ratio() {
        assert_eq!(Surface::new(300, 150, 2.0).backing_size(), (600, 300));
        assert_eq!(Surface::new(301, 151, 1.5).backing_size(), (452, 227));
    }

    #[test]
    fn invalid_pixel_ratio_falls_back_to_one() {
        assert_eq!(Surface::new(120, 80, f64::NAN).backing_size(), (120, 80));
        assert_eq!(Surface::new(120, 80, 0.0).backing_size(), (120, 80));
    }

    #[test]
    fn sample_serializes_with_compact_field_names() {
        let json = serde_json::to_string(&Sample::new(1_000, 2.5)).expect("serialize");
        assert_eq!(json, r#"{"t":1000,"v":2.5}"#);
    }
}
