use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Colors, strokes and paddings for one chart frame.
///
/// Defaults follow the dark dashboard card the chart is embedded in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartStyle {
    pub background_color: Color,
    pub grid_line_color: Color,
    pub grid_line_width: f64,
    pub series_line_color: Color,
    pub series_line_width: f64,
    /// Wide translucent stroke painted under the series line.
    pub glow_color: Color,
    pub glow_line_width: f64,
    pub area_top_color: Color,
    pub area_bottom_color: Color,
    pub axis_label_color: Color,
    pub axis_font_size_px: f64,
    pub crosshair_line_color: Color,
    pub crosshair_line_width: f64,
    pub hover_marker_color: Color,
    pub hover_marker_radius_px: f64,
    pub tooltip_background_color: Color,
    pub tooltip_text_color: Color,
    pub tooltip_font_size_px: f64,
    pub tooltip_padding_px: f64,
    pub placeholder_text_color: Color,
    pub plot_padding_left_px: f64,
    pub plot_padding_right_px: f64,
    pub plot_padding_top_px: f64,
    pub plot_padding_bottom_px: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        let accent = Color::from_hex(0x38bdf8);
        Self {
            background_color: Color::from_hex(0x0b1220),
            grid_line_color: Color::rgba(1.0, 1.0, 1.0, 0.08),
            grid_line_width: 1.0,
            series_line_color: accent,
            series_line_width: 2.0,
            glow_color: accent.with_alpha(0.25),
            glow_line_width: 6.0,
            area_top_color: accent.with_alpha(0.35),
            area_bottom_color: accent.with_alpha(0.0),
            axis_label_color: Color::rgba(1.0, 1.0, 1.0, 0.6),
            axis_font_size_px: 10.0,
            crosshair_line_color: Color::rgba(1.0, 1.0, 1.0, 0.35),
            crosshair_line_width: 1.0,
            hover_marker_color: Color::rgb(1.0, 1.0, 1.0),
            hover_marker_radius_px: 3.5,
            tooltip_background_color: Color::rgba(0.0, 0.0, 0.0, 0.75),
            tooltip_text_color: Color::rgb(1.0, 1.0, 1.0),
            tooltip_font_size_px: 11.0,
            tooltip_padding_px: 6.0,
            placeholder_text_color: Color::rgba(1.0, 1.0, 1.0, 0.5),
            plot_padding_left_px: 44.0,
            plot_padding_right_px: 10.0,
            plot_padding_top_px: 10.0,
            plot_padding_bottom_px: 22.0,
        }
    }
}

impl ChartStyle {
    pub fn validate(&self) -> ChartResult<()> {
        for color in [
            self.background_color,
            self.grid_line_color,
            self.series_line_color,
            self.glow_color,
            self.area_top_color,
            self.area_bottom_color,
            self.axis_label_color,
            self.crosshair_line_color,
            self.hover_marker_color,
            self.tooltip_background_color,
            self.tooltip_text_color,
            self.placeholder_text_color,
        ] {
            color.validate()?;
        }

        for (name, value) in [
            ("grid_line_width", self.grid_line_width),
            ("series_line_width", self.series_line_width),
            ("glow_line_width", self.glow_line_width),
            ("axis_font_size_px", self.axis_font_size_px),
            ("crosshair_line_width", self.crosshair_line_width),
            ("hover_marker_radius_px", self.hover_marker_radius_px),
            ("tooltip_font_size_px", self.tooltip_font_size_px),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "style `{name}` must be finite and > 0"
                )));
            }
        }

        for (name, value) in [
            ("tooltip_padding_px", self.tooltip_padding_px),
            ("plot_padding_left_px", self.plot_padding_left_px),
            ("plot_padding_right_px", self.plot_padding_right_px),
            ("plot_padding_top_px", self.plot_padding_top_px),
            ("plot_padding_bottom_px", self.plot_padding_bottom_px),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "style `{name}` must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ChartStyle;
    use crate::render::Color;

    #[test]
    fn default_style_is_valid() {
        assert!(ChartStyle::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_color_and_negative_padding() {
        let style = ChartStyle {
            glow_color: Color::rgba(0.2, 0.2, 1.4, 1.0),
            ..ChartStyle::default()
        };
        assert!(style.validate().is_err());

        let style = ChartStyle {
            plot_padding_left_px: -1.0,
            ..ChartStyle::default()
        };
        assert!(style.validate().is_err());
    }
}
