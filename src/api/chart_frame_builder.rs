use chrono::FixedOffset;

use crate::core::Surface;
use crate::error::ChartResult;
use crate::render::{
    AreaPrimitive, CanvasLayerKind, LinePrimitive, Point, PolylinePrimitive, RectPrimitive,
    RenderFrame, TextHAlign, TextPrimitive, VerticalGradient,
};

use super::axis_ticks::{
    AXIS_MAX_TICKS, AXIS_MIN_TICKS, AXIS_TIME_TARGET_SPACING_PX, AXIS_VALUE_TARGET_SPACING_PX,
    axis_tick_target_count, time_ticks, value_ticks,
};
use super::label_format::{format_time_of_day, format_tooltip, format_value, value_precision};
use super::{ChartLayout, ChartStyle};

pub const PLACEHOLDER_TEXT: &str = "No series";

const AXIS_LABEL_GAP_PX: f64 = 6.0;
// Rough advance width of the UI font relative to its size.
const GLYPH_WIDTH_RATIO: f64 = 0.6;
const TOOLTIP_OFFSET_PX: f64 = 10.0;

/// Everything the frame builder needs besides the layout.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FrameDecorations<'a> {
    pub style: &'a ChartStyle,
    pub unit: &'a str,
    pub hover_index: Option<usize>,
    pub label_offset: FixedOffset,
}

pub(crate) fn build_chart_frame(
    layout: &ChartLayout,
    decorations: FrameDecorations<'_>,
) -> ChartResult<RenderFrame> {
    let style = decorations.style;
    let mut frame = RenderFrame::new(layout.surface, style.background_color);

    append_value_axis(&mut frame, layout, style)?;
    append_time_axis(&mut frame, layout, style, decorations.label_offset)?;
    append_series(&mut frame, layout, style);
    if let Some(index) = decorations.hover_index {
        append_hover(&mut frame, layout, decorations, index);
    }
    Ok(frame)
}

/// Frame shown when no series is available.
pub(crate) fn build_placeholder_frame(surface: Surface, style: &ChartStyle) -> RenderFrame {
    let mut frame = RenderFrame::new(surface, style.background_color);
    frame.push_text(
        CanvasLayerKind::Overlay,
        TextPrimitive::new(
            PLACEHOLDER_TEXT,
            surface.width() / 2.0,
            (surface.height() - style.axis_font_size_px) / 2.0,
            style.axis_font_size_px,
            style.placeholder_text_color,
            TextHAlign::Center,
        ),
    );
    frame
}

fn append_value_axis(
    frame: &mut RenderFrame,
    layout: &ChartLayout,
    style: &ChartStyle,
) -> ChartResult<()> {
    let plot = layout.plot;
    let target = axis_tick_target_count(
        plot.height(),
        AXIS_VALUE_TARGET_SPACING_PX,
        AXIS_MIN_TICKS,
        AXIS_MAX_TICKS,
    );
    let (min, max) = layout.value_scale.domain();
    let (step, ticks) = value_ticks(min, max, target);
    let precision = value_precision(step);

    for value in ticks {
        let y = layout.value_scale.domain_to_pixel(value)?;
        frame.push_line(
            CanvasLayerKind::Grid,
            LinePrimitive::new(
                plot.left,
                y,
                plot.right,
                y,
                style.grid_line_width,
                style.grid_line_color,
            ),
        );
        frame.push_text(
            CanvasLayerKind::Axis,
            TextPrimitive::new(
                format_value(value, precision),
                plot.left - AXIS_LABEL_GAP_PX,
                y - style.axis_font_size_px / 2.0,
                style.axis_font_size_px,
                style.axis_label_color,
                TextHAlign::Right,
            ),
        );
    }
    Ok(())
}

fn append_time_axis(
    frame: &mut RenderFrame,
    layout: &ChartLayout,
    style: &ChartStyle,
    label_offset: FixedOffset,
) -> ChartResult<()> {
    let plot = layout.plot;
    let target = axis_tick_target_count(
        plot.width(),
        AXIS_TIME_TARGET_SPACING_PX,
        AXIS_MIN_TICKS,
        AXIS_MAX_TICKS,
    );
    let offset_ms = i64::from(label_offset.local_minus_utc()) * 1_000;
    for timestamp_ms in time_ticks(layout.window, target, offset_ms) {
        let x = layout.time_scale.domain_to_pixel(timestamp_ms as f64)?;
        frame.push_text(
            CanvasLayerKind::Axis,
            TextPrimitive::new(
                format_time_of_day(timestamp_ms, label_offset),
                x,
                plot.bottom + AXIS_LABEL_GAP_PX / 2.0,
                style.axis_font_size_px,
                style.axis_label_color,
                TextHAlign::Center,
            ),
        );
    }
    Ok(())
}

fn append_series(frame: &mut RenderFrame, layout: &ChartLayout, style: &ChartStyle) {
    let points = layout.points();
    let plot = layout.plot;

    if let (Some(first), Some(last)) = (points.first().copied(), points.last().copied()) {
        let mut polygon = Vec::with_capacity(points.len() + 2);
        polygon.extend_from_slice(&points);
        polygon.push(Point::new(last.x, plot.bottom));
        polygon.push(Point::new(first.x, plot.bottom));
        frame.push_area(
            CanvasLayerKind::Series,
            AreaPrimitive::new(
                polygon,
                VerticalGradient {
                    top_y: plot.top,
                    bottom_y: plot.bottom,
                    top_color: style.area_top_color,
                    bottom_color: style.area_bottom_color,
                },
            ),
        );
    }

    frame.push_polyline(
        CanvasLayerKind::Series,
        PolylinePrimitive::new(points.clone(), style.glow_line_width, style.glow_color),
    );
    frame.push_polyline(
        CanvasLayerKind::Series,
        PolylinePrimitive::new(points, style.series_line_width, style.series_line_color),
    );
}

fn append_hover(
    frame: &mut RenderFrame,
    layout: &ChartLayout,
    decorations: FrameDecorations<'_>,
    index: usize,
) {
    if !layout.hoverable.contains(&index) {
        return;
    }
    let (Some(sample), Some(&x), Some(&y)) = (
        layout.samples.get(index),
        layout.xs.get(index),
        layout.ys.get(index),
    ) else {
        return;
    };
    let style = decorations.style;
    let plot = layout.plot;

    frame.push_line(
        CanvasLayerKind::Crosshair,
        LinePrimitive::new(
            x,
            plot.top,
            x,
            plot.bottom,
            style.crosshair_line_width,
            style.crosshair_line_color,
        ),
    );
    let radius = style.hover_marker_radius_px;
    frame.push_rect(
        CanvasLayerKind::Crosshair,
        RectPrimitive::new(
            x - radius,
            y - radius,
            radius * 2.0,
            radius * 2.0,
            style.hover_marker_color,
        )
        .with_corner_radius(radius),
    );

    let text = format_tooltip(
        sample.timestamp_ms,
        sample.value,
        decorations.unit,
        decorations.label_offset,
    );
    let padding = style.tooltip_padding_px;
    let font_size = style.tooltip_font_size_px;
    let box_width = text.chars().count() as f64 * font_size * GLYPH_WIDTH_RATIO + padding * 2.0;
    let box_height = font_size + padding * 2.0;

    let surface_width = layout.surface.width();
    let max_left = (surface_width - box_width).max(0.0);
    let box_left = (x - box_width / 2.0).clamp(0.0, max_left);
    let above = y - TOOLTIP_OFFSET_PX - box_height;
    let box_top = if above >= 0.0 {
        above
    } else {
        (y + TOOLTIP_OFFSET_PX).min((layout.surface.height() - box_height).max(0.0))
    };

    frame.push_rect(
        CanvasLayerKind::Overlay,
        RectPrimitive::new(
            box_left,
            box_top,
            box_width,
            box_height,
            style.tooltip_background_color,
        )
        .with_corner_radius(padding),
    );
    frame.push_text(
        CanvasLayerKind::Overlay,
        TextPrimitive::new(
            text,
            box_left + box_width / 2.0,
            box_top + padding,
            font_size,
            style.tooltip_text_color,
            TextHAlign::Center,
        ),
    );
}

#[cfg(test)]
mod tests {
    use super::{FrameDecorations, PLACEHOLDER_TEXT, build_chart_frame, build_placeholder_frame};
    use crate::api::chart_layout::{ChartLayout, LayoutParams};
    use crate::api::label_format::label_offset;
    use crate::api::ChartStyle;
    use crate::core::{Sample, Surface};
    use crate::interaction::ViewportState;
    use crate::render::CanvasLayerKind;

    const MINUTE: i64 = 60_000;

    fn layout(surface: Surface) -> ChartLayout {
        let samples: Vec<Sample> = (0..30)
            .map(|index| Sample::new(index * MINUTE, 20.0 + (index % 5) as f64))
            .collect();
        ChartLayout::compute(
            surface,
            &ChartStyle::default(),
            &samples,
            ViewportState::default(),
            LayoutParams {
                base_window_ms: 120.0 * MINUTE as f64,
                max_points: 240,
                smoothing_factor: 0.2,
            },
        )
        .expect("layout")
        .expect("enough samples")
    }

    #[test]
    fn chart_frame_contains_grid_area_and_two_strokes() {
        let style = ChartStyle::default();
        let frame = build_chart_frame(
            &layout(Surface::new(320, 160, 1.0)),
            FrameDecorations {
                style: &style,
                unit: "°C",
                hover_index: None,
                label_offset: label_offset(0),
            },
        )
        .expect("frame");

        frame.validate().expect("valid frame");
        let series = frame.layer(CanvasLayerKind::Series).expect("series layer");
        assert_eq!(series.areas.len(), 1);
        assert_eq!(series.polylines.len(), 2);
        assert!(!frame.layer(CanvasLayerKind::Grid).expect("grid").lines.is_empty());
        assert!(frame.layer(CanvasLayerKind::Overlay).expect("overlay").texts.is_empty());
    }

    #[test]
    fn hover_adds_crosshair_and_tooltip() {
        let style = ChartStyle::default();
        let frame = build_chart_frame(
            &layout(Surface::new(320, 160, 1.0)),
            FrameDecorations {
                style: &style,
                unit: "°C",
                hover_index: Some(0),
                label_offset: label_offset(0),
            },
        )
        .expect("frame");

        frame.validate().expect("valid frame");
        let crosshair = frame.layer(CanvasLayerKind::Crosshair).expect("crosshair");
        assert_eq!(crosshair.lines.len(), 1);
        let overlay = frame.layer(CanvasLayerKind::Overlay).expect("overlay");
        assert_eq!(overlay.texts.len(), 1);
        assert_eq!(overlay.texts[0].text, "00:00 · 20.0 °C");
    }

    #[test]
    fn stale_hover_index_is_ignored() {
        let style = ChartStyle::default();
        let frame = build_chart_frame(
            &layout(Surface::new(320, 160, 1.0)),
            FrameDecorations {
                style: &style,
                unit: "",
                hover_index: Some(10_000),
                label_offset: label_offset(0),
            },
        )
        .expect("frame");
        assert!(frame.layer(CanvasLayerKind::Crosshair).expect("crosshair").lines.is_empty());
    }

    #[test]
    fn placeholder_frame_says_no_series() {
        let frame = build_placeholder_frame(Surface::new(200, 100, 2.0), &ChartStyle::default());
        frame.validate().expect("valid frame");
        let texts: Vec<_> = frame.texts().map(|text| text.text.as_str()).collect();
        assert_eq!(texts, vec![PLACEHOLDER_TEXT]);
    }
}
