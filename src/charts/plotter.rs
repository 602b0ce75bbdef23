//! Canvas Plotter Module
//! Paints a frame (axes, year label, bubbles) onto an egui canvas.

use crate::animation::FrameSnapshot;
use crate::charts::{LinearScale, ScaleSet};
use crate::config::PlotConfig;
use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke};

const AXIS_COLOR: Color32 = Color32::BLACK;
const BACKGROUND: Color32 = Color32::WHITE;
const TICK_LEN: f32 = 6.0;
const TICK_COUNT: usize = 10;

/// Format a tick value without trailing zeros.
pub fn format_tick(value: f64) -> String {
    let formatted = format!("{:.2}", value);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Paints frames with the pixel coordinates produced by `ScaleSet`.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn fill_color(config: &PlotConfig) -> Color32 {
        let [r, g, b] = config.fill;
        Color32::from_rgb(r, g, b)
    }

    /// Paint one frame into `canvas`, whose top-left is the plot origin.
    pub fn paint_frame(
        painter: &Painter,
        canvas: Rect,
        frame: &FrameSnapshot,
        scales: &ScaleSet,
        config: &PlotConfig,
    ) {
        let origin = canvas.min;
        let at = |x: f64, y: f64| Pos2::new(origin.x + x as f32, origin.y + y as f32);

        painter.rect_filled(canvas, 0.0, BACKGROUND);

        Self::paint_bottom_axis(painter, &scales.x, config.height - config.margin, &at);
        Self::paint_left_axis(painter, &scales.y, config.margin, &at);

        if let Some(year) = frame.year_label {
            painter.text(
                at(config.label_x, config.label_y),
                Align2::LEFT_BOTTOM,
                year.to_string(),
                FontId::proportional(16.0),
                AXIS_COLOR,
            );
        }

        let fill = Self::fill_color(config);
        for bubble in &frame.bubbles {
            painter.circle_filled(
                at(bubble.attrs.cx, bubble.attrs.cy),
                bubble.attrs.r as f32,
                fill,
            );
        }
    }

    fn paint_bottom_axis(
        painter: &Painter,
        scale: &LinearScale,
        y: f64,
        at: &dyn Fn(f64, f64) -> Pos2,
    ) {
        let stroke = Stroke::new(1.0, AXIS_COLOR);
        painter.line_segment([at(scale.range.0, y), at(scale.range.1, y)], stroke);

        for tick in scale.ticks(TICK_COUNT) {
            let x = scale.apply(tick);
            let base = at(x, y);
            painter.line_segment([base, base + egui::vec2(0.0, TICK_LEN)], stroke);
            painter.text(
                base + egui::vec2(0.0, TICK_LEN + 2.0),
                Align2::CENTER_TOP,
                format_tick(tick),
                FontId::proportional(10.0),
                AXIS_COLOR,
            );
        }
    }

    fn paint_left_axis(
        painter: &Painter,
        scale: &LinearScale,
        x: f64,
        at: &dyn Fn(f64, f64) -> Pos2,
    ) {
        let stroke = Stroke::new(1.0, AXIS_COLOR);
        painter.line_segment([at(x, scale.range.0), at(x, scale.range.1)], stroke);

        for tick in scale.ticks(TICK_COUNT) {
            let y = scale.apply(tick);
            let base = at(x, y);
            painter.line_segment([base, base - egui::vec2(TICK_LEN, 0.0)], stroke);
            painter.text(
                base - egui::vec2(TICK_LEN + 2.0, 0.0),
                Align2::RIGHT_CENTER,
                format_tick(tick),
                FontId::proportional(10.0),
                AXIS_COLOR,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ticks_are_formatted_compactly() {
        assert_eq!(format_tick(45.0), "45");
        assert_eq!(format_tick(1.5), "1.5");
        assert_eq!(format_tick(0.25), "0.25");
        assert_eq!(format_tick(0.30000000000000004), "0.3");
    }

    #[test]
    fn fill_is_steel_blue_by_default() {
        assert_eq!(
            ChartPlotter::fill_color(&PlotConfig::default()),
            Color32::from_rgb(70, 130, 180)
        );
    }
}
