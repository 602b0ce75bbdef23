//! Chart Viewer Widget
//! Central panel showing the animated canvas at its configured size.

use crate::animation::FrameSnapshot;
use crate::charts::{ChartPlotter, ScaleSet};
use crate::config::PlotConfig;
use egui::{RichText, Sense};

/// Holds the last frame handed over by the driver and paints it.
#[derive(Default)]
pub struct ChartViewer {
    pub frame: Option<FrameSnapshot>,
    pub scales: Option<ScaleSet>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the canvas
    pub fn clear(&mut self) {
        self.frame = None;
        self.scales = None;
    }

    pub fn set_frame(&mut self, frame: FrameSnapshot, scales: ScaleSet) {
        self.frame = Some(frame);
        self.scales = Some(scales);
    }

    /// Draw the canvas centered in the available space
    pub fn show(&self, ui: &mut egui::Ui, config: &PlotConfig) {
        let (Some(frame), Some(scales)) = (&self.frame, &self.scales) else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        let size = egui::vec2(config.width as f32, config.height as f32);
        ui.vertical_centered(|ui| {
            ui.add_space(10.0);
            let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
            let painter = ui.painter_at(rect);
            ChartPlotter::paint_frame(&painter, rect, frame, scales, config);
        });
    }
}
