//! Control Panel Widget
//! Left side panel with data source, strategy choice and playback controls.

use crate::animation::Strategy;
use egui::{Color32, ComboBox, RichText};
use std::path::PathBuf;

/// User settings for the animation
#[derive(Default, Clone)]
pub struct UserSettings {
    pub csv_path: Option<PathBuf>,
    pub strategy: Strategy,
}

/// Left side control panel with file selection and playback controls.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub year_range: Option<(i64, i64)>,
    pub record_count: usize,
    pub progress: f32,
    pub status: String,
    pub start_enabled: bool,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            year_range: None,
            record_count: 0,
            progress: 0.0,
            status: "Ready".to_string(),
            start_enabled: false,
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new(strategy: Strategy) -> Self {
        let mut panel = Self::default();
        panel.settings.strategy = strategy;
        panel
    }

    /// Update dataset summary after CSV load
    pub fn update_dataset(&mut self, record_count: usize, year_range: Option<(i64, i64)>) {
        self.record_count = record_count;
        self.year_range = year_range;
        self.start_enabled = record_count > 0 && year_range.is_some();
        self.export_enabled = self.start_enabled;
    }

    /// Percentage of the year range covered by `year`.
    pub fn year_progress(&self, year: i64) -> f32 {
        match self.year_range {
            Some((min, max)) if max > min => {
                let done = (year.clamp(min, max) - min) as f32;
                done / (max - min) as f32 * 100.0
            }
            Some(_) => 100.0,
            None => 0.0,
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🫧 Bubble Timeline")
                    .size(22.0)
                    .color(Color32::from_rgb(70, 130, 180)),
            );
            ui.label(
                RichText::new("Fertility vs. life expectancy")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== CSV File Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .settings
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.settings.csv_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });

                if let Some((min, max)) = self.year_range {
                    ui.label(
                        RichText::new(format!(
                            "{} records, years {}–{}",
                            self.record_count, min, max
                        ))
                        .size(11.0)
                        .color(Color32::GRAY),
                    );
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Strategy Section =====
        ui.label(RichText::new("⚙️ Animation").size(14.0).strong());
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([90.0, 20.0], egui::Label::new("Strategy:"));
            ComboBox::from_id_salt("strategy")
                .width(170.0)
                .selected_text(self.settings.strategy.to_string())
                .show_ui(ui, |ui| {
                    for strategy in Strategy::ALL {
                        ui.selectable_value(
                            &mut self.settings.strategy,
                            strategy,
                            strategy.to_string(),
                        );
                    }
                });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.start_enabled, |ui| {
                let button = egui::Button::new(RichText::new("▶ Play").size(16.0))
                    .min_size(egui::vec2(200.0, 35.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::Start;
                }
            });

            ui.add_space(8.0);

            ui.add_enabled_ui(self.export_enabled, |ui| {
                let export_button =
                    egui::Button::new(RichText::new("🖼 Export Frames").size(14.0))
                        .min_size(egui::vec2(150.0, 30.0));
                if ui.add(export_button).clicked() {
                    action = ControlPanelAction::ExportFrames;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Progress").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(egui::ProgressBar::new(self.progress / 100.0).show_percentage());

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Complete") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    Start,
    ExportFrames,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn loading_a_dataset_enables_playback() {
        let mut panel = ControlPanel::new(Strategy::Chained);
        assert!(!panel.start_enabled);
        assert_eq!(panel.settings.strategy, Strategy::Chained);

        panel.update_dataset(120, Some((1960, 2015)));
        assert!(panel.start_enabled);
        assert!(panel.export_enabled);

        panel.update_dataset(0, None);
        assert!(!panel.start_enabled);
    }

    #[test]
    fn progress_follows_the_year() {
        let mut panel = ControlPanel::default();
        assert_eq!(panel.year_progress(2000), 0.0);

        panel.update_dataset(10, Some((2000, 2010)));
        assert_eq!(panel.year_progress(2000), 0.0);
        assert_eq!(panel.year_progress(2005), 50.0);
        assert_eq!(panel.year_progress(2020), 100.0);

        panel.update_dataset(1, Some((2000, 2000)));
        assert_eq!(panel.year_progress(2000), 100.0);
    }
}
