//! Bubble Timeline Main Application
//! Main window with control panel and animated chart viewer.

use crate::animation::{settled_frames, FrameDriver};
use crate::charts::{ScaleSet, StaticFrameRenderer};
use crate::config::PlotConfig;
use crate::data::{DataLoader, Dataset};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;
use tracing::{info, warn};

/// CSV loading result from background thread
enum LoadResult {
    Progress(String),
    Complete { dataset: Dataset, path: PathBuf },
    Error(String),
}

/// Frame export result from background thread
enum ExportResult {
    Complete { dir: PathBuf, count: usize },
    Error(String),
}

/// Main application window.
pub struct BubbleApp {
    config: PlotConfig,
    loader: DataLoader,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    scales: Option<ScaleSet>,
    driver: Option<Box<dyn FrameDriver>>,
    /// Animation clock in milliseconds since the driver started
    clock_ms: f64,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,

    // Async frame export
    export_rx: Option<Receiver<ExportResult>>,
    is_exporting: bool,
}

impl BubbleApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: PlotConfig) -> Self {
        let control_panel = ControlPanel::new(config.strategy);
        Self {
            config,
            loader: DataLoader::new(),
            control_panel,
            chart_viewer: ChartViewer::new(),
            scales: None,
            driver: None,
            clock_ms: 0.0,
            load_rx: None,
            is_loading: false,
            export_rx: None,
            is_exporting: false,
        }
    }

    /// Handle CSV file selection, loading in the background
    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.driver = None;
            self.chart_viewer.clear();
            self.control_panel.settings.csv_path = Some(path.clone());
            self.control_panel.set_progress(0.0, "Loading CSV file...");
            self.is_loading = true;

            let (tx, rx) = channel();
            self.load_rx = Some(rx);

            thread::spawn(move || {
                let _ = tx.send(LoadResult::Progress("Reading CSV file...".to_string()));

                match DataLoader::read_csv(&path) {
                    Ok(dataset) => {
                        let _ = tx.send(LoadResult::Complete { dataset, path });
                    }
                    Err(e) => {
                        let _ = tx.send(LoadResult::Error(e.to_string()));
                    }
                }
            });
        }
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(status) => {
                        self.control_panel.set_progress(0.0, &status);
                    }
                    LoadResult::Complete { dataset, path } => {
                        let record_count = dataset.len();
                        let location_count = dataset.locations().len();
                        let years = dataset.year_extent();
                        self.scales = ScaleSet::from_dataset(&dataset, &self.config);
                        self.loader.set_dataset(dataset, path);
                        self.control_panel.update_dataset(record_count, years);
                        self.control_panel.set_progress(
                            0.0,
                            &format!(
                                "Loaded {} records, {} locations",
                                record_count, location_count
                            ),
                        );
                        self.is_loading = false;
                        should_keep_receiver = false;
                        self.start_animation();
                    }
                    LoadResult::Error(error) => {
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {}", error));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    /// Build a fresh driver for the selected strategy and draw its first frame
    fn start_animation(&mut self) {
        let (Some(dataset), Some(scales)) = (self.loader.get_dataset(), self.scales) else {
            self.control_panel.set_progress(0.0, "No data loaded");
            return;
        };

        let strategy = self.control_panel.settings.strategy;
        let Some(mut driver) = strategy.driver(dataset, scales, &self.config) else {
            self.control_panel.set_progress(0.0, "Error: dataset has no years");
            return;
        };

        driver.advance_to(0);
        self.clock_ms = 0.0;
        self.chart_viewer.set_frame(driver.snapshot(), scales);
        info!(
            %strategy,
            year = driver.year(),
            path = ?self.loader.get_file_path(),
            "animation started"
        );
        self.driver = Some(driver);
    }

    /// Advance the running driver by the frame's elapsed time
    fn tick(&mut self, ctx: &egui::Context) {
        let Some(driver) = self.driver.as_mut() else {
            return;
        };
        let Some(scales) = self.scales else {
            return;
        };

        if driver.is_finished() {
            return;
        }

        self.clock_ms += ctx.input(|i| i.stable_dt as f64) * 1000.0;
        driver.advance_to(self.clock_ms as u64);
        self.chart_viewer.set_frame(driver.snapshot(), scales);

        let year = driver.year();
        if driver.is_finished() {
            self.control_panel.set_progress(
                100.0,
                &format!("Complete! {} ({})", year, driver.strategy()),
            );
        } else {
            let progress = self.control_panel.year_progress(year);
            self.control_panel
                .set_progress(progress, &format!("Year {} ({})", year, driver.strategy()));
            ctx.request_repaint();
        }
    }

    /// Render the settled frame of every year to PNG files in the background
    fn handle_export_frames(&mut self) {
        if self.is_exporting {
            return;
        }
        let (Some(dataset), Some(scales)) = (self.loader.get_dataset(), self.scales) else {
            self.control_panel.set_progress(0.0, "No frames to export");
            return;
        };

        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return; // User cancelled
        };

        self.control_panel.set_progress(10.0, "Rendering frames...");
        self.is_exporting = true;

        let (tx, rx) = channel();
        self.export_rx = Some(rx);
        let config = self.config.clone();

        thread::spawn(move || {
            let frames = settled_frames(dataset, scales, &config);
            let result = match StaticFrameRenderer::export_frames(&frames, &dir, &scales, &config)
            {
                Ok(paths) => ExportResult::Complete {
                    dir,
                    count: paths.len(),
                },
                Err(e) => ExportResult::Error(e.to_string()),
            };
            let _ = tx.send(result);
        });
    }

    /// Check for frame export results
    fn check_export_results(&mut self) {
        let rx = self.export_rx.take();
        if let Some(rx) = rx {
            match rx.try_recv() {
                Ok(ExportResult::Complete { dir, count }) => {
                    self.control_panel.set_progress(
                        100.0,
                        &format!("Complete! {} frames exported to {}", count, dir.display()),
                    );
                    if let Err(e) = open::that(&dir) {
                        warn!(dir = %dir.display(), error = %e, "could not open export folder");
                    }
                    self.is_exporting = false;
                }
                Ok(ExportResult::Error(error)) => {
                    self.control_panel
                        .set_progress(0.0, &format!("Error: {}", error));
                    self.is_exporting = false;
                }
                Err(TryRecvError::Empty) => {
                    self.export_rx = Some(rx);
                }
                Err(TryRecvError::Disconnected) => {
                    self.control_panel
                        .set_progress(0.0, "Error: export stopped unexpectedly");
                    self.is_exporting = false;
                }
            }
        }
    }
}

impl eframe::App for BubbleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();
        self.check_export_results();

        let animating = self.driver.as_ref().is_some_and(|d| !d.is_finished());
        if self.is_loading || self.is_exporting || animating {
            ctx.request_repaint();
        }

        self.tick(ctx);

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::Start => self.start_animation(),
                        ControlPanelAction::ExportFrames => self.handle_export_frames(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, &self.config);
        });
    }
}
