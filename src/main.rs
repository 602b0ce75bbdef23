//! Bubble Timeline - Animated fertility vs. life expectancy chart
//!
//! Loads a yearly CSV dataset and steps a bubble chart through the years with
//! either chained per-bubble transitions or timed per-year rebinding.

mod animation;
mod charts;
mod config;
mod data;
mod gui;

use config::PlotConfig;
use eframe::egui;
use gui::BubbleApp;
use tracing_subscriber::{fmt, EnvFilter};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bubble_timeline=debug"));

    fmt().with_env_filter(filter).with_target(false).init();
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let config = PlotConfig::discover()?;

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.width as f32 + 380.0, config.height as f32 + 80.0])
            .with_min_inner_size([800.0, 560.0])
            .with_title("Bubble Timeline"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Bubble Timeline",
        options,
        Box::new(move |cc| Ok(Box::new(BubbleApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("window failed: {e}"))
}
