//! Static Frame Renderer
//! Renders frames with plotters for export: SVG text or PNG bytes.
//!
//! Layout matches the live canvas:
//! 1. Bottom axis (fertility rate) and left axis (life expectancy) with ticks
//! 2. Year label near the top
//! 3. One filled circle per bubble

use crate::animation::FrameSnapshot;
use crate::charts::plotter::format_tick;
use crate::charts::{LinearScale, ScaleSet};
use crate::config::PlotConfig;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use rayon::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

const TICK_LEN: i32 = 6;
const TICK_COUNT: usize = 10;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Frame buffer has the wrong size")]
    Buffer,
}

fn px(v: f64) -> i32 {
    v.round() as i32
}

pub struct StaticFrameRenderer;

impl StaticFrameRenderer {
    fn canvas_size(config: &PlotConfig) -> (u32, u32) {
        (config.width.round() as u32, config.height.round() as u32)
    }

    /// Render one frame as an SVG document.
    #[cfg(test)]
    pub fn render_svg(
        frame: &FrameSnapshot,
        scales: &ScaleSet,
        config: &PlotConfig,
    ) -> Result<String, RenderError> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, Self::canvas_size(config))
                .into_drawing_area();
            Self::draw_frame(&root, frame, scales, config)?;
        }
        Ok(svg)
    }

    /// Render one frame as PNG bytes.
    pub fn render_png(
        frame: &FrameSnapshot,
        scales: &ScaleSet,
        config: &PlotConfig,
    ) -> Result<Vec<u8>, RenderError> {
        let (width, height) = Self::canvas_size(config);
        let mut buffer = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height))
                .into_drawing_area();
            Self::draw_frame(&root, frame, scales, config)?;
        }

        let img = image::RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Buffer)?;
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Write `frame_<year>.png` for every frame into `dir`, rendering in parallel.
    pub fn export_frames(
        frames: &[FrameSnapshot],
        dir: &Path,
        scales: &ScaleSet,
        config: &PlotConfig,
    ) -> Result<Vec<PathBuf>, RenderError> {
        std::fs::create_dir_all(dir)?;

        let paths = frames
            .par_iter()
            .enumerate()
            .map(|(idx, frame)| {
                let name = match frame.year_label {
                    Some(year) => format!("frame_{year}.png"),
                    None => format!("frame_{idx:04}.png"),
                };
                let path = dir.join(name);
                let bytes = Self::render_png(frame, scales, config)?;
                std::fs::write(&path, bytes)?;
                debug!(path = %path.display(), "frame written");
                Ok(path)
            })
            .collect::<Result<Vec<_>, RenderError>>()?;

        info!(frames = paths.len(), dir = %dir.display(), "frames exported");
        Ok(paths)
    }

    fn draw_frame<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        frame: &FrameSnapshot,
        scales: &ScaleSet,
        config: &PlotConfig,
    ) -> Result<(), RenderError> {
        let draw_err = |e: DrawingAreaErrorKind<DB::ErrorType>| RenderError::Draw(e.to_string());

        root.fill(&WHITE).map_err(draw_err)?;

        Self::draw_bottom_axis(root, &scales.x, config.height - config.margin)?;
        Self::draw_left_axis(root, &scales.y, config.margin)?;

        if let Some(year) = frame.year_label {
            let style = ("sans-serif", 16)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Left, VPos::Bottom));
            root.draw(&Text::new(
                year.to_string(),
                (px(config.label_x), px(config.label_y)),
                style,
            ))
            .map_err(draw_err)?;
        }

        let [r, g, b] = config.fill;
        let fill = RGBColor(r, g, b).filled();
        for bubble in &frame.bubbles {
            root.draw(&Circle::new(
                (px(bubble.attrs.cx), px(bubble.attrs.cy)),
                px(bubble.attrs.r),
                fill,
            ))
            .map_err(draw_err)?;
        }

        root.present().map_err(draw_err)?;
        Ok(())
    }

    fn draw_bottom_axis<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        scale: &LinearScale,
        y: f64,
    ) -> Result<(), RenderError> {
        let draw_err = |e: DrawingAreaErrorKind<DB::ErrorType>| RenderError::Draw(e.to_string());
        let y = px(y);
        root.draw(&PathElement::new(
            vec![(px(scale.range.0), y), (px(scale.range.1), y)],
            BLACK,
        ))
        .map_err(draw_err)?;

        let label_style = ("sans-serif", 10)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Top));
        for tick in scale.ticks(TICK_COUNT) {
            let x = px(scale.apply(tick));
            root.draw(&PathElement::new(vec![(x, y), (x, y + TICK_LEN)], BLACK))
                .map_err(draw_err)?;
            root.draw(&Text::new(
                format_tick(tick),
                (x, y + TICK_LEN + 2),
                label_style.clone(),
            ))
            .map_err(draw_err)?;
        }
        Ok(())
    }

    fn draw_left_axis<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        scale: &LinearScale,
        x: f64,
    ) -> Result<(), RenderError> {
        let draw_err = |e: DrawingAreaErrorKind<DB::ErrorType>| RenderError::Draw(e.to_string());
        let x = px(x);
        root.draw(&PathElement::new(
            vec![(x, px(scale.range.0)), (x, px(scale.range.1))],
            BLACK,
        ))
        .map_err(draw_err)?;

        let label_style = ("sans-serif", 10)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Right, VPos::Center));
        for tick in scale.ticks(TICK_COUNT) {
            let y = px(scale.apply(tick));
            root.draw(&PathElement::new(vec![(x - TICK_LEN, y), (x, y)], BLACK))
                .map_err(draw_err)?;
            root.draw(&Text::new(
                format_tick(tick),
                (x - TICK_LEN - 2, y),
                label_style.clone(),
            ))
            .map_err(draw_err)?;
        }
        Ok(())
    }
}
