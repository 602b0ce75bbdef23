//! Charts module - scales, live canvas painting and static frame rendering

mod plotter;
mod renderer;
mod scale;

pub use plotter::ChartPlotter;
pub use renderer::StaticFrameRenderer;
pub use scale::{LinearScale, ScaleSet};
