//! Animation module - frame drivers stepping the plot through the years

mod chained;
mod event_loop;
mod scene;
mod timed;
mod transition;

pub use chained::ChainedDriver;
pub use event_loop::EventLoop;
pub use scene::{FrameSnapshot, Scene};
pub use timed::{settled_frames, TimedDriver};
pub use transition::{BubbleAttrs, Transition};

use crate::charts::ScaleSet;
use crate::config::PlotConfig;
use crate::data::Dataset;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// How the plot advances from one year to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Per-bubble chained transitions sharing one year counter
    Chained,
    /// Every year step scheduled up front, re-binding by location
    #[default]
    Timed,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::Chained, Strategy::Timed];

    /// Build the driver for this strategy; `None` when the dataset has no years.
    pub fn driver(
        self,
        dataset: Arc<Dataset>,
        scales: ScaleSet,
        config: &PlotConfig,
    ) -> Option<Box<dyn FrameDriver>> {
        match self {
            Strategy::Chained => ChainedDriver::new(dataset, scales, config)
                .map(|d| Box::new(d) as Box<dyn FrameDriver>),
            Strategy::Timed => TimedDriver::new(dataset, scales, config)
                .map(|d| Box::new(d) as Box<dyn FrameDriver>),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Chained => write!(f, "Chained transitions"),
            Strategy::Timed => write!(f, "Timed rebind"),
        }
    }
}

/// Advances a scene on a virtual millisecond clock.
pub trait FrameDriver: Send {
    fn strategy(&self) -> Strategy;

    /// Fire everything due at or before `now_ms`, then hold the clock there.
    fn advance_to(&mut self, now_ms: u64);

    fn now(&self) -> u64;

    /// No steps left to fire and no bubble still moving.
    fn is_finished(&self) -> bool;

    /// Year counter for the chained strategy, displayed year for the timed one.
    fn year(&self) -> i64;

    fn scene(&self) -> &Scene;

    fn snapshot(&self) -> FrameSnapshot {
        self.scene().snapshot(self.now())
    }
}
