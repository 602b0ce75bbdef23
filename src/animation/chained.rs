//! Chained Transition Driver (strategy A)
//!
//! Every bubble runs its own chain of transitions. When one of a bubble's
//! transitions starts, the driver bumps the shared year counter and retargets
//! that bubble to its record for the new year, then re-arms the next link.
//!
//! The counter is shared by all bubbles, so bubbles whose transitions start at
//! the same instant each bump it once and each read a different year. This is
//! kept as-is. If a bubble has no record for the year it reads, it keeps its
//! previous record and re-arms anyway, producing a transition that goes nowhere.

use crate::animation::{EventLoop, FrameDriver, Scene, Strategy};
use crate::charts::ScaleSet;
use crate::config::PlotConfig;
use crate::data::Dataset;
use std::sync::Arc;
use tracing::{debug, trace};

pub struct ChainedDriver {
    dataset: Arc<Dataset>,
    scales: ScaleSet,
    duration_ms: u64,
    events: EventLoop<String>,
    scene: Scene,
    /// Shared year counter, read and bumped by every bubble's chain
    counter: i64,
    max_year: i64,
}

impl ChainedDriver {
    /// Draw the first year and start one chain per bubble at time zero.
    pub fn new(dataset: Arc<Dataset>, scales: ScaleSet, config: &PlotConfig) -> Option<Self> {
        let (min_year, max_year) = dataset.year_extent()?;
        let mut scene = Scene::new();
        let mut events = EventLoop::new();

        for record in dataset.records_for_year(min_year) {
            if scene.contains(&record.location) {
                continue;
            }
            scene.spawn(record.clone(), scales.attrs_for(record));
            events.schedule_in(0, record.location.clone());
        }
        // The label shows the first year only; the chains never update it.
        scene.set_year_label(min_year);

        debug!(
            bubbles = scene.len(),
            min_year, max_year, "chained driver started"
        );

        Some(Self {
            dataset,
            scales,
            duration_ms: config.chained_duration_ms,
            events,
            scene,
            counter: min_year,
            max_year,
        })
    }

    pub fn counter(&self) -> i64 {
        self.counter
    }

    /// A transition of `location` just started.
    fn on_transition_start(&mut self, location: String) {
        self.counter += 1;
        if self.counter >= self.max_year {
            trace!(
                location = %location,
                counter = self.counter,
                remaining = self.events.pending(),
                "chain finished"
            );
            return;
        }

        let Some(bubble) = self.scene.get(&location) else {
            return;
        };
        let datum = match self.dataset.record_for(&location, self.counter) {
            Some(record) => record.clone(),
            None => {
                trace!(location = %location, year = self.counter, "no record, keeping previous");
                bubble.datum.clone()
            }
        };

        let target = self.scales.attrs_for(&datum);
        let now = self.events.now();
        self.scene
            .animate_to(&location, datum, target, now, self.duration_ms);
        self.events.schedule_in(self.duration_ms, location);
    }
}

impl FrameDriver for ChainedDriver {
    fn strategy(&self) -> Strategy {
        Strategy::Chained
    }

    fn advance_to(&mut self, now_ms: u64) {
        while let Some(location) = self.events.next_due(now_ms) {
            self.on_transition_start(location);
        }
        self.events.settle_at(now_ms);
    }

    fn now(&self) -> u64 {
        self.events.now()
    }

    fn is_finished(&self) -> bool {
        self.events.is_idle() && !self.scene.is_animating(self.events.now())
    }

    fn year(&self) -> i64 {
        self.counter()
    }

    fn scene(&self) -> &Scene {
        &self.scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{record, sample_dataset, Record};
    use pretty_assertions::assert_eq;

    fn driver(ds: Dataset) -> ChainedDriver {
        let config = PlotConfig::default();
        let scales = ScaleSet::from_dataset(&ds, &config).expect("scales");
        ChainedDriver::new(Arc::new(ds), scales, &config).expect("driver")
    }

    fn every_year(locations: &[&str], years: std::ops::RangeInclusive<i64>) -> Dataset {
        let mut records: Vec<Record> = Vec::new();
        for year in years {
            for (i, loc) in locations.iter().enumerate() {
                let offset = (year - 2000) as f64;
                let fert = 1.0 + i as f64 + offset * 0.1;
                records.push(record(loc, year, fert, 50.0 + offset, 10.0 + i as f64));
            }
        }
        Dataset::new(records)
    }

    #[test]
    fn first_frame_shows_min_year() {
        let d = driver(sample_dataset());
        let names: Vec<&str> = d.scene().locations().collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(d.scene().year_label(), Some(2000));
        assert_eq!(d.counter(), 2000);
        assert_eq!(d.events.pending(), 3);
    }

    #[test]
    fn simultaneous_starts_each_bump_the_shared_counter() {
        let mut d = driver(every_year(&["A", "B", "C"], 2000..=2010));
        d.advance_to(0);

        assert_eq!(d.counter(), 2003);
        let years: Vec<i64> = ["A", "B", "C"]
            .iter()
            .map(|loc| d.scene().get(loc).map(|b| b.datum.time).unwrap_or_default())
            .collect();
        assert_eq!(years, vec![2001, 2002, 2003]);
        // the label is never advanced by the chains
        assert_eq!(d.scene().year_label(), Some(2000));
    }

    #[test]
    fn missing_record_rearms_with_previous_datum() {
        let mut d = driver(Dataset::new(vec![
            record("C", 2000, 6.0, 50.0, 100.0),
            record("C", 2002, 5.5, 52.0, 98.0),
            record("Z", 2003, 3.0, 65.0, 20.0),
        ]));

        d.advance_to(0);
        let bubble = d.scene().get("C").expect("bubble");
        assert_eq!(d.counter(), 2001);
        assert_eq!(bubble.datum.time, 2000);
        assert_eq!(bubble.motion.from, bubble.motion.to);
        assert_eq!(d.events.pending(), 1);

        d.advance_to(10_000);
        assert_eq!(d.counter(), 2002);
        assert_eq!(d.scene().get("C").map(|b| b.datum.time), Some(2002));

        d.advance_to(20_000);
        assert_eq!(d.counter(), 2003);
        assert_eq!(d.events.pending(), 0);
    }

    #[test]
    fn counter_is_monotonic_and_terminates() {
        let ds = every_year(&["A", "B", "C", "D", "E"], 2000..=2040);
        let (_, max_year) = ds.year_extent().expect("years");
        let mut d = driver(ds);

        let mut seen = vec![d.counter()];
        let mut now = 0;
        while !d.is_finished() {
            d.advance_to(now);
            seen.push(d.counter());
            now += 2_500;
            assert!(now < 10_000_000, "animation never finished");
        }

        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert!(d.counter() >= max_year);
        // chained bubbles are moved, never removed
        assert_eq!(d.scene().len(), 5);
    }

    #[test]
    fn bubbles_move_towards_their_new_record() {
        let mut d = driver(sample_dataset());
        let start = d.snapshot().bubbles[0].attrs;

        d.advance_to(5_000);
        let mid = d.snapshot().bubbles[0].attrs;
        d.advance_to(10_000);
        let end = d.snapshot().bubbles[0].attrs;

        assert!(start.cx < mid.cx && mid.cx < end.cx);
        assert_eq!(d.scene().get("A").map(|b| b.datum.time), Some(2001));
    }
}
