//! Timed Rebind Driver (strategy B)
//!
//! Every year step is queued up front with an increasing delay. Each step
//! re-binds that year's records to the bubbles keyed by location: new
//! locations enter, vanished ones exit, and the rest transition to their new
//! position and size.

use crate::animation::{EventLoop, FrameDriver, FrameSnapshot, Scene, Strategy};
use crate::charts::ScaleSet;
use crate::config::PlotConfig;
use crate::data::{Dataset, Record};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Bubble changes made by one year step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinSummary {
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
}

pub struct TimedDriver {
    dataset: Arc<Dataset>,
    scales: ScaleSet,
    transition_ms: u64,
    events: EventLoop<i64>,
    scene: Scene,
    year: i64,
    schedule: Vec<(i64, u64)>,
}

impl TimedDriver {
    /// Draw the first year and queue one step per year.
    pub fn new(dataset: Arc<Dataset>, scales: ScaleSet, config: &PlotConfig) -> Option<Self> {
        let (min_year, max_year) = dataset.year_extent()?;
        let mut scene = Scene::new();

        for record in dataset.records_for_year(min_year) {
            if !scene.contains(&record.location) {
                scene.spawn(record.clone(), scales.attrs_for(record));
            }
        }

        let mut events = EventLoop::new();
        let schedule: Vec<(i64, u64)> = (min_year..=max_year)
            .map(|year| (year, config.step_delay_ms * (year - min_year) as u64))
            .collect();
        for &(year, delay) in &schedule {
            events.schedule_in(delay, year);
        }

        debug!(
            bubbles = scene.len(),
            steps = schedule.len(),
            "timed driver started"
        );

        Some(Self {
            dataset,
            scales,
            transition_ms: config.transition_ms,
            events,
            scene,
            year: min_year,
            schedule,
        })
    }

    /// Every queued step as `(year, delay_ms)`, in year order.
    pub fn schedule(&self) -> &[(i64, u64)] {
        &self.schedule
    }

    /// Show `year`: relabel, then join that year's records by location.
    fn plot_year(&mut self, year: i64) -> JoinSummary {
        let now = self.events.now();
        self.year = year;
        self.scene.set_year_label(year);

        // First record wins when a location repeats within a year; later
        // duplicates are dropped rather than drawn as extra bubbles.
        let mut this_year: Vec<&Record> = Vec::new();
        let mut by_location: HashMap<&str, &Record> = HashMap::new();
        for record in self.dataset.records_for_year(year) {
            if by_location.insert(&record.location, record).is_none() {
                this_year.push(record);
            }
        }

        let exiting: Vec<String> = self
            .scene
            .locations()
            .filter(|loc| !by_location.contains_key(loc))
            .map(str::to_string)
            .collect();
        for location in &exiting {
            self.scene.remove(location);
        }

        let mut summary = JoinSummary {
            exited: exiting.len(),
            ..JoinSummary::default()
        };
        for record in this_year {
            let target = self.scales.attrs_for(record);
            if self.scene.contains(&record.location) {
                self.scene.animate_to(
                    &record.location,
                    record.clone(),
                    target,
                    now,
                    self.transition_ms,
                );
                summary.updated += 1;
            } else {
                self.scene.spawn(record.clone(), target);
                summary.entered += 1;
            }
        }

        debug!(
            year,
            entered = summary.entered,
            updated = summary.updated,
            exited = summary.exited,
            "year plotted"
        );
        summary
    }
}

impl FrameDriver for TimedDriver {
    fn strategy(&self) -> Strategy {
        Strategy::Timed
    }

    fn advance_to(&mut self, now_ms: u64) {
        while let Some(year) = self.events.next_due(now_ms) {
            self.plot_year(year);
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
        self.year
    }

    fn scene(&self) -> &Scene {
        &self.scene
    }
}

/// The settled frame after each year step, in year order.
pub fn settled_frames(
    dataset: Arc<Dataset>,
    scales: ScaleSet,
    config: &PlotConfig,
) -> Vec<FrameSnapshot> {
    let Some(mut driver) = TimedDriver::new(dataset, scales, config) else {
        return Vec::new();
    };
    let delays: Vec<u64> = driver.schedule().iter().map(|&(_, d)| d).collect();
    delays
        .into_iter()
        .map(|delay| {
            driver.advance_to(delay);
            driver.scene().settled_snapshot()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::scene::BubbleId;
    use crate::data::{record, sample_dataset};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn driver(ds: Dataset) -> TimedDriver {
        let config = PlotConfig::default();
        let scales = ScaleSet::from_dataset(&ds, &config).expect("scales");
        TimedDriver::new(Arc::new(ds), scales, &config).expect("driver")
    }

    fn locations_at(ds: &Dataset, year: i64) -> BTreeSet<String> {
        ds.records_for_year(year)
            .iter()
            .map(|r| r.location.clone())
            .collect()
    }

    fn scene_locations(d: &TimedDriver) -> BTreeSet<String> {
        d.scene().locations().map(str::to_string).collect()
    }

    fn id_of(d: &TimedDriver, location: &str) -> Option<BubbleId> {
        d.scene().get(location).map(|b| b.id)
    }

    #[test]
    fn steps_are_queued_with_increasing_delays() {
        let d = driver(sample_dataset());
        assert_eq!(d.schedule(), &[(2000, 0), (2001, 500), (2002, 1000)]);
        assert!(d.schedule().windows(2).all(|w| w[0].1 < w[1].1));
        // the initial frame has no label until the first step fires
        assert_eq!(d.scene().year_label(), None);
    }

    #[test]
    fn scene_matches_each_year_exactly() {
        let ds = sample_dataset();
        let mut d = driver(ds.clone());

        let schedule = d.schedule().to_vec();
        for (year, delay) in schedule {
            d.advance_to(delay);
            assert_eq!(d.year(), year);
            assert_eq!(d.scene().year_label(), Some(year));
            assert_eq!(scene_locations(&d), locations_at(&ds, year));
        }
    }

    #[test]
    fn persisting_bubbles_keep_identity() {
        let mut d = driver(sample_dataset());
        d.advance_to(0);
        let a = id_of(&d, "A");
        let c = id_of(&d, "C");

        d.advance_to(500);
        assert_eq!(id_of(&d, "A"), a);
        assert_eq!(id_of(&d, "C"), None, "C has no 2001 record");

        d.advance_to(1000);
        assert_eq!(id_of(&d, "A"), a);
        assert!(id_of(&d, "C").is_some());
        assert_ne!(id_of(&d, "C"), c, "C re-entered as a new bubble");
        assert!(id_of(&d, "D").is_some());
    }

    #[test]
    fn updates_transition_while_entries_appear_in_place() {
        let ds = sample_dataset();
        let config = PlotConfig::default();
        let scales = ScaleSet::from_dataset(&ds, &config).expect("scales");
        let mut d = TimedDriver::new(Arc::new(ds.clone()), scales, &config).expect("driver");

        d.advance_to(1000);
        let a = d.scene().get("A").expect("A").motion;
        assert_eq!(a.start_ms, 1000);
        assert_eq!(a.duration_ms, 500);
        let target_a = ds.record_for("A", 2002).map(|r| scales.attrs_for(r));
        assert_eq!(Some(a.to), target_a);

        let entered = d.scene().get("D").expect("D").motion;
        let target_d = ds.record_for("D", 2002).map(|r| scales.attrs_for(r));
        assert_eq!(Some(d.snapshot().bubbles[3].attrs), target_d);
        assert_eq!(entered.from, entered.to);

        d.advance_to(1500);
        assert!(d.is_finished());
    }

    #[test]
    fn join_reports_enter_update_exit() {
        let mut d = driver(Dataset::new(vec![
            record("A", 2000, 1.0, 60.0, 10.0),
            record("B", 2000, 2.0, 61.0, 20.0),
            record("B", 2001, 2.5, 62.0, 21.0),
            record("C", 2001, 3.0, 63.0, 30.0),
            record("C", 2001, 9.0, 99.0, 99.0),
        ]));
        d.advance_to(0);
        let summary = d.plot_year(2001);
        assert_eq!(
            summary,
            JoinSummary {
                entered: 1,
                updated: 1,
                exited: 1
            }
        );
        assert_eq!(d.scene().get("C").map(|b| b.datum.fertility_rate), Some(3.0));
    }

    #[test]
    fn settled_frames_cover_every_year() {
        let ds = sample_dataset();
        let config = PlotConfig::default();
        let scales = ScaleSet::from_dataset(&ds, &config).expect("scales");
        let frames = settled_frames(Arc::new(ds.clone()), scales, &config);

        let labels: Vec<Option<i64>> = frames.iter().map(|f| f.year_label).collect();
        assert_eq!(labels, vec![Some(2000), Some(2001), Some(2002)]);
        assert_eq!(frames[1].bubbles.len(), 2);
        let last_a = frames[2].bubbles[0].attrs;
        assert_eq!(Some(last_a), ds.record_for("A", 2002).map(|r| scales.attrs_for(r)));
    }
}
