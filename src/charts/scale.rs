//! Linear Scales
//! Maps dataset extents onto canvas pixels for x, y and bubble radius.

use crate::animation::BubbleAttrs;
use crate::config::PlotConfig;
use crate::data::{Dataset, Field, Record};

/// Linear mapping from a domain interval onto a range interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Map a domain value onto the range.
    ///
    /// A zero-width domain maps every value to the middle of the range.
    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        let t = if span == 0.0 { 0.5 } else { (value - d0) / span };
        r0 + t * (r1 - r0)
    }

    /// Round tick values inside the domain, roughly `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };
        if count == 0 || !(hi - lo).is_finite() {
            return Vec::new();
        }
        if hi == lo {
            return vec![lo];
        }

        let step = nice_step(hi - lo, count);
        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        // Multiplying integer indices avoids accumulating float error.
        (first..=last).map(|i| i as f64 * step).collect()
    }
}

/// Step of the form 1, 2 or 5 times a power of ten.
fn nice_step(range: f64, target_steps: usize) -> f64 {
    let raw_step = range / target_steps as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let normalized = raw_step / magnitude;

    let nice = if normalized >= 50f64.sqrt() {
        10.0
    } else if normalized >= 10f64.sqrt() {
        5.0
    } else if normalized >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };

    nice * magnitude
}

/// The three scales a frame is drawn with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleSet {
    /// Fertility rate to horizontal pixels
    pub x: LinearScale,
    /// Life expectancy to vertical pixels, larger values higher up
    pub y: LinearScale,
    /// Population to bubble radius
    pub r: LinearScale,
}

impl ScaleSet {
    /// Build scales from the dataset extents; `None` for an empty dataset.
    pub fn from_dataset(dataset: &Dataset, config: &PlotConfig) -> Option<Self> {
        let (fert_min, fert_max) = dataset.extent(Field::FertilityRate)?;
        let (life_min, life_max) = dataset.extent(Field::LifeExpectancy)?;
        let (pop_min, pop_max) = dataset.extent(Field::Population)?;

        Some(Self {
            x: LinearScale::new(
                (fert_min, fert_max),
                (config.margin, config.width - config.margin),
            ),
            y: LinearScale::new(
                (life_min - config.y_padding, life_max + config.y_padding),
                (config.height - config.margin, config.margin),
            ),
            r: LinearScale::new((pop_min, pop_max), (config.dot_min, config.dot_max)),
        })
    }

    pub fn attrs_for(&self, record: &Record) -> BubbleAttrs {
        BubbleAttrs {
            cx: self.x.apply(record.fertility_rate),
            cy: self.y.apply(record.life_expectancy),
            r: self.r.apply(record.pop_mlns),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{record, sample_dataset};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
    }

    #[test]
    fn three_record_example() {
        let ds = Dataset::new(vec![
            record("A", 2000, 2.0, 70.0, 10.0),
            record("B", 2000, 4.0, 60.0, 50.0),
            record("C", 2000, 6.0, 50.0, 100.0),
        ]);
        let scales = ScaleSet::from_dataset(&ds, &PlotConfig::default()).expect("scales");

        assert_eq!(scales.x.domain, (2.0, 6.0));
        assert_eq!(scales.x.range, (50.0, 450.0));
        assert_eq!(scales.x.apply(2.0), 50.0);
        assert_eq!(scales.x.apply(6.0), 450.0);
        assert_eq!(scales.r.apply(10.0), 5.0);
        assert_eq!(scales.r.apply(100.0), 30.0);

        // y is padded by 5 and inverted
        assert_eq!(scales.y.domain, (45.0, 75.0));
        assert_eq!(scales.y.apply(45.0), 450.0);
        assert_eq!(scales.y.apply(75.0), 50.0);
    }

    #[test]
    fn attrs_follow_each_scale() {
        let ds = sample_dataset();
        let scales = ScaleSet::from_dataset(&ds, &PlotConfig::default()).expect("scales");
        let attrs = scales.attrs_for(&ds.records()[2]);
        assert_eq!(attrs.cx, 450.0);
        assert_eq!(attrs.r, 30.0);
        assert!(close(attrs.cy, scales.y.apply(50.0)));
    }

    #[test]
    fn empty_dataset_has_no_scales() {
        assert!(ScaleSet::from_dataset(&Dataset::default(), &PlotConfig::default()).is_none());
    }

    #[test]
    fn zero_width_domain_maps_to_range_midpoint() {
        let ds = Dataset::new(vec![
            record("A", 2000, 3.0, 60.0, 10.0),
            record("B", 2000, 3.0, 60.0, 10.0),
        ]);
        let scales = ScaleSet::from_dataset(&ds, &PlotConfig::default()).expect("scales");
        assert_eq!(scales.x.apply(3.0), 250.0);
        assert_eq!(scales.r.apply(10.0), 17.5);
        // y still has its padding, so it is not degenerate
        assert_eq!(scales.y.apply(60.0), 250.0);
    }

    #[test]
    fn ticks_are_round_and_inside_domain() {
        let scale = LinearScale::new((45.0, 75.0), (450.0, 50.0));
        assert_eq!(
            scale.ticks(5),
            vec![45.0, 50.0, 55.0, 60.0, 65.0, 70.0, 75.0]
        );
        assert_eq!(scale.ticks(10).len(), 15);

        let fert = LinearScale::new((1.13, 7.6), (50.0, 450.0));
        let ticks = fert.ticks(10);
        assert!(close(ticks[0], 1.5));
        assert!(close(ticks[ticks.len() - 1], 7.5));
        assert!(ticks.iter().all(|&t| (1.13..=7.6).contains(&t)));
    }

    proptest! {
        #[test]
        fn scale_endpoints_map_to_range_endpoints(
            values in prop::collection::vec((0.1f64..10.0, 20.0f64..90.0, 0.01f64..1500.0), 2..40),
        ) {
            let records: Vec<Record> = values
                .iter()
                .enumerate()
                .map(|(i, &(f, l, p))| record(&format!("L{i}"), 2000, f, l, p))
                .collect();
            let ds = Dataset::new(records);
            let scales = ScaleSet::from_dataset(&ds, &PlotConfig::default()).unwrap();

            for scale in [scales.x, scales.y, scales.r] {
                if scale.domain.0 == scale.domain.1 {
                    continue;
                }
                prop_assert!(close(scale.apply(scale.domain.0), scale.range.0));
                prop_assert!(close(scale.apply(scale.domain.1), scale.range.1));
            }
        }
    }
}
