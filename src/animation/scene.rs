//! Scene Registry
//! Owns every bubble on the canvas, keyed by location, plus the year label.

use crate::animation::{BubbleAttrs, Transition};
use crate::data::Record;
use std::collections::BTreeMap;

/// Identity token of a bubble; survives moves, changes only on re-creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BubbleId(pub u64);

#[derive(Debug, Clone)]
pub struct Bubble {
    pub id: BubbleId,
    /// Record the bubble is currently showing (or heading towards)
    pub datum: Record,
    pub motion: Transition,
}

/// A bubble sampled at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleSnapshot {
    pub id: BubbleId,
    pub location: String,
    pub attrs: BubbleAttrs,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameSnapshot {
    pub year_label: Option<i64>,
    pub bubbles: Vec<BubbleSnapshot>,
}

#[derive(Debug, Default)]
pub struct Scene {
    bubbles: BTreeMap<String, Bubble>,
    year_label: Option<i64>,
    next_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bubble resting at `attrs`.
    pub fn spawn(&mut self, datum: Record, attrs: BubbleAttrs) -> BubbleId {
        let id = BubbleId(self.next_id);
        self.next_id += 1;
        self.bubbles.insert(
            datum.location.clone(),
            Bubble {
                id,
                datum,
                motion: Transition::at_rest(attrs),
            },
        );
        id
    }

    pub fn remove(&mut self, location: &str) -> Option<Bubble> {
        self.bubbles.remove(location)
    }

    pub fn get(&self, location: &str) -> Option<&Bubble> {
        self.bubbles.get(location)
    }

    pub fn contains(&self, location: &str) -> bool {
        self.bubbles.contains_key(location)
    }

    /// Start a transition from wherever the bubble is at `now_ms` towards `target`.
    pub fn animate_to(
        &mut self,
        location: &str,
        datum: Record,
        target: BubbleAttrs,
        now_ms: u64,
        duration_ms: u64,
    ) -> Option<BubbleId> {
        let bubble = self.bubbles.get_mut(location)?;
        let from = bubble.motion.sample(now_ms);
        bubble.datum = datum;
        bubble.motion = Transition {
            from,
            to: target,
            start_ms: now_ms,
            duration_ms,
        };
        Some(bubble.id)
    }

    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.bubbles.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    pub fn year_label(&self) -> Option<i64> {
        self.year_label
    }

    /// Replace the year label.
    pub fn set_year_label(&mut self, year: i64) {
        self.year_label = Some(year);
    }

    pub fn is_animating(&self, now_ms: u64) -> bool {
        self.bubbles.values().any(|b| b.motion.is_active(now_ms))
    }

    /// Bubbles as drawn at `now_ms`, ordered by location.
    pub fn snapshot(&self, now_ms: u64) -> FrameSnapshot {
        self.collect(|b| b.motion.sample(now_ms))
    }

    /// Bubbles at the end of their current transitions.
    pub fn settled_snapshot(&self) -> FrameSnapshot {
        self.collect(|b| b.motion.to)
    }

    fn collect(&self, attrs: impl Fn(&Bubble) -> BubbleAttrs) -> FrameSnapshot {
        FrameSnapshot {
            year_label: self.year_label,
            bubbles: self
                .bubbles
                .iter()
                .map(|(location, b)| BubbleSnapshot {
                    id: b.id,
                    location: location.clone(),
                    attrs: attrs(b),
                })
                .collect(),
        }
    }
}
