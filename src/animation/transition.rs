//! Bubble attributes and timed interpolation between them.

/// Position and radius of one bubble, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubbleAttrs {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

impl BubbleAttrs {
    pub fn lerp(&self, to: &BubbleAttrs, t: f64) -> BubbleAttrs {
        BubbleAttrs {
            cx: self.cx + (to.cx - self.cx) * t,
            cy: self.cy + (to.cy - self.cy) * t,
            r: self.r + (to.r - self.r) * t,
        }
    }
}

/// Cubic in-out easing, the default ease for chart transitions.
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// Motion from one attribute set to another over a time window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub from: BubbleAttrs,
    pub to: BubbleAttrs,
    pub start_ms: u64,
    pub duration_ms: u64,
}

impl Transition {
    /// A bubble resting at `attrs`.
    pub fn at_rest(attrs: BubbleAttrs) -> Self {
        Self {
            from: attrs,
            to: attrs,
            start_ms: 0,
            duration_ms: 0,
        }
    }

    pub fn end_ms(&self) -> u64 {
        self.start_ms + self.duration_ms
    }

    pub fn sample(&self, now_ms: u64) -> BubbleAttrs {
        if now_ms <= self.start_ms && self.duration_ms > 0 {
            return self.from;
        }
        if now_ms >= self.end_ms() {
            return self.to;
        }
        let t = (now_ms - self.start_ms) as f64 / self.duration_ms as f64;
        self.from.lerp(&self.to, ease_cubic_in_out(t))
    }

    pub fn is_active(&self, now_ms: u64) -> bool {
        now_ms < self.end_ms()
    }
}
