use std::time::{Duration, Instant};

use crate::sketch::Point;

pub const MIN_SCALE: f64 = 0.5;
pub const MAX_SCALE: f64 = 8.0;
pub const ZOOM_IN_FACTOR: f64 = 1.5;
pub const ZOOM_OUT_FACTOR: f64 = 0.67;
pub const TRANSITION: Duration = Duration::from_millis(300);
/// Wheel delta (pixels) to scale exponent, as browsers report line-mode deltas.
const WHEEL_SENSITIVITY: f64 = 0.002;

/// Pan/zoom applied to the root drawing group: `screen = k * p + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    pub const IDENTITY: Self = Self { k: 1.0, x: 0.0, y: 0.0 };

    pub fn apply(&self, (px, py): Point) -> Point {
        (px * self.k + self.x, py * self.k + self.y)
    }

    pub fn invert(&self, (sx, sy): Point) -> Point {
        ((sx - self.x) / self.k, (sy - self.y) / self.k)
    }

    /// Rescale about a fixed screen point.
    fn scaled_about(&self, k: f64, (cx, cy): Point) -> Self {
        let (px, py) = self.invert((cx, cy));
        Self {
            k,
            x: cx - px * k,
            y: cy - py * k,
        }
    }

    fn lerp(&self, to: &Self, t: f64) -> Self {
        Self {
            k: self.k + (to.k - self.k) * t,
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
        }
    }

    pub fn to_svg(&self) -> String {
        format!("translate({:.3},{:.3}) scale({:.4})", self.x, self.y, self.k)
    }
}

fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Transition {
    from: ViewTransform,
    to: ViewTransform,
    start: Instant,
    duration: Duration,
}

impl Transition {
    fn at(&self, now: Instant) -> (ViewTransform, bool) {
        let elapsed = now.saturating_duration_since(self.start);
        if elapsed >= self.duration || self.duration.is_zero() {
            return (self.to, true);
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (self.from.lerp(&self.to, ease_cubic_in_out(t)), false)
    }
}

/// Scale-bounded pan/zoom state with animated discrete controls.
#[derive(Debug, Clone)]
pub struct ZoomBehavior {
    extent: (f64, f64),
    viewport: (f64, f64),
    duration: Duration,
    transform: ViewTransform,
    transition: Option<Transition>,
}

impl ZoomBehavior {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            extent: (MIN_SCALE, MAX_SCALE),
            viewport: (width, height),
            duration: TRANSITION,
            transform: ViewTransform::IDENTITY,
            transition: None,
        }
    }

    pub fn with_extent(mut self, min: f64, max: f64) -> Self {
        self.extent = (min.min(max), max.max(min));
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn extent(&self) -> (f64, f64) {
        self.extent
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    /// Where the view ends up once any running transition finishes.
    pub fn target(&self) -> ViewTransform {
        self.transition.map(|t| t.to).unwrap_or(self.transform)
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = (width, height);
    }

    fn center(&self) -> Point {
        (self.viewport.0 / 2.0, self.viewport.1 / 2.0)
    }

    fn clamp(&self, k: f64) -> f64 {
        k.clamp(self.extent.0, self.extent.1)
    }

    fn animate_to(&mut self, to: ViewTransform, now: Instant) {
        self.transition = Some(Transition {
            from: self.transform,
            to,
            start: now,
            duration: self.duration,
        });
    }

    /// Animated zoom about the viewport centre. Successive calls compound
    /// on the pending target rather than the mid-flight transform.
    pub fn scale_by(&mut self, factor: f64, now: Instant) {
        self.tick(now);
        let target = self.target();
        let k = self.clamp(target.k * factor);
        let to = target.scaled_about(k, self.center());
        self.animate_to(to, now);
    }

    pub fn zoom_in(&mut self, now: Instant) {
        self.scale_by(ZOOM_IN_FACTOR, now);
    }

    pub fn zoom_out(&mut self, now: Instant) {
        self.scale_by(ZOOM_OUT_FACTOR, now);
    }

    /// Animated return to the identity transform.
    pub fn reset(&mut self, now: Instant) {
        self.tick(now);
        self.animate_to(ViewTransform::IDENTITY, now);
    }

    /// Jump to identity without animating.
    pub fn reset_immediate(&mut self) {
        self.transition = None;
        self.transform = ViewTransform::IDENTITY;
    }

    /// Wheel gesture: negative `delta_y` zooms in about the pointer.
    pub fn wheel(&mut self, delta_y: f64, pointer: Point) {
        self.pinch(2f64.powf(-delta_y * WHEEL_SENSITIVITY), pointer);
    }

    /// Continuous zoom about a screen point; interrupts any transition.
    pub fn pinch(&mut self, factor: f64, center: Point) {
        self.transition = None;
        let k = self.clamp(self.transform.k * factor);
        self.transform = self.transform.scaled_about(k, center);
    }

    /// Pan by a screen-space delta; interrupts any transition.
    pub fn drag(&mut self, dx: f64, dy: f64) {
        self.transition = None;
        self.transform.x += dx;
        self.transform.y += dy;
    }

    /// Advance a running transition. Returns whether the transform changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(transition) = self.transition else {
            return false;
        };
        let (transform, done) = transition.at(now);
        let changed = transform != self.transform;
        self.transform = transform;
        if done {
            self.transition = None;
        }
        changed
    }

    /// Finish any running transition immediately.
    pub fn settle(&mut self) {
        if let Some(t) = self.transition.take() {
            self.transform = t.to;
        }
    }
}
