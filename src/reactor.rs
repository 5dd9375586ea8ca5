use std::time::{Duration, Instant};

use crate::theme::ColorScheme;

/// Quiet period after the last resize before re-rendering.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(250);

/// Fires once after `quiet` has passed without a new trigger.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self { quiet, deadline: None }
    }

    /// Restart the quiet period.
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(RESIZE_DEBOUNCE)
    }
}

/// A re-render the reactor wants; both parts may be set at once.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Reaction {
    /// New viewport size: refit the projection and reset the view.
    pub resize: Option<(f64, f64)>,
    /// New scheme: re-resolve colours, keep the view.
    pub theme: Option<ColorScheme>,
}

impl Reaction {
    pub fn is_empty(&self) -> bool {
        self.resize.is_none() && self.theme.is_none()
    }
}

/// Turns resize and colour-scheme events into at most one pending re-render.
#[derive(Debug, Clone, Default)]
pub struct Reactor {
    debounce: Debouncer,
    size: Option<(f64, f64)>,
    theme: Option<ColorScheme>,
}

impl Reactor {
    pub fn new(quiet: Duration) -> Self {
        Self {
            debounce: Debouncer::new(quiet),
            ..Self::default()
        }
    }

    pub fn resized(&mut self, width: f64, height: f64, now: Instant) {
        self.size = Some((width, height));
        self.debounce.trigger(now);
    }

    /// Theme changes are not debounced; they are picked up on the next poll.
    pub fn theme_changed(&mut self, scheme: ColorScheme) {
        self.theme = Some(scheme);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    pub fn poll(&mut self, now: Instant) -> Option<Reaction> {
        let reaction = Reaction {
            resize: if self.debounce.poll(now) { self.size.take() } else { None },
            theme: self.theme.take(),
        };
        if reaction.is_empty() { None } else { Some(reaction) }
    }
}
