use std::time::{Duration, Instant};

use super::SwitchEdge;

/// Turns raw line samples into edges once a level has held for `window`.
///
/// The first settled level only produces an edge when it is active, so a
/// switch that is already ON at startup is reported once.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    stable: Option<bool>,
    pending: Option<(bool, Instant)>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            stable: None,
            pending: None,
        }
    }

    /// Feed one sample taken at `now`; returns an edge when the settled level changes.
    pub fn update(&mut self, active: bool, now: Instant) -> Option<SwitchEdge> {
        if self.stable == Some(active) {
            self.pending = None;
            return None;
        }

        let since = match self.pending {
            Some((level, since)) if level == active => since,
            _ => {
                self.pending = Some((active, now));
                now
            }
        };
        if now.saturating_duration_since(since) < self.window {
            return None;
        }

        let first = self.stable.is_none();
        self.stable = Some(active);
        self.pending = None;
        match (first, active) {
            (_, true) => Some(SwitchEdge::Activated),
            (true, false) => None,
            (false, false) => Some(SwitchEdge::Deactivated),
        }
    }
}
