//! # Refresh Poller
//!
//! Decides when the message list should be reloaded. The list is refreshed
//! on a fixed interval; with `pause_while_editing`, a tick that lands while
//! an edit or reply form is open is skipped so the reload does not throw
//! away what the user is typing. The next tick tries again.

use std::time::{Duration, Instant};

use log::debug;

use crate::core::view::{BoardView, Screen};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub struct Poller {
    interval: Duration,
    pause_while_editing: bool,
    next: Instant,
}

impl Poller {
    pub fn new(interval: Duration, pause_while_editing: bool, now: Instant) -> Self {
        Self {
            interval,
            pause_while_editing,
            next: now + interval,
        }
    }

    pub fn next_tick(&self) -> Instant {
        self.next
    }

    /// Restarts the cadence from `now`, e.g. right after a login already
    /// loaded the list.
    pub fn rearm(&mut self, now: Instant) {
        self.next = now + self.interval;
    }

    /// Returns true if a reload should run now. Consumes the tick either way.
    pub fn should_refresh(&mut self, now: Instant, view: &BoardView) -> bool {
        if now < self.next {
            return false;
        }
        // Fixed cadence: missed ticks collapse into one.
        while self.next <= now {
            self.next += self.interval;
        }

        if view.screen != Screen::Content {
            return false;
        }
        if self.pause_while_editing && view.is_busy() {
            debug!("Skipping refresh: edit or reply in progress");
            return false;
        }
        true
    }
}
