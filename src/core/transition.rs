//! # Transitions
//!
//! Deadline-ordered steps for timed view choreography (fade out, then
//! remove; hide the text, then show the form). Callers schedule a step with
//! a delay and later drain whatever is due. The timeline knows nothing about
//! what a step means.
//!
//! ```text
//! schedule(now, 300ms, Remove(5))   ──►  [ (t+300ms, Remove(5)) ]
//! due(t+100ms)                      ──►  []
//! due(t+300ms)                      ──►  [Remove(5)]
//! ```

use std::time::{Duration, Instant};

/// Length of every cross-fade. Matches the stylesheet's `transition` duration.
pub const FADE: Duration = Duration::from_millis(300);

/// Gap between inserting an element at opacity 0 and raising it to 1,
/// so the fade-in actually animates.
pub const FADE_IN_DELAY: Duration = Duration::from_millis(10);

#[derive(Debug)]
struct Scheduled<S> {
    at: Instant,
    seq: u64,
    step: S,
}

/// Pending steps, kept sorted by deadline. Ties keep insertion order.
#[derive(Debug)]
pub struct Timeline<S> {
    pending: Vec<Scheduled<S>>,
    next_seq: u64,
}

impl<S> Default for Timeline<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Timeline<S> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_seq: 0,
        }
    }

    /// Queue `step` to fire `delay` after `now`.
    pub fn schedule(&mut self, now: Instant, delay: Duration, step: S) {
        let at = now + delay;
        let seq = self.next_seq;
        self.next_seq += 1;
        let idx = self
            .pending
            .partition_point(|s| (s.at, s.seq) <= (at, seq));
        self.pending.insert(idx, Scheduled { at, seq, step });
    }

    /// Remove and return every step whose deadline is at or before `now`.
    pub fn due(&mut self, now: Instant) -> Vec<S> {
        let split = self.pending.partition_point(|s| s.at <= now);
        self.pending.drain(..split).map(|s| s.step).collect()
    }

    /// Drop pending steps matching `pred`, e.g. all steps for an element
    /// that no longer exists.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&S) -> bool) {
        self.pending.retain(|s| !pred(&s.step));
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.first().map(|s| s.at)
    }
}
