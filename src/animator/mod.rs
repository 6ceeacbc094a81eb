//! Staggered entrance animation for result lines.
//!
//! The animator knows nothing about how lines are drawn. It turns a line
//! count and a clock into per-line [`LineFrame`]s: each line starts shifted
//! and transparent and eases to its natural position at full opacity, with
//! successive lines starting one stagger apart. Every `play` resets the whole
//! timeline, so replaying yields the same sequence of frames.

mod easing;
mod scheduler;

use std::time::{Duration, Instant};

pub use easing::{Easing, Tweenable};
pub use scheduler::AnimationScheduler;

/// Timing parameters shared by every line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaggerTiming {
    /// Animation length for a single line
    pub duration: Duration,
    /// Delay between the start of line `i` and line `i + 1`
    pub stagger: Duration,
    /// Initial offset, in cells
    pub offset: f64,
    /// Easing curve applied to both opacity and offset
    pub easing: Easing,
}

impl Default for StaggerTiming {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(500),
            stagger: Duration::from_millis(100),
            offset: 4.0,
            easing: Easing::EaseOut,
        }
    }
}

impl StaggerTiming {
    /// Start time of a line relative to the start of the animation.
    pub fn start_of(&self, index: usize) -> Duration {
        self.stagger.saturating_mul(index as u32)
    }

    /// Visual state of line `index` at `elapsed` since the animation started.
    pub fn frame(&self, index: usize, elapsed: Duration) -> LineFrame {
        let start = self.start_of(index);
        if elapsed <= start {
            return LineFrame::hidden(self.offset);
        }
        let local = elapsed - start;
        if self.duration.is_zero() || local >= self.duration {
            return LineFrame::SETTLED;
        }
        let progress = local.as_secs_f64() / self.duration.as_secs_f64();
        let eased = self.easing.apply(progress);
        LineFrame {
            opacity: 0.0_f64.lerp(&1.0, eased).clamp(0.0, 1.0),
            offset: self.offset.lerp(&0.0, eased),
        }
    }
}

/// Visual state of one line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFrame {
    /// 0.0 (invisible) to 1.0 (fully visible)
    pub opacity: f64,
    /// Remaining offset from the natural position, in cells
    pub offset: f64,
}

impl LineFrame {
    /// Natural position, fully visible.
    pub const SETTLED: LineFrame = LineFrame {
        opacity: 1.0,
        offset: 0.0,
    };

    /// Initial state before a line's animation starts.
    pub fn hidden(offset: f64) -> Self {
        Self {
            opacity: 0.0,
            offset,
        }
    }

    /// Whether the line has reached its final state.
    pub fn is_settled(&self) -> bool {
        *self == Self::SETTLED
    }
}

/// Entrance animation over a set of rendered lines.
#[derive(Debug, Clone)]
pub struct EntranceAnimation {
    timing: StaggerTiming,
    line_count: usize,
    started_at: Option<Instant>,
}

impl Default for EntranceAnimation {
    fn default() -> Self {
        Self::new(StaggerTiming::default())
    }
}

impl EntranceAnimation {
    /// Create an idle animation.
    pub fn new(timing: StaggerTiming) -> Self {
        Self {
            timing,
            line_count: 0,
            started_at: None,
        }
    }

    /// Start the animation over `line_count` lines, resetting any previous run.
    ///
    /// Returns false and leaves the animation idle when there are no lines.
    pub fn play(&mut self, line_count: usize, now: Instant) -> bool {
        if line_count == 0 {
            tracing::debug!("entrance animation skipped: no rendered lines");
            self.stop();
            return false;
        }
        self.line_count = line_count;
        self.started_at = Some(now);
        tracing::debug!(lines = line_count, "entrance animation started");
        true
    }

    /// Play again over the same lines.
    pub fn replay(&mut self, now: Instant) -> bool {
        self.play(self.line_count, now)
    }

    /// Drop the current run. Lines render settled until the next `play`.
    pub fn stop(&mut self) {
        self.started_at = None;
    }

    /// Frame for a single line. Lines outside a run are settled.
    pub fn frame_for(&self, index: usize, now: Instant) -> LineFrame {
        match self.started_at {
            Some(started) if index < self.line_count => {
                self.timing.frame(index, now.saturating_duration_since(started))
            }
            _ => LineFrame::SETTLED,
        }
    }

    /// Frames for every line of the current run.
    pub fn frames(&self, now: Instant) -> Vec<LineFrame> {
        (0..self.line_count)
            .map(|index| self.frame_for(index, now))
            .collect()
    }
}
