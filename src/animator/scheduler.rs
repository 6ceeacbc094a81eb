//! Post-render scheduling of the entrance animation.
//!
//! A new result must not be animated before its lines have been drawn. The
//! host requests a play for a result revision, then reports each committed
//! frame. The play fires on a later frame, once the first frame showing that
//! revision is at least `settle` old.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
struct PendingPlay {
    revision: u64,
    committed_at: Option<Instant>,
}

/// Defers animation start until after the result is on screen.
#[derive(Debug, Clone)]
pub struct AnimationScheduler {
    settle: Duration,
    pending: Option<PendingPlay>,
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new(Duration::from_millis(50))
    }
}

impl AnimationScheduler {
    /// Create a scheduler with the given settle delay.
    pub fn new(settle: Duration) -> Self {
        Self {
            settle,
            pending: None,
        }
    }

    /// Request a play once `revision` has been rendered. Replaces any earlier request.
    pub fn request(&mut self, revision: u64) {
        self.pending = Some(PendingPlay {
            revision,
            committed_at: None,
        });
    }

    /// Drop the pending request, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Whether a play is waiting for a render.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Revision waiting to be animated.
    pub fn pending_revision(&self) -> Option<u64> {
        self.pending.map(|p| p.revision)
    }

    /// Report a committed frame that showed `revision` with `rendered_lines` lines.
    ///
    /// Returns the number of lines to animate when the play is due.
    pub fn on_frame_committed(
        &mut self,
        revision: u64,
        rendered_lines: usize,
        now: Instant,
    ) -> Option<usize> {
        let pending = self.pending.as_mut()?;
        if pending.revision != revision {
            return None;
        }
        if rendered_lines == 0 {
            self.pending = None;
            return None;
        }

        match pending.committed_at {
            None => {
                pending.committed_at = Some(now);
                None
            }
            Some(committed) if now.saturating_duration_since(committed) >= self.settle => {
                self.pending = None;
                Some(rendered_lines)
            }
            Some(_) => None,
        }
    }
}
