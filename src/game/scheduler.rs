// Scheduled session transitions
//
// Every delayed state change (begin listening after playback, clear
// feedback, delayed stop, replay after a wrong attempt, cooldown end) is
// an explicit event with a due time. stop() cancels the whole set, which
// structurally guarantees no stale timer fires into a new round. Time is
// always passed in, never sampled here, so tests control the clock.

use std::time::Instant;

/// A transition the session asked to happen later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Playback finished; switch to listening and open a window
    BeginListening,
    /// Hide the transient feedback message
    ClearFeedback,
    /// Leave listening and return to idle
    StopListening,
    /// Re-play the current melody (after a wrong attempt)
    ReplayMelody,
    /// Resolution cooldown elapsed; accept pitch samples again
    EndCooldown,
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    due: Instant,
    event: SessionEvent,
}

/// Pending scheduled transitions, drained in due order.
#[derive(Debug, Default)]
pub struct TransitionScheduler {
    pending: Vec<Scheduled>,
}

impl TransitionScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Instant, event: SessionEvent) {
        self.pending.push(Scheduled { due, event });
    }

    /// Remove and return every event due at `now`, ordered by due time.
    pub fn take_due(&mut self, now: Instant) -> Vec<SessionEvent> {
        let mut due: Vec<Scheduled> = Vec::new();
        self.pending.retain(|scheduled| {
            if scheduled.due <= now {
                due.push(*scheduled);
                false
            } else {
                true
            }
        });

        due.sort_by_key(|scheduled| scheduled.due);
        due.into_iter().map(|scheduled| scheduled.event).collect()
    }

    /// Drop every pending event.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Drop pending events of one kind.
    pub fn cancel(&mut self, event: SessionEvent) {
        self.pending.retain(|scheduled| scheduled.event != event);
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Due time of the next pending event, if any.
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.iter().map(|scheduled| scheduled.due).min()
    }
}
