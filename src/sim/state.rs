//! Session state and outbound game events
//!
//! `SessionState` is the only mutable game record. The phase state machine
//! owns it exclusively; the presentation layer sees it only through events.

use serde::{Deserialize, Serialize};

use super::keyframe::MotionCurve;
use super::scheduler::Scheduler;

/// Current phase of the fishing loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Line reeled in, waiting for a cast
    #[default]
    Ready,
    /// Cast animation playing
    Casting,
    /// Float settled, waiting for a bite
    Fishing,
    /// Fish is biting, hook now
    Bite,
    /// Hooked
    Hit,
    /// Hooked too early, too late, or on an unbeatable bite
    Miss,
    /// Reserved for equipment failure; never entered by this engine
    Broken,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Ready => "READY",
            Phase::Casting => "CASTING",
            Phase::Fishing => "FISHING",
            Phase::Bite => "BITE",
            Phase::Hit => "HIT",
            Phase::Miss => "MISS",
            Phase::Broken => "BROKEN",
        }
    }

    /// Status line shown to the player
    pub fn message(&self) -> &'static str {
        match self {
            Phase::Ready => "Ready to Cast",
            Phase::Casting => "Casting...",
            Phase::Fishing => "Waiting for bite...",
            Phase::Bite => "BITE! HOOK NOW!",
            Phase::Hit => "Catch Success!",
            Phase::Miss => "Missed...",
            Phase::Broken => "Line broke!",
        }
    }

    /// Whether the primary action casts (as opposed to hooking)
    pub fn is_cast_mode(&self) -> bool {
        matches!(self, Phase::Ready | Phase::Hit | Phase::Miss | Phase::Broken)
    }

    /// Label for the primary action button
    pub fn action_label(&self) -> &'static str {
        if self.is_cast_mode() { "CAST" } else { "HOOK" }
    }
}

/// What the float is visually doing between phase changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VisualState {
    /// Nothing on the water
    #[default]
    Idle,
    /// Playing a motion curve
    Animating(MotionKind),
    /// Settled float, looping idle bob
    Bobbing,
}

/// Which command produced a motion curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotionKind {
    CastIn,
    Bite,
    Sink,
}

/// Float and reflection curves for one motion, played together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionUpdate {
    /// Reported back through `curve_finished` when playback ends
    pub id: u64,
    pub kind: MotionKind,
    pub float: MotionCurve,
    pub reflection: MotionCurve,
    /// Catalog index for bite motions
    pub pattern_index: Option<usize>,
}

impl MotionUpdate {
    pub fn duration_ms(&self) -> f32 {
        self.float.duration_ms
    }
}

/// Outbound notification for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    PhaseChanged {
        phase: Phase,
        message: &'static str,
    },
    Motion(MotionUpdate),
}

/// The mutable game session
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub phase: Phase,
    /// Clock time the current bite started (ms)
    pub bite_start_ms: Option<u64>,
    /// Catalog index of the biting pattern
    pub active_pattern: Option<usize>,
    /// Pending timers, tagged with the phase they were scheduled under
    pub timers: Scheduler<Phase>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the current bite
    pub fn clear_bite(&mut self) {
        self.bite_start_ms = None;
        self.active_pattern = None;
    }

    /// Cancel every timer and return to READY
    pub fn reset(&mut self) {
        self.timers.cancel_all();
        self.clear_bite();
        self.phase = Phase::Ready;
    }

    /// Milliseconds since bite onset, if biting
    pub fn bite_elapsed_ms(&self) -> Option<u64> {
        self.bite_start_ms
            .map(|start| self.timers.now_ms().saturating_sub(start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::scheduler::TimerSlot;

    #[test]
    fn test_cast_mode_labels() {
        assert_eq!(Phase::Ready.action_label(), "CAST");
        assert_eq!(Phase::Hit.action_label(), "CAST");
        assert_eq!(Phase::Miss.action_label(), "CAST");
        assert_eq!(Phase::Broken.action_label(), "CAST");
        assert_eq!(Phase::Fishing.action_label(), "HOOK");
        assert_eq!(Phase::Bite.action_label(), "HOOK");
        assert_eq!(Phase::Casting.action_label(), "HOOK");
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = SessionState::new();
        session.phase = Phase::Bite;
        session.bite_start_ms = Some(10);
        session.active_pattern = Some(2);
        session.timers.schedule(TimerSlot::AutoMiss, 100, Phase::Bite);

        session.reset();
        assert_eq!(session.phase, Phase::Ready);
        assert_eq!(session.bite_start_ms, None);
        assert_eq!(session.active_pattern, None);
        assert_eq!(session.timers.pending_count(), 0);
    }

    #[test]
    fn test_bite_elapsed() {
        let mut session = SessionState::new();
        assert_eq!(session.bite_elapsed_ms(), None);
        session.timers.advance_clock(1000);
        session.bite_start_ms = Some(400);
        assert_eq!(session.bite_elapsed_ms(), Some(600));
    }
}
