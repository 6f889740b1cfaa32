//! Cancellable single-slot timers on a virtual clock
//!
//! Every timer lives in one of four named slots. Scheduling into an occupied
//! slot invalidates the previous token before the new one is installed, so a
//! superseded timer can never be returned by `pop_due`. The clock only moves
//! when the host advances it, which keeps the whole game loop deterministic.

use serde::{Deserialize, Serialize};

/// Named timer slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerSlot {
    /// Delay before a bite while fishing
    Wait,
    /// Fish escapes if not hooked in time
    AutoMiss,
    /// HIT/MISS display before returning to ready
    Result,
    /// Cast animation settling into fishing
    CastTransition,
}

impl TimerSlot {
    pub const ALL: [TimerSlot; 4] = [
        TimerSlot::Wait,
        TimerSlot::AutoMiss,
        TimerSlot::Result,
        TimerSlot::CastTransition,
    ];

    #[inline]
    fn index(self) -> usize {
        match self {
            TimerSlot::Wait => 0,
            TimerSlot::AutoMiss => 1,
            TimerSlot::Result => 2,
            TimerSlot::CastTransition => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimerSlot::Wait => "wait",
            TimerSlot::AutoMiss => "autoMiss",
            TimerSlot::Result => "result",
            TimerSlot::CastTransition => "castTransition",
        }
    }
}

/// Handle to one scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerToken {
    pub slot: TimerSlot,
    pub id: u64,
}

#[derive(Debug, Clone)]
struct PendingTimer<E> {
    token: TimerToken,
    due_ms: u64,
    payload: E,
}

/// A timer that has come due and been removed from its slot
#[derive(Debug, Clone, PartialEq)]
pub struct FiredTimer<E> {
    pub token: TimerToken,
    pub due_ms: u64,
    pub payload: E,
}

/// Four independent timer slots sharing one clock
#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    now_ms: u64,
    next_id: u64,
    slots: [Option<PendingTimer<E>>; 4],
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 1,
            slots: [None, None, None, None],
        }
    }

    /// Current clock time (ms)
    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Install a timer `delay_ms` from now, replacing whatever held `slot`
    pub fn schedule(&mut self, slot: TimerSlot, delay_ms: u64, payload: E) -> TimerToken {
        self.cancel(slot);

        let token = TimerToken {
            slot,
            id: self.next_id,
        };
        self.next_id += 1;

        let due_ms = self.now_ms.saturating_add(delay_ms);
        log::debug!(
            "Timer {} #{} scheduled for {} ms (+{})",
            slot.as_str(),
            token.id,
            due_ms,
            delay_ms
        );
        self.slots[slot.index()] = Some(PendingTimer {
            token,
            due_ms,
            payload,
        });
        token
    }

    /// Drop the timer in `slot`; returns whether one was pending
    pub fn cancel(&mut self, slot: TimerSlot) -> bool {
        match self.slots[slot.index()].take() {
            Some(timer) => {
                log::debug!("Timer {} #{} cancelled", slot.as_str(), timer.token.id);
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        for slot in TimerSlot::ALL {
            self.cancel(slot);
        }
    }

    pub fn is_pending(&self, slot: TimerSlot) -> bool {
        self.slots[slot.index()].is_some()
    }

    pub fn token(&self, slot: TimerSlot) -> Option<TimerToken> {
        self.slots[slot.index()].as_ref().map(|t| t.token)
    }

    /// Whether `token` is still the live timer in its slot
    pub fn is_live(&self, token: TimerToken) -> bool {
        self.token(token.slot) == Some(token)
    }

    /// Due time of the timer in `slot`
    pub fn due_ms(&self, slot: TimerSlot) -> Option<u64> {
        self.slots[slot.index()].as_ref().map(|t| t.due_ms)
    }

    pub fn pending_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Earliest due time across all slots
    pub fn next_due(&self) -> Option<u64> {
        self.slots.iter().flatten().map(|t| t.due_ms).min()
    }

    /// Remove and return the earliest timer due at or before `until_ms`
    ///
    /// The clock moves to the fired timer's due time. Ties go to the timer
    /// scheduled first.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<FiredTimer<E>> {
        let index = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|t| (i, t)))
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.token.id))
            .map(|(i, _)| i)?;

        let timer = self.slots[index].take()?;
        self.now_ms = self.now_ms.max(timer.due_ms);
        Some(FiredTimer {
            token: timer.token,
            due_ms: timer.due_ms,
            payload: timer.payload,
        })
    }

    /// Move the clock forward without firing anything
    pub fn advance_clock(&mut self, to_ms: u64) {
        self.now_ms = self.now_ms.max(to_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_and_fire() {
        let mut scheduler = Scheduler::new();
        let token = scheduler.schedule(TimerSlot::Wait, 100, "bite");
        assert!(scheduler.is_live(token));
        assert_eq!(scheduler.due_ms(TimerSlot::Wait), Some(100));

        assert!(scheduler.pop_due(99).is_none());
        let fired = scheduler.pop_due(150).unwrap();
        assert_eq!(fired.token, token);
        assert_eq!(fired.payload, "bite");
        assert_eq!(scheduler.now_ms(), 100);
        assert!(!scheduler.is_live(token));
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_reschedule_supersedes_previous_token() {
        let mut scheduler = Scheduler::new();
        let first = scheduler.schedule(TimerSlot::AutoMiss, 100, 1);
        let second = scheduler.schedule(TimerSlot::AutoMiss, 300, 2);

        assert_ne!(first, second);
        assert!(!scheduler.is_live(first));
        assert!(scheduler.is_live(second));
        assert_eq!(scheduler.pending_count(), 1);

        // Past the first deadline nothing fires
        assert!(scheduler.pop_due(200).is_none());
        let fired = scheduler.pop_due(300).unwrap();
        assert_eq!(fired.token, second);
        assert_eq!(fired.payload, 2);
        assert!(scheduler.pop_due(u64::MAX).is_none());
    }

    #[test]
    fn test_cancel_is_idempotent_and_isolated() {
        let mut scheduler = Scheduler::new();
        for slot in TimerSlot::ALL {
            scheduler.schedule(slot, 50, ());
        }
        assert_eq!(scheduler.pending_count(), 4);

        assert!(scheduler.cancel(TimerSlot::Result));
        assert!(!scheduler.cancel(TimerSlot::Result));
        assert_eq!(scheduler.pending_count(), 3);
        assert!(scheduler.is_pending(TimerSlot::Wait));
        assert!(scheduler.is_pending(TimerSlot::AutoMiss));
        assert!(scheduler.is_pending(TimerSlot::CastTransition));

        scheduler.cancel_all();
        assert_eq!(scheduler.pending_count(), 0);
        assert!(!scheduler.cancel(TimerSlot::Wait));
    }

    #[test]
    fn test_fire_order_by_due_then_schedule_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(TimerSlot::Result, 200, "result");
        scheduler.schedule(TimerSlot::Wait, 100, "wait");
        scheduler.schedule(TimerSlot::CastTransition, 200, "cast");

        assert_eq!(scheduler.next_due(), Some(100));
        let order: Vec<_> = std::iter::from_fn(|| scheduler.pop_due(1000))
            .map(|f| f.payload)
            .collect();
        assert_eq!(order, vec!["wait", "result", "cast"]);
    }

    #[test]
    fn test_delay_is_relative_to_clock() {
        let mut scheduler = Scheduler::new();
        scheduler.advance_clock(1000);
        scheduler.schedule(TimerSlot::Wait, 500, ());
        assert_eq!(scheduler.due_ms(TimerSlot::Wait), Some(1500));

        // Clock never runs backwards
        scheduler.advance_clock(10);
        assert_eq!(scheduler.now_ms(), 1000);
    }
}
