//! Decorative water pulses
//!
//! Two streams: the ambient ripple rings that loop forever around the float,
//! and short-lived impact pulses fired on bite onset and hook results. Neither
//! feeds back into the game loop.

use serde::{Deserialize, Serialize};

use super::easing::Easing;
use super::state::{GameEvent, Phase};
use crate::settings::ImpactSettings;

/// Ambient ring loop periods (ms); the second ring starts 1 s late
pub const AMBIENT_RING_PERIODS_MS: [u64; 2] = [3000, 4000];
pub const AMBIENT_RING_DELAYS_MS: [u64; 2] = [0, 1000];

/// One ambient ripple ring at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbientRing {
    /// 1.0 at spawn, 2.0 fully expanded
    pub scale: f32,
    pub opacity: f32,
}

/// Ambient ripple rings at `now_ms`; the loop never ends
pub fn ambient_rings(now_ms: u64) -> [AmbientRing; 2] {
    [0, 1].map(|i| ambient_ring(now_ms, AMBIENT_RING_PERIODS_MS[i], AMBIENT_RING_DELAYS_MS[i]))
}

fn ambient_ring(now_ms: u64, period_ms: u64, delay_ms: u64) -> AmbientRing {
    if now_ms < delay_ms {
        return AmbientRing {
            scale: 1.0,
            opacity: 0.0,
        };
    }
    let t = ((now_ms - delay_ms) % period_ms) as f32 / period_ms as f32;
    let eased = Easing::EaseOut.apply(t);
    AmbientRing {
        scale: 1.0 + eased,
        opacity: 1.0 - eased,
    }
}

/// Which half of an impact a pulse is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PulseKind {
    Primary,
    Secondary,
}

/// A live impact pulse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactInstance {
    pub id: u64,
    pub kind: PulseKind,
    pub created_ms: u64,
    pub expires_ms: u64,
}

impl ImpactInstance {
    /// Fraction of this pulse's visible life that has passed
    pub fn progress(&self, now_ms: u64) -> f32 {
        let life = self.expires_ms.saturating_sub(self.created_ms);
        crate::progress(now_ms.saturating_sub(self.created_ms) as f32, life as f32)
    }
}

#[derive(Debug, Clone)]
struct PendingPulse {
    id: u64,
    due_ms: u64,
    expires_ms: u64,
}

/// Spawns and expires impact pulses
#[derive(Debug, Clone, Default)]
pub struct ImpactEmitter {
    settings: ImpactSettings,
    active: Vec<ImpactInstance>,
    pending: Vec<PendingPulse>,
    next_free_id: u64,
}

impl ImpactEmitter {
    pub fn new(settings: ImpactSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    /// Fire a primary pulse now and a secondary one shortly after
    ///
    /// Ids are the trigger timestamp and timestamp + 1, bumped upward when a
    /// concurrent impact already took them. Returns the primary's id.
    pub fn trigger_impact(&mut self, now_ms: u64) -> u64 {
        let id = now_ms.max(self.next_free_id);
        self.next_free_id = id + 2;
        let expires_ms = now_ms + self.settings.lifetime_ms;

        self.active.push(ImpactInstance {
            id,
            kind: PulseKind::Primary,
            created_ms: now_ms,
            expires_ms,
        });
        self.pending.push(PendingPulse {
            id: id + 1,
            due_ms: now_ms + self.settings.secondary_delay_ms,
            expires_ms,
        });
        log::debug!("Impact #{} triggered at {} ms", id, now_ms);
        id
    }

    /// Spawn due secondary pulses and drop expired ones
    pub fn update(&mut self, now_ms: u64) {
        let (due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.due_ms <= now_ms);
        self.pending = waiting;
        self.active.extend(due.into_iter().map(|p| ImpactInstance {
            id: p.id,
            kind: PulseKind::Secondary,
            created_ms: p.due_ms,
            expires_ms: p.expires_ms,
        }));
        self.active.retain(|i| i.expires_ms > now_ms);
        self.active.sort_by_key(|i| i.id);
    }

    /// React to a state machine signal; bites and hook results splash
    pub fn observe(&mut self, event: &GameEvent, now_ms: u64) -> Option<u64> {
        match event {
            GameEvent::PhaseChanged {
                phase: Phase::Bite | Phase::Hit,
                ..
            } => Some(self.trigger_impact(now_ms)),
            _ => None,
        }
    }

    pub fn active(&self) -> &[ImpactInstance] {
        &self.active
    }

    /// Nothing visible and nothing waiting
    pub fn is_idle(&self) -> bool {
        self.active.is_empty() && self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(emitter: &ImpactEmitter) -> Vec<u64> {
        emitter.active().iter().map(|i| i.id).collect()
    }

    #[test]
    fn test_primary_then_secondary() {
        let mut emitter = ImpactEmitter::default();
        let id = emitter.trigger_impact(10_000);
        assert_eq!(id, 10_000);
        assert_eq!(ids(&emitter), vec![10_000]);

        emitter.update(10_199);
        assert_eq!(ids(&emitter), vec![10_000]);

        emitter.update(10_200);
        assert_eq!(ids(&emitter), vec![10_000, 10_001]);
        assert_eq!(emitter.active()[1].kind, PulseKind::Secondary);
        assert_eq!(emitter.active()[1].created_ms, 10_200);
    }

    #[test]
    fn test_both_expire_after_lifetime() {
        let mut emitter = ImpactEmitter::default();
        emitter.trigger_impact(0);
        emitter.update(1499);
        assert_eq!(emitter.active().len(), 2);
        emitter.update(1500);
        assert!(emitter.active().is_empty());
        assert!(emitter.is_idle());
    }

    #[test]
    fn test_overlapping_impacts_expire_independently() {
        let mut emitter = ImpactEmitter::default();
        emitter.trigger_impact(1000);
        emitter.trigger_impact(1800);
        emitter.update(2000);
        assert_eq!(ids(&emitter), vec![1000, 1001, 1800, 1801]);

        emitter.update(2500);
        assert_eq!(ids(&emitter), vec![1800, 1801]);
        emitter.update(3300);
        assert!(emitter.active().is_empty());
    }

    #[test]
    fn test_same_timestamp_ids_stay_unique() {
        let mut emitter = ImpactEmitter::default();
        let a = emitter.trigger_impact(500);
        let b = emitter.trigger_impact(500);
        assert_eq!(a, 500);
        assert_eq!(b, 502);
        emitter.update(700);
        assert_eq!(ids(&emitter), vec![500, 501, 502, 503]);
    }

    #[test]
    fn test_observe_bite_and_hit() {
        let mut emitter = ImpactEmitter::default();
        let bite = GameEvent::PhaseChanged {
            phase: Phase::Bite,
            message: Phase::Bite.message(),
        };
        let fishing = GameEvent::PhaseChanged {
            phase: Phase::Fishing,
            message: Phase::Fishing.message(),
        };
        assert_eq!(emitter.observe(&bite, 100), Some(100));
        assert_eq!(emitter.observe(&fishing, 200), None);
        assert_eq!(emitter.active().len(), 1);
    }

    #[test]
    fn test_progress() {
        let mut emitter = ImpactEmitter::default();
        emitter.trigger_impact(0);
        let primary = emitter.active()[0].clone();
        assert_eq!(primary.progress(0), 0.0);
        assert!((primary.progress(750) - 0.5).abs() < 1e-6);
        assert_eq!(primary.progress(5000), 1.0);
    }

    #[test]
    fn test_ambient_rings_loop() {
        let start = ambient_rings(0);
        assert_eq!(start[0].scale, 1.0);
        assert_eq!(start[0].opacity, 1.0);
        // Second ring has not started yet
        assert_eq!(start[1].opacity, 0.0);

        // One full period later the first ring restarts
        assert_eq!(ambient_rings(3000)[0], start[0]);
        let mid = ambient_rings(1500)[0];
        assert!(mid.scale > 1.0 && mid.scale < 2.0);
        assert!(ambient_rings(1_000_000)[1].scale >= 1.0);
    }
}
