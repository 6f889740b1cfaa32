//! Deterministic fishing simulation
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Virtual millisecond clock only (the host advances it)
//! - Seeded or injected RNG only
//! - No rendering or platform dependencies

pub mod easing;
pub mod game;
pub mod hit;
pub mod impact;
pub mod keyframe;
pub mod mirror;
pub mod pattern;
pub mod scheduler;
pub mod state;

pub use easing::Easing;
pub use game::FishingGame;
pub use hit::{evaluate, matching_window};
pub use impact::{AmbientRing, ImpactEmitter, ImpactInstance, PulseKind, ambient_rings};
pub use keyframe::{
    DriftDirection, MotionCurve, MotionSample, cast_in_curve, generate, return_duration_ms,
    sink_curve,
};
pub use mirror::reflect;
pub use pattern::{BitePattern, BiteStep, CatchWindow, PatternCatalog};
pub use scheduler::{FiredTimer, Scheduler, TimerSlot, TimerToken};
pub use state::{GameEvent, MotionKind, MotionUpdate, Phase, SessionState, VisualState};
