//! Float Bite - timing and choreography engine for a float-fishing minigame
//!
//! Core modules:
//! - `sim`: Deterministic game loop (bite patterns, motion curves, timers, phases)
//! - `floats`: Float equipment catalog
//! - `settings`: Tunable timings and geometry

pub mod floats;
pub mod settings;
pub mod sim;

pub use floats::{FloatCatalog, FloatModel};
pub use settings::{ImpactSettings, Settings, TimingSettings};

/// Game configuration constants
pub mod consts {
    /// Casting animation length before the float settles (ms)
    pub const CAST_TRANSITION_MS: u64 = 3000;
    /// Bite wait window, sampled uniformly from [min, max) (ms)
    pub const WAIT_MIN_MS: u64 = 3000;
    pub const WAIT_MAX_MS: u64 = 6000;
    /// Extra time after a pattern ends before the fish escapes (ms)
    pub const AUTO_MISS_GRACE_MS: u64 = 500;
    /// How long a HIT/MISS result stays on screen (ms)
    pub const RESULT_DISPLAY_MS: u64 = 3000;

    /// Return segment appended to every bite curve
    pub const RETURN_MIN_MS: f32 = 800.0;
    pub const RETURN_MS_PER_PX: f32 = 15.0;

    /// Float resting displacement on the water surface (px)
    pub const RESTING_OFFSET: f32 = 0.0;
    /// Reflection rests at -107px, so the water line sits halfway
    pub const MIRROR_LINE: f32 = -53.5;

    /// Cast-in drop height above the resting line (px)
    pub const CAST_DROP_HEIGHT: f32 = 200.0;
    /// Sink (hook attempt) motion
    pub const SINK_DEPTH: f32 = 30.0;
    pub const SINK_DURATION_MS: f32 = 600.0;

    /// Impact pulses
    pub const IMPACT_SECONDARY_DELAY_MS: u64 = 200;
    pub const IMPACT_LIFETIME_MS: u64 = 1500;
}

/// Progress of `elapsed` through `total`, clamped to [0, 1]
#[inline]
pub fn progress(elapsed: f32, total: f32) -> f32 {
    if total <= 0.0 {
        1.0
    } else {
        (elapsed / total).clamp(0.0, 1.0)
    }
}
