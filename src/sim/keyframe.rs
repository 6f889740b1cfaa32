//! Motion curve generation
//!
//! Turns a bite pattern into a normalized keyframe curve the presentation
//! layer can play back. Offsets are fractions of the full curve duration,
//! which is the pattern itself plus a return segment that brings the float
//! back to rest.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::easing::Easing;
use super::pattern::BitePattern;
use crate::consts::*;
use crate::progress;

/// One keyframe of a motion curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionSample {
    /// Fraction of the curve duration, in [0, 1]
    pub offset: f32,
    /// x = lateral drift, y = vertical displacement (px)
    pub pos: Vec2,
    /// Timing of the segment that arrives at this sample
    pub easing: Easing,
}

impl MotionSample {
    pub fn new(offset: f32, displacement: f32, drift: f32, easing: Easing) -> Self {
        Self {
            offset,
            pos: Vec2::new(drift, displacement),
            easing,
        }
    }

    #[inline]
    pub fn displacement(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn drift(&self) -> f32 {
        self.pos.x
    }
}

/// A continuous animated motion, indexed by normalized time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionCurve {
    pub samples: Vec<MotionSample>,
    /// Wall-clock length of the whole curve (ms)
    pub duration_ms: f32,
}

impl MotionCurve {
    pub fn first(&self) -> Option<&MotionSample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&MotionSample> {
        self.samples.last()
    }

    /// True if offsets strictly increase and stay within [0, 1]
    pub fn is_well_formed(&self) -> bool {
        let in_range = self.samples.iter().all(|s| (0.0..=1.0).contains(&s.offset));
        let increasing = self.samples.windows(2).all(|w| w[0].offset < w[1].offset);
        in_range && increasing && !self.samples.is_empty()
    }

    /// Interpolated position at `t` (fraction of the curve, clamped)
    ///
    /// Each segment is shaped by the easing stored on its closing sample.
    pub fn sample_at(&self, t: f32) -> Vec2 {
        let t = t.clamp(0.0, 1.0);
        let Some(first) = self.samples.first() else {
            return Vec2::ZERO;
        };
        if t <= first.offset {
            return first.pos;
        }
        for pair in self.samples.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if t <= b.offset {
                let local = progress(t - a.offset, b.offset - a.offset);
                return a.pos.lerp(b.pos, b.easing.apply(local));
            }
        }
        self.samples[self.samples.len() - 1].pos
    }

    /// Position `elapsed_ms` into playback
    pub fn position_at_ms(&self, elapsed_ms: f32) -> Vec2 {
        self.sample_at(progress(elapsed_ms, self.duration_ms))
    }
}

/// Lateral drift direction, picked once per bite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriftDirection {
    Left,
    Right,
}

impl DriftDirection {
    pub fn sign(&self) -> f32 {
        match self {
            DriftDirection::Left => -1.0,
            DriftDirection::Right => 1.0,
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            DriftDirection::Right
        } else {
            DriftDirection::Left
        }
    }
}

/// Length of the segment that returns the float to rest after a pattern
///
/// Scales with how far the float ended up from rest, never shorter than 800 ms.
pub fn return_duration_ms(pattern: &BitePattern) -> f32 {
    let distance = Vec2::new(pattern.horizontal_drift, pattern.final_offset()).length();
    (distance * RETURN_MS_PER_PX).max(RETURN_MIN_MS)
}

/// Build the motion curve for one bite
pub fn generate(pattern: &BitePattern, resting_offset: f32, direction: DriftDirection) -> MotionCurve {
    let pattern_ms = pattern.duration_ms() as f32;
    let total_ms = pattern_ms + return_duration_ms(pattern);

    let mut samples = Vec::with_capacity(pattern.steps.len() + 2);
    samples.push(MotionSample::new(0.0, resting_offset, 0.0, Easing::Linear));

    let mut elapsed = 0u32;
    for step in &pattern.steps {
        elapsed += step.duration_ms;
        let drift =
            pattern.horizontal_drift * progress(elapsed as f32, pattern_ms) * direction.sign();
        samples.push(MotionSample::new(
            elapsed as f32 / total_ms,
            resting_offset + step.vertical_offset,
            drift,
            step.easing,
        ));
    }

    // Return segment: vertical and lateral both collapse back to rest
    samples.push(MotionSample::new(1.0, resting_offset, 0.0, Easing::EaseInOut));

    MotionCurve {
        samples,
        duration_ms: total_ms,
    }
}

/// Descent-and-settle motion played while casting
///
/// Drops in from above, splashes below the resting line and settles with a
/// damped bounce.
pub fn cast_in_curve(resting_offset: f32, duration_ms: f32) -> MotionCurve {
    let keys = [
        (0.0, -CAST_DROP_HEIGHT, Easing::Linear),
        (0.35, 24.0, Easing::EaseIn),
        (0.55, -8.0, Easing::EaseOut),
        (0.75, 4.0, Easing::EaseInOut),
        (1.0, 0.0, Easing::EaseInOut),
    ];
    MotionCurve {
        samples: keys
            .iter()
            .map(|&(offset, dy, easing)| MotionSample::new(offset, resting_offset + dy, 0.0, easing))
            .collect(),
        duration_ms,
    }
}

/// Short dip and recovery used for hook attempts
pub fn sink_curve(resting_offset: f32, depth: f32) -> MotionCurve {
    MotionCurve {
        samples: vec![
            MotionSample::new(0.0, resting_offset, 0.0, Easing::Linear),
            MotionSample::new(0.4, resting_offset + depth, 0.0, Easing::EaseOut),
            MotionSample::new(1.0, resting_offset, 0.0, Easing::EaseInOut),
        ],
        duration_ms: SINK_DURATION_MS,
    }
}
