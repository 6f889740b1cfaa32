//! Water-surface reflection of a motion curve
//!
//! The reflection moves opposite to the float, mirrored across the water line.
//! Drift and timing are shared so the two stay visually attached.

use super::keyframe::{MotionCurve, MotionSample};

/// Reflect every sample's displacement across `mirror_line`
pub fn reflect(curve: &MotionCurve, mirror_line: f32) -> MotionCurve {
    MotionCurve {
        samples: curve
            .samples
            .iter()
            .map(|s| MotionSample {
                pos: s.pos.with_y(reflect_displacement(s.displacement(), mirror_line)),
                ..*s
            })
            .collect(),
        duration_ms: curve.duration_ms,
    }
}

#[inline]
pub fn reflect_displacement(displacement: f32, mirror_line: f32) -> f32 {
    2.0 * mirror_line - displacement
}
