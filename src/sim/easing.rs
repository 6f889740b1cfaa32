//! CSS-style timing functions for motion curve segments
//!
//! Each easing is the cubic-bezier the browser uses for the same keyword, so a
//! curve rendered by a web host and one sampled headlessly move identically.

use serde::{Deserialize, Serialize};

/// Timing function applied to one curve segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    #[default]
    Linear,
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::Ease => "ease",
            Easing::EaseIn => "ease-in",
            Easing::EaseOut => "ease-out",
            Easing::EaseInOut => "ease-in-out",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "linear" => Some(Easing::Linear),
            "ease" => Some(Easing::Ease),
            "ease-in" => Some(Easing::EaseIn),
            "ease-out" => Some(Easing::EaseOut),
            "ease-in-out" => Some(Easing::EaseInOut),
            _ => None,
        }
    }

    /// Bezier control points (x1, y1, x2, y2); `None` for linear
    fn control_points(&self) -> Option<(f32, f32, f32, f32)> {
        match self {
            Easing::Linear => None,
            Easing::Ease => Some((0.25, 0.1, 0.25, 1.0)),
            Easing::EaseIn => Some((0.42, 0.0, 1.0, 1.0)),
            Easing::EaseOut => Some((0.0, 0.0, 0.58, 1.0)),
            Easing::EaseInOut => Some((0.42, 0.0, 0.58, 1.0)),
        }
    }

    /// Map linear progress `t` in [0, 1] to eased progress
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        let Some((x1, y1, x2, y2)) = self.control_points() else {
            return t;
        };
        if t == 0.0 || t == 1.0 {
            return t;
        }
        let s = solve_curve_x(t, x1, x2);
        bezier(s, y1, y2)
    }
}

/// One axis of a cubic bezier anchored at 0 and 1
#[inline]
fn bezier(s: f32, p1: f32, p2: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

#[inline]
fn bezier_slope(s: f32, p1: f32, p2: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Find the curve parameter whose x equals `x`
fn solve_curve_x(x: f32, x1: f32, x2: f32) -> f32 {
    const EPSILON: f32 = 1e-5;

    // Newton first; it converges in a few steps away from flat spots
    let mut s = x;
    for _ in 0..8 {
        let err = bezier(s, x1, x2) - x;
        if err.abs() < EPSILON {
            return s;
        }
        let slope = bezier_slope(s, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= err / slope;
    }

    // Bisection fallback (x(s) is monotonic for CSS control points)
    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    s = x;
    for _ in 0..32 {
        let value = bezier(s, x1, x2);
        if (value - x).abs() < EPSILON {
            break;
        }
        if value < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) * 0.5;
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 5] = [
        Easing::Linear,
        Easing::Ease,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
    ];

    #[test]
    fn test_endpoints_fixed() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{:?}", easing);
            assert_eq!(easing.apply(1.0), 1.0, "{:?}", easing);
        }
    }

    #[test]
    fn test_curve_shapes() {
        assert!((Easing::Linear.apply(0.3) - 0.3).abs() < 1e-6);
        assert!(Easing::EaseIn.apply(0.5) < 0.5);
        assert!(Easing::EaseOut.apply(0.5) > 0.5);
        assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_monotonic() {
        for easing in ALL {
            let mut last = 0.0;
            for i in 1..=100 {
                let v = easing.apply(i as f32 / 100.0);
                assert!(v + 1e-4 >= last, "{:?} not monotonic at {}", easing, i);
                last = v;
            }
        }
    }

    #[test]
    fn test_keyword_parsing() {
        assert_eq!(Easing::from_str("ease-in-out"), Some(Easing::EaseInOut));
        assert_eq!(Easing::from_str(" Ease-Out "), Some(Easing::EaseOut));
        assert_eq!(Easing::from_str("bounce"), None);
        for easing in ALL {
            assert_eq!(Easing::from_str(easing.as_str()), Some(easing));
        }
    }

    #[test]
    fn test_serde_uses_css_keywords() {
        let json = serde_json::to_string(&Easing::EaseInOut).unwrap();
        assert_eq!(json, "\"ease-in-out\"");
        let parsed: Easing = serde_json::from_str("\"ease-in\"").unwrap();
        assert_eq!(parsed, Easing::EaseIn);
    }
}
