//! Bite pattern catalog
//!
//! A bite pattern is a fixed sequence of vertical float displacements plus
//! optional lateral drift and the time windows in which hooking succeeds.
//! Positive offsets pull the float down into the water, negative ones lift it.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::easing::Easing;

/// One segment of a bite's motion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiteStep {
    /// Displacement from the resting line at the end of this step (px)
    #[serde(alias = "y")]
    pub vertical_offset: f32,
    /// Segment length (ms, > 0)
    #[serde(alias = "duration")]
    pub duration_ms: u32,
    #[serde(default, alias = "ease")]
    pub easing: Easing,
}

impl BiteStep {
    pub const fn new(vertical_offset: f32, duration_ms: u32, easing: Easing) -> Self {
        Self {
            vertical_offset,
            duration_ms,
            easing,
        }
    }
}

/// Reaction window relative to bite onset, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatchWindow {
    pub start_ms: u32,
    pub end_ms: u32,
}

impl CatchWindow {
    /// Create a window, swapping the bounds if given out of order
    pub fn new(start_ms: u32, end_ms: u32) -> Self {
        Self {
            start_ms: start_ms.min(end_ms),
            end_ms: start_ms.max(end_ms),
        }
    }

    #[inline]
    pub fn contains(&self, elapsed_ms: u64) -> bool {
        elapsed_ms >= self.start_ms as u64 && elapsed_ms <= self.end_ms as u64
    }
}

/// A named bite definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitePattern {
    pub id: String,
    pub name: String,
    pub steps: Vec<BiteStep>,
    /// Lateral drift magnitude reached at the end of the pattern (px, >= 0)
    #[serde(default, alias = "horizontalDrift")]
    pub horizontal_drift: f32,
    /// Empty means the bite cannot be hooked
    #[serde(default, alias = "catchWindows")]
    pub catch_windows: Vec<CatchWindow>,
}

impl BitePattern {
    /// Sum of all step durations, excluding the return segment
    ///
    /// Saturates at `u32::MAX`; loaded catalogs never get that far.
    pub fn duration_ms(&self) -> u32 {
        self.steps
            .iter()
            .fold(0u32, |total, s| total.saturating_add(s.duration_ms))
    }

    /// Vertical offset the pattern ends on
    pub fn final_offset(&self) -> f32 {
        self.steps.last().map(|s| s.vertical_offset).unwrap_or(0.0)
    }

    /// Whether any reaction can succeed against this pattern
    pub fn is_catchable(&self) -> bool {
        !self.catch_windows.is_empty()
    }

    fn validate(&self) -> Result<(), String> {
        if self.steps.is_empty() {
            return Err(format!("pattern {} has no steps", self.id));
        }
        if self.steps.iter().any(|s| s.duration_ms == 0) {
            return Err(format!("pattern {} has a zero-length step", self.id));
        }
        if self
            .steps
            .iter()
            .try_fold(0u32, |total, s| total.checked_add(s.duration_ms))
            .is_none()
        {
            return Err(format!("pattern {} is too long", self.id));
        }
        if !self.horizontal_drift.is_finite() {
            return Err(format!("pattern {} has invalid drift", self.id));
        }
        if self.horizontal_drift < 0.0 {
            return Err(format!("pattern {} has negative drift", self.id));
        }
        if self.catch_windows.iter().any(|w| w.start_ms > w.end_ms) {
            return Err(format!("pattern {} has an inverted catch window", self.id));
        }
        Ok(())
    }
}

/// Read-only, ordered bite pattern table
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    patterns: Vec<BitePattern>,
}

impl Default for PatternCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PatternCatalog {
    /// The ten bites shipped with the game
    pub fn builtin() -> Self {
        use Easing::*;

        let pattern = |id: &str,
                       name: &str,
                       steps: &[BiteStep],
                       drift: f32,
                       windows: &[(u32, u32)]| BitePattern {
            id: id.to_string(),
            name: name.to_string(),
            steps: steps.to_vec(),
            horizontal_drift: drift,
            catch_windows: windows.iter().map(|&(a, b)| CatchWindow::new(a, b)).collect(),
        };

        let patterns = vec![
            pattern(
                "BITE_01",
                "Standard Crucian (Slow Rise)",
                &[
                    BiteStep::new(15.0, 300, EaseOut),
                    BiteStep::new(0.0, 500, Linear),
                    BiteStep::new(0.0, 500, Linear),
                    BiteStep::new(-60.0, 1000, EaseOut),
                    BiteStep::new(-60.0, 1000, EaseOut),
                    BiteStep::new(0.0, 2500, EaseIn),
                ],
                2.0,
                &[(1300, 3300)],
            ),
            pattern(
                "BITE_02",
                "Small Fish (Jitter)",
                &[
                    BiteStep::new(10.0, 200, EaseInOut),
                    BiteStep::new(-10.0, 200, EaseInOut),
                    BiteStep::new(15.0, 200, EaseInOut),
                    BiteStep::new(-5.0, 200, EaseInOut),
                    BiteStep::new(0.0, 2000, Linear),
                ],
                10.0,
                &[(400, 900)],
            ),
            pattern(
                "BITE_03",
                "Carp Dash (Sink)",
                &[
                    BiteStep::new(5.0, 200, Linear),
                    BiteStep::new(120.0, 800, EaseIn),
                    BiteStep::new(120.0, 1500, Linear),
                ],
                30.0,
                &[(200, 1000)],
            ),
            pattern(
                "BITE_04",
                "Sensitive Winter",
                &[
                    BiteStep::new(-10.0, 2000, EaseOut),
                    BiteStep::new(-15.0, 5000, Linear),
                    BiteStep::new(0.0, 1000, EaseIn),
                ],
                0.0,
                &[(1500, 4000)],
            ),
            pattern(
                "BITE_05",
                "Bullet Bite",
                &[
                    BiteStep::new(-40.0, 800, EaseOut),
                    BiteStep::new(-40.0, 600, EaseOut),
                    BiteStep::new(-80.0, 1500, EaseInOut),
                    BiteStep::new(-80.0, 600, EaseInOut),
                    BiteStep::new(0.0, 1500, EaseInOut),
                ],
                0.0,
                &[(600, 1400), (2400, 3500)],
            ),
            pattern(
                "BITE_06",
                "Big Crucian (Endless Rise)",
                &[
                    BiteStep::new(3.0, 1000, Linear),
                    BiteStep::new(-80.0, 7000, EaseInOut),
                    BiteStep::new(-80.0, 2000, Linear),
                ],
                5.0,
                &[(2000, 10000)],
            ),
            pattern(
                "BITE_07",
                "Catfish Drift",
                &[
                    BiteStep::new(18.0, 1000, EaseIn),
                    BiteStep::new(35.0, 4000, Linear),
                ],
                150.0,
                &[(800, 5000)],
            ),
            pattern(
                "BITE_08",
                "False Strike (Blink)",
                &[
                    BiteStep::new(8.0, 300, EaseIn),
                    BiteStep::new(0.0, 500, EaseOut),
                    BiteStep::new(8.0, 300, EaseIn),
                    BiteStep::new(0.0, 2900, Linear),
                ],
                2.0,
                &[],
            ),
            pattern(
                "BITE_09",
                "Flowing Bite",
                &[
                    BiteStep::new(5.0, 2000, Linear),
                    BiteStep::new(15.0, 4000, Linear),
                ],
                40.0,
                &[(1500, 6000)],
            ),
            pattern(
                "BITE_10",
                "Turtle/Crab",
                &[
                    BiteStep::new(3.0, 100, Linear),
                    BiteStep::new(0.0, 1500, Linear),
                    BiteStep::new(4.0, 100, Linear),
                    BiteStep::new(0.0, 1500, Linear),
                    BiteStep::new(2.0, 100, Linear),
                ],
                0.0,
                &[(0, 200), (1600, 1800), (3200, 3400)],
            ),
        ];

        Self { patterns }
    }

    /// Load a catalog from a JSON array of patterns
    ///
    /// Field names accept both the snake_case form and the short keys used by
    /// web-style bite tables (`y`, `duration`, `ease`, `horizontalDrift`).
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        use serde::de::Error;

        let patterns: Vec<BitePattern> = serde_json::from_str(json)?;
        if patterns.is_empty() {
            return Err(serde_json::Error::custom("pattern catalog is empty"));
        }
        for pattern in &patterns {
            pattern.validate().map_err(serde_json::Error::custom)?;
        }
        log::info!("Loaded {} bite patterns", patterns.len());
        Ok(Self { patterns })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.patterns)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Clamp any index into the catalog's range
    #[inline]
    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.patterns.len() - 1)
    }

    /// Pattern at `index`, clamped to the last entry when out of range
    pub fn get(&self, index: usize) -> &BitePattern {
        &self.patterns[self.clamp_index(index)]
    }

    /// Uniformly random pattern index
    pub fn random_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        rng.random_range(0..self.patterns.len())
    }

    pub fn find_by_id(&self, id: &str) -> Option<(usize, &BitePattern)> {
        self.patterns.iter().enumerate().find(|(_, p)| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BitePattern> {
        self.patterns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_builtin_catalog_shape() {
        let catalog = PatternCatalog::builtin();
        assert_eq!(catalog.len(), 10);
        for pattern in catalog.iter() {
            assert!(pattern.validate().is_ok(), "{}", pattern.id);
        }
        assert_eq!(catalog.get(2).name, "Carp Dash (Sink)");
        assert_eq!(catalog.get(9).name, "Turtle/Crab");
    }

    #[test]
    fn test_get_clamps_out_of_range() {
        let catalog = PatternCatalog::builtin();
        assert_eq!(catalog.get(10).id, "BITE_10");
        assert_eq!(catalog.get(usize::MAX).id, "BITE_10");
        assert_eq!(catalog.get(0).id, "BITE_01");
    }

    #[test]
    fn test_pattern_durations() {
        let catalog = PatternCatalog::builtin();
        assert_eq!(catalog.get(0).duration_ms(), 5800);
        assert_eq!(catalog.get(2).duration_ms(), 2500);
        assert_eq!(catalog.get(9).duration_ms(), 3300);
    }

    #[test]
    fn test_false_strike_is_unbeatable() {
        let catalog = PatternCatalog::builtin();
        let (_, blink) = catalog.find_by_id("BITE_08").unwrap();
        assert!(!blink.is_catchable());
        assert_eq!(catalog.iter().filter(|p| !p.is_catchable()).count(), 1);
    }

    #[test]
    fn test_random_index_covers_catalog() {
        let catalog = PatternCatalog::builtin();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen = [false; 10];
        for _ in 0..500 {
            let index = catalog.random_index(&mut rng);
            assert!(index < catalog.len());
            seen[index] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_catch_window_swaps_bounds() {
        let window = CatchWindow::new(1000, 200);
        assert_eq!(window.start_ms, 200);
        assert_eq!(window.end_ms, 1000);
        assert!(window.contains(200));
        assert!(window.contains(1000));
        assert!(!window.contains(1001));
    }

    #[test]
    fn test_from_json_accepts_short_keys() {
        let json = r#"[{
            "id": "T1",
            "name": "Test",
            "steps": [
                { "y": 10, "duration": 300, "ease": "ease-out" },
                { "y": 0, "duration": 200 }
            ],
            "horizontalDrift": 4
        }]"#;
        let catalog = PatternCatalog::from_json(json).unwrap();
        let pattern = catalog.get(0);
        assert_eq!(pattern.duration_ms(), 500);
        assert_eq!(pattern.steps[0].easing, Easing::EaseOut);
        assert_eq!(pattern.steps[1].easing, Easing::Linear);
        assert_eq!(pattern.horizontal_drift, 4.0);
        assert!(pattern.catch_windows.is_empty());
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(PatternCatalog::from_json("[]").is_err());
        let no_steps = r#"[{ "id": "X", "name": "X", "steps": [] }]"#;
        assert!(PatternCatalog::from_json(no_steps).is_err());
        let zero = r#"[{ "id": "X", "name": "X", "steps": [{ "y": 1, "duration": 0 }] }]"#;
        assert!(PatternCatalog::from_json(zero).is_err());
        let drift = r#"[{ "id": "X", "name": "X", "steps": [{ "y": 1, "duration": 10 }], "horizontalDrift": -2 }]"#;
        assert!(PatternCatalog::from_json(drift).is_err());
    }

    #[test]
    fn test_from_json_rejects_overflowing_duration() {
        let json = r#"[{
            "id": "LONG",
            "name": "Long",
            "steps": [
                { "y": 10, "duration": 3000000000 },
                { "y": 0, "duration": 3000000000 }
            ]
        }]"#;
        let err = PatternCatalog::from_json(json).unwrap_err();
        assert!(err.to_string().contains("too long"));
    }

    #[test]
    fn test_duration_saturates_for_hand_built_patterns() {
        let pattern = BitePattern {
            id: "LONG".into(),
            name: "Long".into(),
            steps: vec![
                BiteStep::new(10.0, u32::MAX, Easing::Linear),
                BiteStep::new(0.0, u32::MAX, Easing::Linear),
            ],
            horizontal_drift: 0.0,
            catch_windows: Vec::new(),
        };
        assert_eq!(pattern.duration_ms(), u32::MAX);
    }

    #[test]
    fn test_validate_reports_invalid_drift() {
        let mut pattern = PatternCatalog::builtin().get(0).clone();
        pattern.horizontal_drift = f32::NAN;
        assert_eq!(
            pattern.validate().unwrap_err(),
            format!("pattern {} has invalid drift", pattern.id)
        );
        pattern.horizontal_drift = -1.0;
        assert_eq!(
            pattern.validate().unwrap_err(),
            format!("pattern {} has negative drift", pattern.id)
        );
    }

    #[test]
    fn test_json_roundtrip_builtin() {
        let catalog = PatternCatalog::builtin();
        let json = catalog.to_json().unwrap();
        let loaded = PatternCatalog::from_json(&json).unwrap();
        assert_eq!(loaded.len(), catalog.len());
        assert_eq!(loaded.get(4), catalog.get(4));
    }
}
