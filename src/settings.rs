//! Engine settings
//!
//! Timings and float geometry, stored as JSON next to the host application.
//! Every field has a default, so partial files are fine.

use std::ops::Range;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Phase loop timings (ms)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    /// Casting animation before fishing starts
    pub cast_transition_ms: u64,
    /// Bite wait, sampled from [min, max)
    pub wait_min_ms: u64,
    pub wait_max_ms: u64,
    /// Time after a pattern ends before the fish escapes
    pub auto_miss_grace_ms: u64,
    /// HIT/MISS display before returning to ready
    pub result_display_ms: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            cast_transition_ms: CAST_TRANSITION_MS,
            wait_min_ms: WAIT_MIN_MS,
            wait_max_ms: WAIT_MAX_MS,
            auto_miss_grace_ms: AUTO_MISS_GRACE_MS,
            result_display_ms: RESULT_DISPLAY_MS,
        }
    }
}

impl TimingSettings {
    /// Half-open bite wait range
    pub fn wait_range(&self) -> Range<u64> {
        self.wait_min_ms..self.wait_max_ms
    }
}

/// Decorative impact pulse timings (ms)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactSettings {
    /// Delay between the primary and secondary pulse
    pub secondary_delay_ms: u64,
    /// Both pulses expire this long after the primary was created
    pub lifetime_ms: u64,
}

impl Default for ImpactSettings {
    fn default() -> Self {
        Self {
            secondary_delay_ms: IMPACT_SECONDARY_DELAY_MS,
            lifetime_ms: IMPACT_LIFETIME_MS,
        }
    }
}

/// All engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub timing: TimingSettings,
    pub impact: ImpactSettings,

    // === Geometry (px) ===
    /// Float displacement when at rest on the water
    pub resting_offset: f32,
    /// Water line the reflection mirrors across
    pub mirror_line: f32,
    /// Depth of the hook-attempt dip
    pub sink_depth: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timing: TimingSettings::default(),
            impact: ImpactSettings::default(),
            resting_offset: RESTING_OFFSET,
            mirror_line: MIRROR_LINE,
            sink_depth: SINK_DEPTH,
        }
    }
}

impl Settings {
    /// Parse settings from JSON and fix up inconsistent values
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Repair values that would break the game loop
    pub fn sanitized(mut self) -> Self {
        let timing = &mut self.timing;
        if timing.wait_max_ms <= timing.wait_min_ms {
            log::warn!(
                "Wait range [{}, {}) is empty, widening by 1 ms",
                timing.wait_min_ms,
                timing.wait_max_ms
            );
            timing.wait_max_ms = timing.wait_min_ms + 1;
        }
        if self.impact.lifetime_ms < self.impact.secondary_delay_ms {
            self.impact.lifetime_ms = self.impact.secondary_delay_ms;
        }
        if !self.resting_offset.is_finite() {
            self.resting_offset = RESTING_OFFSET;
        }
        if !self.mirror_line.is_finite() {
            self.mirror_line = MIRROR_LINE;
        }
        if !self.sink_depth.is_finite() {
            self.sink_depth = SINK_DEPTH;
        }
        self
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::info!("No settings at {} ({}), using defaults", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings in {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}
