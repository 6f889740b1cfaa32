//! Hook timing evaluation

use super::pattern::{BitePattern, CatchWindow};

/// First catch window containing a reaction `elapsed_ms` after bite onset
pub fn matching_window(pattern: &BitePattern, elapsed_ms: u64) -> Option<&CatchWindow> {
    pattern.catch_windows.iter().find(|w| w.contains(elapsed_ms))
}

/// Whether a reaction `elapsed_ms` after bite onset hooks the fish
///
/// Windows are inclusive at both ends and checked in any order. A pattern
/// without windows can never be hooked.
pub fn evaluate(pattern: &BitePattern, elapsed_ms: u64) -> bool {
    matching_window(pattern, elapsed_ms).is_some()
}
