//! Float equipment catalog
//!
//! Floats only change how the bobber is drawn; selection never touches the
//! phase loop. Geometry is in the float's own SVG units.

use serde::{Deserialize, Serialize};

/// A selectable float
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatModel {
    pub id: String,
    pub name: String,
    pub width: f32,
    pub height: f32,
    /// Y coordinate in the artwork that sits on the water surface
    pub waterline_y: f32,
    pub scale: f32,
    /// Glow tip color (CSS hex)
    pub glow_color: String,
}

impl FloatModel {
    /// On-screen size after scaling
    pub fn display_size(&self) -> (f32, f32) {
        (self.width * self.scale, self.height * self.scale)
    }
}

/// Ordered float table
#[derive(Debug, Clone)]
pub struct FloatCatalog {
    floats: Vec<FloatModel>,
}

impl Default for FloatCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FloatCatalog {
    pub fn builtin() -> Self {
        let float = |id: &str, name: &str, width: f32, glow: &str| FloatModel {
            id: id.to_string(),
            name: name.to_string(),
            width,
            height: 450.0,
            waterline_y: 250.0,
            scale: 0.9,
            glow_color: glow.to_string(),
        };

        Self {
            floats: vec![
                float("float_01", "Standard Float", 230.0, "#05df72"),
                float("float_02", "Red Dot Float", 230.0, "#ff3636"),
                float("float_03", "Slim Float", 21.0, "#e8f442"),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.floats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.floats.is_empty()
    }

    #[inline]
    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.floats.len() - 1)
    }

    /// Float at `index`, clamped to the last entry
    pub fn get(&self, index: usize) -> &FloatModel {
        &self.floats[self.clamp_index(index)]
    }

    pub fn iter(&self) -> impl Iterator<Item = &FloatModel> {
        self.floats.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_floats() {
        let catalog = FloatCatalog::builtin();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(0).name, "Standard Float");
        assert_eq!(catalog.get(2).glow_color, "#e8f442");
    }

    #[test]
    fn test_get_clamps() {
        let catalog = FloatCatalog::builtin();
        assert_eq!(catalog.get(99).id, "float_03");
        assert_eq!(catalog.clamp_index(7), 2);
    }

    #[test]
    fn test_display_size() {
        let (w, h) = FloatCatalog::builtin().get(0).display_size();
        assert!((w - 207.0).abs() < 1e-3);
        assert!((h - 405.0).abs() < 1e-3);
    }
}
