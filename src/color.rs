use std::collections::HashMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Store → colour
// ---------------------------------------------------------------------------

/// Fixed colour per store, assigned once per dataset so a store keeps its
/// colour while filters change.
#[derive(Debug, Clone, Default)]
pub struct StoreColors {
    mapping: HashMap<String, Color32>,
}

impl StoreColors {
    pub fn new(stores: &[String]) -> Self {
        let mapping = stores
            .iter()
            .cloned()
            .zip(generate_palette(stores.len()))
            .collect();
        Self { mapping }
    }

    pub fn color_for(&self, store: &str) -> Color32 {
        self.mapping.get(store).copied().unwrap_or(Color32::GRAY)
    }
}
