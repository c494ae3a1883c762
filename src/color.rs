use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Species;

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
            let hue = 20.0 + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Colour for histograms that are not split by species.
pub const NEUTRAL: Color32 = Color32::LIGHT_BLUE;

/// Fixed species → colour assignment shared by every figure and the legend.
#[derive(Debug, Clone)]
pub struct SpeciesColors {
    colors: Vec<Color32>,
}

impl Default for SpeciesColors {
    fn default() -> Self {
        Self {
            colors: generate_palette(Species::ALL.len()),
        }
    }
}

impl SpeciesColors {
    pub fn color_for(&self, species: Option<Species>) -> Color32 {
        species
            .and_then(|s| self.colors.get(s.index()).copied())
            .unwrap_or(NEUTRAL)
    }
}
