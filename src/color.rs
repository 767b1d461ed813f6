use std::collections::HashMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::facets::ALL_INDUSTRIES;

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
            let hsl = Hsl::new(hue, 0.65, 0.45);
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
// Industry badge colours
// ---------------------------------------------------------------------------

/// Maps each industry facet to a distinct badge colour.
#[derive(Debug, Clone, Default)]
pub struct BadgeColors {
    mapping: HashMap<String, Color32>,
}

impl BadgeColors {
    /// Build from a facet list; the `"All"` sentinel gets no colour.
    pub fn new(facets: &[String]) -> Self {
        let industries: Vec<&String> = facets.iter().filter(|f| f.as_str() != ALL_INDUSTRIES).collect();
        let palette = generate_palette(industries.len());
        let mapping = industries
            .into_iter()
            .zip(palette)
            .map(|(industry, color)| (industry.clone(), color))
            .collect();
        Self { mapping }
    }

    pub fn color_for(&self, industry: &str) -> Color32 {
        self.mapping
            .get(industry)
            .copied()
            .unwrap_or(Color32::GRAY)
    }
}
