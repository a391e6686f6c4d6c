use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use mouse_rhythms::data::model::{SeriesCollection, Sex, SexPair};

// ---------------------------------------------------------------------------
// Fixed colours
// ---------------------------------------------------------------------------

pub const MALE: Color32 = Color32::from_rgb(65, 105, 225); // royal blue
pub const FEMALE: Color32 = Color32::from_rgb(220, 20, 60); // crimson
pub const ESTRUS: Color32 = Color32::from_rgb(255, 165, 0);
pub const CURSOR: Color32 = Color32::GRAY;

pub fn sex_color(sex: Sex) -> Color32 {
    match sex {
        Sex::Male => MALE,
        Sex::Female => FEMALE,
    }
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// `n` distinct colours with hues evenly spaced over `[hue_start, hue_end)`.
pub fn generate_palette(n: usize, hue_start: f32, hue_end: f32) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (hue_start + (i as f32 / n as f32) * (hue_end - hue_start)).rem_euclid(360.0);
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

// ---------------------------------------------------------------------------
// Subject colours: cool hues for males, warm hues for females
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct SubjectPalette {
    mapping: SexPair<BTreeMap<String, Color32>>,
}

impl SubjectPalette {
    pub fn new(subjects: &SexPair<SeriesCollection>) -> Self {
        let build = |c: &SeriesCollection, hues: (f32, f32)| -> BTreeMap<String, Color32> {
            c.names()
                .map(str::to_string)
                .zip(generate_palette(c.len(), hues.0, hues.1))
                .collect()
        };
        SubjectPalette {
            mapping: SexPair::new(
                build(&subjects.male, (180.0, 270.0)),
                build(&subjects.female, (320.0, 400.0)),
            ),
        }
    }

    /// Colour of one subject; the sex colour for unknown names.
    pub fn color_for(&self, sex: Sex, subject: &str) -> Color32 {
        self.mapping
            .get(sex)
            .get(subject)
            .copied()
            .unwrap_or_else(|| sex_color(sex))
    }
}
