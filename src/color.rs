use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::{self, Color32};
use palette::{Hsl, IntoColor, Srgb};
use serde::{Deserialize, Serialize};

use crate::data::model::CellValue;

// ---------------------------------------------------------------------------
// Theme – the binary light/dark toggle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        }
    }

    pub fn visuals(self) -> egui::Visuals {
        match self {
            Theme::Light => egui::Visuals::light(),
            Theme::Dark => egui::Visuals::dark(),
        }
    }

    /// Hue-spaced categorical palette: pastel in light mode, saturated in
    /// dark mode (mirroring the Pastel/Dark24 chart palettes of the
    /// original dashboard).
    fn palette_params(self) -> (f32, f32) {
        match self {
            Theme::Light => (0.55, 0.70),
            Theme::Dark => (0.75, 0.55),
        }
    }

    /// Accent for positive heatmap cells and trend lines.
    pub fn accent(self) -> Color32 {
        match self {
            Theme::Light => Color32::from_rgb(99, 110, 250),
            Theme::Dark => Color32::from_rgb(130, 140, 255),
        }
    }
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize, theme: Theme) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    let (saturation, lightness) = theme.palette_params();
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, saturation, lightness);
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
// Color mapping: cell value → Color32
// ---------------------------------------------------------------------------

/// Maps the unique values of a categorical column to distinct colours, so
/// a category keeps its colour across every chart of a render cycle.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<CellValue, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map for a column from its unique values.
    pub fn new(unique_values: &BTreeSet<CellValue>, theme: Theme) -> Self {
        let palette = generate_palette(unique_values.len(), theme);
        let mapping: BTreeMap<CellValue, Color32> = unique_values
            .iter()
            .zip(palette)
            .map(|(v, c)| (v.clone(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given cell value.
    pub fn color_for(&self, value: &CellValue) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}
