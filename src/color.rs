use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use tsplot::Figure;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Golden-angle hue step: consecutive colours stay far apart however many
/// series are drawn.
const HUE_STEP: f32 = 137.508;

/// The `i`-th series colour. Lightness alternates so neighbours differ even
/// where hues come close.
pub fn series_color(i: usize) -> Color32 {
    let hue = (i as f32 * HUE_STEP) % 360.0;
    let lightness = if i % 2 == 0 { 0.55 } else { 0.42 };
    let rgb: Srgb = Hsl::new(hue, 0.75, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Per-figure colours
// ---------------------------------------------------------------------------

/// Colours for every series of a figure. Right-axis series continue the
/// sequence after the left-axis ones so no two lines share a colour.
#[derive(Debug, Clone)]
pub struct SeriesColors {
    left: Vec<Color32>,
    right: Vec<Color32>,
}

impl SeriesColors {
    pub fn for_figure(figure: &Figure) -> Self {
        let n_left = figure.left().len();
        let n_right = figure.right().map_or(0, |r| r.len());
        SeriesColors {
            left: (0..n_left).map(series_color).collect(),
            right: (n_left..n_left + n_right).map(series_color).collect(),
        }
    }

    pub fn left(&self, i: usize) -> Color32 {
        self.left.get(i).copied().unwrap_or(Color32::GRAY)
    }

    pub fn right(&self, i: usize) -> Color32 {
        self.right.get(i).copied().unwrap_or(Color32::GRAY)
    }
}
