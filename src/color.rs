use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| hsl_to_color32((i as f32 / n as f32) * 360.0, 0.75, 0.55))
        .collect()
}

/// Diverging blue → white → red colour for a correlation in `[-1, 1]`.
pub fn correlation_color(r: f64) -> Color32 {
    let t = r.clamp(-1.0, 1.0) as f32;
    let hue = if t < 0.0 { 220.0 } else { 5.0 };
    hsl_to_color32(hue, 0.7, 0.95 - 0.45 * t.abs())
}

// ---------------------------------------------------------------------------
// Color mapping: series label → Color32
// ---------------------------------------------------------------------------

/// Maps series labels to distinct colours, in first-seen order.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let mut unique: Vec<&str> = Vec::new();
        for label in labels {
            if !unique.contains(&label) {
                unique.push(label);
            }
        }
        let mapping = unique
            .iter()
            .zip(generate_palette(unique.len()))
            .map(|(label, c)| (label.to_string(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Colour for `label`, gray for labels the map does not know.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Colour for points that matched no candidate.
    pub fn unassigned(&self) -> Color32 {
        self.default_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        let p = generate_palette(6);
        assert_eq!(p.len(), 6);
        for (i, a) in p.iter().enumerate() {
            assert!(p[i + 1..].iter().all(|b| b != a));
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn duplicate_labels_share_a_colour() {
        let map = ColorMap::new(["y7", "y12", "y7"]);
        assert_ne!(map.color_for("y7"), map.color_for("y12"));
        assert_eq!(map.color_for("unknown"), map.unassigned());
    }

    #[test]
    fn zero_correlation_is_near_white() {
        let c = correlation_color(0.0);
        assert!(c.r() > 230 && c.g() > 230 && c.b() > 230);
        assert_ne!(correlation_color(-1.0), correlation_color(1.0));
    }
}
