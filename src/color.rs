use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Peak highlight colours
// ---------------------------------------------------------------------------

/// Hue step between consecutive peaks (golden angle), so colours already on
/// screen never change when another peak is added.
const HUE_STEP: f32 = 137.508;

fn hsl_to_color32(hsl: Hsl, alpha: u8) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgba_unmultiplied(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
        alpha,
    )
}

/// Opaque colour of the `index`-th integrated peak, starting from yellow.
pub fn peak_color(index: usize) -> Color32 {
    let hue = (60.0 + index as f32 * HUE_STEP) % 360.0;
    hsl_to_color32(Hsl::new(hue, 0.85, 0.55), 255)
}

/// Translucent fill for the `index`-th integrated peak.
pub fn peak_fill(index: usize) -> Color32 {
    let hue = (60.0 + index as f32 * HUE_STEP) % 360.0;
    hsl_to_color32(Hsl::new(hue, 0.85, 0.55), 110)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consecutive_peaks_differ() {
        assert_ne!(peak_color(0), peak_color(1));
        assert_ne!(peak_color(1), peak_color(2));
        assert_eq!(peak_fill(3).a(), 110);
    }
}
