use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use household_impact::analysis::ImpactTone;

// ---------------------------------------------------------------------------
// Impact colours
// ---------------------------------------------------------------------------

const FAVORABLE_HUE: f32 = 135.0;
const UNFAVORABLE_HUE: f32 = 2.0;
const TOTALS_HUE: f32 = 215.0;

fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Green for good news, red for bad news.
pub fn tone_color(tone: ImpactTone) -> Color32 {
    match tone {
        ImpactTone::Favorable => from_hsl(FAVORABLE_HUE, 0.65, 0.40),
        ImpactTone::Unfavorable => from_hsl(UNFAVORABLE_HUE, 0.75, 0.50),
    }
}

/// Baseline and final bars of the waterfall.
pub fn totals_color() -> Color32 {
    from_hsl(TOTALS_HUE, 0.70, 0.50)
}
