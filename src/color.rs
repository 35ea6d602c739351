use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
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
// Channel colours: neuron index → Color32
// ---------------------------------------------------------------------------

/// One colour per channel, shared by the voltage lines, the raster
/// and the side-panel toggles so a neuron looks the same everywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelColors {
    colors: Vec<Color32>,
}

impl ChannelColors {
    pub fn new(channel_count: usize) -> Self {
        Self {
            colors: generate_palette(channel_count),
        }
    }

    /// Neuron ids outside the configured range wrap around; negative ids get grey.
    pub fn color_for(&self, channel: i64) -> Color32 {
        if channel < 0 || self.colors.is_empty() {
            return Color32::GRAY;
        }
        self.colors[channel as usize % self.colors.len()]
    }

    /// Legend entries (channel label → colour) for the UI.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.colors
            .iter()
            .enumerate()
            .map(|(i, c)| (i.to_string(), *c))
            .collect()
    }
}
