use serde::{Deserialize, Serialize};

/// An RGB colour
pub type Rgb = (u8, u8, u8);

/// Colour scheme for the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skin {
    #[default]
    Classic,
    Blue,
    Purple,
    Golden,
    /// Hue cycles over time
    Rainbow,
}

/// Rainbow hue speed in degrees per second
pub const RAINBOW_DEGREES_PER_SECOND: f32 = 100.0;

impl Skin {
    pub const ALL: [Skin; 5] = [
        Skin::Classic,
        Skin::Blue,
        Skin::Purple,
        Skin::Golden,
        Skin::Rainbow,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Skin::Classic => "Classic Green",
            Skin::Blue => "Ocean Blue",
            Skin::Purple => "Royal Purple",
            Skin::Golden => "Golden Snake",
            Skin::Rainbow => "Rainbow",
        }
    }

    /// Head and body colours; `hue` only matters for the rainbow skin
    pub fn colors(&self, hue: f32) -> (Rgb, Rgb) {
        match self {
            Skin::Classic => ((0x22, 0xc5, 0x5e), (0x16, 0xa3, 0x4a)),
            Skin::Blue => ((0x3b, 0x82, 0xf6), (0x1d, 0x4e, 0xd8)),
            Skin::Purple => ((0xa8, 0x55, 0xf7), (0x7e, 0x22, 0xce)),
            Skin::Golden => ((0xfb, 0xbf, 0x24), (0xd9, 0x77, 0x06)),
            Skin::Rainbow => (
                hsl_to_rgb(hue, 1.0, 0.5),
                hsl_to_rgb((hue + 30.0) % 360.0, 1.0, 0.4),
            ),
        }
    }

    /// The skin after this one, wrapping around
    pub fn next(&self) -> Skin {
        let index = Skin::ALL.iter().position(|s| s == self).unwrap_or(0);
        Skin::ALL[(index + 1) % Skin::ALL.len()]
    }
}

/// Convert hue (degrees), saturation and lightness (0..=1) to RGB
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Rgb {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let sector = hue.rem_euclid(360.0) / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    let channel = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (channel(r), channel(g), channel(b))
}
