//! Display colors for sites

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// RGBA color with components in `[0, 1]`
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiteColor(pub [f32; 4]);

impl SiteColor {
    pub const GRAY: SiteColor = SiteColor([0.5, 0.5, 0.5, 1.0]);

    /// Parse `#rrggbb`, `#rgb` or a basic color name
    ///
    /// Returns `None` for anything else.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(hex) = text.strip_prefix('#') {
            return parse_hex(hex);
        }

        let rgb: [u8; 3] = match text.to_ascii_lowercase().as_str() {
            "black" => [0, 0, 0],
            "white" => [255, 255, 255],
            "red" => [255, 0, 0],
            "green" => [0, 128, 0],
            "lime" => [0, 255, 0],
            "blue" => [0, 0, 255],
            "yellow" => [255, 255, 0],
            "cyan" => [0, 255, 255],
            "magenta" => [255, 0, 255],
            "orange" => [255, 165, 0],
            "purple" => [128, 0, 128],
            "pink" => [255, 192, 203],
            "brown" => [165, 42, 42],
            "gray" | "grey" => [128, 128, 128],
            _ => return None,
        };
        Some(Self::from_rgb8(rgb))
    }

    /// Parse like [`SiteColor::parse`], falling back to gray
    pub fn parse_or_gray(text: &str) -> Self {
        Self::parse(text).unwrap_or(Self::GRAY)
    }

    pub fn from_rgb8([r, g, b]: [u8; 3]) -> Self {
        SiteColor([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0])
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, alpha: f32) -> Self {
        let [r, g, b, _] = self.0;
        SiteColor([r, g, b, alpha])
    }
}

impl Default for SiteColor {
    fn default() -> Self {
        Self::GRAY
    }
}

fn parse_hex(hex: &str) -> Option<SiteColor> {
    let digits: Vec<u8> = hex
        .chars()
        .map(|c| c.to_digit(16).map(|d| d as u8))
        .collect::<Option<_>>()?;

    let rgb = match digits.as_slice() {
        [r, g, b] => [r * 17, g * 17, b * 17],
        [r1, r0, g1, g0, b1, b0] => [r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0],
        _ => return None,
    };
    Some(SiteColor::from_rgb8(rgb))
}
