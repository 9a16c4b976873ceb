//! Brand colors.

use serde::{Deserialize, Serialize};

/// Straight-alpha RGBA8 color, the form paint and text brushes take.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    /// Accent used when a profile has no usable color.
    pub const NEUTRAL_ACCENT: Self = Self::opaque(0x1f, 0x29, 0x37);
    /// Secondary text on white cards.
    pub const MUTED: Self = Self::opaque(0x6b, 0x72, 0x80);
    /// Primary text on white cards.
    pub const INK: Self = Self::opaque(0x11, 0x18, 0x27);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Parse `#RRGGBB` / `#RRGGBBAA` (the `#` is optional, case-insensitive).
    pub fn parse_hex(s: &str) -> Result<Self, String> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        fn hex_byte(pair: &str) -> Result<u8, String> {
            u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
        }

        if !s.is_ascii() {
            return Err("hex color must be ASCII".to_owned());
        }
        match s.len() {
            6 => Ok(Self::opaque(
                hex_byte(&s[0..2])?,
                hex_byte(&s[2..4])?,
                hex_byte(&s[4..6])?,
            )),
            8 => Ok(Self {
                r: hex_byte(&s[0..2])?,
                g: hex_byte(&s[2..4])?,
                b: hex_byte(&s[4..6])?,
                a: hex_byte(&s[6..8])?,
            }),
            _ => Err("hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned()),
        }
    }

    /// Branding accent with the neutral fallback for empty or malformed values.
    pub fn accent_or_default(s: &str) -> Self {
        if s.trim().is_empty() {
            return Self::NEUTRAL_ACCENT;
        }
        match Self::parse_hex(s) {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!(accent = s, error = %e, "ignoring invalid accent color");
                Self::NEUTRAL_ACCENT
            }
        }
    }

    /// Black or white, whichever reads better on top of `self`.
    pub fn contrasting_text(self) -> Self {
        let luma = 0.2126 * f64::from(self.r) + 0.7152 * f64::from(self.g) + 0.0722 * f64::from(self.b);
        if luma > 150.0 { Self::INK } else { Self::WHITE }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}
