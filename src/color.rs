use crate::error::{Error, Result};
use palette::Srgb;
use std::{fmt, str::FromStr};

/// An immutable 8-bit RGB color.
///
/// Every other representation (normalized RGB, hex, HSV) is computed from the three channels on access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
}

impl Color {
    pub const fn new(red: u8, green: u8, blue: u8) -> Color {
        Self { red, green, blue }
    }

    /// Build a color from HSV components, each in `[0, 1]`.
    ///
    /// The hue wraps around the color wheel, saturation and value are clamped. The wheel is split into six sectors
    /// and each resulting channel is truncated towards zero when scaled back to 8 bits.
    pub fn from_hsv(hue: f64, saturation: f64, value: f64) -> Color {
        let hue = hue.rem_euclid(1.0);
        let saturation = saturation.clamp(0.0, 1.0);
        let value = value.clamp(0.0, 1.0);

        if saturation == 0.0 {
            let gray = truncate_channel(value);
            return Self::new(gray, gray, gray);
        }

        let sector = (hue * 6.0).floor();
        let f = hue * 6.0 - sector;
        let p = value * (1.0 - saturation);
        let q = value * (1.0 - saturation * f);
        let t = value * (1.0 - saturation * (1.0 - f));

        let (r, g, b) = match sector as u32 % 6 {
            0 => (value, t, p),
            1 => (q, value, p),
            2 => (p, value, t),
            3 => (p, q, value),
            4 => (t, p, value),
            _ => (value, p, q),
        };

        Self::new(truncate_channel(r), truncate_channel(g), truncate_channel(b))
    }

    /// Parse a `#rrggbb` (or bare `rrggbb`) hex string. Both cases of hex digits are accepted.
    pub fn from_hex(s: &str) -> Result<Color> {
        let hex = s.strip_prefix('#').unwrap_or(s);

        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidHex(s.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| Error::InvalidHex(s.to_string()))
        };

        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        (self.red, self.green, self.blue)
    }

    pub fn red(self) -> u8 {
        self.red
    }

    pub fn green(self) -> u8 {
        self.green
    }

    pub fn blue(self) -> u8 {
        self.blue
    }

    /// The channels scaled to `[0, 1]`.
    pub fn rgb_normalized(self) -> (f64, f64, f64) {
        (
            self.red as f64 / 255.0,
            self.green as f64 / 255.0,
            self.blue as f64 / 255.0,
        )
    }

    /// Lowercase `#rrggbb` representation.
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }

    /// Hue, saturation and value, each in `[0, 1]`. Hue is in `[0, 1)` and is zero for achromatic colors.
    pub fn hsv(self) -> (f64, f64, f64) {
        let (r, g, b) = self.rgb_normalized();
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let range = max - min;

        if range == 0.0 {
            return (0.0, 0.0, max);
        }

        let saturation = range / max;
        let rc = (max - r) / range;
        let gc = (max - g) / range;
        let bc = (max - b) / range;

        let hue = if r == max {
            bc - gc
        } else if g == max {
            2.0 + rc - bc
        } else {
            4.0 + gc - rc
        };
        let hue = (hue / 6.0).rem_euclid(1.0);
        let hue = if hue >= 1.0 { 0.0 } else { hue };

        (hue, saturation, max)
    }

    /// Squared euclidean distance in 8-bit RGB space.
    pub(crate) fn distance_squared(self, other: Color) -> u32 {
        let dr = self.red as i32 - other.red as i32;
        let dg = self.green as i32 - other.green as i32;
        let db = self.blue as i32 - other.blue as i32;

        (dr * dr + dg * dg + db * db) as u32
    }
}

impl From<[u8; 3]> for Color {
    fn from([red, green, blue]: [u8; 3]) -> Self {
        Self::new(red, green, blue)
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::new(red, green, blue)
    }
}

impl From<Srgb<u8>> for Color {
    fn from(rgb: Srgb<u8>) -> Self {
        Self::new(rgb.red, rgb.green, rgb.blue)
    }
}

impl From<Color> for Srgb<u8> {
    fn from(color: Color) -> Self {
        Srgb::new(color.red, color.green, color.blue)
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

fn truncate_channel(value: f64) -> u8 {
    (value * 255.0).clamp(0.0, 255.0) as u8
}
