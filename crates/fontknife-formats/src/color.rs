//! RGBA colors for sprite-sheet output.

use std::fmt;
use std::str::FromStr;

use crate::error::FormatError;

/// An 8-bit per channel RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Luminance using ITU-R 601-2 weights, as used for grayscale conversion.
    pub fn luminance(self) -> u8 {
        let l = (self.r as u32 * 299 + self.g as u32 * 587 + self.b as u32 * 114) / 1000;
        l as u8
    }
}

impl From<[u8; 4]> for Rgba {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Rgba::new(r, g, b, a)
    }
}

impl FromStr for Rgba {
    type Err = FormatError;

    /// Parse `#RRGGBB` or `#RRGGBBAA`; the leading `#` is optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FormatError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !(hex.len() == 6 || hex.len() == 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Rgba::new(channel(0)?, channel(2)?, channel(4)?, alpha))
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02X}", self.a)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rgb_and_rgba() {
        assert_eq!("#FF8000".parse::<Rgba>().unwrap(), Rgba::rgb(255, 128, 0));
        assert_eq!("00000080".parse::<Rgba>().unwrap(), Rgba::new(0, 0, 0, 128));
        assert_eq!("#ffffff".parse::<Rgba>().unwrap(), Rgba::WHITE);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "#FFF", "#GGGGGG", "#FFFFFFF", "red"] {
            assert!(bad.parse::<Rgba>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_display_round_trip() {
        let color = Rgba::new(1, 2, 3, 4);
        assert_eq!(color.to_string(), "#01020304");
        assert_eq!(color.to_string().parse::<Rgba>().unwrap(), color);
        assert_eq!(Rgba::BLACK.to_string(), "#000000");
    }

    #[test]
    fn test_luminance() {
        assert_eq!(Rgba::WHITE.luminance(), 255);
        assert_eq!(Rgba::BLACK.luminance(), 0);
        assert_eq!(Rgba::rgb(255, 0, 0).luminance(), 76);
    }
}
