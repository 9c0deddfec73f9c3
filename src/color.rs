//! 24-bit colors and the two blend operations the scene needs: channel-wise
//! interpolation and brightness offsets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Linear interpolation per channel, `t` clamped to `[0, 1]` and rounded
    /// to the nearest integer.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 {
            let a = a as f64;
            (a + (b as f64 - a) * t).round() as u8
        };
        Rgb(
            mix(self.0, other.0),
            mix(self.1, other.1),
            mix(self.2, other.2),
        )
    }

    /// Adds `amount` to every channel, saturating at 0 and 255.
    pub fn adjust(self, amount: i16) -> Rgb {
        let ch = |c: u8| (c as i16 + amount).clamp(0, 255) as u8;
        Rgb(ch(self.0), ch(self.1), ch(self.2))
    }

    /// Parses `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> Result<Rgb, Error> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(Error::InvalidColor(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| Error::InvalidColor(s.to_string()))
        };
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl FromStr for Rgb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::from_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&s)
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> String {
        c.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        let a = Rgb(0x0C, 0x14, 0x45);
        let b = Rgb(0xFF, 0xB3, 0x47);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
    }

    #[test]
    fn test_lerp_midpoint_rounds() {
        assert_eq!(Rgb(0, 0, 0).lerp(Rgb(255, 1, 3), 0.5), Rgb(128, 1, 2));
    }

    #[test]
    fn test_lerp_clamps_t() {
        let a = Rgb(10, 20, 30);
        let b = Rgb(200, 100, 0);
        assert_eq!(a.lerp(b, -3.0), a);
        assert_eq!(a.lerp(b, 7.5), b);
    }

    #[test]
    fn test_adjust_clamps_channels() {
        assert_eq!(Rgb(250, 10, 128).adjust(20), Rgb(255, 30, 148));
        assert_eq!(Rgb(250, 10, 128).adjust(-30), Rgb(220, 0, 98));
    }

    #[test]
    fn test_hex_roundtrip() {
        let c: Rgb = "#1a2a6c".parse().unwrap();
        assert_eq!(c, Rgb(0x1A, 0x2A, 0x6C));
        assert_eq!(c.to_string(), "#1A2A6C");
        assert_eq!(Rgb::from_hex("FFD700").unwrap(), Rgb(255, 215, 0));
    }

    #[test]
    fn test_bad_hex_rejected() {
        assert!(Rgb::from_hex("#FFF").is_err());
        assert!(Rgb::from_hex("#GG0000").is_err());
        assert!(Rgb::from_hex("#ééé").is_err());
    }
}
