use std::fmt;

use serde::{Deserialize, Serialize};

/// Functional category of a mino color.
///
/// NES Tetris draws every locked mino with one of three palette entries of the
/// current level. `Empty` marks a cell with no mino and is never the result of a
/// classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[repr(u8)]
pub enum ColorRole {
    #[default]
    Empty = 0,
    White = 1,
    Primary = 2,
    Secondary = 3,
}

impl ColorRole {
    /// The roles a mino can be classified as, in tie-breaking priority order.
    pub const MINO_ROLES: [ColorRole; 3] = [
        ColorRole::White,
        ColorRole::Primary,
        ColorRole::Secondary,
    ];

    #[must_use]
    pub fn is_empty(self) -> bool {
        self == ColorRole::Empty
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            ColorRole::Empty => '.',
            ColorRole::White => 'W',
            ColorRole::Primary => 'P',
            ColorRole::Secondary => 'S',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(ColorRole::Empty),
            'W' => Some(ColorRole::White),
            'P' => Some(ColorRole::Primary),
            'S' => Some(ColorRole::Secondary),
            _ => None,
        }
    }
}

/// An 8-bit-per-channel RGB color as sampled from a frame.
///
/// Serializes as a `"#rrggbb"` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// HSV color with hue in degrees `[0, 360)` and saturation/value in percent `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[must_use]
    pub fn to_hsv(self) -> Hsv {
        let r = f32::from(self.r) / 255.0;
        let g = f32::from(self.g) / 255.0;
        let b = f32::from(self.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let mut h = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        if h >= 360.0 {
            h -= 360.0;
        }

        let s = if max == 0.0 { 0.0 } else { delta / max * 100.0 };
        let v = max * 100.0;

        Hsv { h, s, v }
    }

    /// Parses `"#rrggbb"` (the leading `#` is optional).
    #[must_use]
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Rgb::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("expected \"#rrggbb\", got '{s}'")))
    }
}

impl Hsv {
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn to_rgb(self) -> Rgb {
        let h = self.h.rem_euclid(360.0);
        let s = (self.s / 100.0).clamp(0.0, 1.0);
        let v = (self.v / 100.0).clamp(0.0, 1.0);

        let c = v * s;
        let h_prime = h / 60.0;
        let x = c * (1.0 - (h_prime.rem_euclid(2.0) - 1.0).abs());
        let m = v - c;

        let (r, g, b) = match h_prime as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        let to_channel = |value: f32| ((value + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgb::new(to_channel(r), to_channel(g), to_channel(b))
    }

    /// Perceptual distance between two HSV colors.
    ///
    /// Hue difference wraps around the color circle; the result is the euclidean
    /// norm of the hue, saturation and value deltas.
    #[must_use]
    pub fn distance(self, other: Hsv) -> f32 {
        let mut dh = (self.h - other.h).abs();
        dh = dh.min(360.0 - dh);
        let ds = self.s - other.s;
        let dv = self.v - other.v;
        (dh * dh + ds * ds + dv * dv).sqrt()
    }
}

/// Default white mino color (real captures are slightly off-white).
pub const DEFAULT_WHITE: Rgb = Rgb::new(250, 250, 250);

/// Default primary mino color per level bucket (NES palette).
pub const DEFAULT_PRIMARY: [Rgb; 10] = [
    Rgb::new(0x00, 0x58, 0xf8),
    Rgb::new(0x00, 0xa8, 0x00),
    Rgb::new(0xd8, 0x00, 0xcc),
    Rgb::new(0x00, 0x58, 0xf8),
    Rgb::new(0xe4, 0x00, 0x58),
    Rgb::new(0x58, 0xf8, 0x98),
    Rgb::new(0xf8, 0x38, 0x00),
    Rgb::new(0x68, 0x44, 0xfc),
    Rgb::new(0x00, 0x58, 0xf8),
    Rgb::new(0xf8, 0x38, 0x00),
];

/// Default secondary mino color per level bucket (NES palette).
pub const DEFAULT_SECONDARY: [Rgb; 10] = [
    Rgb::new(0x3c, 0xbc, 0xfc),
    Rgb::new(0xb8, 0xf8, 0x18),
    Rgb::new(0xf8, 0x78, 0xf8),
    Rgb::new(0x58, 0xd8, 0x54),
    Rgb::new(0x58, 0xf8, 0x98),
    Rgb::new(0x68, 0x88, 0xfc),
    Rgb::new(0x7c, 0x7c, 0x7c),
    Rgb::new(0xa8, 0x00, 0x20),
    Rgb::new(0xf8, 0x38, 0x00),
    Rgb::new(0xfc, 0xa0, 0x44),
];

#[cfg(test)]
mod tests {
    use super::*;

    const EXACT_PAIRS: [(Rgb, Hsv); 6] = [
        (Rgb::new(255, 0, 0), Hsv { h: 0.0, s: 100.0, v: 100.0 }),
        (Rgb::new(0, 255, 0), Hsv { h: 120.0, s: 100.0, v: 100.0 }),
        (Rgb::new(0, 0, 255), Hsv { h: 240.0, s: 100.0, v: 100.0 }),
        (Rgb::new(255, 255, 0), Hsv { h: 60.0, s: 100.0, v: 100.0 }),
        (Rgb::new(255, 255, 255), Hsv { h: 0.0, s: 0.0, v: 100.0 }),
        (Rgb::new(0, 0, 0), Hsv { h: 0.0, s: 0.0, v: 0.0 }),
    ];

    #[test]
    fn test_exact_rgb_to_hsv() {
        for (rgb, hsv) in EXACT_PAIRS {
            assert_eq!(rgb.to_hsv(), hsv, "rgb {rgb}");
        }
    }

    #[test]
    fn test_exact_hsv_to_rgb() {
        for (rgb, hsv) in EXACT_PAIRS {
            assert_eq!(hsv.to_rgb(), rgb, "hsv {hsv:?}");
        }
    }

    #[test]
    fn test_round_trip_within_one() {
        for r in (0..=255u8).step_by(15) {
            for g in (0..=255u8).step_by(17) {
                for b in (0..=255u8).step_by(51) {
                    let rgb = Rgb::new(r, g, b);
                    let back = rgb.to_hsv().to_rgb();
                    assert!(back.r.abs_diff(r) <= 1, "{rgb} -> {back}");
                    assert!(back.g.abs_diff(g) <= 1, "{rgb} -> {back}");
                    assert!(back.b.abs_diff(b) <= 1, "{rgb} -> {back}");
                }
            }
        }
    }

    #[test]
    fn test_hue_is_in_range() {
        let hsv = Rgb::new(255, 0, 1).to_hsv();
        assert!((0.0..360.0).contains(&hsv.h), "hue {}", hsv.h);
    }

    #[test]
    fn test_distance_wraps_hue() {
        let a = Hsv { h: 350.0, s: 50.0, v: 50.0 };
        let b = Hsv { h: 10.0, s: 50.0, v: 50.0 };
        assert!((a.distance(b) - 20.0).abs() < 1e-4);
        assert!((b.distance(a) - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_rgb_serialization() {
        let rgb = Rgb::new(0x00, 0x58, 0xf8);
        let serialized = serde_json::to_string(&rgb).unwrap();
        assert_eq!(serialized, "\"#0058f8\"");
        assert_eq!(serde_json::from_str::<Rgb>(&serialized).unwrap(), rgb);
        assert_eq!(serde_json::from_str::<Rgb>("\"0058F8\"").unwrap(), rgb);

        assert!(serde_json::from_str::<Rgb>("\"#0058f\"").is_err());
        assert!(serde_json::from_str::<Rgb>("\"#0058fg\"").is_err());
    }

    #[test]
    fn test_role_char_conversion() {
        for role in [
            ColorRole::Empty,
            ColorRole::White,
            ColorRole::Primary,
            ColorRole::Secondary,
        ] {
            assert_eq!(ColorRole::from_char(role.as_char()), Some(role));
        }
        assert_eq!(ColorRole::from_char('x'), None);
    }
}
