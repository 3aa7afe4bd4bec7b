//! Types shared by descriptors, fields, and the renderer

use serde::{Deserialize, Deserializer};

/// A linear RGB color with components in [0, 1]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create from a 24-bit hex value (0xRRGGBB)
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
        }
    }

    /// Parse `#rrggbb` or `rrggbb`
    pub fn parse_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::from_hex)
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<[f32; 3]> for Rgb {
    fn from(arr: [f32; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }
}

// Accepts either "#rrggbb" or [r, g, b] in config files
impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Triple([f32; 3]),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => Rgb::parse_hex(&s)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color '{s}'"))),
            Repr::Triple(arr) => Ok(arr.into()),
        }
    }
}

/// Opaque reference to a texture owned by the renderer's texture cache
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);
