//! Hex colour strings attached to medicines and aisles.

/// An RGBA colour with 8-bit channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha, 255 is opaque
    pub a: u8,
}

impl Rgba {
    /// Opaque black, used for anything that does not parse
    pub const BLACK: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };

    /// Parses `RRGGBB` or `RRGGBBAA` hex digits (no `#` prefix, any case).
    ///
    /// Any other length or a non-hex character yields [`Rgba::BLACK`].
    #[must_use]
    pub fn from_hex(hex: &str) -> Self {
        if !matches!(hex.len(), 6 | 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Self::BLACK;
        }
        let Ok(value) = u32::from_str_radix(hex, 16) else {
            return Self::BLACK;
        };

        let [b0, b1, b2, b3] = value.to_be_bytes();
        if hex.len() == 8 {
            Self {
                r: b0,
                g: b1,
                b: b2,
                a: b3,
            }
        } else {
            Self {
                r: b1,
                g: b2,
                b: b3,
                a: 255,
            }
        }
    }

    /// Formats the colour back as `RRGGBB`, or `RRGGBBAA` when not opaque.
    #[must_use]
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}
