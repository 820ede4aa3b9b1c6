use std::fmt;

/// Premultiplied RGBA8 pixel as stored in canvases.
pub type PremulRgba8 = [u8; 4];

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (case-insensitive, `#` optional).
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        if !s.is_ascii() {
            return Err(format!("invalid hex color \"{s}\""));
        }

        fn hex_byte(pair: &str) -> Result<u8, String> {
            u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
        }

        match s.len() {
            3 => {
                let mut out = [0u8; 3];
                for (slot, i) in out.iter_mut().zip(0..3) {
                    let nib = hex_byte(&s[i..i + 1])?;
                    *slot = nib * 17;
                }
                Ok(Self::rgb(out[0], out[1], out[2]))
            }
            6 => Ok(Self::rgb(
                hex_byte(&s[0..2])?,
                hex_byte(&s[2..4])?,
                hex_byte(&s[4..6])?,
            )),
            8 => Ok(Self::rgba(
                hex_byte(&s[0..2])?,
                hex_byte(&s[2..4])?,
                hex_byte(&s[4..6])?,
                hex_byte(&s[6..8])?,
            )),
            _ => Err("hex color must be #RGB, #RRGGBB or #RRGGBBAA".to_owned()),
        }
    }

    pub fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// Linear interpolation in straight-alpha space, `t` clamped to `[0, 1]`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 {
            let af = f64::from(a);
            let bf = f64::from(b);
            (af + (bf - af) * t).round().clamp(0.0, 255.0) as u8
        };
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    pub fn premultiplied(self) -> PremulRgba8 {
        let a = u16::from(self.a);
        if a == 0 {
            return [0, 0, 0, 0];
        }
        let mul = |c: u8| ((u16::from(c) * a + 127) / 255) as u8;
        [mul(self.r), mul(self.g), mul(self.b), self.a]
    }
}

impl fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)?;
        if !self.is_opaque() {
            write!(f, "{:02X}", self.a)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_long_and_alpha_hex() {
        assert_eq!(Rgba8::from_hex("#fff").unwrap(), Rgba8::WHITE);
        assert_eq!(
            Rgba8::from_hex("#112233").unwrap(),
            Rgba8::rgb(0x11, 0x22, 0x33)
        );
        assert_eq!(
            Rgba8::from_hex("0000ff80").unwrap(),
            Rgba8::rgba(0, 0, 255, 0x80)
        );
        assert_eq!(Rgba8::from_hex("#A1b2C3").unwrap().to_string(), "#A1B2C3");
    }

    #[test]
    fn rejects_bad_lengths_and_digits() {
        assert!(Rgba8::from_hex("#12345").is_err());
        assert!(Rgba8::from_hex("#ggg").is_err());
        assert!(Rgba8::from_hex("").is_err());
        assert!(Rgba8::from_hex("#ééé").is_err());
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = Rgba8::rgb(0, 0, 0);
        let b = Rgba8::rgb(200, 100, 50);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgba8::rgb(100, 50, 25));
    }

    #[test]
    fn premultiply_scales_color_by_alpha() {
        assert_eq!(Rgba8::rgb(10, 20, 30).premultiplied(), [10, 20, 30, 255]);
        assert_eq!(Rgba8::rgba(255, 0, 0, 0).premultiplied(), [0, 0, 0, 0]);
        assert_eq!(Rgba8::rgba(200, 100, 50, 128).premultiplied(), [
            ((200u16 * 128 + 127) / 255) as u8,
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            128
        ]);
    }
}
