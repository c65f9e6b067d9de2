//! Color representation
//!
//! 8 bits per channel, straight (non-premultiplied) alpha.

/// RGBA color with 8-bit components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8, // 255 = opaque
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// Create an opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque gray with all three channels set to `v`
    pub const fn gray(v: u8) -> Self {
        Self::rgb(v, v, v)
    }

    /// Create color from a `0xAARRGGBB` word, the layout of image pixels
    pub const fn from_argb(value: u32) -> Self {
        Self {
            a: (value >> 24) as u8,
            r: (value >> 16) as u8,
            g: (value >> 8) as u8,
            b: value as u8,
        }
    }

    pub const fn to_argb(self) -> u32 {
        sketch_resources::argb(self.r, self.g, self.b, self.a)
    }
}

impl From<u32> for Color {
    fn from(value: u32) -> Self {
        Color::from_argb(value)
    }
}

impl From<Color> for u32 {
    fn from(c: Color) -> Self {
        c.to_argb()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argb_conversion_is_lossless() {
        let c = Color::rgba(0x12, 0x34, 0x56, 0x78);
        assert_eq!(c.to_argb(), 0x7812_3456);
        assert_eq!(Color::from_argb(0x7812_3456), c);
    }

    #[test]
    fn gray_is_opaque() {
        assert_eq!(Color::gray(200), Color::rgba(200, 200, 200, 255));
    }
}
