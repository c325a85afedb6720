//! Turns an escape count into a colour.  The banding is deliberately
//! crude and must stay bit-exact so that images are comparable
//! between runs and builds.

/// An 8-bit RGB triple.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PixelColor {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl PixelColor {
    /// The colour as it is laid out in a PPM pixel.
    pub fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Quantize an escape count.
pub fn to_color(count: usize) -> PixelColor {
    PixelColor {
        r: (count % 8 * 32) as u8,
        g: (count % 16 * 16) as u8,
        b: (count % 32 * 8) as u8,
    }
}
