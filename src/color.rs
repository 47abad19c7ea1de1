//! Color type for monochrome memory LCDs
//!
//! Each pixel is one bit. A set bit leaves the liquid crystal reflective
//! (white); a clear bit makes it absorb (black).
//!
//! | Color | Bit | Fill byte |
//! |-------|-----|-----------|
//! | Black | 0   | 0x00      |
//! | White | 1   | 0xFF      |
//!
//! ## Example
//!
//! ```
//! use memlcd::Color;
//!
//! assert!(Color::White.bit());
//! assert_eq!(Color::Black.byte(), 0x00);
//! assert_eq!(Color::from_bit(true), Color::White);
//! ```

/// Pixel colors supported by memory LCDs
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum Color {
    /// Absorbing pixel (bit clear)
    #[default]
    Black,
    /// Reflective pixel (bit set)
    White,
}

impl Color {
    /// Pixel bit for this color
    pub const fn bit(self) -> bool {
        matches!(self, Self::White)
    }

    /// Byte with all 8 pixels set to this color
    pub const fn byte(self) -> u8 {
        match self {
            Self::Black => 0x00,
            Self::White => 0xFF,
        }
    }

    /// Color for a pixel bit
    pub const fn from_bit(bit: bool) -> Self {
        if bit { Self::White } else { Self::Black }
    }

    /// The other color
    pub const fn inverse(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }
}

#[cfg(feature = "graphics")]
impl embedded_graphics_core::prelude::PixelColor for Color {
    type Raw = embedded_graphics_core::pixelcolor::raw::RawU1;
}

#[cfg(feature = "graphics")]
impl From<embedded_graphics_core::pixelcolor::BinaryColor> for Color {
    fn from(color: embedded_graphics_core::pixelcolor::BinaryColor) -> Self {
        Self::from_bit(color.is_on())
    }
}

#[cfg(feature = "graphics")]
impl From<Color> for embedded_graphics_core::pixelcolor::BinaryColor {
    fn from(color: Color) -> Self {
        if color.bit() { Self::On } else { Self::Off }
    }
}
