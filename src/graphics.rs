//! Graphics support via embedded-graphics
//!
//! Implements [`DrawTarget`] and [`OriginDimensions`] for [`Display`], so any
//! embedded-graphics primitive, font or image can be drawn into the frame
//! buffer. Drawing only marks rows dirty; call
//! [`sync`](crate::Display::sync) to put them on the panel.
//!
//! ## Features
//!
//! - 2D graphics primitives (lines, rectangles, circles, text, etc.)
//! - Rotation support (rows on the wire stay physical)
//! - Pixels outside the display are clipped silently
//!
//! ## Example
//!
//! ```rust
//! use embedded_graphics::{
//!     prelude::*,
//!     primitives::{PrimitiveStyle, Rectangle},
//! };
//! use memlcd::{Builder, Color, Dimensions, Display, VcomFlag, VcomMode, VcomSource, VcomTimer};
//! # use core::convert::Infallible;
//! # use memlcd::DisplayInterface;
//! # struct MockInterface;
//! # impl DisplayInterface for MockInterface {
//! #     type Error = Infallible;
//! #     fn select(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn deselect(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn send(&mut self, _data: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockTimer;
//! # impl VcomTimer for MockTimer {
//! #     type Error = Infallible;
//! #     fn arm(&mut self, _: u32, _: &'static VcomFlag, _: VcomMode) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockDelay;
//! # impl embedded_hal::delay::DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # static VCOM: VcomFlag = VcomFlag::new();
//! # let Ok(vcom) = VcomSource::initialize_default(MockTimer, &VCOM, VcomMode::HardwareRelay) else { return };
//! # let Ok(dims) = Dimensions::new(128, 128) else { return };
//! # let Ok(config) = Builder::new().dimensions(dims).build() else { return };
//! # let mut delay = MockDelay;
//! let mut display = Display::new(MockInterface, config, vcom, [0u8; 128 * 128 / 8]);
//!
//! display.fill(Color::White);
//! let _ = Rectangle::new(Point::new(10, 10), Size::new(50, 30))
//!     .into_styled(PrimitiveStyle::with_fill(Color::Black))
//!     .draw(&mut display);
//!
//! // Only rows 10..40 are sent
//! let _ = display.sync(&mut delay);
//! ```

use core::convert::Infallible;
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    prelude::Pixel,
};

use crate::color::Color;
use crate::display::Display;
use crate::interface::DisplayInterface;
use crate::rotation::apply_rotation;

impl<I, T, B> DrawTarget for Display<I, T, B>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    type Color = Color;
    type Error = Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let sz = self.size();
        let dims = *self.dimensions();
        let rotation = self.rotation();

        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 {
                continue;
            }

            let x = x as u32;
            let y = y as u32;

            if x >= sz.width || y >= sz.height {
                continue;
            }

            let (col, row) =
                apply_rotation(x as u16, y as u16, dims.cols(), dims.rows(), rotation);
            debug_assert!(
                col < dims.cols() && row < dims.rows(),
                "rotation mapped ({x}, {y}) off the panel"
            );
            if let Err(e) = self.set_pixel(col, row, color.bit()) {
                log::warn!("dropped pixel ({}, {}): {}", x, y, e);
            }
        }

        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}

impl<I, T, B> OriginDimensions for Display<I, T, B>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    fn size(&self) -> Size {
        let (width, height) = self.config().rotated_size();
        Size::new(width as u32, height as u32)
    }
}
