//! Sharp Memory LCD Driver
//!
//! A driver for Sharp memory-in-pixel LCDs (LS013B7DH03, LS027B7DH01 and
//! friends) supporting panels up to 800x255 pixels.
//!
//! ## Features
//!
//! - `no_std` compatible
//! - `embedded-hal` v1.0 support
//! - `embedded-graphics` integration (with `graphics` feature)
//! - Dirty-row tracking: only changed rows go on the wire
//! - Timer-driven VCOM with software or hardware relay
//! - Configurable keep-alive policy and bit order
//! - Rotation support
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::OutputPin;
//! use embedded_hal::spi::SpiBus;
//! use memlcd::{
//!     Builder, Dimensions, Display, Interface, KeepAlive, VcomFlag, VcomMode, VcomSource,
//!     VcomTimer,
//! };
//!
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiBus for MockSpi {
//! #     fn read(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn write(&mut self, _words: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn transfer(&mut self, _read: &mut [u8], _write: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockTimer;
//! # impl VcomTimer for MockTimer {
//! #     type Error = Infallible;
//! #     fn arm(&mut self, _: u32, _: &'static VcomFlag, _: VcomMode) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let spi = MockSpi;
//! # let cs = MockPin;
//! # let timer = MockTimer;
//! # let mut delay = MockDelay;
//! static VCOM: VcomFlag = VcomFlag::new();
//!
//! // Arm VCOM before anything touches the panel
//! let vcom = match VcomSource::initialize(timer, &VCOM, VcomMode::HardwareRelay, 2) {
//!     Ok(vcom) => vcom,
//!     Err(_) => loop {},
//! };
//!
//! let interface = Interface::new(spi, cs);
//! let dims = match Dimensions::new(128, 128) {
//!     Ok(dims) => dims,
//!     Err(_) => return,
//! };
//! let config = match Builder::new()
//!     .dimensions(dims)
//!     .keep_alive(KeepAlive::WhenIdle)
//!     .build()
//! {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut display = Display::new(interface, config, vcom, [0u8; 128 * 128 / 8]);
//! let _ = display.init(&mut delay);
//! let _ = display.set_pixel(3, 2, true);
//! let _ = display.sync(&mut delay);
//! ```

#![no_std]

#[cfg(test)]
extern crate alloc;

#[cfg(test)]
extern crate std;

/// Monochrome color type
pub mod color;
/// Wire-level constants and panel timing minimums
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Core display operations
pub mod display;
/// Error types for the driver
pub mod error;
/// Pixel storage with dirty-row tracking
pub mod framebuffer;
/// Hardware interface abstraction
pub mod interface;
/// Frame encoding and the sync pass
pub mod protocol;
/// Coordinate rotation utilities
pub mod rotation;
/// VCOM polarity generation
pub mod vcom;

/// Graphics support via embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

pub use color::Color;
pub use config::{
    BitOrder, Builder, Config, Dimensions, KeepAlive, MAX_COLUMNS, MAX_ROWS, Rotation, Timing,
};
pub use display::Display;
pub use error::{BuilderError, Error, FrameBufferError, VcomError};
pub use framebuffer::{DirtyRows, FrameBuffer};
pub use interface::{DisplayInterface, Interface, InterfaceError};
pub use protocol::{FrameWriter, MAX_FRAME_LEN, SyncReport};
pub use vcom::{VcomFlag, VcomMode, VcomSource, VcomTimer};
