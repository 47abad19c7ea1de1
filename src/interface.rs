//! Hardware interface abstraction
//!
//! This module provides the [`DisplayInterface`] trait and the [`Interface`] struct
//! for communicating with a memory LCD over SPI.
//!
//! ## Hardware Requirements
//!
//! Memory LCDs require:
//! - SPI bus (SCLK + SI), mode 0, LSB first, at most ~1-2 MHz depending on panel
//! - 1 GPIO pin:
//!   - **SCS**: Chip select (output, **active high**)
//!
//! Because chip select is active high and needs microsecond setup and hold
//! times around each transfer, the driver takes an [`SpiBus`] and drives the
//! pin itself instead of using [`SpiDevice`](embedded_hal::spi::SpiDevice).
//!
//! EXTCOMIN and DISP are not handled here; EXTCOMIN belongs to the VCOM timer
//! (see [`crate::vcom`]).
//!
//! ## Example
//!
//! ```rust
//! use embedded_hal::digital::OutputPin;
//! use embedded_hal::spi::SpiBus;
//! use memlcd::{DisplayInterface, Interface};
//! # use core::convert::Infallible;
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
//! let mut interface = Interface::new(MockSpi, MockPin);
//!
//! // One keep-alive frame, VCOM high
//! let _ = interface.select();
//! let _ = interface.send(&[0x02, 0x00]);
//! let _ = interface.deselect();
//! ```

use core::fmt::Debug;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Trait for hardware interface to a memory LCD
///
/// This trait abstracts over different hardware implementations,
/// allowing the [`Display`](crate::display::Display) to work with any
/// SPI + GPIO implementation that satisfies embedded-hal traits.
///
/// Timing between the calls is handled by the caller. Implementations must
/// send bytes in order and must not toggle chip select inside `send`.
pub trait DisplayInterface {
    /// Error type for interface operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Assert chip select (drive SCS high)
    fn select(&mut self) -> InterfaceResult<(), Self::Error>;

    /// Deassert chip select (drive SCS low)
    fn deselect(&mut self) -> InterfaceResult<(), Self::Error>;

    /// Send bytes, returning only once they are fully clocked out
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails.
    fn send(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error>;
}

/// Errors that can occur at the interface level
///
/// Generic over SPI and GPIO error types.
#[derive(Debug)]
pub enum InterfaceError<SpiErr, PinErr> {
    /// SPI communication error
    Spi(SpiErr),
    /// GPIO pin error
    Pin(PinErr),
}

impl<SpiErr: Debug, PinErr: Debug> core::fmt::Display for InterfaceError<SpiErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "SPI error: {e:?}"),
            Self::Pin(e) => write!(f, "Pin error: {e:?}"),
        }
    }
}

impl<SpiErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<SpiErr, PinErr> {}

/// Hardware interface implementation for memory LCDs
///
/// Implements [`DisplayInterface`] for embedded-hal v1.0 SPI bus and GPIO traits.
///
/// ## Type Parameters
///
/// * `SPI` - SPI bus implementing [`SpiBus`], configured mode 0, LSB first
/// * `CS` - Chip select pin implementing [`OutputPin`] (active high)
pub struct Interface<SPI, CS> {
    /// SPI bus for communication
    spi: SPI,
    /// Chip select pin (active high)
    cs: CS,
}

impl<SPI, CS> Interface<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    /// Create a new Interface
    ///
    /// The pin is left as passed in; [`Display::init`](crate::Display::init)
    /// drives it to the deasserted level.
    ///
    /// # Arguments
    ///
    /// * `spi` - SPI bus (must implement [`SpiBus`])
    /// * `cs` - Chip select pin (output, active high)
    pub fn new(spi: SPI, cs: CS) -> Self {
        Self { spi, cs }
    }

    /// Release the bus and pin
    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }
}

impl<SPI, CS> DisplayInterface for Interface<SPI, CS>
where
    SPI: SpiBus,
    SPI::Error: Debug,
    CS: OutputPin,
    CS::Error: Debug,
{
    type Error = InterfaceError<SPI::Error, CS::Error>;

    fn select(&mut self) -> InterfaceResult<(), Self::Error> {
        self.cs.set_high().map_err(InterfaceError::Pin)
    }

    fn deselect(&mut self) -> InterfaceResult<(), Self::Error> {
        self.cs.set_low().map_err(InterfaceError::Pin)
    }

    fn send(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.spi.write(data).map_err(InterfaceError::Spi)?;
        // Hold time is measured from the last clock edge, not from queueing
        self.spi.flush().map_err(InterfaceError::Spi)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use embedded_hal::digital::ErrorType;
    use embedded_hal::spi::ErrorType as SpiErrorType;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Event {
        High,
        Low,
        Write(u8),
        Flush,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct MockError;

    impl embedded_hal::digital::Error for MockError {
        fn kind(&self) -> embedded_hal::digital::ErrorKind {
            embedded_hal::digital::ErrorKind::Other
        }
    }

    impl embedded_hal::spi::Error for MockError {
        fn kind(&self) -> embedded_hal::spi::ErrorKind {
            embedded_hal::spi::ErrorKind::Other
        }
    }

    #[derive(Debug, Default)]
    struct MockSpi {
        events: Vec<Event>,
        fail: bool,
    }

    impl SpiErrorType for MockSpi {
        type Error = MockError;
    }

    impl SpiBus for MockSpi {
        fn read(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> {
            Ok(())
        }

        fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
            if self.fail {
                return Err(MockError);
            }
            self.events.extend(words.iter().map(|b| Event::Write(*b)));
            Ok(())
        }

        fn transfer(&mut self, _read: &mut [u8], _write: &[u8]) -> Result<(), Self::Error> {
            Ok(())
        }

        fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> {
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.events.push(Event::Flush);
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct MockPin {
        events: Vec<Event>,
    }

    impl ErrorType for MockPin {
        type Error = MockError;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.events.push(Event::Low);
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.events.push(Event::High);
            Ok(())
        }
    }

    #[test]
    fn test_chip_select_is_active_high() {
        let mut interface = Interface::new(MockSpi::default(), MockPin::default());
        interface.select().unwrap();
        interface.deselect().unwrap();
        let (_, cs) = interface.release();
        assert_eq!(cs.events, [Event::High, Event::Low]);
    }

    #[test]
    fn test_send_writes_then_flushes() {
        let mut interface = Interface::new(MockSpi::default(), MockPin::default());
        interface.send(&[0x03, 0x01, 0xAA, 0x00]).unwrap();
        let (spi, _) = interface.release();
        assert_eq!(
            spi.events,
            [
                Event::Write(0x03),
                Event::Write(0x01),
                Event::Write(0xAA),
                Event::Write(0x00),
                Event::Flush,
            ]
        );
    }

    #[test]
    fn test_send_maps_spi_error() {
        let spi = MockSpi {
            fail: true,
            ..MockSpi::default()
        };
        let mut interface = Interface::new(spi, MockPin::default());
        assert!(matches!(
            interface.send(&[0x00]),
            Err(InterfaceError::Spi(MockError))
        ));
    }
}
