//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`]),
//! VCOM arming ([`VcomError`]) and display operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`VcomError`] - The VCOM timer could not be armed. This is fatal: a panel
//!   without polarity inversion accumulates DC bias and is damaged, so startup
//!   must not continue.
//! - [`FrameBufferError`] - Bad coordinates or row lengths, buffer untouched
//! - [`Error`] - Runtime errors during display operations
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level hardware communication errors
//!
//! ## Example
//!
//! ```
//! use memlcd::{Builder, BuilderError, Dimensions};
//!
//! // Missing dimensions
//! let result = Builder::new().build();
//! assert!(matches!(result, Err(BuilderError::MissingDimensions)));
//!
//! // Columns must be byte aligned
//! let result = Dimensions::new(128, 130);
//! assert!(result.is_err());
//! ```

use crate::interface::DisplayInterface;

/// Maximum number of rows
///
/// The row address is a single 1-based byte, so row 254 is addressed as 255.
pub const MAX_ROWS: u16 = 255;

/// Maximum number of columns
///
/// Caps a single row frame at 100 data bytes.
pub const MAX_COLUMNS: u16 = 800;

/// Errors that can occur when interacting with the display
///
/// Generic over the interface type to preserve the specific error type.
#[derive(Debug)]
pub enum Error<I: DisplayInterface> {
    /// Interface error (SPI/GPIO)
    ///
    /// The frame that failed is not counted as sent; its row stays dirty and
    /// is retried by the next [`sync`](crate::Display::sync).
    Interface(I::Error),
    /// Pixel coordinates outside the configured bounds
    OutOfRange {
        /// Column requested
        x: u16,
        /// Row requested
        y: u16,
    },
    /// Row replacement data has the wrong length
    LengthMismatch {
        /// Row length in bytes
        expected: usize,
        /// Provided length in bytes
        provided: usize,
    },
    /// Buffer is too small for the display
    ///
    /// The provided buffer must be at least `dimensions.buffer_size()` bytes.
    BufferTooSmall {
        /// Required buffer size in bytes
        required: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
}

impl<I: DisplayInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => write!(f, "Interface error: {e:?}"),
            Self::OutOfRange { x, y } => write!(f, "Pixel out of range: x={x}, y={y}"),
            Self::LengthMismatch { expected, provided } => {
                write!(
                    f,
                    "Row length mismatch: expected {expected} bytes, provided {provided}"
                )
            }
            Self::BufferTooSmall { required, provided } => {
                write!(
                    f,
                    "Buffer too small: required {required} bytes, provided {provided}"
                )
            }
        }
    }
}

impl<I: DisplayInterface + core::fmt::Debug> core::error::Error for Error<I> {}

impl<I: DisplayInterface> From<FrameBufferError> for Error<I> {
    fn from(err: FrameBufferError) -> Self {
        match err {
            FrameBufferError::OutOfRange { x, y } => Self::OutOfRange { x, y },
            FrameBufferError::LengthMismatch { expected, provided } => {
                Self::LengthMismatch { expected, provided }
            }
            FrameBufferError::BufferTooSmall { required, provided } => {
                Self::BufferTooSmall { required, provided }
            }
        }
    }
}

/// Errors from frame buffer operations
///
/// All are caller errors; the buffer is left unmodified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameBufferError {
    /// Pixel coordinates outside the configured bounds
    OutOfRange {
        /// Column requested
        x: u16,
        /// Row requested
        y: u16,
    },
    /// Row replacement data has the wrong length
    LengthMismatch {
        /// Row length in bytes
        expected: usize,
        /// Provided length in bytes
        provided: usize,
    },
    /// Backing storage is smaller than the dimensions require
    BufferTooSmall {
        /// Required buffer size in bytes
        required: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
}

impl core::fmt::Display for FrameBufferError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OutOfRange { x, y } => write!(f, "Pixel out of range: x={x}, y={y}"),
            Self::LengthMismatch { expected, provided } => {
                write!(
                    f,
                    "Row length mismatch: expected {expected} bytes, provided {provided}"
                )
            }
            Self::BufferTooSmall { required, provided } => {
                write!(
                    f,
                    "Buffer too small: required {required} bytes, provided {provided}"
                )
            }
        }
    }
}

impl core::error::Error for FrameBufferError {}

/// Errors that can occur when building configuration
///
/// These errors occur during the builder pattern before the display is created.
#[derive(Debug, PartialEq)]
pub enum BuilderError {
    /// Dimensions were not specified
    ///
    /// [`Builder::dimensions()`](crate::config::Builder::dimensions) must be called before building.
    MissingDimensions,
    /// Invalid dimensions provided
    ///
    /// See [`Dimensions::new()`](crate::config::Dimensions::new) for constraints.
    InvalidDimensions {
        /// Number of rows (height) requested
        rows: u16,
        /// Number of columns (width) requested
        cols: u16,
    },
    /// A chip select delay is shorter than the panel allows
    TimingBelowMinimum {
        /// Requested delay in microseconds
        requested_us: u32,
        /// Panel minimum in microseconds
        minimum_us: u32,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingDimensions => write!(f, "Dimensions not specified"),
            Self::InvalidDimensions { rows, cols } => {
                write!(f, "Invalid dimensions: {rows}x{cols}")
            }
            Self::TimingBelowMinimum {
                requested_us,
                minimum_us,
            } => {
                write!(
                    f,
                    "Delay of {requested_us}us is below the {minimum_us}us minimum"
                )
            }
        }
    }
}

impl core::error::Error for BuilderError {}

/// Errors that prevent the VCOM source from starting
///
/// Every variant is fatal. There is no degraded mode: callers should halt
/// rather than drive the panel without polarity inversion.
#[derive(Debug, PartialEq)]
pub enum VcomError<E> {
    /// Requested event rate would put polarity outside 0.5 Hz to 30 Hz
    FrequencyOutOfRange {
        /// Requested timer event rate in Hz
        frequency_hz: u32,
    },
    /// The timer peripheral refused to arm
    Arm(E),
}

impl<E: core::fmt::Debug> core::fmt::Display for VcomError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::FrequencyOutOfRange { frequency_hz } => {
                write!(f, "VCOM event rate {frequency_hz}Hz outside 1..=60Hz")
            }
            Self::Arm(e) => write!(f, "Failed to arm VCOM timer: {e:?}"),
        }
    }
}

impl<E: core::fmt::Debug> core::error::Error for VcomError<E> {}
