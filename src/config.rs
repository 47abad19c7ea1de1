//! Display configuration types and builder

use crate::command::{T_HOLD_US, T_INTERFRAME_US, T_SETUP_US};
pub use crate::error::{BuilderError, MAX_COLUMNS, MAX_ROWS};

/// Display dimensions
///
/// Only obtainable through [`Dimensions::new`], so every value has
/// addressable rows and byte-aligned columns.
///
/// ```compile_fail
/// use memlcd::Dimensions;
///
/// let dims = Dimensions { rows: 300, cols: 12 };
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dimensions {
    /// Number of rows (height in pixels, one address per row)
    rows: u16,
    /// Number of columns (width in pixels)
    cols: u16,
}

impl Dimensions {
    /// Create new dimensions with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if:
    /// - rows == 0 or rows > MAX_ROWS (address byte is 1-based)
    /// - cols == 0 or cols > MAX_COLUMNS
    /// - cols % 8 != 0 (rows are whole bytes on the wire)
    pub fn new(rows: u16, cols: u16) -> Result<Self, BuilderError> {
        if rows == 0 || rows > MAX_ROWS {
            return Err(BuilderError::InvalidDimensions { rows, cols });
        }
        if cols == 0 || cols > MAX_COLUMNS || cols % 8 != 0 {
            return Err(BuilderError::InvalidDimensions { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    /// Number of rows (height in pixels)
    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Number of columns (width in pixels)
    pub fn cols(&self) -> u16 {
        self.cols
    }

    /// Bytes per row
    pub fn row_bytes(&self) -> usize {
        self.cols as usize / 8
    }

    /// Calculate required buffer size in bytes
    pub fn buffer_size(&self) -> usize {
        self.rows as usize * self.row_bytes()
    }
}

/// Display rotation relative to native orientation
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Rotation {
    /// No rotation
    #[default]
    Rotate0,
    /// Rotate 90 degrees clockwise
    Rotate90,
    /// Rotate 180 degrees
    Rotate180,
    /// Rotate 270 degrees clockwise
    Rotate270,
}

/// When to send a keep-alive frame
///
/// A keep-alive frame carries only the VCOM bit. In software-relay mode it is
/// the only way the panel sees polarity change while nothing is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum KeepAlive {
    /// Never send keep-alive frames; `sync` with a clean buffer is silent
    Disabled,
    /// Send one keep-alive frame when `sync` finds no dirty rows
    #[default]
    WhenIdle,
    /// Send a keep-alive frame at the end of every `sync`
    Always,
}

/// Bit order the bus peripheral shifts out
///
/// The panel expects LSB first. If the peripheral can only do MSB first,
/// select [`BitOrder::MsbFirst`] and the driver mirrors each byte so the wire
/// image is unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum BitOrder {
    /// Bus already configured LSB first
    #[default]
    LsbFirst,
    /// Bus shifts MSB first; bytes are mirrored before sending
    MsbFirst,
}

/// Chip select timing in microseconds
///
/// Values are minimums. Slower is always safe; faster is rejected, and the
/// only constructors are [`Timing::new`] and [`Timing::default`].
///
/// ```compile_fail
/// use memlcd::Timing;
///
/// let timing = Timing { setup_us: 0, hold_us: 0, inter_frame_us: 0 };
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timing {
    /// Delay after asserting chip select, before the first byte
    setup_us: u32,
    /// Delay after the last byte, before deasserting chip select
    hold_us: u32,
    /// Delay after deasserting chip select, before the next frame
    inter_frame_us: u32,
}

impl Timing {
    /// Create timing, rejecting any value below the panel minimums
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::TimingBelowMinimum` for the first value under
    /// its minimum.
    pub fn new(setup_us: u32, hold_us: u32, inter_frame_us: u32) -> Result<Self, BuilderError> {
        for (requested_us, minimum_us) in [
            (setup_us, T_SETUP_US),
            (hold_us, T_HOLD_US),
            (inter_frame_us, T_INTERFRAME_US),
        ] {
            if requested_us < minimum_us {
                return Err(BuilderError::TimingBelowMinimum {
                    requested_us,
                    minimum_us,
                });
            }
        }
        Ok(Self {
            setup_us,
            hold_us,
            inter_frame_us,
        })
    }

    /// Delay after asserting chip select, before the first byte
    pub fn setup_us(&self) -> u32 {
        self.setup_us
    }

    /// Delay after the last byte, before deasserting chip select
    pub fn hold_us(&self) -> u32 {
        self.hold_us
    }

    /// Delay after deasserting chip select, before the next frame
    pub fn inter_frame_us(&self) -> u32 {
        self.inter_frame_us
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            setup_us: T_SETUP_US,
            hold_us: T_HOLD_US,
            inter_frame_us: T_INTERFRAME_US,
        }
    }
}

/// Display configuration
///
/// Use `Builder` to create a Config.
#[derive(Clone, Debug)]
pub struct Config {
    /// Display dimensions
    pub dimensions: Dimensions,
    /// Display rotation (graphics layer only; rows on the wire are physical)
    pub rotation: Rotation,
    /// Chip select timing
    pub timing: Timing,
    /// Keep-alive frame policy
    pub keep_alive: KeepAlive,
    /// Bus bit order
    pub bit_order: BitOrder,
}

impl Config {
    /// Logical `(width, height)` after rotation
    ///
    /// Not a [`Dimensions`]: a rotated panel can be taller than the row
    /// address allows.
    pub fn rotated_size(&self) -> (u16, u16) {
        let Dimensions { rows, cols } = self.dimensions;
        match self.rotation {
            Rotation::Rotate0 | Rotation::Rotate180 => (cols, rows),
            Rotation::Rotate90 | Rotation::Rotate270 => (rows, cols),
        }
    }
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```rust
/// use memlcd::{Builder, Dimensions, KeepAlive};
///
/// let dims = match Dimensions::new(128, 128) {
///     Ok(dims) => dims,
///     Err(_) => return,
/// };
/// let config = match Builder::new().dimensions(dims).keep_alive(KeepAlive::Always).build() {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// assert_eq!(config.dimensions.row_bytes(), 16);
/// ```
#[must_use]
#[derive(Default)]
pub struct Builder {
    /// Display dimensions (required)
    dimensions: Option<Dimensions>,
    /// Display rotation
    rotation: Rotation,
    /// Chip select timing
    timing: Timing,
    /// Keep-alive frame policy
    keep_alive: KeepAlive,
    /// Bus bit order
    bit_order: BitOrder,
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set display dimensions (required)
    pub fn dimensions(mut self, dims: Dimensions) -> Self {
        self.dimensions = Some(dims);
        self
    }

    /// Set display rotation
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set chip select timing
    pub fn timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Set the keep-alive frame policy
    pub fn keep_alive(mut self, keep_alive: KeepAlive) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    /// Set the bus bit order
    pub fn bit_order(mut self, bit_order: BitOrder) -> Self {
        self.bit_order = bit_order;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingDimensions` if dimensions were not set
    pub fn build(self) -> Result<Config, BuilderError> {
        Ok(Config {
            dimensions: self.dimensions.ok_or(BuilderError::MissingDimensions)?,
            rotation: self.rotation,
            timing: self.timing,
            keep_alive: self.keep_alive,
            bit_order: self.bit_order,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_valid() {
        let dims = Dimensions::new(240, 400).unwrap();
        assert_eq!(dims.row_bytes(), 50);
        assert_eq!(dims.buffer_size(), 12_000);
    }

    #[test]
    fn test_dimensions_rejects_unaligned_columns() {
        assert_eq!(
            Dimensions::new(8, 12),
            Err(BuilderError::InvalidDimensions { rows: 8, cols: 12 })
        );
    }

    #[test]
    fn test_dimensions_rejects_unreachable_layouts() {
        // Unaligned columns would let a pixel spill into the next row
        assert!(Dimensions::new(2, 12).is_err());
        // Row 300 has no one-byte address
        assert!(Dimensions::new(300, 8).is_err());
        let dims = Dimensions::new(MAX_ROWS, 8).unwrap();
        assert_eq!((dims.rows(), dims.cols()), (255, 8));
    }

    #[test]
    fn test_dimensions_rejects_zero_and_oversized() {
        assert!(Dimensions::new(0, 8).is_err());
        assert!(Dimensions::new(8, 0).is_err());
        assert!(Dimensions::new(256, 8).is_err());
        assert!(Dimensions::new(8, MAX_COLUMNS + 8).is_err());
        assert!(Dimensions::new(MAX_ROWS, MAX_COLUMNS).is_ok());
    }

    #[test]
    fn test_timing_default_is_panel_minimum() {
        let timing = Timing::default();
        assert_eq!(timing.setup_us(), 6);
        assert_eq!(timing.hold_us(), 2);
        assert_eq!(timing.inter_frame_us(), 2);
    }

    #[test]
    fn test_timing_accepts_longer_delays() {
        let timing = Timing::new(10, 5, 7).unwrap();
        assert_eq!(
            (timing.setup_us(), timing.hold_us(), timing.inter_frame_us()),
            (10, 5, 7)
        );
    }

    #[test]
    fn test_timing_zero_delays_never_reach_builder() {
        assert!(Timing::new(0, 0, 0).is_err());
        let config = Builder::new()
            .dimensions(Dimensions::new(8, 8).unwrap())
            .timing(Timing::new(0, 0, 0).unwrap_or_default())
            .build()
            .unwrap();
        assert!(config.timing.setup_us() >= T_SETUP_US);
        assert!(config.timing.hold_us() >= T_HOLD_US);
        assert!(config.timing.inter_frame_us() >= T_INTERFRAME_US);
    }

    #[test]
    fn test_timing_rejects_short_delays() {
        assert_eq!(
            Timing::new(5, 2, 2),
            Err(BuilderError::TimingBelowMinimum {
                requested_us: 5,
                minimum_us: 6
            })
        );
        assert!(Timing::new(6, 1, 2).is_err());
        assert!(Timing::new(6, 2, 0).is_err());
    }

    #[test]
    fn test_builder_missing_dimensions() {
        assert!(matches!(
            Builder::new().build(),
            Err(BuilderError::MissingDimensions)
        ));
    }

    #[test]
    fn test_builder_defaults() {
        let config = Builder::new()
            .dimensions(Dimensions::new(8, 8).unwrap())
            .build()
            .unwrap();
        assert_eq!(config.keep_alive, KeepAlive::WhenIdle);
        assert_eq!(config.bit_order, BitOrder::LsbFirst);
        assert_eq!(config.rotation, Rotation::Rotate0);
        assert_eq!(config.timing, Timing::default());
    }

    #[test]
    fn test_rotated_size_swaps() {
        let config = Builder::new()
            .dimensions(Dimensions::new(64, 128).unwrap())
            .rotation(Rotation::Rotate90)
            .build()
            .unwrap();
        assert_eq!(config.rotated_size(), (64, 128));
    }

    #[test]
    fn test_rotated_size_may_exceed_row_limit() {
        let config = Builder::new()
            .dimensions(Dimensions::new(240, 400).unwrap())
            .rotation(Rotation::Rotate270)
            .build()
            .unwrap();
        assert_eq!(config.rotated_size(), (240, 400));
    }
}
