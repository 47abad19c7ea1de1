//! Memory LCD wire constants
//!
//! Sharp memory-in-pixel panels have no register file. Every transfer starts
//! with a mode byte whose low bits select the operation, and the same byte
//! carries the frame inversion flag (VCOM).
//!
//! ## Frame Structure
//!
//! A row update is one chip-select bracketed transfer:
//!
//! | Byte      | Value                          |
//! |-----------|--------------------------------|
//! | mode      | [`MODE_WRITE_LINE`] \| VCOM    |
//! | address   | row index + 1                  |
//! | data      | `cols / 8` bytes, LSB = column 0 |
//! | trailer   | [`TRAILER`]                    |
//!
//! A keep-alive frame is the mode byte with only the VCOM bit set, followed
//! by [`TRAILER`].
//!
//! All bytes are shifted out least-significant bit first.
//!
//! ## Example
//!
//! ```
//! use memlcd::command;
//!
//! // Write row 2 with VCOM high
//! let mode = command::MODE_WRITE_LINE | command::MODE_VCOM;
//! assert_eq!(mode, 0x03);
//! assert_eq!(command::row_address(2), 3);
//! ```

// Mode byte bits

/// Data update mode (M0)
///
/// Set for row writes, clear for keep-alive and clear-all frames.
pub const MODE_WRITE_LINE: u8 = 0x01;

/// Frame inversion flag (M1), already shifted into position
pub const MODE_VCOM: u8 = 0x02;

/// All clear flag (M2)
///
/// Clears panel memory to white without touching the host frame buffer.
pub const MODE_CLEAR_ALL: u8 = 0x04;

/// Dummy byte terminating every transfer
pub const TRAILER: u8 = 0x00;

// Timing minimums (microseconds)

/// Chip select setup time before the first clock (tsSCS)
pub const T_SETUP_US: u32 = 6;

/// Chip select hold time after the last clock (thSCS)
pub const T_HOLD_US: u32 = 2;

/// Chip select low time between transfers (twSCSL)
pub const T_INTERFRAME_US: u32 = 2;

// VCOM window

/// Lowest timer event rate that keeps polarity above 0.5 Hz
///
/// Each event flips the flag, so a full polarity cycle takes two events.
pub const VCOM_MIN_EVENT_HZ: u32 = 1;

/// Highest timer event rate that keeps polarity below 30 Hz
pub const VCOM_MAX_EVENT_HZ: u32 = 60;

/// Default timer event rate (1 Hz polarity after divide-by-two)
pub const VCOM_DEFAULT_EVENT_HZ: u32 = 2;

/// Encode a zero-based row index as the 1-based address byte
///
/// Callers must pass an index below 255; [`crate::Dimensions`] enforces this.
pub const fn row_address(row: u16) -> u8 {
    (row + 1) as u8
}

/// Reverse the bit order of a byte
///
/// Used when the bus peripheral can only shift MSB first.
pub const fn reverse_bits(b: u8) -> u8 {
    b.reverse_bits()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_address_is_one_based() {
        assert_eq!(row_address(0), 1);
        assert_eq!(row_address(239), 240);
        assert_eq!(row_address(254), 255);
    }

    #[test]
    fn test_mode_bits_are_disjoint() {
        assert_eq!(MODE_WRITE_LINE & MODE_VCOM, 0);
        assert_eq!(MODE_WRITE_LINE & MODE_CLEAR_ALL, 0);
        assert_eq!(MODE_VCOM & MODE_CLEAR_ALL, 0);
    }

    #[test]
    fn test_reverse_bits() {
        assert_eq!(reverse_bits(0b0000_0001), 0b1000_0000);
        assert_eq!(reverse_bits(0b0000_1000), 0b0001_0000);
        assert_eq!(reverse_bits(0xF0), 0x0F);
    }

    #[test]
    fn test_vcom_window_contains_default() {
        assert!((VCOM_MIN_EVENT_HZ..=VCOM_MAX_EVENT_HZ).contains(&VCOM_DEFAULT_EVENT_HZ));
    }
}
