//! Coordinate rotation utilities
//!
//! Maps logical (drawing) coordinates to physical panel coordinates. Memory
//! LCD rows are always sent in physical order, so rotation is resolved
//! before a pixel reaches the frame buffer and the dirty set tracks physical
//! rows.
//!
//! ## Rotation Modes
//!
//! - **Rotate0**: Native orientation
//! - **Rotate90**: 90° clockwise, width and height swapped
//! - **Rotate180**: 180° rotation, origin at bottom-right
//! - **Rotate270**: 270° clockwise (or 90° counter-clockwise)
//!
//! ## Example
//!
//! ```
//! use memlcd::{rotation::apply_rotation, Rotation};
//!
//! // 16 columns x 8 rows panel
//! assert_eq!(apply_rotation(0, 0, 16, 8, Rotation::Rotate0), (0, 0));
//! assert_eq!(apply_rotation(0, 0, 16, 8, Rotation::Rotate180), (15, 7));
//! ```

use crate::config::Rotation;

/// Apply rotation transformation to get the physical pixel
///
/// # Arguments
///
/// * `x` - Logical X coordinate, within the rotated width
/// * `y` - Logical Y coordinate, within the rotated height
/// * `width` - Physical panel width in pixels (columns)
/// * `height` - Physical panel height in pixels (rows)
/// * `rotation` - Rotation mode
///
/// # Returns
///
/// Returns `(column, row)` on the physical panel. Inputs must already be in
/// bounds of the rotated dimensions.
pub fn apply_rotation(x: u16, y: u16, width: u16, height: u16, rotation: Rotation) -> (u16, u16) {
    match rotation {
        Rotation::Rotate0 => (x, y),
        Rotation::Rotate90 => (width - 1 - y, x),
        Rotation::Rotate180 => (width - 1 - x, height - 1 - y),
        Rotation::Rotate270 => (y, height - 1 - x),
    }
}
