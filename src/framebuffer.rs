//! Frame buffer with dirty-row tracking
//!
//! Memory LCDs keep their image without refresh, so only rows that changed
//! need to go over the wire. [`FrameBuffer`] stores the image as contiguous
//! rows of `cols / 8` bytes and records every row touched since the last
//! flush in a [`DirtyRows`] set.
//!
//! ## Pixel Layout
//!
//! Row `y` occupies bytes `y * row_bytes .. (y + 1) * row_bytes`. Column `x`
//! is bit `x % 8` of byte `x / 8` within the row, least significant bit
//! first, which is the order the panel shifts pixels in.
//!
//! ## Example
//!
//! ```
//! use memlcd::{Dimensions, FrameBuffer};
//!
//! let dims = match Dimensions::new(8, 8) {
//!     Ok(dims) => dims,
//!     Err(_) => return,
//! };
//! let mut fb = FrameBuffer::new(dims, [0u8; 8]);
//!
//! let _ = fb.set_pixel(3, 2, true);
//! assert_eq!(fb.row(2), Ok(&[0b0000_1000][..]));
//! assert!(fb.is_dirty(2));
//! ```

use crate::color::Color;
use crate::config::{Dimensions, MAX_ROWS};
use crate::error::FrameBufferError;

type BufferResult<T> = core::result::Result<T, FrameBufferError>;

const DIRTY_WORDS: usize = (MAX_ROWS as usize).div_ceil(32);

/// Set of row indices awaiting transmission
///
/// A fixed bitset sized for the largest addressable panel. Membership only:
/// inserting a row twice keeps one entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DirtyRows {
    words: [u32; DIRTY_WORDS],
}

impl DirtyRows {
    /// Create an empty set
    pub const fn new() -> Self {
        Self {
            words: [0; DIRTY_WORDS],
        }
    }

    /// Add a row
    ///
    /// Rows beyond [`MAX_ROWS`] cannot be addressed and are ignored.
    pub fn insert(&mut self, row: u16) {
        if row >= MAX_ROWS {
            return;
        }
        let row = row as usize;
        self.words[row / 32] |= 1 << (row % 32);
    }

    /// Add rows `0..rows`
    pub fn insert_all(&mut self, rows: u16) {
        for row in 0..rows {
            self.insert(row);
        }
    }

    /// Check membership
    pub fn contains(&self, row: u16) -> bool {
        let row = row as usize;
        row < DIRTY_WORDS * 32 && self.words[row / 32] & (1 << (row % 32)) != 0
    }

    /// Remove and return one row
    ///
    /// Rows come out lowest first. Callers must not rely on the order.
    pub fn pop(&mut self) -> Option<u16> {
        for (i, word) in self.words.iter_mut().enumerate() {
            if *word != 0 {
                let bit = word.trailing_zeros();
                *word &= !(1 << bit);
                return Some((i * 32) as u16 + bit as u16);
            }
        }
        None
    }

    /// Number of rows in the set
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    /// Remove every row
    pub fn clear(&mut self) {
        self.words = [0; DIRTY_WORDS];
    }

    /// Iterate rows in ascending order without removing them
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        (0..(DIRTY_WORDS * 32) as u16).filter(|row| self.contains(*row))
    }
}

/// Pixel storage plus the set of rows changed since the last flush
///
/// ## Type Parameters
///
/// * `B` - Backing storage, e.g. `[u8; N]`, `&'static mut [u8]` or `Vec<u8>`
///
/// Only the thread that owns the display touches this; nothing here is
/// shared with the VCOM timer.
#[derive(Debug)]
pub struct FrameBuffer<B> {
    /// Row-major pixel bytes
    buffer: B,
    /// Panel dimensions
    dimensions: Dimensions,
    /// Rows awaiting transmission
    dirty: DirtyRows,
}

impl<B> FrameBuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Create a frame buffer over `buffer`
    ///
    /// The first `dimensions.buffer_size()` bytes are zeroed and no row is
    /// dirty.
    ///
    /// # Panics
    ///
    /// Panics if `buffer` is smaller than `dimensions.buffer_size()`.
    pub fn new(dimensions: Dimensions, mut buffer: B) -> Self {
        let required = dimensions.buffer_size();
        assert!(
            buffer.as_mut().len() >= required,
            "frame buffer too small: required {} bytes, got {}",
            required,
            buffer.as_mut().len()
        );
        buffer.as_mut()[..required].fill(0);
        Self {
            buffer,
            dimensions,
            dirty: DirtyRows::new(),
        }
    }

    /// Try to create a frame buffer, returning an error if `buffer` is too small
    ///
    /// This is the fallible version of [`new`](Self::new).
    pub fn try_new(dimensions: Dimensions, mut buffer: B) -> BufferResult<Self> {
        let required = dimensions.buffer_size();
        let provided = buffer.as_mut().len();
        if provided < required {
            return Err(FrameBufferError::BufferTooSmall { required, provided });
        }
        Ok(Self::new(dimensions, buffer))
    }

    /// Panel dimensions
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Set every pixel to 0 and mark every row dirty
    pub fn clear(&mut self) {
        self.fill(Color::Black);
    }

    /// Set every pixel to `color` and mark every row dirty
    pub fn fill(&mut self, color: Color) {
        let size = self.dimensions.buffer_size();
        self.buffer.as_mut()[..size].fill(color.byte());
        self.dirty.insert_all(self.dimensions.rows());
    }

    /// Read one pixel
    ///
    /// # Errors
    ///
    /// Returns `FrameBufferError::OutOfRange` if `x >= cols` or `y >= rows`.
    pub fn get_pixel(&self, x: u16, y: u16) -> BufferResult<bool> {
        let (index, mask) = self.locate(x, y)?;
        Ok(self.buffer.as_ref()[index] & mask != 0)
    }

    /// Write one pixel and mark its row dirty
    ///
    /// # Errors
    ///
    /// Returns `FrameBufferError::OutOfRange` if `x >= cols` or `y >= rows`.
    pub fn set_pixel(&mut self, x: u16, y: u16, value: bool) -> BufferResult<()> {
        let (index, mask) = self.locate(x, y)?;
        let byte = &mut self.buffer.as_mut()[index];
        if value {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
        self.dirty.insert(y);
        Ok(())
    }

    /// Borrow one row's bytes
    ///
    /// # Errors
    ///
    /// Returns `FrameBufferError::OutOfRange` if `y >= rows`.
    pub fn row(&self, y: u16) -> BufferResult<&[u8]> {
        let range = self.row_range(y)?;
        Ok(&self.buffer.as_ref()[range])
    }

    /// Replace one row's bytes and mark it dirty
    ///
    /// # Errors
    ///
    /// Returns `FrameBufferError::OutOfRange` if `y >= rows`, or
    /// `FrameBufferError::LengthMismatch` if `bytes` is not exactly one row.
    pub fn set_row(&mut self, y: u16, bytes: &[u8]) -> BufferResult<()> {
        let range = self.row_range(y)?;
        if bytes.len() != range.len() {
            return Err(FrameBufferError::LengthMismatch {
                expected: range.len(),
                provided: bytes.len(),
            });
        }
        self.buffer.as_mut()[range].copy_from_slice(bytes);
        self.dirty.insert(y);
        Ok(())
    }

    /// Replace the whole image from a row-major byte sequence
    ///
    /// Consumes at most `rows * row_bytes` values. A shorter sequence leaves
    /// the remaining bytes as they were; every row is marked dirty either way.
    /// Returns the number of bytes written.
    pub fn set_all<T>(&mut self, values: T) -> usize
    where
        T: IntoIterator<Item = u8>,
    {
        let size = self.dimensions.buffer_size();
        let mut written = 0;
        for (dst, src) in self.buffer.as_mut()[..size].iter_mut().zip(values) {
            *dst = src;
            written += 1;
        }
        self.dirty.insert_all(self.dimensions.rows());
        written
    }

    /// Whether `y` is waiting to be sent
    pub fn is_dirty(&self, y: u16) -> bool {
        self.dirty.contains(y)
    }

    /// Number of rows waiting to be sent
    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    /// The dirty set
    pub fn dirty_rows(&self) -> &DirtyRows {
        &self.dirty
    }

    /// Mark a row for retransmission
    ///
    /// Out-of-range rows are ignored so the set never holds an invalid index.
    pub fn mark_dirty(&mut self, y: u16) {
        if y < self.dimensions.rows() {
            self.dirty.insert(y);
        }
    }

    /// Mark every row for retransmission
    pub fn mark_all_dirty(&mut self) {
        self.dirty.insert_all(self.dimensions.rows());
    }

    /// Forget every pending row
    ///
    /// For when the panel is known to match the buffer by other means, such
    /// as after the all-clear command.
    pub fn mark_clean(&mut self) {
        self.dirty.clear();
    }

    /// Remove and return one dirty row
    pub fn pop_dirty(&mut self) -> Option<u16> {
        self.dirty.pop()
    }

    /// Release the backing storage
    pub fn release(self) -> B {
        self.buffer
    }

    fn row_range(&self, y: u16) -> BufferResult<core::ops::Range<usize>> {
        if y >= self.dimensions.rows() {
            return Err(FrameBufferError::OutOfRange { x: 0, y });
        }
        let row_bytes = self.dimensions.row_bytes();
        let start = y as usize * row_bytes;
        Ok(start..start + row_bytes)
    }

    fn locate(&self, x: u16, y: u16) -> BufferResult<(usize, u8)> {
        if x >= self.dimensions.cols() || y >= self.dimensions.rows() {
            return Err(FrameBufferError::OutOfRange { x, y });
        }
        let index = y as usize * self.dimensions.row_bytes() + x as usize / 8;
        Ok((index, 1 << (x % 8)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    fn fb(rows: u16, cols: u16) -> FrameBuffer<Vec<u8>> {
        let dims = Dimensions::new(rows, cols).unwrap();
        FrameBuffer::new(dims, vec![0xA5; dims.buffer_size()])
    }

    #[test]
    fn test_new_zeroes_and_is_clean() {
        let fb = fb(4, 16);
        assert_eq!(fb.dirty_count(), 0);
        assert!((0..4).all(|y| fb.row(y).unwrap() == [0, 0]));
    }

    #[test]
    fn test_try_new_rejects_small_buffer() {
        let dims = Dimensions::new(8, 8).unwrap();
        let result = FrameBuffer::try_new(dims, [0u8; 7]);
        assert!(matches!(
            result,
            Err(FrameBufferError::BufferTooSmall {
                required: 8,
                provided: 7
            })
        ));
    }

    #[test]
    fn test_clear_zeroes_and_marks_all_dirty() {
        let mut fb = fb(8, 8);
        fb.set_all(core::iter::repeat(0xFF));
        while fb.pop_dirty().is_some() {}

        fb.clear();
        for y in 0..8 {
            for x in 0..8 {
                assert!(!fb.get_pixel(x, y).unwrap());
            }
        }
        assert_eq!(fb.dirty_count(), 8);
    }

    #[test]
    fn test_set_pixel_round_trip_marks_row() {
        let mut fb = fb(8, 16);
        for (x, y) in [(0, 0), (7, 1), (8, 2), (15, 7)] {
            fb.set_pixel(x, y, true).unwrap();
            assert!(fb.get_pixel(x, y).unwrap());
            assert!(fb.is_dirty(y));
            fb.set_pixel(x, y, false).unwrap();
            assert!(!fb.get_pixel(x, y).unwrap());
        }
        assert_eq!(fb.dirty_count(), 4);
    }

    #[test]
    fn test_pixel_bit_order_is_lsb_first() {
        let mut fb = fb(1, 16);
        fb.set_pixel(3, 0, true).unwrap();
        fb.set_pixel(8, 0, true).unwrap();
        assert_eq!(fb.row(0).unwrap(), [0b0000_1000, 0b0000_0001]);
    }

    #[test]
    fn test_set_pixel_leaves_neighbours() {
        let mut fb = fb(1, 8);
        fb.set_row(0, &[0xFF]).unwrap();
        fb.set_pixel(4, 0, false).unwrap();
        assert_eq!(fb.row(0).unwrap(), [0b1110_1111]);
    }

    #[test]
    fn test_out_of_range_pixels() {
        let mut fb = fb(8, 16);
        assert_eq!(
            fb.get_pixel(16, 0),
            Err(FrameBufferError::OutOfRange { x: 16, y: 0 })
        );
        assert_eq!(
            fb.set_pixel(0, 8, true),
            Err(FrameBufferError::OutOfRange { x: 0, y: 8 })
        );
        assert_eq!(fb.dirty_count(), 0);
    }

    #[test]
    fn test_set_row_length_mismatch_leaves_row() {
        let mut fb = fb(4, 16);
        fb.set_row(1, &[0x12, 0x34]).unwrap();
        while fb.pop_dirty().is_some() {}

        for bad in [&[0xFFu8][..], &[0xFF, 0xFF, 0xFF][..], &[][..]] {
            assert_eq!(
                fb.set_row(1, bad),
                Err(FrameBufferError::LengthMismatch {
                    expected: 2,
                    provided: bad.len()
                })
            );
        }
        assert_eq!(fb.row(1).unwrap(), [0x12, 0x34]);
        assert!(!fb.is_dirty(1));
    }

    #[test]
    fn test_set_row_out_of_range() {
        let mut fb = fb(4, 8);
        assert!(matches!(
            fb.set_row(4, &[0x00]),
            Err(FrameBufferError::OutOfRange { y: 4, .. })
        ));
    }

    #[test]
    fn test_set_all_fills_row_major() {
        let mut fb = fb(2, 16);
        let written = fb.set_all([1, 2, 3, 4]);
        assert_eq!(written, 4);
        assert_eq!(fb.row(0).unwrap(), [1, 2]);
        assert_eq!(fb.row(1).unwrap(), [3, 4]);
        assert_eq!(fb.dirty_count(), 2);
    }

    #[test]
    fn test_set_all_short_input_keeps_tail_but_marks_all() {
        let mut fb = fb(3, 8);
        fb.set_all([9, 9, 9]);
        while fb.pop_dirty().is_some() {}

        let written = fb.set_all([1]);
        assert_eq!(written, 1);
        assert_eq!(fb.row(0).unwrap(), [1]);
        assert_eq!(fb.row(1).unwrap(), [9]);
        assert_eq!(fb.row(2).unwrap(), [9]);
        assert_eq!(fb.dirty_count(), 3);
    }

    #[test]
    fn test_set_all_ignores_excess_input() {
        let mut fb = fb(1, 8);
        assert_eq!(fb.set_all(0u8..), 1);
    }

    #[test]
    fn test_dirty_set_semantics() {
        let mut fb = fb(8, 8);
        fb.set_pixel(1, 5, true).unwrap();
        fb.set_pixel(2, 5, true).unwrap();
        fb.set_pixel(0, 3, true).unwrap();
        assert_eq!(fb.dirty_count(), 2);

        let mut popped = Vec::new();
        while let Some(y) = fb.pop_dirty() {
            popped.push(y);
        }
        popped.sort_unstable();
        assert_eq!(popped, [3, 5]);
        assert_eq!(fb.dirty_count(), 0);
    }

    #[test]
    fn test_mark_dirty_ignores_out_of_range() {
        let mut fb = fb(4, 8);
        fb.mark_dirty(4);
        fb.mark_dirty(200);
        assert!(fb.dirty_rows().is_empty());
        fb.mark_dirty(3);
        assert_eq!(fb.dirty_rows().iter().collect::<Vec<_>>(), [3]);
    }

    #[test]
    fn test_dirty_rows_covers_max_rows() {
        let mut dirty = DirtyRows::new();
        dirty.insert_all(MAX_ROWS);
        assert_eq!(dirty.len(), MAX_ROWS as usize);
        assert!(dirty.contains(MAX_ROWS - 1));
        assert!(!dirty.contains(MAX_ROWS));
        dirty.clear();
        assert!(dirty.is_empty());
        assert_eq!(dirty.pop(), None);
    }

    #[test]
    fn test_fill_white() {
        let mut fb = fb(2, 8);
        fb.fill(Color::White);
        assert!(fb.get_pixel(7, 1).unwrap());
        assert_eq!(fb.dirty_count(), 2);
    }
}
