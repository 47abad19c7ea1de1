//! Core display operations

use embedded_hal::delay::DelayNs;

use crate::color::Color;
use crate::config::{Config, Dimensions, Rotation};
use crate::error::Error;
use crate::framebuffer::FrameBuffer;
use crate::interface::DisplayInterface;
use crate::protocol::{self, FrameWriter, SyncReport};
use crate::vcom::VcomSource;

type DisplayResult<I> = core::result::Result<(), Error<I>>;

/// Memory LCD driver
///
/// Owns the bus interface, the frame buffer and the armed VCOM source.
/// Drawing only touches the frame buffer; [`sync`](Self::sync) sends the
/// rows that changed.
///
/// ## Type Parameters
///
/// * `I` - Interface type implementing [`DisplayInterface`]
/// * `T` - VCOM timer held by the [`VcomSource`]
/// * `B` - Frame buffer storage implementing `AsRef<[u8]> + AsMut<[u8]>`
///
/// ## Keeping the Panel Safe
///
/// In [`VcomMode::SoftwareRelay`](crate::VcomMode::SoftwareRelay) the panel
/// only receives polarity through frames, so call `sync` at least once per
/// timer period, with [`KeepAlive::WhenIdle`](crate::KeepAlive::WhenIdle) or
/// [`KeepAlive::Always`](crate::KeepAlive::Always) so a clean buffer still
/// produces a frame. In hardware-relay mode the panel is safe regardless.
pub struct Display<I, T, B>
where
    I: DisplayInterface,
{
    /// Hardware interface
    interface: I,
    /// Display configuration
    config: Config,
    /// Armed VCOM generator
    vcom: VcomSource<T>,
    /// Pixel storage and dirty rows
    framebuffer: FrameBuffer<B>,
}

impl<I, T, B> Display<I, T, B>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Create a new Display instance
    ///
    /// # Panics
    ///
    /// Panics if `buffer` is smaller than `config.dimensions.buffer_size()`.
    pub fn new(interface: I, config: Config, vcom: VcomSource<T>, buffer: B) -> Self {
        let framebuffer = FrameBuffer::new(config.dimensions, buffer);
        Self {
            interface,
            config,
            vcom,
            framebuffer,
        }
    }

    /// Try to create a new Display, returning an error if `buffer` is too small
    ///
    /// This is the fallible version of [`new`](Self::new).
    pub fn try_new(
        interface: I,
        config: Config,
        vcom: VcomSource<T>,
        buffer: B,
    ) -> core::result::Result<Self, Error<I>> {
        let framebuffer = FrameBuffer::try_new(config.dimensions, buffer)?;
        Ok(Self {
            interface,
            config,
            vcom,
            framebuffer,
        })
    }

    /// Drive chip select to its idle level
    ///
    /// Call once after power-up, before the first `sync`.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.writer(delay).settle().map_err(Error::Interface)?;
        log::debug!(
            "memory LCD {}x{} ready, VCOM {:?} at {}Hz",
            self.config.dimensions.cols(),
            self.config.dimensions.rows(),
            self.vcom.mode(),
            self.vcom.frequency_hz()
        );
        Ok(())
    }

    /// Set every pixel to 0 and mark every row dirty
    pub fn clear(&mut self) {
        self.framebuffer.clear();
    }

    /// Set every pixel to `color` and mark every row dirty
    pub fn fill(&mut self, color: Color) {
        self.framebuffer.fill(color);
    }

    /// Read one pixel from the frame buffer
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfRange` if `x >= cols` or `y >= rows`.
    pub fn get_pixel(&self, x: u16, y: u16) -> core::result::Result<bool, Error<I>> {
        Ok(self.framebuffer.get_pixel(x, y)?)
    }

    /// Write one pixel and mark its row dirty
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfRange` if `x >= cols` or `y >= rows`.
    pub fn set_pixel(&mut self, x: u16, y: u16, value: bool) -> DisplayResult<I> {
        Ok(self.framebuffer.set_pixel(x, y, value)?)
    }

    /// Replace one row and mark it dirty
    ///
    /// # Errors
    ///
    /// Returns `Error::LengthMismatch` if `bytes.len() != cols / 8`, or
    /// `Error::OutOfRange` if `y >= rows`.
    pub fn set_row(&mut self, y: u16, bytes: &[u8]) -> DisplayResult<I> {
        Ok(self.framebuffer.set_row(y, bytes)?)
    }

    /// Replace the whole image from a row-major byte sequence
    ///
    /// See [`FrameBuffer::set_all`]. Returns the number of bytes written.
    pub fn set_all<S>(&mut self, values: S) -> usize
    where
        S: IntoIterator<Item = u8>,
    {
        self.framebuffer.set_all(values)
    }

    /// Send every dirty row, then a keep-alive frame if the policy asks
    ///
    /// Blocks for the fixed chip select delays of every frame. On a bus error
    /// the failing row stays dirty and will be resent by the next call.
    pub fn sync<D: DelayNs>(&mut self, delay: &mut D) -> core::result::Result<SyncReport, Error<I>> {
        let keep_alive = self.config.keep_alive;
        let flag = self.vcom.flag();
        let mut writer = FrameWriter::new(
            &mut self.interface,
            delay,
            self.config.timing,
            self.config.bit_order,
        );
        protocol::sync(&mut writer, &mut self.framebuffer, flag, keep_alive)
            .map_err(Error::Interface)
    }

    /// Send a keep-alive frame now, whatever the policy
    ///
    /// For software-relay setups that go long stretches without drawing.
    pub fn refresh_vcom<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        let bits = self.vcom.mode_bits();
        self.writer(delay)
            .write_idle(bits)
            .map_err(Error::Interface)
    }

    /// Blank the panel with the all-clear command
    ///
    /// The panel memory goes white in one short frame. The frame buffer is
    /// filled white to match and nothing is left dirty.
    pub fn clear_screen<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        let bits = self.vcom.mode_bits();
        self.writer(delay)
            .write_clear(bits)
            .map_err(Error::Interface)?;
        self.framebuffer.fill(Color::White);
        self.framebuffer.mark_clean();
        Ok(())
    }

    /// Get display dimensions
    pub fn dimensions(&self) -> &Dimensions {
        &self.config.dimensions
    }

    /// Get display rotation
    pub fn rotation(&self) -> Rotation {
        self.config.rotation
    }

    /// Access the underlying configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Access the VCOM source
    pub fn vcom(&self) -> &VcomSource<T> {
        &self.vcom
    }

    /// Access the frame buffer
    pub fn framebuffer(&self) -> &FrameBuffer<B> {
        &self.framebuffer
    }

    /// Release the interface, VCOM source and buffer storage
    ///
    /// The VCOM timer keeps running for as long as the returned source is
    /// kept alive.
    pub fn release(self) -> (I, VcomSource<T>, B) {
        (self.interface, self.vcom, self.framebuffer.release())
    }

    fn writer<'a, D: DelayNs>(&'a mut self, delay: &'a mut D) -> FrameWriter<'a, I, D> {
        FrameWriter::new(
            &mut self.interface,
            delay,
            self.config.timing,
            self.config.bit_order,
        )
    }
}
