//! Update protocol
//!
//! Turns dirty rows into chip-select bracketed transfers. Every transfer
//! follows the same timing contract:
//!
//! ```text
//! SCS  ____/‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾\________/‾‾‾
//!          | setup |  bytes  | hold |  inter-frame |
//! ```
//!
//! The delays come from [`Timing`] and are minimums; a slow bus or delay
//! only makes them longer.
//!
//! The VCOM bit is read from the shared flag immediately before each frame
//! is encoded, so a long `sync` keeps following the timer.

use embedded_hal::delay::DelayNs;

use crate::command::{MODE_CLEAR_ALL, MODE_WRITE_LINE, TRAILER, reverse_bits, row_address};
use crate::config::{BitOrder, KeepAlive, MAX_COLUMNS, Timing};
use crate::framebuffer::FrameBuffer;
use crate::interface::DisplayInterface;
use crate::vcom::VcomFlag;

/// Longest frame: mode, address, row data, trailer
pub const MAX_FRAME_LEN: usize = 2 + MAX_COLUMNS as usize / 8 + 1;

/// What a `sync` put on the wire
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SyncReport {
    /// Row frames sent
    pub rows: usize,
    /// Whether a keep-alive frame was sent
    pub idle_frame: bool,
}

/// Writes individual frames with the timing contract applied
pub struct FrameWriter<'a, I, D> {
    interface: &'a mut I,
    delay: &'a mut D,
    timing: Timing,
    bit_order: BitOrder,
}

impl<'a, I, D> FrameWriter<'a, I, D>
where
    I: DisplayInterface,
    D: DelayNs,
{
    /// Borrow an interface and delay for a batch of frames
    pub fn new(interface: &'a mut I, delay: &'a mut D, timing: Timing, bit_order: BitOrder) -> Self {
        Self {
            interface,
            delay,
            timing,
            bit_order,
        }
    }

    /// Send one row: `MODE_WRITE_LINE | vcom`, address, data, trailer
    ///
    /// `data` longer than a full panel row is truncated.
    pub fn write_row(&mut self, vcom_bits: u8, row: u16, data: &[u8]) -> Result<(), I::Error> {
        let data = &data[..data.len().min(MAX_FRAME_LEN - 3)];
        let mut frame = [0u8; MAX_FRAME_LEN];
        frame[0] = MODE_WRITE_LINE | vcom_bits;
        frame[1] = row_address(row);
        frame[2..2 + data.len()].copy_from_slice(data);
        frame[2 + data.len()] = TRAILER;
        self.transfer(&mut frame[..3 + data.len()])
    }

    /// Send a keep-alive frame carrying only the VCOM bit
    pub fn write_idle(&mut self, vcom_bits: u8) -> Result<(), I::Error> {
        self.transfer(&mut [vcom_bits, TRAILER])
    }

    /// Send the all-clear command, blanking panel memory to white
    pub fn write_clear(&mut self, vcom_bits: u8) -> Result<(), I::Error> {
        self.transfer(&mut [MODE_CLEAR_ALL | vcom_bits, TRAILER])
    }

    /// Deassert chip select and wait the inter-frame time
    ///
    /// Used after power-up before the first frame.
    pub fn settle(&mut self) -> Result<(), I::Error> {
        self.interface.deselect()?;
        self.delay.delay_us(self.timing.inter_frame_us());
        Ok(())
    }

    fn transfer(&mut self, frame: &mut [u8]) -> Result<(), I::Error> {
        if self.bit_order == BitOrder::MsbFirst {
            for byte in frame.iter_mut() {
                *byte = reverse_bits(*byte);
            }
        }

        self.interface.select()?;
        self.delay.delay_us(self.timing.setup_us());
        let sent = self.interface.send(frame);
        if sent.is_ok() {
            self.delay.delay_us(self.timing.hold_us());
        }
        // Always try to drop chip select, even after a failed send
        let released = self.interface.deselect();
        self.delay.delay_us(self.timing.inter_frame_us());
        sent?;
        released
    }
}

/// Drain the dirty set onto the wire
///
/// Each dirty row is sent exactly once. If a frame fails, its row is put
/// back in the dirty set and the error returned; rows already sent stay
/// clean. After the rows, `keep_alive` decides whether a keep-alive frame
/// follows.
pub fn sync<I, D, B>(
    writer: &mut FrameWriter<'_, I, D>,
    framebuffer: &mut FrameBuffer<B>,
    vcom: &VcomFlag,
    keep_alive: KeepAlive,
) -> Result<SyncReport, I::Error>
where
    I: DisplayInterface,
    D: DelayNs,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    let mut report = SyncReport::default();

    while let Some(y) = framebuffer.pop_dirty() {
        debug_assert!(
            y < framebuffer.dimensions().rows(),
            "dirty row {y} outside the panel"
        );
        let Ok(data) = framebuffer.row(y) else {
            framebuffer.mark_dirty(y);
            continue;
        };
        if let Err(e) = writer.write_row(vcom.mode_bits(), y, data) {
            log::warn!("row {} frame failed, left dirty: {:?}", y, e);
            framebuffer.mark_dirty(y);
            return Err(e);
        }
        report.rows += 1;
    }

    let send_idle = match keep_alive {
        KeepAlive::Disabled => false,
        KeepAlive::WhenIdle => report.rows == 0,
        KeepAlive::Always => true,
    };
    if send_idle {
        writer.write_idle(vcom.mode_bits())?;
        report.idle_frame = true;
    }

    log::trace!(
        "sync: {} rows, keep-alive {}",
        report.rows,
        report.idle_frame
    );
    Ok(report)
}
