//! Frame inversion (VCOM) generation
//!
//! Memory LCDs must see their common electrode polarity alternate between
//! 0.5 Hz and 30 Hz. Without it the liquid crystal builds up a DC bias and
//! the panel is permanently damaged, so the signal is produced by a hardware
//! timer rather than by the code that draws.
//!
//! ## Pieces
//!
//! - [`VcomFlag`] - the polarity bit, an atomic shared between the timer
//!   event and the thread that calls [`sync`](crate::Display::sync)
//! - [`VcomTimer`] - the platform seam: arms a periodic event that flips the
//!   flag, optionally also toggling the EXTCOMIN pin in hardware
//! - [`VcomSource`] - validates the rate, arms the timer once and keeps it
//!   for the lifetime of the display
//!
//! ## Relay Modes
//!
//! In [`VcomMode::SoftwareRelay`] the panel only learns the polarity through
//! the mode byte of each frame, so `sync` must run at least once per timer
//! period. In [`VcomMode::HardwareRelay`] the timer also drives the panel's
//! EXTCOMIN input directly and the panel stays safe even if the CPU stops
//! running code. The flag is still mirrored into every frame.
//!
//! ## Example
//!
//! ```
//! use core::convert::Infallible;
//! use memlcd::{VcomFlag, VcomMode, VcomSource, VcomTimer};
//!
//! static VCOM: VcomFlag = VcomFlag::new();
//!
//! struct Tim11;
//! impl VcomTimer for Tim11 {
//!     type Error = Infallible;
//!     fn arm(
//!         &mut self,
//!         _frequency_hz: u32,
//!         _flag: &'static VcomFlag,
//!         _mode: VcomMode,
//!     ) -> Result<(), Self::Error> {
//!         // Configure the timer; its interrupt handler calls `VCOM.toggle()`
//!         Ok(())
//!     }
//! }
//!
//! let vcom = match VcomSource::initialize(Tim11, &VCOM, VcomMode::HardwareRelay, 2) {
//!     Ok(vcom) => vcom,
//!     // Never continue without polarity inversion
//!     Err(_) => loop {},
//! };
//! assert!(vcom.current());
//! ```

use core::fmt::Debug;
use core::sync::atomic::{AtomicBool, Ordering};

use crate::command::{MODE_VCOM, VCOM_DEFAULT_EVENT_HZ, VCOM_MAX_EVENT_HZ, VCOM_MIN_EVENT_HZ};
use crate::error::VcomError;

/// The polarity bit shared with the timer event
///
/// A single atomic byte, so a read racing a flip sees either the old or the
/// new level and never anything else. Only the timer event writes it.
#[derive(Debug)]
pub struct VcomFlag {
    high: AtomicBool,
}

impl VcomFlag {
    /// Create a flag starting high
    pub const fn new() -> Self {
        Self::with_level(true)
    }

    /// Create a flag with an explicit starting level
    pub const fn with_level(high: bool) -> Self {
        Self {
            high: AtomicBool::new(high),
        }
    }

    /// Flip the polarity
    ///
    /// Call from the timer event only. Load and store are separate so this
    /// works on cores without atomic read-modify-write; with a single writer
    /// no flip is lost.
    pub fn toggle(&self) {
        let level = self.high.load(Ordering::Relaxed);
        self.high.store(!level, Ordering::Relaxed);
    }

    /// Current polarity
    pub fn current(&self) -> bool {
        self.high.load(Ordering::Relaxed)
    }

    /// Current polarity as mode byte bits (0 or [`MODE_VCOM`])
    pub fn mode_bits(&self) -> u8 {
        if self.current() { MODE_VCOM } else { 0 }
    }
}

impl Default for VcomFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// How polarity reaches the panel
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum VcomMode {
    /// Only through the VCOM bit of transmitted frames
    SoftwareRelay,
    /// The timer also toggles the EXTCOMIN pin by output compare
    #[default]
    HardwareRelay,
}

/// Periodic timer that flips the VCOM flag
///
/// ## Implementing
///
/// After `arm` returns `Ok`, the implementation must call
/// [`VcomFlag::toggle`] on `flag` from its event handler at `frequency_hz`
/// for as long as the program runs, independent of any scheduler. With
/// [`VcomMode::HardwareRelay`] it must also toggle the EXTCOMIN output on the
/// same event with no software in the loop (output compare toggle mode).
/// There is no disarm.
pub trait VcomTimer {
    /// Error type for arming failures
    type Error: Debug;

    /// Start the periodic event
    ///
    /// # Errors
    ///
    /// Returns an error if the timer or its output channel is unavailable.
    fn arm(
        &mut self,
        frequency_hz: u32,
        flag: &'static VcomFlag,
        mode: VcomMode,
    ) -> Result<(), Self::Error>;
}

/// An armed VCOM generator
///
/// Owns the timer so the periodic event outlives every display operation.
/// Only obtainable through [`VcomSource::initialize`], which makes an
/// unarmed display unrepresentable.
#[derive(Debug)]
pub struct VcomSource<T> {
    /// Timer kept alive for the process lifetime
    timer: T,
    /// Flag flipped by the timer event
    flag: &'static VcomFlag,
    /// Relay mode
    mode: VcomMode,
    /// Timer event rate
    frequency_hz: u32,
}

impl<T: VcomTimer> VcomSource<T> {
    /// Arm the timer and start generating VCOM
    ///
    /// `frequency_hz` is the timer event rate. Every event flips the flag, so
    /// the polarity frequency is half of it; the accepted range is 1..=60 Hz.
    ///
    /// # Errors
    ///
    /// Both errors are fatal; see [`VcomError`].
    pub fn initialize(
        mut timer: T,
        flag: &'static VcomFlag,
        mode: VcomMode,
        frequency_hz: u32,
    ) -> Result<Self, VcomError<T::Error>> {
        if !(VCOM_MIN_EVENT_HZ..=VCOM_MAX_EVENT_HZ).contains(&frequency_hz) {
            log::error!("VCOM event rate {}Hz out of range", frequency_hz);
            return Err(VcomError::FrequencyOutOfRange { frequency_hz });
        }

        if let Err(e) = timer.arm(frequency_hz, flag, mode) {
            log::error!("VCOM timer failed to arm: {:?}", e);
            return Err(VcomError::Arm(e));
        }

        log::debug!("VCOM armed at {}Hz, {:?}", frequency_hz, mode);
        Ok(Self {
            timer,
            flag,
            mode,
            frequency_hz,
        })
    }

    /// Arm the timer at the default 2 Hz event rate (1 Hz polarity)
    pub fn initialize_default(
        timer: T,
        flag: &'static VcomFlag,
        mode: VcomMode,
    ) -> Result<Self, VcomError<T::Error>> {
        Self::initialize(timer, flag, mode, VCOM_DEFAULT_EVENT_HZ)
    }
}

impl<T> VcomSource<T> {
    /// Current polarity
    pub fn current(&self) -> bool {
        self.flag.current()
    }

    /// Current polarity as mode byte bits
    pub fn mode_bits(&self) -> u8 {
        self.flag.mode_bits()
    }

    /// Relay mode
    pub fn mode(&self) -> VcomMode {
        self.mode
    }

    /// Timer event rate in Hz
    pub fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }

    /// The shared flag
    pub fn flag(&self) -> &'static VcomFlag {
        self.flag
    }

    /// Access the timer
    pub fn timer(&self) -> &T {
        &self.timer
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use alloc::boxed::Box;

    /// Timer whose events are fired by hand
    #[derive(Debug, Default)]
    pub(crate) struct ManualTimer {
        pub(crate) armed: Option<(u32, VcomMode)>,
        pub(crate) flag: Option<&'static VcomFlag>,
    }

    impl ManualTimer {
        pub(crate) fn fire(&self) {
            if let Some(flag) = self.flag {
                flag.toggle();
            }
        }
    }

    impl VcomTimer for ManualTimer {
        type Error = core::convert::Infallible;

        fn arm(
            &mut self,
            frequency_hz: u32,
            flag: &'static VcomFlag,
            mode: VcomMode,
        ) -> Result<(), Self::Error> {
            self.armed = Some((frequency_hz, mode));
            self.flag = Some(flag);
            Ok(())
        }
    }

    #[derive(Debug)]
    struct BusyTimer;

    #[derive(Debug, PartialEq)]
    struct TimerInUse;

    impl VcomTimer for BusyTimer {
        type Error = TimerInUse;

        fn arm(&mut self, _: u32, _: &'static VcomFlag, _: VcomMode) -> Result<(), Self::Error> {
            Err(TimerInUse)
        }
    }

    pub(crate) fn leaked_flag() -> &'static VcomFlag {
        Box::leak(Box::new(VcomFlag::new()))
    }

    #[test]
    fn test_flag_starts_high_and_toggles() {
        let flag = VcomFlag::new();
        assert!(flag.current());
        assert_eq!(flag.mode_bits(), MODE_VCOM);
        flag.toggle();
        assert!(!flag.current());
        assert_eq!(flag.mode_bits(), 0);
        flag.toggle();
        assert!(flag.current());
    }

    #[test]
    fn test_initialize_arms_timer() {
        let vcom = VcomSource::initialize_default(
            ManualTimer::default(),
            leaked_flag(),
            VcomMode::SoftwareRelay,
        )
        .unwrap();
        assert_eq!(vcom.timer().armed, Some((2, VcomMode::SoftwareRelay)));
        assert_eq!(vcom.frequency_hz(), 2);
        assert_eq!(vcom.mode(), VcomMode::SoftwareRelay);
    }

    #[test]
    fn test_timer_event_flips_source() {
        let vcom =
            VcomSource::initialize(ManualTimer::default(), leaked_flag(), VcomMode::HardwareRelay, 2)
                .unwrap();
        let before = vcom.current();
        vcom.timer().fire();
        assert_ne!(vcom.current(), before);
    }

    #[test]
    fn test_initialize_rejects_out_of_window_rates() {
        for frequency_hz in [0, 61, 1_000] {
            let result = VcomSource::initialize(
                ManualTimer::default(),
                leaked_flag(),
                VcomMode::HardwareRelay,
                frequency_hz,
            );
            assert!(matches!(
                result,
                Err(VcomError::FrequencyOutOfRange { frequency_hz: f }) if f == frequency_hz
            ));
        }
    }

    #[test]
    fn test_initialize_accepts_window_edges() {
        for frequency_hz in [1, 60] {
            assert!(
                VcomSource::initialize(
                    ManualTimer::default(),
                    leaked_flag(),
                    VcomMode::SoftwareRelay,
                    frequency_hz,
                )
                .is_ok()
            );
        }
    }

    #[test]
    fn test_arm_failure_is_reported() {
        let result =
            VcomSource::initialize(BusyTimer, leaked_flag(), VcomMode::HardwareRelay, 2);
        assert!(matches!(result, Err(VcomError::Arm(TimerInUse))));
    }

    #[test]
    fn test_concurrent_reads_see_valid_levels() {
        use std::sync::atomic::AtomicBool;
        use std::sync::Arc;

        let flag = leaked_flag();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_writer = Arc::clone(&stop);

        let writer = std::thread::spawn(move || {
            while !stop_writer.load(Ordering::Relaxed) {
                flag.toggle();
            }
        });

        for _ in 0..100_000 {
            let bits = flag.mode_bits();
            assert!(bits == 0 || bits == MODE_VCOM);
        }

        stop.store(true, Ordering::Relaxed);
        writer.join().unwrap();
    }
}
