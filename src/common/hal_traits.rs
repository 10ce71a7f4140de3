// src/common/hal_traits.rs

use core::fmt::Debug;
use core::ops::{Add, Sub};
use core::time::Duration;

/// A point on the interface's monotonic clock.
///
/// Any `Copy + Ord` type that can be offset by a `Duration` and subtracted into
/// one qualifies, so HAL instant types usually work without a wrapper.
pub trait Ld2410Instant:
    Copy + Ord + Debug + Add<Duration, Output = Self> + Sub<Self, Output = Duration>
{
}

impl<T> Ld2410Instant for T where
    T: Copy + Ord + Debug + Add<Duration, Output = T> + Sub<T, Output = Duration>
{
}

/// Abstraction for the clock and delay operations the driver needs.
pub trait Ld2410Timer {
    /// Instant type returned by [`now`](Ld2410Timer::now).
    type Instant: Ld2410Instant;

    /// Current reading of a monotonic clock.
    fn now(&self) -> Self::Instant;

    /// Delay for at least the specified number of microseconds.
    fn delay_us(&mut self, us: u32);

    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// Abstraction for the (non-blocking) UART link to the sensor.
pub trait Ld2410Serial {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Attempts to read a single byte.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` when no byte is currently available.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Attempts to queue a single byte for transmission.
    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error>;

    /// Attempts to flush the transmit buffer, returning `WouldBlock` while
    /// bytes are still on their way out.
    fn flush(&mut self) -> nb::Result<(), Self::Error>;
}

/// Milliseconds since an arbitrary epoch (usually boot).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Millis(pub u64);

impl Add<Duration> for Millis {
    type Output = Self;
    fn add(self, rhs: Duration) -> Self {
        Millis(self.0.saturating_add(rhs.as_millis() as u64))
    }
}

impl Sub<Millis> for Millis {
    type Output = Duration;
    fn sub(self, rhs: Millis) -> Duration {
        Duration::from_millis(self.0.saturating_sub(rhs.0))
    }
}

/// Bundles a serial port with an `embedded-hal` delay and a millisecond clock.
///
/// The clock closure must be monotonic; `HalInterface` reports it as [`Millis`].
#[cfg(feature = "impl-native")]
pub struct HalInterface<S, D, C> {
    serial: S,
    delay: D,
    clock: C,
}

#[cfg(feature = "impl-native")]
impl<S, D, C> HalInterface<S, D, C>
where
    S: Ld2410Serial,
    D: embedded_hal::delay::DelayNs,
    C: Fn() -> u64,
{
    pub fn new(serial: S, delay: D, clock: C) -> Self {
        HalInterface { serial, delay, clock }
    }

    /// Gives back the wrapped parts.
    pub fn release(self) -> (S, D, C) {
        (self.serial, self.delay, self.clock)
    }
}

#[cfg(feature = "impl-native")]
impl<S, D, C> Ld2410Serial for HalInterface<S, D, C>
where
    S: Ld2410Serial,
{
    type Error = S::Error;

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        self.serial.read_byte()
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        self.serial.write_byte(byte)
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        self.serial.flush()
    }
}

#[cfg(feature = "impl-native")]
impl<S, D, C> Ld2410Timer for HalInterface<S, D, C>
where
    D: embedded_hal::delay::DelayNs,
    C: Fn() -> u64,
{
    type Instant = Millis;

    fn now(&self) -> Millis {
        Millis((self.clock)())
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
