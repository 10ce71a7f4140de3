// src/driver/io_helpers.rs

use super::Ld2410;
use crate::common::{
    constants::{FRAME_CAPACITY, MARKER_LEN},
    error::Ld2410Error,
    frame::FrameFamily,
    hal_traits::{Ld2410Serial, Ld2410Timer},
    timing,
};
use core::time::Duration;
use nb::Result as NbResult;

// Implementation block for I/O related helpers
impl<IF> Ld2410<IF>
where
    IF: Ld2410Serial + Ld2410Timer,
{
    /// Executes a non-blocking I/O operation (`f`) repeatedly until it
    /// stops returning `WouldBlock`, returning the final result or a timeout error.
    pub(super) fn execute_blocking_io_with_timeout<FN, T>(
        &mut self,
        timeout: Duration,
        f: FN,
    ) -> Result<T, Ld2410Error<IF::Error>>
    where
        FN: FnMut(&mut IF) -> NbResult<T, IF::Error>,
    {
        let deadline = self.interface.now() + timeout;
        self.execute_blocking_io_until(deadline, f)
    }

    fn execute_blocking_io_until<FN, T>(
        &mut self,
        deadline: IF::Instant,
        mut f: FN,
    ) -> Result<T, Ld2410Error<IF::Error>>
    where
        FN: FnMut(&mut IF) -> NbResult<T, IF::Error>,
    {
        loop {
            match f(&mut self.interface) {
                Ok(result) => return Ok(result),
                Err(nb::Error::WouldBlock) => {
                    if self.interface.now() >= deadline {
                        return Err(Ld2410Error::Timeout);
                    }
                    self.interface
                        .delay_us(timing::IO_POLL_INTERVAL.as_micros() as u32);
                }
                Err(nb::Error::Other(e)) => return Err(Ld2410Error::Io(e)),
            }
        }
    }

    /// One non-blocking read; `None` when no byte is waiting.
    pub(super) fn poll_byte(&mut self) -> Result<Option<u8>, Ld2410Error<IF::Error>> {
        match self.interface.read_byte() {
            Ok(byte) => Ok(Some(byte)),
            Err(nb::Error::WouldBlock) => Ok(None),
            Err(nb::Error::Other(e)) => Err(Ld2410Error::Io(e)),
        }
    }

    /// Writes every byte and waits for the transmit buffer to drain.
    pub(super) fn write_frame(&mut self, parts: &[&[u8]]) -> Result<(), Ld2410Error<IF::Error>> {
        for part in parts {
            for byte in part.iter() {
                self.execute_blocking_io_with_timeout(timing::WRITE_TIMEOUT, |iface| {
                    iface.write_byte(*byte)
                })?;
            }
        }
        self.execute_blocking_io_with_timeout(timing::WRITE_TIMEOUT, |iface| iface.flush())
    }

    /// Reads the rest of a frame whose head marker was just seen.
    ///
    /// Two bounded steps: the length field, then payload plus tail. On success
    /// the frame buffer is sealed and its payload is available.
    pub(super) fn read_frame(&mut self, family: FrameFamily) -> Result<(), Ld2410Error<IF::Error>> {
        self.frame.begin(family);

        let deadline = self.interface.now() + self.config.frame_read_timeout;
        let lo = self.execute_blocking_io_until(deadline, |iface| iface.read_byte())?;
        let hi = self.execute_blocking_io_until(deadline, |iface| iface.read_byte())?;
        let len = u16::from_le_bytes([lo, hi]);
        if len == 0 {
            return Err(Ld2410Error::InvalidLength(len));
        }

        let total = usize::from(len) + MARKER_LEN;
        let deadline = self.interface.now() + self.config.frame_read_timeout;
        for _ in 0..total {
            let byte = self.execute_blocking_io_until(deadline, |iface| iface.read_byte())?;
            self.frame.push(byte);
        }

        if self.frame.overflowed() {
            return Err(Ld2410Error::BufferOverflow {
                needed: total,
                got: FRAME_CAPACITY,
            });
        }
        if self.config.debug {
            log::debug!("{:?} frame: {:02X?}", family, self.frame.as_bytes());
        }
        if !self.frame.seal() {
            return Err(Ld2410Error::TailMismatch);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::mock::{MockCommError, MockInterface};
    use super::*;

    #[test]
    fn test_execute_blocking_io_with_timeout() {
        let mut sensor = Ld2410::new(MockInterface::new(), false);

        // Succeeds after a few WouldBlocks
        let mut calls = 0;
        let result = sensor.execute_blocking_io_with_timeout(Duration::from_millis(10), |_| {
            calls += 1;
            if calls < 4 {
                Err(nb::Error::WouldBlock)
            } else {
                Ok(123)
            }
        });
        assert_eq!(result.unwrap(), 123);
        assert_eq!(sensor.interface.now_us(), 300);

        // Times out
        let start = sensor.interface.now_us();
        let result: Result<(), _> = sensor
            .execute_blocking_io_with_timeout(Duration::from_millis(5), |_| Err(nb::Error::WouldBlock));
        assert!(matches!(result, Err(Ld2410Error::Timeout)));
        assert!(sensor.interface.now_us() - start >= 5_000);

        // Transport error
        let result: Result<(), _> = sensor
            .execute_blocking_io_with_timeout(Duration::from_millis(5), |_| {
                Err(nb::Error::Other(MockCommError))
            });
        assert!(matches!(result, Err(Ld2410Error::Io(MockCommError))));
    }

    #[test]
    fn test_read_frame_times_out_mid_body() {
        let mut iface = MockInterface::new();
        // Length says 8, only 3 bytes follow
        iface.stage(&[0x08, 0x00, 0xFF, 0x01, 0x00]);
        let mut sensor = Ld2410::new(iface, false);

        let start = sensor.interface.now_us();
        let result = sensor.read_frame(FrameFamily::Reply);
        assert!(matches!(result, Err(Ld2410Error::Timeout)));
        let elapsed = sensor.interface.now_us() - start;
        assert!(elapsed >= 100_000 && elapsed <= 100_200);
        assert_eq!(sensor.frame.payload(), None);
    }

    #[test]
    fn test_read_frame_checks_tail() {
        let mut iface = MockInterface::new();
        iface.stage(&[0x02, 0x00, 0xFE, 0x01, 0xF8, 0xF7, 0xF6, 0xF5]);
        let mut sensor = Ld2410::new(iface, true);
        assert!(matches!(
            sensor.read_frame(FrameFamily::Reply),
            Err(Ld2410Error::TailMismatch)
        ));
    }

    #[test]
    fn test_write_frame_flushes() {
        let mut sensor = Ld2410::new(MockInterface::new(), false);
        sensor.write_frame(&[&[1u8, 2][..], &[3u8][..]]).unwrap();
        assert_eq!(sensor.interface.flushed(), &[1, 2, 3]);
    }
}
