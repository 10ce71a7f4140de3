// src/config.rs

use core::time::Duration;

use crate::common::timing;

/// Tunables for an [`Ld2410`](crate::Ld2410) driver instance.
///
/// The defaults match what the sensor firmware expects; most applications only
/// touch [`debug`](DriverConfig::debug).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// Maximum wait for a command reply.
    pub command_timeout: Duration,
    /// Maximum duration of one frame read step.
    pub frame_read_timeout: Duration,
    /// How long a telemetry frame counts as a live detection.
    pub data_lifespan: Duration,
    /// Pause between polls in [`begin`](crate::Ld2410::begin).
    pub begin_poll_interval: Duration,
    /// Pause between per-gate writes in the all-gates threshold setter.
    pub gate_write_delay: Duration,
    /// Log a hex dump of every received frame.
    pub debug: bool,
}

impl DriverConfig {
    /// Creates a configuration with default timing and the given debug flag.
    pub fn new(debug: bool) -> Self {
        DriverConfig {
            debug,
            ..Self::default()
        }
    }

    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    pub fn frame_read_timeout(mut self, timeout: Duration) -> Self {
        self.frame_read_timeout = timeout;
        self
    }

    pub fn data_lifespan(mut self, lifespan: Duration) -> Self {
        self.data_lifespan = lifespan;
        self
    }

    pub fn begin_poll_interval(mut self, interval: Duration) -> Self {
        self.begin_poll_interval = interval;
        self
    }

    pub fn gate_write_delay(mut self, delay: Duration) -> Self {
        self.gate_write_delay = delay;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            command_timeout: timing::COMMAND_TIMEOUT,
            frame_read_timeout: timing::FRAME_READ_TIMEOUT,
            data_lifespan: timing::DATA_LIFESPAN,
            begin_poll_interval: timing::BEGIN_POLL_INTERVAL,
            gate_write_delay: timing::GATE_WRITE_DELAY,
            debug: false,
        }
    }
}
