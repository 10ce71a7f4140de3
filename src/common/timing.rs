// src/common/timing.rs

use core::time::Duration;

// Defaults for `DriverConfig`.

// === Command/Response Timing ===

/// Maximum wait for the reply to a command, measured from the end of the flush.
pub const COMMAND_TIMEOUT: Duration = Duration::from_millis(2000);
/// Maximum duration of a single frame read step (length bytes, or body + tail).
pub const FRAME_READ_TIMEOUT: Duration = Duration::from_millis(100);
/// Upper bound for pushing a single byte into the transmit buffer.
pub const WRITE_TIMEOUT: Duration = Duration::from_millis(100);
/// Back-off between polls of a transport that returned `WouldBlock`.
pub const IO_POLL_INTERVAL: Duration = Duration::from_micros(100);

// === Telemetry ===

/// A telemetry frame older than this no longer counts as a detection.
pub const DATA_LIFESPAN: Duration = Duration::from_millis(500);

// === Start-up ===

/// Pause between `check()` attempts while waiting for the sensor to come online.
/// The overall bound is `COMMAND_TIMEOUT`.
pub const BEGIN_POLL_INTERVAL: Duration = Duration::from_millis(110);

// === Configuration ===

/// Pause between per-gate writes when setting all thresholds at once.
pub const GATE_WRITE_DELAY: Duration = Duration::from_millis(20);
