// src/driver/mod.rs

use crate::common::{
    constants::SCAN_LIMIT,
    error::Ld2410Error,
    frame::{FrameFamily, HeadWindow, RawFrame},
    hal_traits::{Ld2410Serial, Ld2410Timer},
    response::SensorFrame,
    types::{GateValues, StreamFormat, TargetStatus},
};
use crate::config::DriverConfig;
use crate::device::DeviceState;

mod io_helpers;
mod requests;
mod transaction;

#[cfg(test)]
mod mock;

/// Driver for one LD2410 sensor on a serial link.
///
/// Call [`check`](Ld2410::check) from a polling loop to keep the telemetry
/// current; configuration methods block for at most the command timeout.
#[derive(Debug)]
pub struct Ld2410<IF>
where
    IF: Ld2410Serial + Ld2410Timer,
{
    interface: IF,
    config: DriverConfig,
    window: HeadWindow,
    frame: RawFrame,
    state: DeviceState,
    sensor: SensorFrame<IF::Instant>,
    data_frames: u32,
}

impl<IF> Ld2410<IF>
where
    IF: Ld2410Serial + Ld2410Timer,
{
    pub fn new(interface: IF, debug: bool) -> Self {
        Self::with_config(interface, DriverConfig::new(debug))
    }

    pub fn with_config(interface: IF, config: DriverConfig) -> Self {
        Ld2410 {
            interface,
            config,
            window: HeadWindow::new(),
            frame: RawFrame::default(),
            state: DeviceState::default(),
            sensor: SensorFrame::default(),
            data_frames: 0,
        }
    }

    /// Gives back the transport.
    pub fn release(self) -> IF {
        self.interface
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    // --- Lifecycle ---

    /// Polls until the first valid frame arrives or the command timeout passes.
    pub fn begin(&mut self) -> Result<(), Ld2410Error<IF::Error>> {
        let deadline = self.interface.now() + self.config.command_timeout;
        loop {
            if let Some(family) = self.check()? {
                log::debug!("Sensor online, first frame: {:?}", family);
                return Ok(());
            }
            if self.interface.now() >= deadline {
                log::warn!("Sensor did not send any frame within {:?}", self.config.command_timeout);
                return Err(Ld2410Error::Timeout);
            }
            self.interface
                .delay_ms(self.config.begin_poll_interval.as_millis() as u32);
        }
    }

    /// Forgets the mode flags. Nothing is sent to the device.
    pub fn end(&mut self) {
        self.state.clear_modes();
    }

    /// Drains the available bytes until one frame has been processed.
    ///
    /// Returns the family of the processed frame, or `None` once the transport
    /// has nothing more to offer or `SCAN_LIMIT` bytes went by without a frame
    /// head. A partial head carries over to the next call. Framing and decoding
    /// faults are skipped over; only transport errors are returned.
    pub fn check(&mut self) -> Result<Option<FrameFamily>, Ld2410Error<IF::Error>> {
        for _ in 0..SCAN_LIMIT {
            let Some(byte) = self.poll_byte()? else {
                break;
            };
            let Some(family) = self.window.push(byte) else {
                continue;
            };
            self.window.reset();

            let outcome = match family {
                FrameFamily::Telemetry => self.receive_data(),
                FrameFamily::Reply => self.receive_ack().map(|_| ()),
            };
            match outcome {
                Ok(()) => return Ok(Some(family)),
                Err(e) if e.is_recoverable() => {
                    log::debug!("Dropped {:?} frame: {}", family, e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }

    pub fn debug_on(&mut self) {
        self.config.debug = true;
    }

    pub fn debug_off(&mut self) {
        self.config.debug = false;
    }

    // --- Mode Flags ---

    pub fn in_config_mode(&self) -> bool {
        self.state.in_config
    }

    pub fn in_basic_mode(&self) -> bool {
        self.state.format == StreamFormat::Basic
    }

    pub fn in_enhanced_mode(&self) -> bool {
        self.state.format == StreamFormat::Enhanced
    }

    /// Protocol version from the last enter-config reply.
    pub fn protocol_version(&self) -> Option<u16> {
        self.state.protocol_version
    }

    /// Receive buffer size from the last enter-config reply.
    pub fn buffer_size(&self) -> Option<u16> {
        self.state.buffer_size
    }

    // --- Telemetry ---

    fn is_fresh(&self) -> bool {
        self.sensor
            .is_fresh(self.interface.now(), self.config.data_lifespan)
    }

    /// Target status of the latest frame, `None` once it has gone stale.
    pub fn status(&self) -> Option<TargetStatus> {
        if self.is_fresh() {
            self.sensor.target_status()
        } else {
            None
        }
    }

    pub fn status_str(&self) -> &'static str {
        self.status().unwrap_or(TargetStatus::NoTarget).as_str()
    }

    /// Capture instant of the latest telemetry frame.
    pub fn timestamp(&self) -> Option<IF::Instant> {
        self.sensor.timestamp
    }

    /// Telemetry frames decoded since construction.
    pub fn frame_count(&self) -> u32 {
        self.data_frames
    }

    pub fn presence_detected(&self) -> bool {
        self.status().is_some_and(TargetStatus::has_target)
    }

    pub fn moving_target_detected(&self) -> bool {
        self.status().is_some_and(TargetStatus::has_moving)
    }

    pub fn stationary_target_detected(&self) -> bool {
        self.status().is_some_and(TargetStatus::has_stationary)
    }

    pub fn moving_target_distance(&self) -> u16 {
        self.sensor.moving_distance
    }

    pub fn moving_target_signal(&self) -> u8 {
        self.sensor.moving_signal
    }

    pub fn stationary_target_distance(&self) -> u16 {
        self.sensor.stationary_distance
    }

    pub fn stationary_target_signal(&self) -> u8 {
        self.sensor.stationary_signal
    }

    pub fn detected_distance(&self) -> u16 {
        self.sensor.detected_distance
    }

    /// Per-gate moving signals; empty unless the device streams enhanced frames.
    pub fn moving_signals(&self) -> &GateValues {
        &self.sensor.moving_signals
    }

    /// Per-gate stationary signals; empty unless the device streams enhanced frames.
    pub fn stationary_signals(&self) -> &GateValues {
        &self.sensor.stationary_signals
    }

    pub fn light_level(&self) -> u8 {
        self.sensor.light_level
    }

    pub fn out_level(&self) -> u8 {
        self.sensor.out_level
    }

    /// The latest decoded frame, stale or not.
    pub fn sensor_data(&self) -> &SensorFrame<IF::Instant> {
        &self.sensor
    }
}
