// src/driver/transaction.rs

use super::Ld2410;
use crate::common::{
    command::Command,
    constants::{REPLY_HEAD, REPLY_TAIL},
    error::Ld2410Error,
    frame::FrameFamily,
    hal_traits::{Ld2410Serial, Ld2410Timer},
    response::{parse_ack, parse_data, AckFrame, ResponseParseError},
    timing,
};

impl<IF> Ld2410<IF>
where
    IF: Ld2410Serial + Ld2410Timer,
{
    // --- Frame Processing ---

    /// Reads and decodes a telemetry frame; its head has just been seen.
    pub(super) fn receive_data(&mut self) -> Result<(), Ld2410Error<IF::Error>> {
        self.read_frame(FrameFamily::Telemetry)?;
        let payload = self.frame.payload().ok_or(Ld2410Error::TailMismatch)?;
        let decoded = parse_data(payload, self.interface.now())?;

        self.state.note_stream_format(decoded.format);
        self.sensor = decoded;
        self.data_frames = self.data_frames.wrapping_add(1);
        Ok(())
    }

    /// Reads and decodes a reply frame, then applies it to the device state.
    pub(super) fn receive_ack(&mut self) -> Result<AckFrame, Ld2410Error<IF::Error>> {
        self.read_frame(FrameFamily::Reply)?;
        let payload = self.frame.payload().ok_or(Ld2410Error::TailMismatch)?;
        let reply = parse_ack(payload)?;

        log::debug!("Reply {:#06x}: {:?}", reply.code, reply.ack);
        self.state.apply(&reply.ack);
        Ok(reply)
    }

    // --- Command Exchange ---

    /// Sends `command` and waits for the reply carrying its echo code.
    ///
    /// Telemetry on the wire is skipped while waiting. Replies to other
    /// commands are still applied to the state but do not end the wait.
    pub(super) fn send_command(&mut self, command: Command) -> Result<AckFrame, Ld2410Error<IF::Error>> {
        let body = command.encode().map_err(|_| Ld2410Error::CommandFormat)?;
        let expected = command.expected_ack();

        log::debug!("Sending {:?} ({:#06x})", command, command.opcode());
        self.write_frame(&[&REPLY_HEAD[..], body.as_slice(), &REPLY_TAIL[..]])?;

        let deadline = self.interface.now() + self.config.command_timeout;
        self.window.reset();
        loop {
            if self.interface.now() >= deadline {
                log::warn!("No reply to {:?} within {:?}", command, self.config.command_timeout);
                return Err(Ld2410Error::Timeout);
            }

            let Some(byte) = self.poll_byte()? else {
                self.interface
                    .delay_us(timing::IO_POLL_INTERVAL.as_micros() as u32);
                continue;
            };
            if self.window.push(byte) != Some(FrameFamily::Reply) {
                continue;
            }
            self.window.reset();

            match self.receive_ack() {
                Ok(reply) if reply.code == expected => return Ok(reply),
                Ok(reply) => {
                    log::debug!("Ignoring reply {:#06x} while waiting for {:#06x}", reply.code, expected);
                }
                Err(Ld2410Error::Response(ResponseParseError::Rejected { code, status }))
                    if code == expected =>
                {
                    log::warn!("{:?} rejected with status {:#06x}", command, status);
                    return Err(Ld2410Error::CommandRejected { code, status });
                }
                Err(e) if e.is_recoverable() => {
                    log::debug!("Dropped reply frame: {}", e);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Runs `op` inside configuration mode and leaves the mode as it was found.
    ///
    /// Config mode is only exited if this call entered it and the device is
    /// still in it afterwards (a reboot leaves it on its own). The exit is also
    /// attempted when `op` fails; `op`'s error is the one returned.
    pub(super) fn with_config_mode<T, FN>(&mut self, op: FN) -> Result<T, Ld2410Error<IF::Error>>
    where
        FN: FnOnce(&mut Self) -> Result<T, Ld2410Error<IF::Error>>,
    {
        let opened = !self.state.in_config;
        if opened {
            self.send_command(Command::EnterConfig)?;
        }

        let result = op(self);

        if opened && self.state.in_config {
            let exited = self.send_command(Command::ExitConfig);
            if let Err(e) = &exited {
                log::warn!("Could not leave config mode: {}", e);
            }
            let value = result?;
            exited?;
            return Ok(value);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::super::mock::{reply_frame, data_frame, MockInterface, SimDevice};
    use super::*;
    use crate::common::{constants::opcode, response::Ack};
    use core::time::Duration;

    #[test]
    fn test_enter_config_scenario() {
        let mut iface = MockInterface::new();
        iface.stage(&[
            0xFD, 0xFC, 0xFB, 0xFA, 0x08, 0x00, 0xFF, 0x01, 0x00, 0x00, 0x40, 0x00, 0x02, 0x00,
            0x04, 0x03, 0x02, 0x01,
        ]);
        let mut sensor = Ld2410::new(iface, false);

        let reply = sensor.send_command(Command::EnterConfig).unwrap();
        assert_eq!(reply.code, 0x01FF);
        assert!(sensor.in_config_mode());
        assert_eq!(sensor.protocol_version(), Some(64));
        assert_eq!(sensor.buffer_size(), Some(2));
        assert_eq!(
            sensor.interface.flushed(),
            &[0xFD, 0xFC, 0xFB, 0xFA, 0x04, 0x00, 0xFF, 0x00, 0x01, 0x00, 0x04, 0x03, 0x02, 0x01]
        );
    }

    #[test]
    fn test_command_timeout_bounds() {
        let mut sensor = Ld2410::new(MockInterface::new(), false);
        let start = sensor.interface.now();
        let result = sensor.send_command(Command::ReadFirmware);
        assert!(matches!(result, Err(Ld2410Error::Timeout)));

        let elapsed = sensor.interface.now() - start;
        assert!(elapsed >= Duration::from_millis(2000));
        assert!(elapsed <= Duration::from_millis(2000 + 100) + timing::IO_POLL_INTERVAL);
    }

    #[test]
    fn test_timeout_holds_under_continuous_noise() {
        let mut iface = MockInterface::new();
        iface.streaming_noise = true;
        let mut sensor = Ld2410::new(iface, false);
        let start = sensor.interface.now();
        assert!(matches!(
            sensor.send_command(Command::ReadFirmware),
            Err(Ld2410Error::Timeout)
        ));
        let elapsed = sensor.interface.now() - start;
        assert!(elapsed >= Duration::from_millis(2000));
        assert!(elapsed <= Duration::from_millis(2100));
    }

    #[test]
    fn test_reply_skips_telemetry_and_foreign_replies() {
        let mut iface = MockInterface::new();
        iface.stage(&data_frame(&[
            0x02, 0xAA, 0x01, 0x10, 0x00, 0x20, 0x00, 0x00, 0x00, 0x10, 0x00, 0x55, 0x00,
        ]));
        // Reply to an earlier enable-enhanced command
        iface.stage(&reply_frame(&[0x62, 0x01, 0x00, 0x00]));
        iface.stage(&reply_frame(&[0xAB, 0x01, 0x00, 0x00, 0x01, 0x00]));
        let mut sensor = Ld2410::new(iface, false);

        let reply = sensor.send_command(Command::ReadResolution).unwrap();
        assert_eq!(reply.code, 0x01AB);
        // Foreign reply still updated the state; telemetry was not decoded
        assert!(sensor.in_enhanced_mode());
        assert_eq!(sensor.frame_count(), 0);
    }

    #[test]
    fn test_rejected_command_fails_immediately() {
        let mut iface = MockInterface::new();
        iface.stage(&reply_frame(&[0xA0, 0x01, 0x01, 0x00]));
        let mut sensor = Ld2410::new(iface, false);
        let start = sensor.interface.now();

        let result = sensor.send_command(Command::ReadFirmware);
        assert!(matches!(
            result,
            Err(Ld2410Error::CommandRejected { code: 0x01A0, status: 1 })
        ));
        assert!(sensor.interface.now() - start < Duration::from_millis(1));

        // The rejected reply leaves the state alone
        assert_eq!(sensor.state.config.firmware, None);
        assert!(!sensor.in_config_mode());
        assert!(sensor.in_basic_mode());
        assert_eq!(sensor.frame_count(), 0);
    }

    #[test]
    fn test_with_config_mode_leaves_as_found() {
        let mut sensor = Ld2410::new(MockInterface::with_device(SimDevice::new()), false);

        // Outside config mode: enter, run, exit
        let ack = sensor
            .with_config_mode(|dev| dev.send_command(Command::ReadMac))
            .unwrap();
        assert!(matches!(ack.ack, Ack::Mac(_)));
        assert!(!sensor.in_config_mode());
        assert_eq!(
            sensor.interface.sent_opcodes(),
            [opcode::ENTER_CONFIG, opcode::READ_MAC, opcode::EXIT_CONFIG]
        );

        // Inside config mode: no enter, no exit
        sensor.send_command(Command::EnterConfig).unwrap();
        sensor.interface.clear_sent();
        sensor
            .with_config_mode(|dev| dev.send_command(Command::ReadMac))
            .unwrap();
        assert!(sensor.in_config_mode());
        assert_eq!(sensor.interface.sent_opcodes(), [opcode::READ_MAC]);
    }

    #[test]
    fn test_with_config_mode_returns_op_error() {
        let mut device = SimDevice::new();
        device.reject = Some(opcode::READ_RESOLUTION);
        let mut sensor = Ld2410::new(MockInterface::with_device(device), false);

        let result = sensor.with_config_mode(|dev| dev.send_command(Command::ReadResolution));
        assert!(matches!(result, Err(Ld2410Error::CommandRejected { .. })));
        // Exit still attempted
        assert!(!sensor.in_config_mode());
        assert_eq!(
            sensor.interface.sent_opcodes().last(),
            Some(&opcode::EXIT_CONFIG)
        );
    }

    #[test]
    fn test_with_config_mode_skips_exit_after_reboot() {
        let mut sensor = Ld2410::new(MockInterface::with_device(SimDevice::new()), false);
        sensor
            .with_config_mode(|dev| dev.send_command(Command::Reboot))
            .unwrap();
        assert!(!sensor.in_config_mode());
        assert_eq!(
            sensor.interface.sent_opcodes(),
            [opcode::ENTER_CONFIG, opcode::REBOOT]
        );
    }
}
