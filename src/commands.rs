//! Inbound command frames from the host.
//!
//! One frame per command: a one-byte id followed by a little-endian payload
//! (4 bytes for setpoints, 1 byte for flags, none for a telemetry poll).
//! Dispatch is synchronous and always acknowledges success; the only input
//! validation is clamping negative setpoints to zero at this boundary.

use crate::power_state::SharedPowerState;

pub const CMD_POLL_TELEMETRY: u8 = 0x00;
pub const CMD_SET_VOLTAGE: u8 = 0x01;
pub const CMD_SET_CURRENT: u8 = 0x02;
pub const CMD_SET_INTERNAL_ENABLE: u8 = 0x03;
pub const CMD_SET_WARN_LAMP_TEST: u8 = 0x04;
pub const CMD_SET_EXAMPLE_OUT: u8 = 0x05;

pub const ACK: u8 = 0x01;

#[derive(Clone, Copy, PartialEq, Debug, defmt::Format)]
pub enum PowerCommand {
    PollTelemetry,
    SetVoltage(f32),
    SetCurrent(f32),
    SetInternalEnable(bool),
    SetWarnLampTest(bool),
    SetExampleOut(bool),
}

impl PowerCommand {
    pub fn parse(frame: &[u8]) -> Option<PowerCommand> {
        let (&id, payload) = frame.split_first()?;

        match id {
            CMD_POLL_TELEMETRY if payload.is_empty() => Some(PowerCommand::PollTelemetry),
            CMD_SET_VOLTAGE => Some(PowerCommand::SetVoltage(parse_f32(payload)?)),
            CMD_SET_CURRENT => Some(PowerCommand::SetCurrent(parse_f32(payload)?)),
            CMD_SET_INTERNAL_ENABLE => {
                Some(PowerCommand::SetInternalEnable(parse_bool(payload)?))
            }
            CMD_SET_WARN_LAMP_TEST => Some(PowerCommand::SetWarnLampTest(parse_bool(payload)?)),
            CMD_SET_EXAMPLE_OUT => Some(PowerCommand::SetExampleOut(parse_bool(payload)?)),
            _ => None,
        }
    }

    /// Applies the command to the shared state. Always succeeds; the returned
    /// acknowledgment is unconditionally `true`.
    pub fn apply(self, state: &SharedPowerState) -> bool {
        match self {
            PowerCommand::PollTelemetry => {}
            PowerCommand::SetVoltage(volts) => {
                state.set_set_voltage(if volts < 0.0 { 0.0 } else { volts });
            }
            PowerCommand::SetCurrent(amps) => {
                state.set_set_current(if amps < 0.0 { 0.0 } else { amps });
            }
            PowerCommand::SetInternalEnable(enable) => state.set_internal_enable(enable),
            PowerCommand::SetWarnLampTest(test_active) => state.set_warn_lamp_test(test_active),
            PowerCommand::SetExampleOut(out_active) => state.set_example_out(out_active),
        }

        true
    }
}

/// Total frame length (id byte included) for a command id. Frames are
/// self-delimiting, so several may arrive in one uart chunk.
pub fn frame_len(id: u8) -> Option<usize> {
    match id {
        CMD_POLL_TELEMETRY => Some(1),
        CMD_SET_VOLTAGE | CMD_SET_CURRENT => Some(5),
        CMD_SET_INTERNAL_ENABLE | CMD_SET_WARN_LAMP_TEST | CMD_SET_EXAMPLE_OUT => Some(2),
        _ => None,
    }
}

fn parse_f32(payload: &[u8]) -> Option<f32> {
    let bytes: [u8; 4] = payload.try_into().ok()?;
    Some(f32::from_le_bytes(bytes))
}

fn parse_bool(payload: &[u8]) -> Option<bool> {
    match payload {
        [b] => Some(*b != 0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_setpoint_frames() {
        let mut frame = [CMD_SET_VOLTAGE, 0, 0, 0, 0];
        frame[1..].copy_from_slice(&12.5f32.to_le_bytes());
        assert_eq!(
            PowerCommand::parse(&frame),
            Some(PowerCommand::SetVoltage(12.5))
        );
    }

    #[test]
    fn parses_flag_and_poll_frames() {
        assert_eq!(
            PowerCommand::parse(&[CMD_SET_INTERNAL_ENABLE, 1]),
            Some(PowerCommand::SetInternalEnable(true))
        );
        assert_eq!(
            PowerCommand::parse(&[CMD_SET_EXAMPLE_OUT, 0]),
            Some(PowerCommand::SetExampleOut(false))
        );
        assert_eq!(
            PowerCommand::parse(&[CMD_POLL_TELEMETRY]),
            Some(PowerCommand::PollTelemetry)
        );
    }

    #[test]
    fn rejects_malformed_frames() {
        assert_eq!(PowerCommand::parse(&[]), None);
        assert_eq!(PowerCommand::parse(&[0xFF, 1]), None);
        // truncated payload
        assert_eq!(PowerCommand::parse(&[CMD_SET_CURRENT, 1, 2]), None);
        // trailing bytes on a poll
        assert_eq!(PowerCommand::parse(&[CMD_POLL_TELEMETRY, 9]), None);
    }

    #[test]
    fn frame_lengths_match_parsers() {
        assert_eq!(frame_len(CMD_POLL_TELEMETRY), Some(1));
        assert_eq!(frame_len(CMD_SET_VOLTAGE), Some(5));
        assert_eq!(frame_len(CMD_SET_WARN_LAMP_TEST), Some(2));
        assert_eq!(frame_len(0xFF), None);
    }

    #[test]
    fn negative_setpoints_clamp_to_zero() {
        let state = SharedPowerState::new();

        assert!(PowerCommand::SetVoltage(-3.0).apply(&state));
        assert!(PowerCommand::SetCurrent(-0.1).apply(&state));
        assert_eq!(state.get_set_voltage(), 0.0);
        assert_eq!(state.get_set_current(), 0.0);
    }

    #[test]
    fn flags_write_through_and_always_ack() {
        let state = SharedPowerState::new();

        assert!(PowerCommand::SetInternalEnable(true).apply(&state));
        assert!(PowerCommand::SetWarnLampTest(true).apply(&state));
        assert!(PowerCommand::SetExampleOut(true).apply(&state));

        assert!(state.get_internal_enable());
        assert!(state.get_warn_lamp_test());
        assert!(state.get_example_out());

        // output enable is derived, never commanded
        assert!(!state.get_output_enabled());
    }
}
