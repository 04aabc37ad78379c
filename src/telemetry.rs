//! Packed-word telemetry codec for the host link.
//!
//! Every poll produces one 64-bit word. Successive polls alternate between
//! two layouts, distinguished by the id bit. This module is the single
//! source of truth for the layout; encode and decode share the constants
//! below.
//!
//! Packet 0 (id = 0), measurements:
//!
//! | bits    | field                                  |
//! |---------|----------------------------------------|
//! | 63      | packet id (0)                          |
//! | 62:58   | flag bundle (bit 58 = external enable) |
//! | 57:38   | probe_voltage_output x100, s20         |
//! | 37:18   | probe_current x100, s20                |
//! | 17:0    | reserved (zero)                        |
//!
//! Packet 1 (id = 1), setpoints:
//!
//! | bits    | field                                  |
//! |---------|----------------------------------------|
//! | 63      | packet id (1)                          |
//! | 62:43   | set_current x100, s20                  |
//! | 42:23   | internal temperature x100, s20         |
//! | 22:0    | reserved (zero)                        |
//!
//! "s20" fields are two's-complement truncated to 20 bits; the packer never
//! sign-extends, the receiver must. Values outside the representable range
//! clamp silently to the nearest extreme.

use crate::power_state::SharedPowerState;

pub const PACKET_ID_SHIFT: u32 = 63;

pub const SIGNED_FIELD_BITS: u32 = 20;
pub const SIGNED_FIELD_MAX: i32 = (1 << (SIGNED_FIELD_BITS - 1)) - 1;
pub const SIGNED_FIELD_MIN: i32 = -(1 << (SIGNED_FIELD_BITS - 1));
pub const FIELD_SCALE: f32 = 100.0;

pub const P0_FLAGS_SHIFT: u32 = 58;
pub const P0_FLAGS_MASK: u64 = 0x1F;
pub const P0_FLAG_EXTERNAL_ENABLE: u64 = 1 << 0;
pub const P0_VOLTAGE_SHIFT: u32 = 38;
pub const P0_CURRENT_SHIFT: u32 = 18;

pub const P1_SET_CURRENT_SHIFT: u32 = 43;
pub const P1_TEMPERATURE_SHIFT: u32 = 23;

const FIELD_MASK: u64 = (1 << SIGNED_FIELD_BITS) - 1;

/// Scales by 100, rounds to nearest, clamps to the 20-bit signed range, and
/// truncates to the low 20 bits.
pub fn encode_scaled(value: f32) -> u64 {
    let scaled = libm::roundf(value * FIELD_SCALE) as i32;
    let clamped = scaled.clamp(SIGNED_FIELD_MIN, SIGNED_FIELD_MAX);

    (clamped as u32 as u64) & FIELD_MASK
}

/// Sign-extends a 20-bit field and removes the x100 scaling.
pub fn decode_scaled(field: u64) -> f32 {
    let raw = (field & FIELD_MASK) as u32;
    let shift = 32 - SIGNED_FIELD_BITS;
    let extended = ((raw << shift) as i32) >> shift;

    extended as f32 / FIELD_SCALE
}

/// Outbound packer. The alternation toggle is the protocol's only session
/// state; the first poll after reset always yields packet 0.
pub struct TelemetryPacker {
    send_measurement_packet: bool,
}

impl TelemetryPacker {
    pub const fn new() -> Self {
        Self {
            send_measurement_packet: true,
        }
    }

    pub fn pack_next(&mut self, state: &SharedPowerState) -> u64 {
        let mut word: u64 = 0;

        if self.send_measurement_packet {
            let mut flags: u64 = 0;
            if state.get_external_enable() {
                flags |= P0_FLAG_EXTERNAL_ENABLE;
            }

            word |= (flags & P0_FLAGS_MASK) << P0_FLAGS_SHIFT;
            word |= encode_scaled(state.get_probe_voltage_output()) << P0_VOLTAGE_SHIFT;
            word |= encode_scaled(state.get_probe_current()) << P0_CURRENT_SHIFT;
        } else {
            word |= 1u64 << PACKET_ID_SHIFT;
            word |= encode_scaled(state.get_set_current()) << P1_SET_CURRENT_SHIFT;
            word |= encode_scaled(state.get_probe_internal_temperature())
                << P1_TEMPERATURE_SHIFT;
        }

        self.send_measurement_packet = !self.send_measurement_packet;

        word
    }
}

impl Default for TelemetryPacker {
    fn default() -> Self {
        Self::new()
    }
}

/// Host-side view of one received word.
#[derive(Clone, Copy, PartialEq, Debug, defmt::Format)]
pub enum TelemetryFrame {
    Measurements {
        external_enable: bool,
        probe_voltage_output: f32,
        probe_current: f32,
    },
    Setpoints {
        set_current: f32,
        internal_temperature: f32,
    },
}

pub fn decode(word: u64) -> TelemetryFrame {
    if word >> PACKET_ID_SHIFT == 0 {
        let flags = (word >> P0_FLAGS_SHIFT) & P0_FLAGS_MASK;
        TelemetryFrame::Measurements {
            external_enable: flags & P0_FLAG_EXTERNAL_ENABLE != 0,
            probe_voltage_output: decode_scaled(word >> P0_VOLTAGE_SHIFT),
            probe_current: decode_scaled(word >> P0_CURRENT_SHIFT),
        }
    } else {
        TelemetryFrame::Setpoints {
            set_current: decode_scaled(word >> P1_SET_CURRENT_SHIFT),
            internal_temperature: decode_scaled(word >> P1_TEMPERATURE_SHIFT),
        }
    }
}
