#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_probe as _;

#[defmt_test::tests]
mod tests {
    use psu_carrier_board::power_state::SharedPowerState;
    use psu_carrier_board::telemetry::{
        decode, TelemetryFrame, TelemetryPacker, PACKET_ID_SHIFT,
    };

    #[test]
    fn alternation_starts_at_packet_zero() {
        let state = SharedPowerState::new();
        let mut packer = TelemetryPacker::new();

        defmt::assert_eq!(packer.pack_next(&state) >> PACKET_ID_SHIFT, 0);
        defmt::assert_eq!(packer.pack_next(&state) >> PACKET_ID_SHIFT, 1);
        defmt::assert_eq!(packer.pack_next(&state) >> PACKET_ID_SHIFT, 0);
    }

    #[test]
    fn measurement_word_round_trips() {
        let state = SharedPowerState::new();
        state.set_probe_voltage_output(12.34);
        state.set_probe_current(-56.78);
        state.set_external_enable(true);

        let mut packer = TelemetryPacker::new();
        let word = packer.pack_next(&state);

        match decode(word) {
            TelemetryFrame::Measurements {
                external_enable,
                probe_voltage_output,
                probe_current,
            } => {
                defmt::assert!(external_enable);
                defmt::assert!(libm::fabsf(probe_voltage_output - 12.34) < 0.005);
                defmt::assert!(libm::fabsf(probe_current + 56.78) < 0.005);
            }
            _ => defmt::panic!("expected measurement frame"),
        }
    }
}
