use crate::config::{WARN_BLINK_INTERVAL_MS, WARN_VOLTAGE_THRESHOLD};
use crate::power_state::SharedPowerState;

/// Level debouncer for the external enable input.
///
/// A level change is accepted only once the raw input has held the new level
/// unchanged for the configured delay. Until then the previously accepted
/// level is retained. Timestamps are supplied by the caller so the logic
/// stays hardware-free.
pub struct Debouncer {
    delay_us: u64,
    accepted: bool,
    last_raw: bool,
    last_change_us: u64,
}

impl Debouncer {
    pub const fn new(initial_level: bool, delay_us: u64) -> Self {
        Self {
            delay_us,
            accepted: initial_level,
            last_raw: initial_level,
            last_change_us: 0,
        }
    }

    pub fn update(&mut self, raw_level: bool, now_us: u64) -> bool {
        if raw_level != self.last_raw {
            self.last_raw = raw_level;
            self.last_change_us = now_us;
        }

        if raw_level != self.accepted
            && now_us.wrapping_sub(self.last_change_us) >= self.delay_us
        {
            self.accepted = raw_level;
        }

        self.accepted
    }

    pub fn level(&self) -> bool {
        self.accepted
    }
}

/// The authoritative output-enable state, recomputed every control cycle.
pub fn derive_output_enable(internal_enable: bool, debounced_external_enable: bool) -> bool {
    internal_enable && debounced_external_enable
}

/// Advances the warning lamp for one control cycle and returns the level to
/// drive onto the lamp pin.
///
/// The lamp is active (blinking) whenever the measured output voltage is
/// above the warning threshold or a lamp test is commanded. While inactive
/// the lamp is forced off and the blink timer does not advance.
pub fn warn_lamp_step(state: &SharedPowerState, now_ms: u32) -> bool {
    let active = state.get_probe_voltage_output() > WARN_VOLTAGE_THRESHOLD
        || state.get_warn_lamp_test();

    if !active {
        state.set_warn_lamp_on(false);
        return false;
    }

    if now_ms.wrapping_sub(state.get_last_warn_blink_time_ms()) >= WARN_BLINK_INTERVAL_MS {
        state.set_warn_lamp_on(!state.get_warn_lamp_on());
        state.set_last_warn_blink_time_ms(now_ms);
    }

    state.get_warn_lamp_on()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEBOUNCE_DELAY_US;

    #[test]
    fn short_glitches_are_rejected() {
        let mut deb = Debouncer::new(false, DEBOUNCE_DELAY_US);

        assert!(!deb.update(true, 0));
        assert!(!deb.update(true, DEBOUNCE_DELAY_US / 2));
        // level dropped back before the delay elapsed
        assert!(!deb.update(false, DEBOUNCE_DELAY_US / 2 + 1));
        assert!(!deb.update(false, DEBOUNCE_DELAY_US * 10));
    }

    #[test]
    fn stable_level_is_accepted_after_delay() {
        let mut deb = Debouncer::new(false, DEBOUNCE_DELAY_US);

        assert!(!deb.update(true, 1000));
        assert!(!deb.update(true, 1000 + DEBOUNCE_DELAY_US - 1));
        assert!(deb.update(true, 1000 + DEBOUNCE_DELAY_US));
        // and back again
        assert!(deb.update(false, 5000));
        assert!(!deb.update(false, 5000 + DEBOUNCE_DELAY_US));
    }

    #[test]
    fn output_enable_truth_table() {
        assert!(!derive_output_enable(false, false));
        assert!(!derive_output_enable(false, true));
        assert!(!derive_output_enable(true, false));
        assert!(derive_output_enable(true, true));
    }

    #[test]
    fn lamp_off_when_inactive() {
        let state = SharedPowerState::new();
        state.set_probe_voltage_output(WARN_VOLTAGE_THRESHOLD - 1.0);

        assert!(!warn_lamp_step(&state, 0));
        assert!(!state.get_warn_lamp_on());
    }

    #[test]
    fn lamp_blinks_on_overvoltage() {
        let state = SharedPowerState::new();
        state.set_probe_voltage_output(WARN_VOLTAGE_THRESHOLD + 5.0);

        // first step past the interval toggles on
        assert!(warn_lamp_step(&state, WARN_BLINK_INTERVAL_MS));
        // within the interval the lamp holds
        assert!(warn_lamp_step(&state, WARN_BLINK_INTERVAL_MS + 10));
        // next interval boundary toggles off
        assert!(!warn_lamp_step(&state, 2 * WARN_BLINK_INTERVAL_MS));
    }

    #[test]
    fn lamp_test_forces_activity() {
        let state = SharedPowerState::new();
        state.set_warn_lamp_test(true);

        assert!(warn_lamp_step(&state, WARN_BLINK_INTERVAL_MS));

        state.set_warn_lamp_test(false);
        assert!(!warn_lamp_step(&state, WARN_BLINK_INTERVAL_MS + 10));
    }

    #[test]
    fn blink_timer_does_not_advance_while_inactive() {
        let state = SharedPowerState::new();
        state.set_probe_voltage_output(WARN_VOLTAGE_THRESHOLD + 5.0);
        assert!(warn_lamp_step(&state, WARN_BLINK_INTERVAL_MS));

        state.set_probe_voltage_output(0.0);
        assert!(!warn_lamp_step(&state, 3 * WARN_BLINK_INTERVAL_MS));
        // timer still holds the last active toggle time
        assert_eq!(state.get_last_warn_blink_time_ms(), WARN_BLINK_INTERVAL_MS);
    }
}
