//! Analog gauge driver: two duty-cycle outputs on one shared timer running a
//! fixed-frequency center-aligned carrier.

use embassy_stm32::timer::simple_pwm::{SimplePwm, SimplePwmChannel};
use embassy_stm32::timer::GeneralInstance4Channel;

use crate::config::{GAUGE_CARRIER_FREQUENCY_HZ, GAUGE_TIMER_CLOCK_HZ};

#[derive(Clone, Copy, PartialEq, Eq, Debug, defmt::Format)]
pub struct CarrierTiming {
    pub prescaler: u16,
    pub period: u16,
}

/// Solves for the smallest prescaler putting the center-aligned period
/// register of `carrier_hz` within 16 bits. A center-aligned counter counts
/// up then down, so one carrier cycle spans twice the period register.
pub fn solve_carrier(timer_clock_hz: u32, carrier_hz: u32) -> Option<CarrierTiming> {
    if carrier_hz == 0 {
        return None;
    }

    let total_period_ticks = timer_clock_hz / (2 * carrier_hz);

    let mut prescaler: u32 = 0;
    loop {
        let counts = total_period_ticks / (prescaler + 1);
        if counts == 0 {
            return None;
        }

        let period = counts - 1;
        if period <= u16::MAX as u32 {
            return Some(CarrierTiming {
                prescaler: prescaler as u16,
                period: period as u16,
            });
        }

        prescaler += 1;
        if prescaler > u16::MAX as u32 {
            return None;
        }
    }
}

/// Maps a normalized duty cycle to a compare-register count.
/// Inputs below 0 give 0 (output fully off); above 1, full scale.
pub fn duty_to_compare(duty_norm: f32, period: u16) -> u16 {
    if duty_norm <= 0.0 {
        return 0;
    }

    let dn = libm::fminf(duty_norm, 1.0);
    let compare = libm::roundf(dn * (period as f32 + 1.0)) as u32;

    if compare > period as u32 {
        period
    } else {
        compare as u16
    }
}

/// The two gauge outputs. Initialization is lazy and idempotent: whichever
/// conditioner runs first triggers it, later calls are no-ops. If the
/// carrier cannot be realized on this timer clock, the gauges silently stay
/// inert while sensing and telemetry continue.
pub struct GaugePwm<'d, T: GeneralInstance4Channel> {
    voltage_ch: SimplePwmChannel<'d, T>,
    current_ch: SimplePwmChannel<'d, T>,
    timing: Option<CarrierTiming>,
    initialized: bool,
}

impl<'d, T: GeneralInstance4Channel> GaugePwm<'d, T> {
    /// Takes a `SimplePwm` already configured for the carrier frequency in
    /// center-aligned mode, ch1 driving the voltage gauge and ch2 the
    /// current gauge.
    pub fn new(pwm: SimplePwm<'d, T>) -> Self
    where
        'd: 'static,
    {
        let channels = pwm.split();

        Self {
            voltage_ch: channels.ch1,
            current_ch: channels.ch2,
            timing: solve_carrier(GAUGE_TIMER_CLOCK_HZ, GAUGE_CARRIER_FREQUENCY_HZ),
            initialized: false,
        }
    }

    pub fn ensure_ready(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        match self.timing {
            Some(timing) => {
                self.voltage_ch.set_duty_cycle(0);
                self.current_ch.set_duty_cycle(0);
                self.voltage_ch.enable();
                self.current_ch.enable();
                defmt::info!("gauge carrier configured: {}", timing);
            }
            None => {
                defmt::warn!("gauge carrier unrealizable, gauge outputs disabled");
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.initialized && self.timing.is_some()
    }

    pub fn set_voltage_duty(&mut self, duty_norm: f32) {
        if let Some(timing) = self.ready_timing() {
            self.voltage_ch
                .set_duty_cycle(duty_to_compare(duty_norm, timing.period));
        }
    }

    pub fn set_current_duty(&mut self, duty_norm: f32) {
        if let Some(timing) = self.ready_timing() {
            self.current_ch
                .set_duty_cycle(duty_to_compare(duty_norm, timing.period));
        }
    }

    fn ready_timing(&self) -> Option<CarrierTiming> {
        if !self.initialized {
            return None;
        }

        self.timing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_without_prescaling_when_period_fits() {
        // 16 MHz / (2 * 10 kHz) = 800 counts
        let timing = solve_carrier(16_000_000, 10_000).unwrap();
        assert_eq!(timing.prescaler, 0);
        assert_eq!(timing.period, 799);
    }

    #[test]
    fn picks_smallest_fitting_prescaler() {
        // 200 MHz at 1 Hz needs division before the period fits 16 bits
        let timing = solve_carrier(200_000_000, 1).unwrap();
        assert!(timing.prescaler > 0);
        let counts = 200_000_000 / 2 / (timing.prescaler as u32 + 1);
        assert!(counts - 1 <= u16::MAX as u32);

        // one prescaler step lower must not fit
        let tighter = 200_000_000 / 2 / (timing.prescaler as u32);
        assert!(tighter - 1 > u16::MAX as u32);
    }

    #[test]
    fn rejects_unrealizable_carriers() {
        assert_eq!(solve_carrier(16_000_000, 0), None);
        // carrier faster than the timer clock can express
        assert_eq!(solve_carrier(100, 10_000), None);
    }

    #[test]
    fn duty_compare_clamps_to_period() {
        let period = 799;
        assert_eq!(duty_to_compare(-0.5, period), 0);
        assert_eq!(duty_to_compare(0.0, period), 0);
        assert_eq!(duty_to_compare(0.5, period), 400);
        assert_eq!(duty_to_compare(1.0, period), period);
        assert_eq!(duty_to_compare(2.0, period), period);
    }
}
