use libm::{fmaxf, fminf};

use crate::filter::{ExponentialFilter, Filter};
use crate::math::Range;

const UNIT_RANGE: Range<f32> = Range::new(0.0, 1.0);

/// Linear calibration of one analog sense channel.
///
/// Raw ADC codes convert to physical units as
/// `(raw / full_scale * vref - mid_ref) * scale + offset`, which is affine
/// and monotonic in the raw code.
pub struct ChannelCalibration {
    pub full_scale_counts: f32,
    pub reference_volts: f32,
    pub mid_reference_volts: f32,
    pub scale: f32,
    pub offset: f32,
}

impl ChannelCalibration {
    pub fn convert(&self, raw: u16) -> f32 {
        let vin = (raw as f32 / self.full_scale_counts) * self.reference_volts;

        (vin - self.mid_reference_volts) * self.scale + self.offset
    }
}

/// One sense channel: calibration, smoothing, and the mapping from the
/// filtered measurement to a normalized gauge duty cycle.
///
/// The conditioner consumes raw codes handed in by the caller, so a test
/// harness can feed deterministic samples without any hardware wiring.
pub struct SignalConditioner {
    calibration: ChannelCalibration,
    filter: ExponentialFilter,
    gauge_range: Range<f32>,
}

impl SignalConditioner {
    pub const fn new(calibration: ChannelCalibration, gauge_range: Range<f32>) -> Self {
        Self {
            calibration,
            filter: ExponentialFilter::new(0.9),
            gauge_range,
        }
    }

    /// Converts and filters one raw sample, returning the value to publish.
    /// The first sample after reset seeds the filter with no transient.
    pub fn ingest(&mut self, raw: u16) -> f32 {
        let sample = self.calibration.convert(raw);
        self.filter.add_sample(sample);

        // add_sample never leaves the filter unseeded
        self.filter.filtered_value().unwrap_or(sample)
    }

    /// Normalized gauge duty for a filtered measurement, clamped to [0, 1].
    pub fn gauge_duty(&self, filtered: f32) -> f32 {
        let duty = self.gauge_range.map_value_to_range(filtered, &UNIT_RANGE);

        fminf(fmaxf(duty, 0.0), 1.0)
    }

    pub fn reset(&mut self) {
        self.filter.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CURRENT_PROBE_CALIBRATION, VOLTAGE_PROBE_CALIBRATION};

    fn current_conditioner() -> SignalConditioner {
        SignalConditioner::new(CURRENT_PROBE_CALIBRATION, Range::new(-4250.0, 4250.0))
    }

    #[test]
    fn conversion_is_affine_and_monotonic() {
        let cal = CURRENT_PROBE_CALIBRATION;

        let lo = cal.convert(0);
        let mid = cal.convert(2048);
        let hi = cal.convert(4095);
        assert!(lo < mid && mid < hi);

        // affine: equal code steps give equal value steps
        let step_a = cal.convert(1000) - cal.convert(500);
        let step_b = cal.convert(1500) - cal.convert(1000);
        assert!(libm::fabsf(step_a - step_b) < 1e-5);
    }

    #[test]
    fn midscale_code_reads_near_zero_current() {
        // raw 2048 of 4095 at 3.3 V vref sits 0.81 mV above the 1.65 V bias
        let sample = CURRENT_PROBE_CALIBRATION.convert(2048);
        assert!(libm::fabsf(sample - 0.00081) < 0.0001);
    }

    #[test]
    fn first_sample_publishes_unfiltered() {
        let mut cond = current_conditioner();
        let expected = CURRENT_PROBE_CALIBRATION.convert(2048);
        assert_eq!(cond.ingest(2048), expected);
    }

    #[test]
    fn later_samples_are_smoothed() {
        let mut cond = current_conditioner();
        let first = cond.ingest(1000);
        let second = cond.ingest(3000);

        let raw_second = CURRENT_PROBE_CALIBRATION.convert(3000);
        assert!(second > first && second < raw_second);

        let expected = 0.9 * first + 0.1 * raw_second;
        assert!(libm::fabsf(second - expected) < 1e-6);
    }

    #[test]
    fn gauge_duty_always_in_unit_range() {
        let cond = current_conditioner();
        for filtered in [-1.0e6, -4250.0, 0.0, 4250.0, 1.0e6] {
            let duty = cond.gauge_duty(filtered);
            assert!((0.0..=1.0).contains(&duty));
        }
        assert!(libm::fabsf(cond.gauge_duty(0.0) - 0.5) < 1e-6);
    }

    #[test]
    fn voltage_gauge_maps_full_scale() {
        let cond =
            SignalConditioner::new(VOLTAGE_PROBE_CALIBRATION, Range::new(0.0, 100.0));
        assert_eq!(cond.gauge_duty(0.0), 0.0);
        assert!(libm::fabsf(cond.gauge_duty(50.0) - 0.5) < 1e-6);
        assert!(libm::fabsf(cond.gauge_duty(100.0) - 1.0) < 1e-6);
        assert_eq!(cond.gauge_duty(120.0), 1.0);
    }
}
