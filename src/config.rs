// Variable naming scheme
// "probe" values are measured by this board and reported to the host
// "set" values are commanded by the host and never written locally

use crate::conditioner::ChannelCalibration;
use crate::math::Range;

//////////////////////////////
//  channel calibration     //
//////////////////////////////

// Identity calibration for board bring-up. Replace with per-unit values
// once the sense dividers have been characterized.
pub const VOLTAGE_PROBE_SCALE: f32 = 1.0;
pub const VOLTAGE_PROBE_OFFSET: f32 = 0.0;
pub const CURRENT_PROBE_SCALE: f32 = 1.0;
pub const CURRENT_PROBE_OFFSET: f32 = 0.0;

pub const ADC_FULL_SCALE_COUNTS: f32 = 4095.0;
pub const ADC_REFERENCE_V: f32 = 3.3;

// The current sensor is a bidirectional hall type biased at half rail.
pub const CURRENT_PROBE_MID_REFERENCE_V: f32 = 1.65;
pub const VOLTAGE_PROBE_MID_REFERENCE_V: f32 = 0.0;

pub const VOLTAGE_PROBE_CALIBRATION: ChannelCalibration = ChannelCalibration {
    full_scale_counts: ADC_FULL_SCALE_COUNTS,
    reference_volts: ADC_REFERENCE_V,
    mid_reference_volts: VOLTAGE_PROBE_MID_REFERENCE_V,
    scale: VOLTAGE_PROBE_SCALE,
    offset: VOLTAGE_PROBE_OFFSET,
};

pub const CURRENT_PROBE_CALIBRATION: ChannelCalibration = ChannelCalibration {
    full_scale_counts: ADC_FULL_SCALE_COUNTS,
    reference_volts: ADC_REFERENCE_V,
    mid_reference_volts: CURRENT_PROBE_MID_REFERENCE_V,
    scale: CURRENT_PROBE_SCALE,
    offset: CURRENT_PROBE_OFFSET,
};

//////////////////////////////
//  gauge output mapping    //
//////////////////////////////

// Full-scale value displayed on the voltage gauge.
pub const VOLTAGE_GAUGE_FULL_SCALE: f32 = 100.0;
pub const VOLTAGE_GAUGE_RANGE: Range<f32> = Range::new(0.0, VOLTAGE_GAUGE_FULL_SCALE);

// The current gauge is center-zero, needle deflects both ways.
pub const CURRENT_GAUGE_RANGE: Range<f32> = Range::new(-4250.0, 4250.0);

pub const GAUGE_CARRIER_FREQUENCY_HZ: u32 = 10_000;

// TIM3 runs off the APB clock, 16 MHz HSI out of reset on the G031.
pub const GAUGE_TIMER_CLOCK_HZ: u32 = 16_000_000;

//////////////////////////////
//  timing and thresholds   //
//////////////////////////////

pub const CONTROL_LOOP_INTERVAL_MS: u64 = 10;

pub const DEBOUNCE_DELAY_US: u64 = 1000;

pub const WARN_BLINK_INTERVAL_MS: u32 = 5000;
pub const WARN_VOLTAGE_THRESHOLD: f32 = 50.0;
