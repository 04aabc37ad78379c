#![no_std]

use embassy_stm32::{bind_interrupts, peripherals, usart};

bind_interrupts!(pub struct SystemIrqs {
    USART1 => usart::InterruptHandler<peripherals::USART1>;
});

pub mod commands;
pub mod conditioner;
pub mod config;
pub mod drivers;
pub mod enable_control;
pub mod filter;
pub mod math;
pub mod pins;
pub mod power_state;
pub mod tasks;
pub mod telemetry;

const ADC_VREF_EXT: f32 = 3.3;
const ADC_FULL_SCALE: f32 = 4095.0;

pub const fn adc_raw_to_v(sample: u16) -> f32 {
    (sample as f32 / ADC_FULL_SCALE) * ADC_VREF_EXT
}

pub fn adc_raw_to_temperature_c(sample: u16) -> f32 {
    // From https://www.st.com/resource/en/datasheet/stm32g031g8.pdf
    // 6.3.15 Temperature sensor characteristics
    const TEMP_SENSOR_V_AT_30C: f32 = 0.760; // V
    const TEMP_SENSOR_SLOPE_V_PER_C: f32 = 0.0025; // V/degC

    (adc_raw_to_v(sample) - TEMP_SENSOR_V_AT_30C) / TEMP_SENSOR_SLOPE_V_PER_C + 30.0
}
