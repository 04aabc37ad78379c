#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::{
    adc::{Adc, AdcChannel, SampleTime},
    gpio::{Level, Output, OutputType, Speed},
    time::hz,
    timer::{low_level::CountingMode, simple_pwm::{PwmPin, SimplePwm}},
};
use embassy_time::Timer;
use {defmt_rtt as _, panic_probe as _};

use psu_carrier_board::adc_raw_to_v;
use psu_carrier_board::config::GAUGE_CARRIER_FREQUENCY_HZ;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_stm32::init(Default::default());
    info!("Hello World!");

    let mut user_led = Output::new(p.PC6, Level::High, Speed::Low);

    let mut adc = Adc::new(p.ADC1);
    let mut adc_dma = p.DMA1_CH1;
    let mut voltage_probe_pin = p.PA0.degrade_adc();
    let mut current_probe_pin = p.PA1.degrade_adc();
    let mut adc_buf: [u16; 2] = [0; 2];

    // sweep both gauges so a multimeter on PB4/PB5 shows the carrier
    let ch1 = PwmPin::new_ch1(p.PB4, OutputType::PushPull);
    let ch2 = PwmPin::new_ch2(p.PB5, OutputType::PushPull);
    let pwm = SimplePwm::new(
        p.TIM3,
        Some(ch1),
        Some(ch2),
        None,
        None,
        hz(GAUGE_CARRIER_FREQUENCY_HZ),
        CountingMode::CenterAlignedBothInterrupts,
    );
    let channels = pwm.split();
    let mut voltage_gauge = channels.ch1;
    let mut current_gauge = channels.ch2;
    voltage_gauge.enable();
    current_gauge.enable();

    let mut sweep: u16 = 0;
    loop {
        adc.read(
            &mut adc_dma,
            [
                (&mut voltage_probe_pin, SampleTime::CYCLES160_5),
                (&mut current_probe_pin, SampleTime::CYCLES160_5),
            ]
            .into_iter(),
            &mut adc_buf,
        )
        .await;

        info!(
            "voltage probe: {} V, current probe: {} V",
            adc_raw_to_v(adc_buf[0]),
            adc_raw_to_v(adc_buf[1])
        );

        let max_duty = voltage_gauge.max_duty_cycle();
        let duty = (max_duty as u32 * sweep as u32 / 10) as u16;
        voltage_gauge.set_duty_cycle(duty);
        current_gauge.set_duty_cycle(max_duty - duty);
        sweep = (sweep + 1) % 11;

        user_led.toggle();
        Timer::after_millis(500).await;
    }
}
