use embassy_executor::Spawner;
use embassy_stm32::{
    adc::{Adc, AdcChannel, SampleTime},
    gpio::{Input, Level, Output, OutputType, Pull, Speed},
    time::hz,
    timer::{low_level::CountingMode, simple_pwm::{PwmPin, SimplePwm}},
};
use embassy_time::{Duration, Instant, Ticker};

use crate::{
    adc_raw_to_temperature_c,
    conditioner::SignalConditioner,
    config::{
        CONTROL_LOOP_INTERVAL_MS, CURRENT_GAUGE_RANGE, CURRENT_PROBE_CALIBRATION,
        DEBOUNCE_DELAY_US, GAUGE_CARRIER_FREQUENCY_HZ, VOLTAGE_GAUGE_RANGE,
        VOLTAGE_PROBE_CALIBRATION,
    },
    drivers::gauge::GaugePwm,
    enable_control::{derive_output_enable, warn_lamp_step, Debouncer},
    pins::*,
    power_state::SharedPowerState,
};

#[macro_export]
macro_rules! create_control_task {
    ($spawner:ident, $p:ident, $state:ident) => {
        psu_carrier_board::tasks::control_task::start_control_task(
            &$spawner,
            $state,
            $p.ADC1,
            $p.DMA1_CH1,
            $p.PA0,
            $p.PA1,
            $p.TIM3,
            $p.PB4,
            $p.PB5,
            $p.PA8,
            $p.PB0,
            $p.PB1,
            $p.PA7,
        )
        .await;
    };
}

#[embassy_executor::task]
async fn control_task_entry(
    state: &'static SharedPowerState,
    adc: ProbeAdc,
    mut adc_dma: ProbeAdcDma,
    voltage_probe_pin: VoltageProbeAdcPin,
    current_probe_pin: CurrentProbeAdcPin,
    gauge_timer: GaugeTimer,
    voltage_gauge_pin: VoltageGaugePwmPin,
    current_gauge_pin: CurrentGaugePwmPin,
    external_enable_pin: ExternalEnablePin,
    output_enable_pin: OutputEnablePin,
    warn_lamp_pin: WarnLampPin,
    example_out_pin: ExampleOutPin,
) {
    /////////////////
    //  ADC setup  //
    /////////////////

    let mut adc = Adc::new(adc);
    let mut voltage_probe_pin = voltage_probe_pin.degrade_adc();
    let mut current_probe_pin = current_probe_pin.degrade_adc();
    let mut temperature_channel = adc.enable_temperature().degrade_adc();

    let mut adc_raw_samples: [u16; 3] = [0; 3];

    ///////////////////////////
    //  gauge output setup   //
    ///////////////////////////

    let voltage_gauge_pwm_pin = PwmPin::new_ch1(voltage_gauge_pin, OutputType::PushPull);
    let current_gauge_pwm_pin = PwmPin::new_ch2(current_gauge_pin, OutputType::PushPull);
    let gauge_pwm = SimplePwm::new(
        gauge_timer,
        Some(voltage_gauge_pwm_pin),
        Some(current_gauge_pwm_pin),
        None,
        None,
        hz(GAUGE_CARRIER_FREQUENCY_HZ),
        CountingMode::CenterAlignedBothInterrupts,
    );
    let mut gauge = GaugePwm::new(gauge_pwm);

    //////////////////////////////
    //  enable logic and lamps  //
    //////////////////////////////

    let external_enable_input = Input::new(external_enable_pin, Pull::Down);
    let mut output_enable_out = Output::new(output_enable_pin, Level::Low, Speed::Low);
    let mut warn_lamp_out = Output::new(warn_lamp_pin, Level::Low, Speed::Low);
    let mut example_out = Output::new(example_out_pin, Level::Low, Speed::Low);

    let mut external_enable_debounce = Debouncer::new(false, DEBOUNCE_DELAY_US);

    let mut voltage_conditioner =
        SignalConditioner::new(VOLTAGE_PROBE_CALIBRATION, VOLTAGE_GAUGE_RANGE);
    let mut current_conditioner =
        SignalConditioner::new(CURRENT_PROBE_CALIBRATION, CURRENT_GAUGE_RANGE);

    let mut loop_ticker = Ticker::every(Duration::from_millis(CONTROL_LOOP_INTERVAL_MS));

    loop {
        //////////////////////////////////////
        //  read and condition the sensors  //
        //////////////////////////////////////

        let probe_read_seq = [
            (&mut voltage_probe_pin, SampleTime::CYCLES160_5),
            (&mut current_probe_pin, SampleTime::CYCLES160_5),
            (&mut temperature_channel, SampleTime::CYCLES160_5),
        ]
        .into_iter();
        adc.read(&mut adc_dma, probe_read_seq, &mut adc_raw_samples).await;

        let probe_voltage = voltage_conditioner.ingest(adc_raw_samples[0]);
        let probe_current = current_conditioner.ingest(adc_raw_samples[1]);

        // measurements publish whether or not the gauges came up
        state.set_probe_voltage_output(probe_voltage);
        state.set_probe_current(probe_current);
        state.set_probe_internal_temperature(adc_raw_to_temperature_c(adc_raw_samples[2]));

        gauge.ensure_ready();
        gauge.set_voltage_duty(voltage_conditioner.gauge_duty(probe_voltage));
        gauge.set_current_duty(current_conditioner.gauge_duty(probe_current));

        ////////////////////
        //  enable logic  //
        ////////////////////

        let now = Instant::now();

        let external_enable =
            external_enable_debounce.update(external_enable_input.is_high(), now.as_micros());
        state.set_external_enable(external_enable);

        let output_enabled =
            derive_output_enable(state.get_internal_enable(), external_enable);
        state.set_output_enabled(output_enabled);
        if output_enabled {
            output_enable_out.set_high();
        } else {
            output_enable_out.set_low();
        }

        if warn_lamp_step(state, now.as_millis() as u32) {
            warn_lamp_out.set_high();
        } else {
            warn_lamp_out.set_low();
        }

        if state.get_example_out() {
            example_out.set_high();
        } else {
            example_out.set_low();
        }

        loop_ticker.next().await;
    }
}

pub async fn start_control_task(
    spawner: &Spawner,
    state: &'static SharedPowerState,
    adc: ProbeAdc,
    adc_dma: ProbeAdcDma,
    voltage_probe_pin: VoltageProbeAdcPin,
    current_probe_pin: CurrentProbeAdcPin,
    gauge_timer: GaugeTimer,
    voltage_gauge_pin: VoltageGaugePwmPin,
    current_gauge_pin: CurrentGaugePwmPin,
    external_enable_pin: ExternalEnablePin,
    output_enable_pin: OutputEnablePin,
    warn_lamp_pin: WarnLampPin,
    example_out_pin: ExampleOutPin,
) {
    spawner
        .spawn(control_task_entry(
            state,
            adc,
            adc_dma,
            voltage_probe_pin,
            current_probe_pin,
            gauge_timer,
            voltage_gauge_pin,
            current_gauge_pin,
            external_enable_pin,
            output_enable_pin,
            warn_lamp_pin,
            example_out_pin,
        ))
        .expect("failed to spawn control task");
}
