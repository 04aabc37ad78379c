use embassy_stm32::peripherals::*;

///////////////////////
//  voltage monitor  //
///////////////////////

pub type VoltageProbeAdcPin = PA0;
pub type CurrentProbeAdcPin = PA1;

pub type ProbeAdc = ADC1;
pub type ProbeAdcDma = DMA1_CH1;

/////////////////////
//  gauge outputs  //
/////////////////////

pub type GaugeTimer = TIM3; // ch1 voltage, ch2 current
pub type VoltageGaugePwmPin = PB4;
pub type CurrentGaugePwmPin = PB5;

////////////////////
//  enable logic  //
////////////////////

pub type ExternalEnablePin = PA8;
pub type OutputEnablePin = PB0;
pub type WarnLampPin = PB1;
pub type ExampleOutPin = PA7;

///////////////
//  User IO  //
///////////////

pub type UserLedPin = PC6;

pub type ComsUart = USART1;
pub type ComsUartTxPin = PB6;
pub type ComsUartRxPin = PB7;
pub type ComsDmaTx = DMA1_CH2;
pub type ComsDmaRx = DMA1_CH3;
