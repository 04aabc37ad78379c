use embassy_executor::Spawner;
use embassy_stm32::usart::{self, Uart};
use heapless::Vec;

use crate::{
    commands::{frame_len, PowerCommand},
    pins::*,
    power_state::SharedPowerState,
    telemetry::TelemetryPacker,
    SystemIrqs,
};

// largest inbound frame is a setpoint (id + f32)
const MAX_RX_CHUNK_SIZE: usize = 32;
const MAX_TX_CHUNK_SIZE: usize = 32;

#[macro_export]
macro_rules! create_coms_task {
    ($spawner:ident, $p:ident, $state:ident) => {
        psu_carrier_board::tasks::coms_task::start_coms_task(
            &$spawner,
            $state,
            $p.USART1,
            $p.PB7,
            $p.PB6,
            $p.DMA1_CH2,
            $p.DMA1_CH3,
        )
        .await;
    };
}

#[embassy_executor::task]
async fn coms_task_entry(
    state: &'static SharedPowerState,
    uart: ComsUart,
    uart_rx_pin: ComsUartRxPin,
    uart_tx_pin: ComsUartTxPin,
    uart_tx_dma: ComsDmaTx,
    uart_rx_dma: ComsDmaRx,
) {
    let uart_config = usart::Config::default();
    let mut uart = Uart::new(
        uart,
        uart_rx_pin,
        uart_tx_pin,
        SystemIrqs,
        uart_tx_dma,
        uart_rx_dma,
        uart_config,
    )
    .unwrap();

    // the packet alternation toggle lives here for the life of the link
    let mut packer = TelemetryPacker::new();

    let mut rx_buf = [0u8; MAX_RX_CHUNK_SIZE];
    let mut tx_buf: Vec<u8, MAX_TX_CHUNK_SIZE> = Vec::new();

    loop {
        let len = match uart.read_until_idle(&mut rx_buf).await {
            Ok(len) => len,
            Err(err) => {
                defmt::warn!("coms uart read error: {}", err);
                continue;
            }
        };

        // frames are self-delimiting by command id; one idle chunk may
        // carry several back to back
        tx_buf.clear();
        let mut chunk = &rx_buf[..len];
        while let Some((&id, _)) = chunk.split_first() {
            let frame_size = match frame_len(id) {
                Some(frame_size) if frame_size <= chunk.len() => frame_size,
                _ => {
                    defmt::warn!("invalid command frame id {}, dropping chunk of len {}", id, chunk.len());
                    break;
                }
            };

            let (frame, rest) = chunk.split_at(frame_size);
            chunk = rest;

            match PowerCommand::parse(frame) {
                Some(PowerCommand::PollTelemetry) => {
                    let word = packer.pack_next(state);
                    let _ = tx_buf.extend_from_slice(&word.to_le_bytes());
                }
                Some(command) => {
                    let ack = command.apply(state);
                    let _ = tx_buf.push(ack as u8);
                }
                None => {
                    defmt::warn!("unparseable command frame of len {}", frame.len());
                }
            }
        }

        if !tx_buf.is_empty() {
            if let Err(err) = uart.write(&tx_buf).await {
                defmt::warn!("coms uart write error: {}", err);
            }
        }
    }
}

pub async fn start_coms_task(
    spawner: &Spawner,
    state: &'static SharedPowerState,
    uart: ComsUart,
    uart_rx_pin: ComsUartRxPin,
    uart_tx_pin: ComsUartTxPin,
    uart_tx_dma: ComsDmaTx,
    uart_rx_dma: ComsDmaRx,
) {
    spawner
        .spawn(coms_task_entry(
            state,
            uart,
            uart_rx_pin,
            uart_tx_pin,
            uart_tx_dma,
            uart_rx_dma,
        ))
        .expect("failed to spawn coms task");
}
