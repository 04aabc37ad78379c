#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use {defmt_rtt as _, panic_probe as _};

use psu_carrier_board::power_state::SharedPowerState;
use psu_carrier_board::{create_coms_task, create_control_task};

static SHARED_POWER_STATE: SharedPowerState = SharedPowerState::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_stm32::init(Default::default());
    info!("psu front-end startup!");

    let state = &SHARED_POWER_STATE;
    create_control_task!(spawner, p, state);
    create_coms_task!(spawner, p, state);
}
