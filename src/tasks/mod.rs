pub mod coms_task;
pub mod control_task;
