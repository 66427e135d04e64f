//! Actuator drivers, hardware initialisation, and peripheral helpers.

pub mod hw_init;
pub mod ledc;
pub mod servo;
pub mod tone;
pub mod watchdog;
