//! PetFeeder peripheral firmware library.
//!
//! Exposes the pure-logic modules for integration testing and host-side
//! tooling. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod actuators;
pub mod app;
pub mod config;
pub mod error;
pub mod protocol;

// Hardware-facing modules compile on the host with simulation stubs.
pub mod adapters;
pub mod drivers;
pub mod pins;
