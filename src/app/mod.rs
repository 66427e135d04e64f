//! Application core: pure domain logic, zero I/O.
//!
//! Command schemas, the dispatch table and the per-tick orchestration
//! live here. All interaction with hardware and the serial link happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod commands;
pub mod dispatcher;
pub mod ports;
pub mod service;
