//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements   | Connects to                 |
//! |------------|--------------|-----------------------------|
//! | `hardware` | ActuatorPort | LEDC buzzer + servo         |
//! | `time`     | ClockPort    | ESP32 high-resolution timer |
//! | `uart`     | Transport    | UART1 host link             |

pub mod hardware;
pub mod time;
pub mod uart;
