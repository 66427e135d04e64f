//! GPIO / peripheral pin assignments for the PetFeeder peripheral board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Piezo buzzer (LEDC square wave)
// ---------------------------------------------------------------------------

pub const BUZZER_GPIO: i32 = 5;
/// Buzzer timer resolution (bits). Low enough for tones up to ~78 kHz.
pub const BUZZER_PWM_RESOLUTION_BITS: u32 = 10;
/// Frequency the buzzer timer is configured with at boot (silent, duty 0).
pub const BUZZER_IDLE_FREQ_HZ: u32 = 1_000;

// ---------------------------------------------------------------------------
// Dispenser gate servo (hobby servo, 50 Hz)
// ---------------------------------------------------------------------------

pub const SERVO_GPIO: i32 = 6;
pub const SERVO_PWM_FREQ_HZ: u32 = 50;
/// 14 bits gives ~1.2 µs steps across the 20 ms period.
pub const SERVO_PWM_RESOLUTION_BITS: u32 = 14;
/// Pulse width at 0°.
pub const SERVO_MIN_PULSE_US: u32 = 500;
/// Pulse width at 180°.
pub const SERVO_MAX_PULSE_US: u32 = 2_500;

// ---------------------------------------------------------------------------
// Host link UART
// ---------------------------------------------------------------------------

/// UART0 carries the ESP-IDF console; the host link uses UART1.
pub const HOST_UART_PORT: i32 = 1;
pub const UART_TX_GPIO: i32 = 17;
pub const UART_RX_GPIO: i32 = 18;
/// Driver RX ring buffer (bytes). Must exceed the 128-byte hardware FIFO.
pub const UART_RX_BUFFER: i32 = 256;
