//! LEDC channel as an `embedded-hal` PWM output.
//!
//! On ESP-IDF duty writes go to the channel register through
//! [`hw_init::set_channel_duty`]; on the host the driver keeps the last
//! duty in memory so callers can be tested against it.

use embedded_hal::pwm::{ErrorKind, ErrorType, SetDutyCycle};

use crate::drivers::hw_init;

/// Raw ESP-IDF return code from a failed duty write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedcError(pub i32);

impl embedded_hal::pwm::Error for LedcError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// One configured LEDC channel.
pub struct LedcChannel {
    channel: u32,
    max_duty: u16,
    duty: u16,
}

impl LedcChannel {
    /// `resolution_bits` must match the timer the channel is bound to.
    pub fn new(channel: u32, resolution_bits: u32) -> Self {
        let bits = resolution_bits.min(16);
        Self {
            channel,
            max_duty: ((1u32 << bits) - 1) as u16,
            duty: 0,
        }
    }

    /// Last duty successfully written.
    pub fn duty(&self) -> u16 {
        self.duty
    }
}

impl ErrorType for LedcChannel {
    type Error = LedcError;
}

impl SetDutyCycle for LedcChannel {
    fn max_duty_cycle(&self) -> u16 {
        self.max_duty
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        let duty = duty.min(self.max_duty);
        hw_init::set_channel_duty(self.channel, u32::from(duty)).map_err(LedcError)?;
        self.duty = duty;
        Ok(())
    }
}
