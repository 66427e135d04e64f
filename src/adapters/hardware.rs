//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the buzzer and servo drivers and exposes them through
//! [`ActuatorPort`]. This is the only module in the system that drives
//! actuators. On non-espidf targets the underlying drivers use cfg-gated
//! simulation stubs.

use crate::app::ports::ActuatorPort;
use crate::drivers::hw_init;
use crate::drivers::ledc::LedcChannel;
use crate::drivers::servo::ServoDriver;
use crate::drivers::tone::ToneDriver;
use crate::pins;

/// Concrete adapter that combines all actuators behind the port trait.
pub struct HardwareAdapter {
    tone: ToneDriver,
    servo: ServoDriver<LedcChannel>,
}

impl HardwareAdapter {
    pub fn new(tone: ToneDriver, servo: ServoDriver<LedcChannel>) -> Self {
        Self { tone, servo }
    }

    /// Adapter wired to the channels configured by `hw_init`.
    pub fn from_board() -> Self {
        let tone = ToneDriver::new(
            LedcChannel::new(hw_init::LEDC_CH_BUZZER, pins::BUZZER_PWM_RESOLUTION_BITS),
            hw_init::LEDC_TIMER_BUZZER,
        );
        let servo = ServoDriver::new(LedcChannel::new(
            hw_init::LEDC_CH_SERVO,
            pins::SERVO_PWM_RESOLUTION_BITS,
        ));
        Self::new(tone, servo)
    }

    pub fn tone(&self) -> &ToneDriver {
        &self.tone
    }

    pub fn servo(&self) -> &ServoDriver<LedcChannel> {
        &self.servo
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn tone_on(&mut self, frequency_hz: u16) {
        self.tone.tone_on(frequency_hz);
    }

    fn tone_off(&mut self) {
        self.tone.tone_off();
    }

    fn set_servo_angle(&mut self, degrees: u8) {
        self.servo.set_angle(degrees);
    }
}
