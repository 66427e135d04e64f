//! Hobby servo driver for the dispenser gate.
//!
//! Maps 0–180° onto a 500–2500 µs pulse inside the 20 ms (50 Hz) period.
//! Generic over any `embedded-hal` PWM output so the angle math is tested
//! without hardware.

use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::pins;

const PERIOD_US: u32 = 1_000_000 / pins::SERVO_PWM_FREQ_HZ;

pub struct ServoDriver<P: SetDutyCycle> {
    pwm: P,
    angle: Option<u8>,
}

impl<P: SetDutyCycle> ServoDriver<P> {
    pub fn new(pwm: P) -> Self {
        Self { pwm, angle: None }
    }

    /// Command `degrees` (clamped to 180).
    pub fn set_angle(&mut self, degrees: u8) {
        let degrees = degrees.min(180);
        let duty = Self::duty_for(degrees, self.pwm.max_duty_cycle());
        match self.pwm.set_duty_cycle(duty) {
            Ok(()) => self.angle = Some(degrees),
            Err(e) => warn!("servo: {}° not applied: {:?}", degrees, e),
        }
    }

    /// Last angle successfully commanded; `None` before the first move.
    pub fn angle(&self) -> Option<u8> {
        self.angle
    }

    pub fn pwm(&self) -> &P {
        &self.pwm
    }

    fn pulse_us(degrees: u8) -> u32 {
        let span = pins::SERVO_MAX_PULSE_US - pins::SERVO_MIN_PULSE_US;
        pins::SERVO_MIN_PULSE_US + u32::from(degrees) * span / 180
    }

    fn duty_for(degrees: u8, max_duty: u16) -> u16 {
        (Self::pulse_us(degrees) * u32::from(max_duty) / PERIOD_US) as u16
    }
}
