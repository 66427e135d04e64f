//! Piezo buzzer tone driver.
//!
//! A tone is a 50 % square wave on the buzzer channel with the timer
//! retuned to the requested frequency. Silence is duty 0; the timer keeps
//! running.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: retunes LEDC timer 0 and writes channel 0.
//! On host/test: tracks state in-memory only.

use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::drivers::hw_init;
use crate::drivers::ledc::LedcChannel;

pub struct ToneDriver {
    channel: LedcChannel,
    timer: u32,
    frequency_hz: Option<u16>,
}

impl ToneDriver {
    pub fn new(channel: LedcChannel, timer: u32) -> Self {
        Self {
            channel,
            timer,
            frequency_hz: None,
        }
    }

    pub fn tone_on(&mut self, frequency_hz: u16) {
        if let Err(rc) = hw_init::set_timer_freq(self.timer, u32::from(frequency_hz)) {
            warn!("tone: {} Hz not reachable (rc={})", frequency_hz, rc);
            self.tone_off();
            return;
        }
        match self.channel.set_duty_cycle_percent(50) {
            Ok(()) => self.frequency_hz = Some(frequency_hz),
            Err(e) => warn!("tone: duty write failed (rc={})", e.0),
        }
    }

    pub fn tone_off(&mut self) {
        if let Err(e) = self.channel.set_duty_cycle_fully_off() {
            warn!("tone: silence failed (rc={})", e.0);
        }
        self.frequency_hz = None;
    }

    /// Frequency currently sounding.
    pub fn frequency_hz(&self) -> Option<u16> {
        self.frequency_hz
    }

    pub fn is_sounding(&self) -> bool {
        self.frequency_hz.is_some()
    }
}
