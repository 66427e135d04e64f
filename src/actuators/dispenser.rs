//! Food dispenser task controller.
//!
//! A dispense is a two-step task: the gate servo opens for a time
//! proportional to the requested quantity, then closes and waits for the
//! hopper to settle before reporting completion.
//!
//! ```text
//!   Idle ──start──▶ Dispensing ──deadline──▶ Settling ──deadline──▶ Idle + TASK_COMPLETE
//!        (open gate)             (close gate)
//! ```

use log::{info, warn};

use crate::app::ports::{ActuatorPort, ResponsePort};
use crate::config::SystemConfig;
use crate::protocol::ids::ResponseId;

use super::{ActuatorBusy, ActuatorState};

/// Gate timing and geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispenserSettings {
    pub open_angle: u8,
    pub closed_angle: u8,
    pub ms_per_gram: u32,
    pub settle_ms: u32,
    pub max_grams: u16,
}

impl DispenserSettings {
    pub fn from_config(config: &SystemConfig) -> Self {
        Self {
            open_angle: config.dispenser_open_angle,
            closed_angle: config.dispenser_closed_angle,
            ms_per_gram: config.dispenser_ms_per_gram,
            settle_ms: config.dispenser_settle_ms,
            max_grams: config.dispenser_max_grams,
        }
    }

    /// How long the gate stays open for `grams`.
    pub fn open_duration_ms(&self, grams: u16) -> u64 {
        u64::from(grams) * u64::from(self.ms_per_gram)
    }
}

impl Default for DispenserSettings {
    fn default() -> Self {
        Self::from_config(&SystemConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DispenserTask {
    Idle,
    Dispensing {
        grams: u16,
        deadline_ms: u64,
        correlation_id: Option<u8>,
    },
    Settling {
        deadline_ms: u64,
        correlation_id: Option<u8>,
    },
}

pub struct DispenserController {
    settings: DispenserSettings,
    task: DispenserTask,
    total_grams: u32,
}

impl DispenserController {
    pub fn new(settings: DispenserSettings) -> Self {
        Self {
            settings,
            task: DispenserTask::Idle,
            total_grams: 0,
        }
    }

    /// Drive the gate to its closed position. Called once at boot.
    pub fn home(&mut self, hw: &mut dyn ActuatorPort) {
        hw.set_servo_angle(self.settings.closed_angle);
    }

    /// Open the gate for `grams`. Legal only from idle.
    pub fn start_dispense(
        &mut self,
        grams: u16,
        correlation_id: Option<u8>,
        now_ms: u64,
        hw: &mut dyn ActuatorPort,
    ) -> Result<(), ActuatorBusy> {
        if !self.is_idle() {
            return Err(ActuatorBusy);
        }

        hw.set_servo_angle(self.settings.open_angle);
        let open_ms = self.settings.open_duration_ms(grams);
        self.task = DispenserTask::Dispensing {
            grams,
            deadline_ms: now_ms + open_ms,
            correlation_id,
        };
        info!("dispenser: {} g, gate open for {} ms", grams, open_ms);
        Ok(())
    }

    /// Advance the running task. Call once per tick.
    pub fn update(
        &mut self,
        now_ms: u64,
        hw: &mut dyn ActuatorPort,
        out: &mut impl ResponsePort,
    ) {
        match self.task {
            DispenserTask::Idle => {}

            DispenserTask::Dispensing {
                grams,
                deadline_ms,
                correlation_id,
            } => {
                if now_ms > deadline_ms {
                    hw.set_servo_angle(self.settings.closed_angle);
                    self.total_grams = self.total_grams.saturating_add(u32::from(grams));
                    self.task = DispenserTask::Settling {
                        deadline_ms: now_ms + u64::from(self.settings.settle_ms),
                        correlation_id,
                    };
                }
            }

            DispenserTask::Settling {
                deadline_ms,
                correlation_id,
            } => {
                if now_ms > deadline_ms {
                    self.task = DispenserTask::Idle;
                    info!("dispenser: complete ({} g total)", self.total_grams);
                    if let Err(e) = out.send(ResponseId::TaskComplete, correlation_id, &[]) {
                        warn!("dispenser: completion notice not sent: {}", e);
                    }
                }
            }
        }
    }

    pub fn state(&self) -> ActuatorState {
        match self.task {
            DispenserTask::Idle => ActuatorState::Idle,
            DispenserTask::Dispensing { .. } | DispenserTask::Settling { .. } => {
                ActuatorState::MultiStepTask
            }
        }
    }

    pub fn is_idle(&self) -> bool {
        self.task == DispenserTask::Idle
    }

    pub fn is_gate_open(&self) -> bool {
        matches!(self.task, DispenserTask::Dispensing { .. })
    }

    pub fn deadline_ms(&self) -> Option<u64> {
        match self.task {
            DispenserTask::Idle => None,
            DispenserTask::Dispensing { deadline_ms, .. }
            | DispenserTask::Settling { deadline_ms, .. } => Some(deadline_ms),
        }
    }

    /// Grams dispensed since boot.
    pub fn total_grams(&self) -> u32 {
        self.total_grams
    }

    pub fn settings(&self) -> &DispenserSettings {
        &self.settings
    }
}
