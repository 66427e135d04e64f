//! Buzzer task controller.
//!
//! ```text
//!            start_simple                    deadline passed
//!   Idle ───────────────▶ SimpleTone ─────────────────────────▶ Idle + TASK_COMPLETE
//!    │
//!    │ start_melody              deadline passed, notes remain
//!    └──────────────▶ Melody ◀──────────────┐
//!                       │───────────────────┘
//!                       │ deadline passed, last note done
//!                       └────────────────────────────────────▶ Idle + TASK_COMPLETE
//! ```

use log::{info, warn};

use crate::app::commands::Notes;
use crate::app::ports::{ActuatorPort, ResponsePort};
use crate::protocol::ids::ResponseId;

use super::{ActuatorBusy, ActuatorState};

/// A melody in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Melody {
    notes: Notes,
    cursor: usize,
    note_duration_ms: u32,
}

impl Melody {
    /// `tempo_bpm` must be nonzero and `notes` non-empty; the dispatcher
    /// validates both before a melody is built.
    pub fn new(tempo_bpm: u16, notes: Notes) -> Self {
        Self {
            notes,
            cursor: 0,
            note_duration_ms: 60_000 / u32::from(tempo_bpm.max(1)),
        }
    }

    /// Milliseconds per beat; every note lasts one beat.
    pub fn note_duration_ms(&self) -> u32 {
        self.note_duration_ms
    }

    /// Index of the note currently sounding.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    pub fn current_note(&self) -> Option<u16> {
        self.notes.get(self.cursor).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum BuzzerTask {
    Idle,
    SimpleTone {
        deadline_ms: u64,
        correlation_id: Option<u8>,
    },
    Melody {
        melody: Melody,
        deadline_ms: u64,
        correlation_id: Option<u8>,
    },
}

/// Non-blocking buzzer state machine.
pub struct BuzzerController {
    task: BuzzerTask,
}

impl BuzzerController {
    pub fn new() -> Self {
        Self {
            task: BuzzerTask::Idle,
        }
    }

    /// Sound `frequency_hz` for `duration_ms`. Legal only from idle.
    pub fn start_simple(
        &mut self,
        frequency_hz: u16,
        duration_ms: u16,
        correlation_id: Option<u8>,
        now_ms: u64,
        hw: &mut dyn ActuatorPort,
    ) -> Result<(), ActuatorBusy> {
        if !self.is_idle() {
            return Err(ActuatorBusy);
        }

        hw.tone_on(frequency_hz);
        let deadline_ms = now_ms + u64::from(duration_ms);
        self.task = BuzzerTask::SimpleTone {
            deadline_ms,
            correlation_id,
        };
        info!(
            "buzzer: tone {} Hz for {} ms (until t={})",
            frequency_hz, duration_ms, deadline_ms
        );
        Ok(())
    }

    /// Play `notes` at `tempo_bpm`, one beat per note. Legal only from idle.
    pub fn start_melody(
        &mut self,
        tempo_bpm: u16,
        notes: Notes,
        correlation_id: Option<u8>,
        now_ms: u64,
        hw: &mut dyn ActuatorPort,
    ) -> Result<(), ActuatorBusy> {
        if !self.is_idle() {
            return Err(ActuatorBusy);
        }

        let melody = Melody::new(tempo_bpm, notes);
        Self::sound(melody.current_note(), hw);
        let deadline_ms = now_ms + u64::from(melody.note_duration_ms());
        info!(
            "buzzer: melody of {} notes at {} bpm ({} ms/note)",
            melody.note_count(),
            tempo_bpm,
            melody.note_duration_ms()
        );
        self.task = BuzzerTask::Melody {
            melody,
            deadline_ms,
            correlation_id,
        };
        Ok(())
    }

    /// Advance the running task. Call once per tick.
    pub fn update(
        &mut self,
        now_ms: u64,
        hw: &mut dyn ActuatorPort,
        out: &mut impl ResponsePort,
    ) {
        match &mut self.task {
            BuzzerTask::Idle => {}

            BuzzerTask::SimpleTone {
                deadline_ms,
                correlation_id,
            } => {
                if now_ms > *deadline_ms {
                    let correlation_id = *correlation_id;
                    hw.tone_off();
                    self.task = BuzzerTask::Idle;
                    info!("buzzer: tone complete");
                    Self::notify_complete(correlation_id, out);
                }
            }

            BuzzerTask::Melody {
                melody,
                deadline_ms,
                correlation_id,
            } => {
                if now_ms > *deadline_ms {
                    hw.tone_off();
                    melody.cursor += 1;

                    if melody.cursor < melody.note_count() {
                        Self::sound(melody.current_note(), hw);
                        *deadline_ms = now_ms + u64::from(melody.note_duration_ms);
                    } else {
                        let correlation_id = *correlation_id;
                        self.task = BuzzerTask::Idle;
                        info!("buzzer: melody complete");
                        Self::notify_complete(correlation_id, out);
                    }
                }
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> ActuatorState {
        match self.task {
            BuzzerTask::Idle => ActuatorState::Idle,
            BuzzerTask::SimpleTone { .. } => ActuatorState::SimpleTask,
            BuzzerTask::Melody { .. } => ActuatorState::MultiStepTask,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.task == BuzzerTask::Idle
    }

    /// Deadline of the current tone or note.
    pub fn deadline_ms(&self) -> Option<u64> {
        match self.task {
            BuzzerTask::Idle => None,
            BuzzerTask::SimpleTone { deadline_ms, .. }
            | BuzzerTask::Melody { deadline_ms, .. } => Some(deadline_ms),
        }
    }

    pub fn melody(&self) -> Option<&Melody> {
        match &self.task {
            BuzzerTask::Melody { melody, .. } => Some(melody),
            _ => None,
        }
    }

    // ── Internal ──────────────────────────────────────────────

    /// Frequency 0 is a rest.
    fn sound(note: Option<u16>, hw: &mut dyn ActuatorPort) {
        match note {
            Some(freq) if freq > 0 => hw.tone_on(freq),
            _ => hw.tone_off(),
        }
    }

    fn notify_complete(correlation_id: Option<u8>, out: &mut impl ResponsePort) {
        if let Err(e) = out.send(ResponseId::TaskComplete, correlation_id, &[]) {
            warn!("buzzer: completion notice not sent: {}", e);
        }
    }
}

impl Default for BuzzerController {
    fn default() -> Self {
        Self::new()
    }
}
