//! Polled, non-blocking actuator task controllers.
//!
//! Each controller runs at most one task at a time. A task is a saved
//! deadline compared against the tick's clock reading; `update()` never
//! sleeps. Start requests while a task is running are rejected, never
//! queued, and leave the running task untouched.
//!
//! | Controller            | Simple task  | Multi-step task           |
//! |-----------------------|--------------|---------------------------|
//! | `BuzzerController`    | single tone  | melody, one beat per note |
//! | `DispenserController` | none         | dispense, then settle     |

use core::fmt;

pub mod buzzer;
pub mod dispenser;

/// Coarse task state shared by all controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorState {
    Idle,
    /// A single fixed-duration action.
    SimpleTask,
    /// An ordered sequence of timed sub-actions.
    MultiStepTask,
}

/// Start rejected because a task is already running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorBusy;

impl fmt::Display for ActuatorBusy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actuator busy")
    }
}
