//! Serial command protocol between the host controller and this peripheral.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                     Protocol Stack                         │
//! │                                                            │
//! │  ┌───────────┐   ┌────────────────┐   ┌────────────────┐   │
//! │  │ Transport │──▶│ FrameAssembler │──▶│ CommandDispatch│   │
//! │  │ (trait)   │   │ (byte FSM)     │   │ (app layer)    │   │
//! │  └───────────┘   └────────────────┘   └───────┬────────┘   │
//! │       ▲                                       │            │
//! │       │          ┌─────────────────┐          │            │
//! │       └──────────│ ResponseEmitter │◀─────────┘            │
//! │                  │ (frame encode)  │◀── actuator updates   │
//! │                  └─────────────────┘                       │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Inbound and outbound frames share one shape; see [`frame`] for the
//! byte layout of both protocol revisions.

pub mod assembler;
pub mod emitter;
pub mod frame;
pub mod ids;
pub mod transport;
