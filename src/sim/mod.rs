//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed forward-axis arithmetic only
//! - Seeded RNG only (gate generation happens once, before the first tick)
//! - Stable iteration order (by gate ordinal)
//! - No rendering, input-device, or platform dependencies

pub mod gate;
pub mod state;
pub mod tick;

pub use gate::{Gate, GateOption, OperationKind, SignClass, draw_option, generate_gates};
pub use state::{Lane, RngState, RunSnapshot, RunState, ScoreEvent};
pub use tick::{LaneLatch, TickError, TickInput, TickOutcome, advance};
