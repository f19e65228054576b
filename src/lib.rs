//! Gate Dash - lane-runner arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (gate generation, tick advance, run state)
//! - `config`: Run configuration and validation
//!
//! The crate owns only the game rules: a runner auto-advances along a forward
//! axis, the player holds one of a fixed set of lanes, and each gate
//! checkpoint applies an arithmetic operation to the running score. Rendering
//! and gesture input are host concerns; they read [`sim::RunSnapshot`] and
//! feed [`sim::TickInput`], never the other way around.

pub mod config;
pub mod sim;

pub use config::{ConfigError, OperandRange, OperationRanges, ResolvePolicy, RunConfig};
pub use sim::{
    Gate, GateOption, Lane, OperationKind, RunSnapshot, RunState, ScoreEvent, SignClass,
    TickError, TickInput, TickOutcome, advance,
};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Forward run speed in world units per second
    pub const RUN_SPEED: f32 = 12.0;

    /// Gate layout defaults
    pub const DEFAULT_TOTAL_GATES: u32 = 10;
    pub const DEFAULT_GATE_SPACING: f32 = 15.0;
    /// Half-width of the resolution window around a gate's position
    pub const DEFAULT_COLLISION_THRESHOLD: f32 = 2.0;

    /// Lane defaults (left/right in the base game)
    pub const DEFAULT_LANE_COUNT: u8 = 2;

    /// Score the runner starts with
    pub const INITIAL_SCORE: i64 = 10;

    /// Operand ranges per operation kind, inclusive
    pub const MULTIPLY_RANGE: (u32, u32) = (2, 4);
    pub const ADD_RANGE: (u32, u32) = (10, 100);
    pub const SUBTRACT_RANGE: (u32, u32) = (5, 50);
}
