//! Per-tick run advance
//!
//! The host invokes [`advance`] once per rendered frame, serially. Each tick
//! moves the runner forward, latches the lane, and resolves any gate whose
//! proximity window is met, exactly once per gate. No I/O, no logging, no
//! internal parallelism.

use thiserror::Error;

use crate::config::ResolvePolicy;
use crate::sim::gate::GateOption;
use crate::sim::state::{Lane, RunState, ScoreEvent};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Forward distance covered this tick; must be >= 0
    pub forward_delta: f32,
    /// Lane the runner holds this tick
    pub lane: Lane,
}

/// Last-value-wins latch between the input collaborator and the tick.
///
/// Swipe handling may fire `change` any number of times between frames; the
/// tick reads `current` once. No queueing, no debouncing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LaneLatch {
    lane: Lane,
}

impl LaneLatch {
    pub fn new(lane: Lane) -> Self {
        Self { lane }
    }

    /// Record a `LaneChange` intent; overwrites any earlier one this frame.
    pub fn change(&mut self, lane: Lane) {
        self.lane = lane;
    }

    pub fn current(&self) -> Lane {
        self.lane
    }
}

/// Malformed tick arguments. The tick is rejected whole; run state is left
/// exactly as it was, and the caller may correct and retry.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TickError {
    #[error("forward_delta must be >= 0, got {0}")]
    NegativeForwardDelta(f32),
    #[error("lane {lane:?} outside configured lane set of {lane_count}")]
    UnknownLane { lane: Lane, lane_count: u8 },
}

/// What one tick produced.
#[derive(Debug, Clone, Default)]
pub struct TickOutcome {
    /// Gate resolutions this tick, ascending by ordinal (usually 0 or 1)
    pub events: Vec<ScoreEvent>,
    /// True on exactly the tick the last gate resolved. Any end-of-run
    /// delay before declaring game over is the host's presentation policy.
    pub just_finished: bool,
}

/// Advance the run by one tick.
///
/// Resolution is idempotent per gate: the resolved set makes a window
/// re-check a no-op, however many ticks the window spans. After the run
/// finishes the state is frozen and `advance` returns an empty outcome.
pub fn advance(state: &mut RunState, input: &TickInput) -> Result<TickOutcome, TickError> {
    // Validate before touching anything. NaN fails the >= comparison too.
    if !(input.forward_delta >= 0.0) {
        return Err(TickError::NegativeForwardDelta(input.forward_delta));
    }
    let lane_count = state.config().lane_count;
    if input.lane.index() >= lane_count as usize {
        return Err(TickError::UnknownLane {
            lane: input.lane,
            lane_count,
        });
    }

    if state.finished {
        return Ok(TickOutcome::default());
    }

    state.forward_position += input.forward_delta;
    state.lane = input.lane;

    let position = state.forward_position;
    let threshold = state.config().collision_threshold;
    let policy = state.config().resolve_policy;
    let last_id = state.config().total_gates - 1;

    // Collect, then apply: the option at the held lane for every unresolved
    // gate, in ascending ordinal order.
    let pending: Vec<(u32, f32, GateOption)> = state
        .gates()
        .iter()
        .filter(|g| !state.resolved.contains(&g.id))
        .map(|g| (g.id, g.position, *state.chosen_option(g)))
        .collect();

    let mut outcome = TickOutcome::default();
    for (gate_id, gate_position, option) in pending {
        let in_window = (position - gate_position).abs() < threshold;
        let hit = match policy {
            ResolvePolicy::WindowOnly => in_window,
            // The runner never retreats, so "window crossed since the last
            // tick" reduces to "at or past the far edge".
            ResolvePolicy::SweepCrossed => in_window || position >= gate_position + threshold,
        };
        if !hit {
            continue;
        }

        let old_score = state.score;
        let new_score = option.apply(old_score);
        state.score = new_score;
        state.resolved.insert(gate_id);
        outcome.events.push(ScoreEvent {
            gate_id,
            lane: input.lane,
            kind: option.kind,
            operand: option.operand,
            delta: new_score - old_score,
            sign: option.sign(),
            score_after: new_score,
        });

        if gate_id == last_id {
            state.finished = true;
            outcome.just_finished = true;
        }
    }

    Ok(outcome)
}
