//! Run state and core simulation types
//!
//! All state that must survive a tick (and serialize for host snapshots)
//! lives here. `RunState` is a single-writer resource: only
//! [`advance`](crate::sim::advance) mutates it; renderers and UI read a
//! [`RunSnapshot`] per frame.

use std::collections::BTreeSet;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, RunConfig};
use crate::sim::gate::{Gate, GateOption, OperationKind, SignClass, generate_gates};

/// A lane index into the configured lane set.
///
/// The base game has two lanes; membership is checked against
/// `RunConfig::lane_count` at tick time, so a host with more lanes uses the
/// same type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Lane(pub u8);

impl Lane {
    pub const LEFT: Lane = Lane(0);
    pub const RIGHT: Lane = Lane(1);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// One gate resolution, emitted for the host to render (score popup, gate
/// flash). `delta` is `score_after - score_before` and already reflects the
/// Subtract clamp at zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreEvent {
    pub gate_id: u32,
    pub lane: Lane,
    pub kind: OperationKind,
    pub operand: u32,
    pub delta: i64,
    pub sign: SignClass,
    pub score_after: i64,
}

/// Complete run state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG state the gates were drawn from
    pub rng_state: RngState,
    /// Validated configuration, fixed for the run
    config: RunConfig,
    /// Gate sequence, immutable after generation (ascending ordinal)
    gates: Vec<Gate>,
    /// Running score, starts at `config.initial_score`, never negative
    pub(crate) score: i64,
    /// Currently held lane (last value wins)
    pub(crate) lane: Lane,
    /// Forward distance from the run's start, monotonically non-decreasing
    pub(crate) forward_position: f32,
    /// Gate ids already resolved; grows only, each id at most once.
    /// Mutated only by `advance`.
    pub(crate) resolved: BTreeSet<u32>,
    /// True once the last gate resolves; score is frozen after that
    pub(crate) finished: bool,
}

impl RunState {
    /// Create a new run: validate the config, draw the gates from the seed.
    /// This is also the explicit reset path; there is no in-place restart.
    pub fn new(config: RunConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng_state = RngState::new(seed);
        let gates = generate_gates(&config, &mut rng_state.to_rng());
        Ok(Self::assemble(config, gates, seed))
    }

    /// Create a run over a handcrafted gate sequence (scenario tests, level
    /// editors). The sequence must carry exactly `total_gates` gates with
    /// contiguous 0-based ordinals, or the run's last gate could never
    /// resolve and `finished` would never latch.
    pub fn with_gates(config: RunConfig, gates: Vec<Gate>) -> Result<Self, ConfigError> {
        config.validate()?;
        if gates.len() != config.total_gates as usize
            || gates.iter().enumerate().any(|(i, g)| g.id != i as u32)
        {
            return Err(ConfigError::GateMismatch {
                expected: config.total_gates,
                actual: gates.len(),
            });
        }
        Ok(Self::assemble(config, gates, 0))
    }

    fn assemble(config: RunConfig, gates: Vec<Gate>, seed: u64) -> Self {
        Self {
            seed,
            rng_state: RngState::new(seed),
            score: config.initial_score,
            lane: Lane::LEFT,
            forward_position: 0.0,
            resolved: BTreeSet::new(),
            finished: false,
            config,
            gates,
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// The full gate sequence, ascending by ordinal.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn lane(&self) -> Lane {
        self.lane
    }

    pub fn forward_position(&self) -> f32 {
        self.forward_position
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Gate ids already resolved, ascending.
    pub fn resolved(&self) -> &BTreeSet<u32> {
        &self.resolved
    }

    pub fn is_resolved(&self, gate_id: u32) -> bool {
        self.resolved.contains(&gate_id)
    }

    /// The next gate the runner has not resolved yet, if any.
    pub fn next_unresolved(&self) -> Option<&Gate> {
        self.gates.iter().find(|g| !self.resolved.contains(&g.id))
    }

    /// The option the current lane would pick at the given gate.
    pub fn chosen_option<'a>(&self, gate: &'a Gate) -> &'a GateOption {
        &gate.options[self.lane.index()]
    }

    /// Immutable per-frame view for the presentation collaborator.
    pub fn snapshot(&self) -> RunSnapshot {
        RunSnapshot {
            score: self.score,
            lane: self.lane,
            forward_position: self.forward_position,
            resolved_count: self.resolved.len() as u32,
            total_gates: self.config.total_gates,
            finished: self.finished,
        }
    }
}

/// What a renderer/UI needs each frame, detached from the live state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub score: i64,
    pub lane: Lane,
    pub forward_position: f32,
    pub resolved_count: u32,
    pub total_gates: u32,
    pub finished: bool,
}

impl RunSnapshot {
    /// Run completion in `[0, 1]` for progress bars.
    pub fn progress(&self) -> f32 {
        self.resolved_count as f32 / self.total_gates as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_run_starts_clean() {
        let state = RunState::new(RunConfig::default(), 123).unwrap();
        assert_eq!(state.score, state.config().initial_score);
        assert_eq!(state.lane, Lane::LEFT);
        assert_eq!(state.forward_position, 0.0);
        assert!(state.resolved.is_empty());
        assert!(!state.finished);
        assert_eq!(state.gates().len(), state.config().total_gates as usize);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = RunConfig {
            total_gates: 0,
            ..Default::default()
        };
        assert!(RunState::new(config, 1).is_err());
    }

    #[test]
    fn test_with_gates_rejects_mismatched_sequence() {
        let config = RunConfig {
            total_gates: 2,
            ..Default::default()
        };
        let gate = |id: u32| Gate {
            id,
            position: (id + 1) as f32 * config.gate_spacing,
            options: vec![
                GateOption {
                    kind: OperationKind::Add,
                    operand: 10,
                };
                2
            ],
        };

        // Too few gates
        let err = RunState::with_gates(config.clone(), vec![gate(0)]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::GateMismatch {
                expected: 2,
                actual: 1,
            }
        );

        // Right count, broken ordinals
        assert!(RunState::with_gates(config.clone(), vec![gate(0), gate(3)]).is_err());

        // Matching sequence is accepted
        let matching = vec![gate(0), gate(1)];
        assert!(RunState::with_gates(config, matching).is_ok());
    }

    #[test]
    fn test_same_seed_same_run() {
        let a = RunState::new(RunConfig::default(), 99).unwrap();
        let b = RunState::new(RunConfig::default(), 99).unwrap();
        assert_eq!(a.gates(), b.gates());
    }

    #[test]
    fn test_snapshot_progress() {
        let mut state = RunState::new(RunConfig::default(), 5).unwrap();
        assert_eq!(state.snapshot().progress(), 0.0);
        state.resolved.insert(0);
        state.resolved.insert(1);
        let snapshot = state.snapshot();
        assert!((snapshot.progress() - 0.2).abs() < 1e-6);
        assert_eq!(snapshot.resolved_count, 2);
    }

    #[test]
    fn test_next_unresolved_skips_resolved() {
        let mut state = RunState::new(RunConfig::default(), 5).unwrap();
        assert_eq!(state.next_unresolved().unwrap().id, 0);
        state.resolved.insert(0);
        assert_eq!(state.next_unresolved().unwrap().id, 1);
    }
}
