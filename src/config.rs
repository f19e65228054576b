//! Run configuration and validation
//!
//! Everything the source game read from ambient globals (viewport, hardcoded
//! gate table, full-reload reset) is explicit configuration here. A
//! [`RunConfig`] is validated once, at run construction; no partial engine
//! exists on failure.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Policy for gates whose proximity window a single tick can jump over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ResolvePolicy {
    /// Resolve only while the runner is inside the window. A forward delta
    /// large enough to clear the whole window leaves the gate unresolved
    /// forever (the source game's behavior).
    #[default]
    WindowOnly,
    /// Also resolve every gate whose window was overshot since the previous
    /// position, in ordinal order, however many that is per tick.
    SweepCrossed,
}

/// Inclusive operand range for one operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperandRange {
    pub min: u32,
    pub max: u32,
}

impl OperandRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, operand: u32) -> bool {
        operand >= self.min && operand <= self.max
    }
}

impl From<(u32, u32)> for OperandRange {
    fn from((min, max): (u32, u32)) -> Self {
        Self { min, max }
    }
}

/// Operand ranges per operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRanges {
    pub multiply: OperandRange,
    pub add: OperandRange,
    pub subtract: OperandRange,
}

impl Default for OperationRanges {
    fn default() -> Self {
        Self {
            multiply: MULTIPLY_RANGE.into(),
            add: ADD_RANGE.into(),
            subtract: SUBTRACT_RANGE.into(),
        }
    }
}

/// Configuration for one run, fixed at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of gate checkpoints in the run
    pub total_gates: u32,
    /// Forward distance between consecutive gates
    pub gate_spacing: f32,
    /// Half-width of the resolution window around each gate position.
    /// Must stay below `gate_spacing`; above `gate_spacing / 2` adjacent
    /// windows overlap, which is allowed — the resolved set still fires
    /// each gate at most once.
    pub collision_threshold: f32,
    /// Number of parallel lanes (one gate option per lane)
    pub lane_count: u8,
    /// Score the runner starts with
    pub initial_score: i64,
    /// Operand ranges per operation kind
    pub operation_ranges: OperationRanges,
    /// What happens to gates a tick jumps clean over
    pub resolve_policy: ResolvePolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            total_gates: DEFAULT_TOTAL_GATES,
            gate_spacing: DEFAULT_GATE_SPACING,
            collision_threshold: DEFAULT_COLLISION_THRESHOLD,
            lane_count: DEFAULT_LANE_COUNT,
            initial_score: INITIAL_SCORE,
            operation_ranges: OperationRanges::default(),
            resolve_policy: ResolvePolicy::default(),
        }
    }
}

/// Construction-time configuration failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("total_gates must be > 0")]
    NoGates,
    #[error("gate_spacing must be > 0, got {0}")]
    NonPositiveSpacing(f32),
    #[error("collision_threshold must be > 0 and < gate_spacing, got {threshold} (spacing {spacing})")]
    ThresholdTooWide { threshold: f32, spacing: f32 },
    #[error("lane_count must be >= 2, got {0}")]
    TooFewLanes(u8),
    #[error("{kind} operand range is empty or starts below 1: [{min}, {max}]")]
    EmptyOperandRange { kind: &'static str, min: u32, max: u32 },
    #[error("gate sequence does not match config: expected {expected} gates with contiguous ordinals, got {actual}")]
    GateMismatch { expected: u32, actual: usize },
    #[error("invalid config JSON: {0}")]
    Parse(String),
}

impl RunConfig {
    /// Check every invariant the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_gates == 0 {
            return Err(ConfigError::NoGates);
        }
        if !(self.gate_spacing > 0.0) {
            return Err(ConfigError::NonPositiveSpacing(self.gate_spacing));
        }
        if !(self.collision_threshold > 0.0) || self.collision_threshold >= self.gate_spacing {
            return Err(ConfigError::ThresholdTooWide {
                threshold: self.collision_threshold,
                spacing: self.gate_spacing,
            });
        }
        if self.lane_count < 2 {
            return Err(ConfigError::TooFewLanes(self.lane_count));
        }
        for (kind, range) in [
            ("multiply", self.operation_ranges.multiply),
            ("add", self.operation_ranges.add),
            ("subtract", self.operation_ranges.subtract),
        ] {
            if range.min < 1 || range.min > range.max {
                return Err(ConfigError::EmptyOperandRange {
                    kind,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        Ok(())
    }

    /// Parse and validate a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON (host-side storage/debugging).
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
