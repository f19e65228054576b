//! Gate generation
//!
//! A run's gates are drawn once, up front, from a seeded RNG; they are
//! immutable for the life of the run. Each gate sits at a fixed forward
//! checkpoint and carries one arithmetic option per lane.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{OperationRanges, RunConfig};

/// Arithmetic operation a gate option applies to the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationKind {
    Multiply,
    Add,
    Subtract,
}

/// Display class of an option, derived from its kind (never stored
/// independently).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignClass {
    /// Multiply and Add: rendered as the "good" gate
    Positive,
    /// Subtract: rendered as the "bad" gate
    Negative,
}

impl OperationKind {
    pub fn sign(self) -> SignClass {
        match self {
            OperationKind::Multiply | OperationKind::Add => SignClass::Positive,
            OperationKind::Subtract => SignClass::Negative,
        }
    }
}

/// One side of a gate: an operation and its operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateOption {
    pub kind: OperationKind,
    pub operand: u32,
}

impl GateOption {
    /// Apply this option to a score. Subtract clamps at zero and Multiply/Add
    /// saturate at `i64::MAX`; the score is never negative.
    pub fn apply(&self, score: i64) -> i64 {
        let operand = self.operand as i64;
        match self.kind {
            OperationKind::Multiply => score.saturating_mul(operand),
            OperationKind::Add => score.saturating_add(operand),
            OperationKind::Subtract => (score - operand).max(0),
        }
    }

    pub fn sign(&self) -> SignClass {
        self.kind.sign()
    }
}

/// A forward-distance checkpoint with one option per lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// Ordinal in the run, 0-based
    pub id: u32,
    /// Forward distance from the run's start: `(id + 1) * gate_spacing`
    pub position: f32,
    /// One option per lane, indexed by lane
    pub options: Vec<GateOption>,
}

impl Gate {
    /// Option the runner picks when holding the left lane.
    pub fn left(&self) -> &GateOption {
        &self.options[0]
    }

    /// Option the runner picks when holding the right lane.
    pub fn right(&self) -> &GateOption {
        &self.options[1]
    }
}

/// Draw one gate option: kind uniform over the three operations, operand
/// uniform (inclusive) within that kind's configured range.
pub fn draw_option(rng: &mut impl Rng, ranges: &OperationRanges) -> GateOption {
    let (kind, range) = match rng.random_range(0..3u8) {
        0 => (OperationKind::Multiply, ranges.multiply),
        1 => (OperationKind::Add, ranges.add),
        _ => (OperationKind::Subtract, ranges.subtract),
    };
    GateOption {
        kind,
        operand: rng.random_range(range.min..=range.max),
    }
}

/// Generate the run's full gate sequence. Pure over the config and the RNG;
/// the same seed always yields the same gates. Both sides of a gate are drawn
/// independently and may coincide in kind and operand.
pub fn generate_gates(config: &RunConfig, rng: &mut impl Rng) -> Vec<Gate> {
    (0..config.total_gates)
        .map(|i| Gate {
            id: i,
            position: (i + 1) as f32 * config.gate_spacing,
            options: (0..config.lane_count)
                .map(|_| draw_option(rng, &config.operation_ranges))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OperandRange;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_gate_positions_and_ordinals() {
        let config = RunConfig {
            total_gates: 8,
            gate_spacing: 15.0,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(7);
        let gates = generate_gates(&config, &mut rng);

        assert_eq!(gates.len(), 8);
        for (i, gate) in gates.iter().enumerate() {
            assert_eq!(gate.id, i as u32);
            assert!((gate.position - (i as f32 + 1.0) * 15.0).abs() < 1e-5);
            assert_eq!(gate.options.len(), config.lane_count as usize);
            assert_eq!(gate.left(), &gate.options[0]);
            assert_eq!(gate.right(), &gate.options[1]);
        }
    }

    #[test]
    fn test_same_seed_same_gates() {
        let config = RunConfig::default();
        let gates_a = generate_gates(&config, &mut Pcg32::seed_from_u64(42));
        let gates_b = generate_gates(&config, &mut Pcg32::seed_from_u64(42));
        assert_eq!(gates_a, gates_b);
    }

    #[test]
    fn test_apply_subtract_clamps_at_zero() {
        let option = GateOption {
            kind: OperationKind::Subtract,
            operand: 20,
        };
        assert_eq!(option.apply(10), 0);
        assert_eq!(option.apply(25), 5);
    }

    #[test]
    fn test_apply_multiply_and_add() {
        let times3 = GateOption {
            kind: OperationKind::Multiply,
            operand: 3,
        };
        let plus50 = GateOption {
            kind: OperationKind::Add,
            operand: 50,
        };
        assert_eq!(times3.apply(10), 30);
        assert_eq!(plus50.apply(10), 60);
    }

    #[test]
    fn test_apply_saturates_instead_of_overflowing() {
        let times4 = GateOption {
            kind: OperationKind::Multiply,
            operand: 4,
        };
        let plus100 = GateOption {
            kind: OperationKind::Add,
            operand: 100,
        };
        assert_eq!(times4.apply(i64::MAX / 2), i64::MAX);
        assert_eq!(plus100.apply(i64::MAX), i64::MAX);
        // A long chain of multiplies pins at the ceiling, never negative
        let mut score = 10;
        for _ in 0..64 {
            score = times4.apply(score);
            assert!(score >= 0);
        }
        assert_eq!(score, i64::MAX);
    }

    #[test]
    fn test_sign_derived_from_kind() {
        assert_eq!(OperationKind::Multiply.sign(), SignClass::Positive);
        assert_eq!(OperationKind::Add.sign(), SignClass::Positive);
        assert_eq!(OperationKind::Subtract.sign(), SignClass::Negative);
    }

    proptest! {
        /// Drawn operands always land inside the configured inclusive range,
        /// whatever the ranges and seed.
        #[test]
        fn prop_operands_within_ranges(
            seed in any::<u64>(),
            mul in (1u32..50).prop_flat_map(|lo| (Just(lo), lo..lo + 50)),
            add in (1u32..200).prop_flat_map(|lo| (Just(lo), lo..lo + 200)),
            sub in (1u32..100).prop_flat_map(|lo| (Just(lo), lo..lo + 100)),
        ) {
            let ranges = OperationRanges {
                multiply: OperandRange::new(mul.0, mul.1),
                add: OperandRange::new(add.0, add.1),
                subtract: OperandRange::new(sub.0, sub.1),
            };
            let mut rng = Pcg32::seed_from_u64(seed);
            for _ in 0..64 {
                let option = draw_option(&mut rng, &ranges);
                let range = match option.kind {
                    OperationKind::Multiply => ranges.multiply,
                    OperationKind::Add => ranges.add,
                    OperationKind::Subtract => ranges.subtract,
                };
                prop_assert!(range.contains(option.operand));
            }
        }

        /// Positions follow `(i+1) * spacing` for any valid spacing.
        #[test]
        fn prop_positions_follow_spacing(
            seed in any::<u64>(),
            spacing in 0.5f32..100.0,
            total in 1u32..40,
        ) {
            let config = RunConfig {
                total_gates: total,
                gate_spacing: spacing,
                collision_threshold: spacing * 0.1,
                ..Default::default()
            };
            let gates = generate_gates(&config, &mut Pcg32::seed_from_u64(seed));
            for gate in &gates {
                let expected = (gate.id + 1) as f32 * spacing;
                prop_assert!((gate.position - expected).abs() <= expected * 1e-6);
            }
        }
    }
}
