//! Gate Dash headless host
//!
//! Drives the run engine at the fixed tick rate with an autoplay policy that
//! always swipes to the better lane, logging every gate resolution. This is
//! the engine's host contract exercised end to end without a renderer:
//! lane intents go in through a [`LaneLatch`], scoring events come out of
//! [`advance`].

use gate_dash::consts::{RUN_SPEED, SIM_DT};
use gate_dash::sim::{Lane, LaneLatch, RunState, TickInput, advance};
use gate_dash::{ResolvePolicy, RunConfig};

fn usage() -> ! {
    eprintln!("usage: gate-dash [--seed N] [--gates N] [--sweep] [--config FILE.json]");
    std::process::exit(2);
}

fn parse_args() -> (RunConfig, u64) {
    let mut config = RunConfig::default();
    let mut seed = 0xDA5Eu64;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let value = args.next().unwrap_or_else(|| usage());
                seed = value.parse().unwrap_or_else(|_| usage());
            }
            "--gates" => {
                let value = args.next().unwrap_or_else(|| usage());
                config.total_gates = value.parse().unwrap_or_else(|_| usage());
            }
            "--sweep" => config.resolve_policy = ResolvePolicy::SweepCrossed,
            "--config" => {
                let path = args.next().unwrap_or_else(|| usage());
                let json = std::fs::read_to_string(&path).unwrap_or_else(|e| {
                    eprintln!("cannot read {path}: {e}");
                    std::process::exit(2);
                });
                config = RunConfig::from_json(&json).unwrap_or_else(|e| {
                    eprintln!("bad config {path}: {e}");
                    std::process::exit(2);
                });
            }
            _ => usage(),
        }
    }
    (config, seed)
}

/// Autoplay: swipe toward whichever side of the next gate leaves the higher
/// score. A real host replaces this with its gesture recognizer.
fn pick_lane(state: &RunState) -> Lane {
    let Some(gate) = state.next_unresolved() else {
        return state.lane();
    };
    let best = (0..state.config().lane_count)
        .map(Lane)
        .max_by_key(|lane| gate.options[lane.index()].apply(state.score()));
    best.unwrap_or(state.lane())
}

fn main() {
    env_logger::init();

    let (config, seed) = parse_args();
    let mut state = match RunState::new(config, seed) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("invalid run config: {e}");
            std::process::exit(2);
        }
    };
    log::info!(
        "Run start: seed={seed}, gates={}, initial score={}",
        state.config().total_gates,
        state.score()
    );

    let mut latch = LaneLatch::new(state.lane());
    let mut ticks = 0u64;
    loop {
        latch.change(pick_lane(&state));
        let input = TickInput {
            forward_delta: RUN_SPEED * SIM_DT,
            lane: latch.current(),
        };
        let outcome = match advance(&mut state, &input) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("tick rejected: {e}");
                std::process::exit(1);
            }
        };
        ticks += 1;

        for event in &outcome.events {
            log::info!(
                "Gate {}: lane {} {:?} {} -> score {} ({:+})",
                event.gate_id,
                event.lane.0,
                event.kind,
                event.operand,
                event.score_after,
                event.delta
            );
        }
        if outcome.just_finished {
            break;
        }
        // Safety net if a window-only config strands a gate
        if ticks > 100_000 {
            let unresolved = state.gates().len() - state.resolved().len();
            log::warn!("run never finished; {unresolved} gates unresolved");
            break;
        }
    }

    let snapshot = state.snapshot();
    println!(
        "Final score: {} ({} of {} gates, {} ticks)",
        snapshot.score, snapshot.resolved_count, snapshot.total_gates, ticks
    );
}
