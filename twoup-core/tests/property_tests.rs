//! Property tests for engine invariants.
//!
//! Uses proptest to verify:
//! 1. Terminal reasons: every session ends for exactly one listed reason
//!    and never plays past its round limit
//! 2. Peak accounting: peak >= initial and peak >= final
//! 3. Martingale rule: losses multiply by exactly the factor, wins reset
//! 4. Whole-stake settlement: bankroll moves by base * m^k per round

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use twoup_core::{
    RoundOutcome, SessionConfig, SessionSimulator, StopPolicy, TerminalReason, WagerController,
};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_stake() -> impl Strategy<Value = f64> {
    prop::sample::select(vec![1.0, 5.0, 10.0, 20.0, 25.0, 50.0])
}

fn arb_policy() -> impl Strategy<Value = StopPolicy> {
    prop_oneof![
        (1u32..200).prop_map(|rounds| StopPolicy::FixedBox { rounds }),
        (1u32..200).prop_map(|safety_cap| StopPolicy::Unlimited { safety_cap }),
    ]
}

fn arb_config() -> impl Strategy<Value = SessionConfig> {
    (
        100.0..5000.0_f64,
        arb_stake(),
        prop::sample::select(vec![1.5, 2.0, 3.0]),
        0.05..=1.0_f64,
        0.0..0.9_f64,
        arb_policy(),
    )
        .prop_map(|(bankroll, stake, multiplier, p, q, policy)| {
            SessionConfig::new((bankroll * 100.0).round() / 100.0, stake, policy)
                .with_loss_multiplier(multiplier)
                .with_win_probability(p)
                .with_retoss_probability(q)
        })
}

fn arb_outcomes() -> impl Strategy<Value = Vec<RoundOutcome>> {
    prop::collection::vec(
        prop_oneof![Just(RoundOutcome::Win), Just(RoundOutcome::Loss)],
        1..40,
    )
}

// ── 1 & 2. Session invariants ────────────────────────────────────────

proptest! {
    #[test]
    fn session_ends_with_a_valid_reason(config in arb_config(), seed in any::<u64>()) {
        let limit = config.stop_policy.round_limit();
        let sim = SessionSimulator::new(config.clone()).unwrap();
        let result = sim.run(&mut StdRng::seed_from_u64(seed)).unwrap();

        prop_assert!(result.rounds_played <= limit);
        match result.terminal_reason {
            TerminalReason::BoxExhausted => {
                prop_assert!(matches!(config.stop_policy, StopPolicy::FixedBox { .. }), "expected FixedBox stop policy");
                prop_assert_eq!(result.rounds_played, limit);
                prop_assert!(result.bust_round.is_none());
            }
            TerminalReason::SafetyCapReached => {
                prop_assert!(matches!(config.stop_policy, StopPolicy::Unlimited { .. }), "expected Unlimited stop policy");
                prop_assert_eq!(result.rounds_played, limit);
                prop_assert!(result.bust_round.is_none());
            }
            TerminalReason::Busted => {
                prop_assert_eq!(result.bust_round, Some(result.rounds_played));
                prop_assert!(result.rounds_played < limit);
            }
        }
    }

    #[test]
    fn peak_bounds_initial_and_final(config in arb_config(), seed in any::<u64>()) {
        let sim = SessionSimulator::new(config).unwrap();
        let result = sim.run(&mut StdRng::seed_from_u64(seed)).unwrap();

        prop_assert!(result.peak_bankroll >= result.initial_bankroll);
        prop_assert!(result.peak_bankroll >= result.final_bankroll);
        prop_assert!(result.peak_profit() >= 0.0);
    }

    #[test]
    fn bankroll_never_goes_negative(config in arb_config(), seed in any::<u64>()) {
        let sim = SessionSimulator::new(config).unwrap();
        let result = sim.run(&mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert!(result.final_bankroll >= -1e-9);
    }
}

// ── 3 & 4. Martingale rule ───────────────────────────────────────────

proptest! {
    #[test]
    fn losses_multiply_and_wins_reset(
        stake in arb_stake(),
        multiplier in prop::sample::select(vec![2.0, 4.0]),
        outcomes in arb_outcomes(),
    ) {
        let mut wager = WagerController::new(stake, multiplier);
        for outcome in outcomes {
            let before = wager.current_stake();
            wager.record(outcome);
            match outcome {
                RoundOutcome::Loss => {
                    // Power-of-two multipliers stay exact in f64.
                    prop_assert_eq!(wager.current_stake(), before * multiplier);
                }
                RoundOutcome::Win => {
                    prop_assert_eq!(wager.current_stake(), stake);
                    prop_assert_eq!(wager.consecutive_losses(), 0);
                }
            }
        }
    }

    #[test]
    fn stake_matches_closed_form(
        stake in arb_stake(),
        multiplier in 1.01..3.0_f64,
        outcomes in arb_outcomes(),
    ) {
        let mut wager = WagerController::new(stake, multiplier);
        for outcome in outcomes {
            wager.record(outcome);
            let k = wager.consecutive_losses() as i32;
            let expected = stake * multiplier.powi(k);
            prop_assert!((wager.current_stake() - expected).abs() <= expected * 1e-12);
        }
    }
}
