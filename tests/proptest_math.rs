//! Property-based tests (proptest) for boost round math.
//!
//! These test with u64 production types across wide ranges.
//! They can't prove exhaustively (unlike Kani), but they test
//! millions of random inputs including production-scale values.

use proptest::prelude::*;

const RATE_SCALE: u64 = 1_000_000;

// Mirror production functions exactly (from src/math.rs)
fn reward_amount(risk_fee: u64, reward_rate: u64) -> Option<u64> {
    let reward = (risk_fee as u128)
        .checked_mul(reward_rate as u128)?
        .checked_div(RATE_SCALE as u128)?;
    if reward > u64::MAX as u128 { None } else { Some(reward as u64) }
}

fn protocol_cut(remaining: u64, protocol_fee: u64) -> Option<u64> {
    let cut = (remaining as u128)
        .checked_mul(protocol_fee as u128)?
        .checked_div(RATE_SCALE as u128)?;
    if cut > remaining as u128 { None } else { Some(cut as u64) }
}

fn fee_delta(current: u64, baseline: u64) -> Option<u64> {
    current.checked_sub(baseline)
}

fn debit_remaining(remaining: u64, amount: u64) -> Option<u64> {
    remaining.checked_sub(amount)
}

fn claim_gate_open(now: i64, stake_start: i64, min_staked_time: i64) -> bool {
    now.saturating_sub(stake_start) >= min_staked_time
}

fn time_weighted_avg_tick(cum_start: i64, cum_end: i64, interval: i64) -> Option<i32> {
    if interval <= 0 {
        return None;
    }
    let delta = cum_end.checked_sub(cum_start)?;
    let mut tick = delta / interval;
    if delta < 0 && delta % interval != 0 {
        tick -= 1;
    }
    if tick < -887_272 || tick > 887_272 {
        return None;
    }
    Some(tick as i32)
}

// ═══════════════════════════════════════════════════════════════
// Property Tests
// ═══════════════════════════════════════════════════════════════

proptest! {
    // ── Solvency ──

    #[test]
    fn prop_rewards_never_exceed_deposit(
        deposit in 0u64..u64::MAX,
        amounts in prop::collection::vec(0u64..1_000_000_000, 0..32),
    ) {
        // A sequence of debits through the solvency gate can never pay
        // out more than the locked deposit, no matter how it ends.
        let mut remaining = deposit;
        let mut paid: u128 = 0;
        for a in amounts {
            match debit_remaining(remaining, a) {
                Some(r) => {
                    remaining = r;
                    paid += a as u128;
                }
                None => break,
            }
        }
        prop_assert!(paid <= deposit as u128);
        prop_assert_eq!(paid + remaining as u128, deposit as u128);
    }

    #[test]
    fn prop_debit_exact_inverse(
        remaining in 0u64..u64::MAX,
        amount in 0u64..u64::MAX,
    ) {
        match debit_remaining(remaining, amount) {
            Some(r) => prop_assert_eq!(r + amount, remaining),
            None => prop_assert!(amount > remaining),
        }
    }

    // ── Reward rounding ──

    #[test]
    fn prop_reward_truncates_down(
        fee in 0u64..u64::MAX,
        rate in 0u64..100_000_000,
    ) {
        if let Some(reward) = reward_amount(fee, rate) {
            // reward = floor(fee * rate / SCALE): never rounds up
            let exact = (fee as u128) * (rate as u128);
            prop_assert!((reward as u128) * (RATE_SCALE as u128) <= exact);
            prop_assert!(exact - (reward as u128) * (RATE_SCALE as u128) < RATE_SCALE as u128);
        }
    }

    #[test]
    fn prop_reward_monotonic_in_fee(
        fee in 0u64..1_000_000_000_000,
        rate in 0u64..100_000_000,
    ) {
        let a = reward_amount(fee, rate).unwrap();
        let b = reward_amount(fee + 1, rate).unwrap();
        prop_assert!(b >= a);
    }

    #[test]
    fn prop_reward_identity_rate(fee in 0u64..u64::MAX) {
        // rate == SCALE pays exactly the fee
        prop_assert_eq!(reward_amount(fee, RATE_SCALE), Some(fee));
    }

    // ── Close settlement ──

    #[test]
    fn prop_close_split_conserves(
        remaining in 0u64..u64::MAX,
        fee in 0u64..=RATE_SCALE,
    ) {
        let cut = protocol_cut(remaining, fee).unwrap();
        prop_assert!(cut <= remaining);
        // cut + refund reconstructs the remaining deposit exactly
        let refund = remaining - cut;
        prop_assert_eq!(cut + refund, remaining);
    }

    #[test]
    fn prop_protocol_cut_monotonic_in_fee(
        remaining in 0u64..u64::MAX,
        fee in 0u64..RATE_SCALE,
    ) {
        let a = protocol_cut(remaining, fee).unwrap();
        let b = protocol_cut(remaining, fee + 1).unwrap();
        prop_assert!(b >= a);
    }

    // ── Fee deltas ──

    #[test]
    fn prop_fee_delta_settles_to_snapshot(
        baseline in 0u64..u64::MAX,
        growth in 0u64..1_000_000_000,
    ) {
        // current = baseline + growth; advancing the baseline by the
        // delta makes the next delta zero
        let current = match baseline.checked_add(growth) {
            Some(v) => v, None => return Ok(()),
        };
        let delta = fee_delta(current, baseline).unwrap();
        prop_assert_eq!(delta, growth);
        prop_assert_eq!(fee_delta(current, baseline + delta), Some(0));
    }

    #[test]
    fn prop_fee_delta_rejects_regression(
        current in 0u64..u64::MAX,
        baseline in 0u64..u64::MAX,
    ) {
        match fee_delta(current, baseline) {
            Some(d) => prop_assert_eq!(baseline + d, current),
            None => prop_assert!(current < baseline),
        }
    }

    // ── Time gate ──

    #[test]
    fn prop_gate_threshold_exact(
        start in 0i64..1_000_000_000_000,
        min in 0i64..1_000_000_000,
    ) {
        prop_assert!(claim_gate_open(start + min, start, min));
        if min > 0 {
            prop_assert!(!claim_gate_open(start + min - 1, start, min));
        }
    }

    #[test]
    fn prop_gate_never_closes_once_open(
        start in 0i64..1_000_000_000,
        min in 0i64..1_000_000_000,
        extra in 0i64..1_000_000_000,
    ) {
        if claim_gate_open(start + min, start, min) {
            prop_assert!(claim_gate_open(start + min + extra, start, min));
        }
    }

    // ── TWAP ──

    #[test]
    fn prop_twap_of_constant_tick_is_that_tick(
        tick in -887_272i64..=887_272,
        interval in 1i64..10_000_000,
    ) {
        // A pool pinned at one tick has cum_end - cum_start = tick * interval
        let delta = tick * interval;
        prop_assert_eq!(time_weighted_avg_tick(0, delta, interval), Some(tick as i32));
    }

    #[test]
    fn prop_twap_floor_rounds_toward_negative(
        cum_start in -1_000_000_000i64..1_000_000_000,
        cum_end in -1_000_000_000i64..1_000_000_000,
        interval in 1i64..100_000,
    ) {
        if let Some(tick) = time_weighted_avg_tick(cum_start, cum_end, interval) {
            let delta = cum_end - cum_start;
            // floor: tick * interval <= delta < (tick + 1) * interval
            prop_assert!((tick as i64) * interval <= delta);
            prop_assert!(delta < (tick as i64 + 1) * interval);
        }
    }

    #[test]
    fn prop_twap_rejects_nonpositive_interval(
        cum_start in -1_000_000i64..1_000_000,
        cum_end in -1_000_000i64..1_000_000,
        interval in -100_000i64..=0,
    ) {
        prop_assert_eq!(time_weighted_avg_tick(cum_start, cum_end, interval), None);
    }
}
