//! Pure boost-round math — reward accrual, settlement splits, TWAP ticks.
//!
//! No Solana/Pubkey dependencies. Just arithmetic. Everything here is
//! deterministic and checked; callers map `None` to a program error.

/// Fixed-point denominator for `reward_rate` and `protocol_fee`.
pub const RATE_SCALE: u64 = 1_000_000;

/// Tick domain bounds of the CLMM price space.
pub const MIN_TICK: i32 = -887_272;
pub const MAX_TICK: i32 = 887_272;

/// Bonus reward for a claim.
///
/// `reward = risk_fee * reward_rate / 1_000_000`, truncating. A rate
/// above the scale is a multiplier (3_000_000 = 3x).
///
/// # Returns
/// * `Some(reward)` — fits in u64
/// * `None` — result exceeds u64 (caller rejects as overflow)
pub fn reward_amount(risk_fee: u64, reward_rate: u64) -> Option<u64> {
    let reward = (risk_fee as u128)
        .checked_mul(reward_rate as u128)?
        .checked_div(RATE_SCALE as u128)?;
    if reward > u64::MAX as u128 {
        None
    } else {
        Some(reward as u64)
    }
}

/// Protocol cut taken from the remaining boost deposit at normal close.
///
/// `cut = remaining * protocol_fee / 1_000_000`, truncating. With
/// `protocol_fee <= RATE_SCALE` (enforced at config time) the cut never
/// exceeds `remaining`.
pub fn protocol_cut(remaining: u64, protocol_fee: u64) -> Option<u64> {
    let cut = (remaining as u128)
        .checked_mul(protocol_fee as u128)?
        .checked_div(RATE_SCALE as u128)?;
    if cut > remaining as u128 {
        None
    } else {
        Some(cut as u64)
    }
}

/// Newly accrued fees since the last settled baseline.
///
/// The AMM's per-position fee counters are lifetime-cumulative and
/// monotonic; a snapshot that moved backwards means the account is not
/// the one we baselined against.
pub fn fee_delta(current: u64, baseline: u64) -> Option<u64> {
    current.checked_sub(baseline)
}

/// Solvency-gated debit of the round's locked deposit.
///
/// # Returns
/// * `Some(new_remaining)` — debit applied
/// * `None` — amount exceeds remaining; the claim must abort whole
pub fn debit_remaining(remaining: u64, amount: u64) -> Option<u64> {
    remaining.checked_sub(amount)
}

/// Anti-flash-stake gate. Claims before the minimum staked time pay
/// nothing and must not advance baselines.
pub fn claim_gate_open(now: i64, stake_start: i64, min_staked_time: i64) -> bool {
    now.saturating_sub(stake_start) >= min_staked_time
}

/// Pick the fee accrued on the risk-asset side of the pair.
pub fn risk_side_fee(delta_0: u64, delta_1: u64, risk_is_token0: bool) -> u64 {
    if risk_is_token0 {
        delta_0
    } else {
        delta_1
    }
}

/// Liquidation predicate.
///
/// Tick is the log-price of token0 in token1. If the risk asset is
/// token0 it devalues as the tick falls; if it is token1 it devalues as
/// the tick rises. The insurance tick is stored in the pool's canonical
/// orientation, so the breach direction flips with the risk side.
pub fn price_breached(twap_tick: i32, insurance_tick: i32, risk_is_token0: bool) -> bool {
    if risk_is_token0 {
        twap_tick <= insurance_tick
    } else {
        twap_tick >= insurance_tick
    }
}

/// Time-weighted average tick over `interval` seconds, from two
/// cumulative-tick samples. Rounds toward negative infinity, matching
/// the CLMM's own observation arithmetic.
///
/// # Returns
/// * `Some(tick)` — average within the valid tick domain
/// * `None` — zero/negative interval or out-of-domain result
pub fn time_weighted_avg_tick(cum_start: i64, cum_end: i64, interval: i64) -> Option<i32> {
    if interval <= 0 {
        return None;
    }
    let delta = cum_end.checked_sub(cum_start)?;
    let mut tick = delta / interval;
    if delta < 0 && delta % interval != 0 {
        tick -= 1;
    }
    if tick < MIN_TICK as i64 || tick > MAX_TICK as i64 {
        return None;
    }
    Some(tick as i32)
}

/// Linear interpolation of the cumulative tick between two stored
/// observations. Requires `t0 <= t <= t1` and `t0 < t1`.
pub fn interpolate_tick_cumulative(t0: i64, c0: i64, t1: i64, c1: i64, t: i64) -> Option<i64> {
    if t < t0 || t > t1 || t0 >= t1 {
        return None;
    }
    let span = (t1 - t0) as i128;
    let elapsed = (t - t0) as i128;
    let c = (c0 as i128).checked_add((c1 as i128).checked_sub(c0 as i128)?.checked_mul(elapsed)? / span)?;
    if c > i64::MAX as i128 || c < i64::MIN as i128 {
        None
    } else {
        Some(c as i64)
    }
}

/// Extrapolation of the cumulative tick past the newest observation,
/// assuming the pool's current tick held since then.
pub fn extrapolate_tick_cumulative(t_last: i64, c_last: i64, tick_current: i32, t: i64) -> Option<i64> {
    if t < t_last {
        return None;
    }
    let grown = (tick_current as i128).checked_mul((t - t_last) as i128)?;
    let c = (c_last as i128).checked_add(grown)?;
    if c > i64::MAX as i128 || c < i64::MIN as i128 {
        None
    } else {
        Some(c as i64)
    }
}
