//! Read-side views of the external CLMM program's accounts.
//!
//! The AMM is a collaborator, not part of this program: we deserialize
//! its pool and position accounts to read mints, ticks, observation
//! history, and per-position fee counters. Layouts match the CLMM's
//! account encoding the same way `cpi.rs` matches its instruction tags.

use bytemuck::{Pod, Zeroable};
use solana_program::{account_info::AccountInfo, program_error::ProgramError, pubkey::Pubkey};

use crate::error::BoostError;
use crate::math;

/// Capacity of the pool's observation ring buffer.
pub const OBSERVATION_CAPACITY: usize = 128;

/// One price observation: the pool appends (timestamp, cumulative tick)
/// pairs as trades move the price.
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
#[repr(C)]
pub struct Observation {
    /// Unix timestamp of the observation
    pub timestamp: i64,

    /// Running sum of (tick × seconds) since pool creation
    pub tick_cumulative: i64,
}

/// CLMM pool account view.
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
#[repr(C)]
pub struct AmmPool {
    /// Token pair, canonical order
    pub token_0_mint: [u8; 32],
    pub token_1_mint: [u8; 32],

    /// Current price tick
    pub tick_current: i32,

    /// Tick spacing of the fee tier
    pub tick_spacing: i32,

    /// Ring index of the newest observation
    pub observation_index: u32,

    /// Number of populated observations (≤ capacity)
    pub observation_count: u32,

    /// Observation ring buffer; chronological starting at the oldest
    pub observations: [Observation; OBSERVATION_CAPACITY],
}

/// Size of AmmPool in bytes
pub const AMM_POOL_SIZE: usize = core::mem::size_of::<AmmPool>();

/// CLMM position account view.
///
/// `fees_earned_*` are lifetime-cumulative counters maintained by the
/// AMM; they only grow. We snapshot them as baselines at stake time and
/// settle deltas on each claim.
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
#[repr(C)]
pub struct AmmPosition {
    /// The position's mint — its identifier in the AMM
    pub position_mint: [u8; 32],

    /// The pool this position provides liquidity to
    pub pool: [u8; 32],

    /// Current custody authority (transferable via the position manager)
    pub authority: [u8; 32],

    /// Lifetime token0 fees accrued to this position
    pub fees_earned_0: u64,

    /// Lifetime token1 fees accrued to this position
    pub fees_earned_1: u64,
}

/// Size of AmmPosition in bytes
pub const AMM_POSITION_SIZE: usize = core::mem::size_of::<AmmPosition>();

impl AmmPool {
    pub fn token_0_mint_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.token_0_mint)
    }

    pub fn token_1_mint_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.token_1_mint)
    }

    /// Ring slot of the k-th oldest populated observation.
    fn ring_slot(&self, k: usize) -> usize {
        let count = self.observation_count as usize;
        if count < OBSERVATION_CAPACITY {
            // Not yet wrapped: slots 0..count in write order
            k
        } else {
            (self.observation_index as usize + 1 + k) % OBSERVATION_CAPACITY
        }
    }

    /// Cumulative tick at time `t`, interpolating between stored
    /// observations and extrapolating past the newest with the current
    /// tick. Fails when `t` predates the oldest stored observation.
    pub fn tick_cumulative_at(&self, t: i64) -> Result<i64, BoostError> {
        let count = (self.observation_count as usize).min(OBSERVATION_CAPACITY);
        if count == 0 {
            return Err(BoostError::InsufficientOracleHistory);
        }

        let oldest = self.observations[self.ring_slot(0)];
        if t < oldest.timestamp {
            return Err(BoostError::InsufficientOracleHistory);
        }

        let newest = self.observations[self.ring_slot(count - 1)];
        if t >= newest.timestamp {
            return math::extrapolate_tick_cumulative(
                newest.timestamp,
                newest.tick_cumulative,
                self.tick_current,
                t,
            )
            .ok_or(BoostError::Overflow);
        }

        // t falls strictly inside the stored window: find the last
        // observation at or before t and interpolate to its successor.
        let mut before = oldest;
        let mut after = newest;
        for k in 0..count {
            let obs = self.observations[self.ring_slot(k)];
            if obs.timestamp <= t {
                before = obs;
            } else {
                after = obs;
                break;
            }
        }
        if before.timestamp == t {
            return Ok(before.tick_cumulative);
        }
        math::interpolate_tick_cumulative(
            before.timestamp,
            before.tick_cumulative,
            after.timestamp,
            after.tick_cumulative,
            t,
        )
        .ok_or(BoostError::Overflow)
    }

    /// Time-weighted average tick over the trailing `interval` seconds.
    pub fn twap_tick(&self, now: i64, interval: i64) -> Result<i32, BoostError> {
        let start = now
            .checked_sub(interval)
            .ok_or(BoostError::Overflow)?;
        let cum_start = self.tick_cumulative_at(start)?;
        let cum_end = self.tick_cumulative_at(now)?;
        math::time_weighted_avg_tick(cum_start, cum_end, interval).ok_or(BoostError::Overflow)
    }
}

/// Borrow a pool view from an account, validating the owning program
/// and the exact account size.
pub fn load_pool<'a>(
    info: &AccountInfo,
    amm_program: &Pubkey,
    data: &'a [u8],
) -> Result<&'a AmmPool, ProgramError> {
    if info.owner != amm_program {
        return Err(BoostError::InvalidAmmProgram.into());
    }
    if data.len() < AMM_POOL_SIZE {
        return Err(ProgramError::InvalidAccountData);
    }
    Ok(bytemuck::from_bytes(&data[..AMM_POOL_SIZE]))
}

/// Borrow a position view from an account, validating the owning
/// program and the exact account size.
pub fn load_position<'a>(
    info: &AccountInfo,
    amm_program: &Pubkey,
    data: &'a [u8],
) -> Result<&'a AmmPosition, ProgramError> {
    if info.owner != amm_program {
        return Err(BoostError::InvalidAmmProgram.into());
    }
    if data.len() < AMM_POSITION_SIZE {
        return Err(ProgramError::InvalidAccountData);
    }
    Ok(bytemuck::from_bytes(&data[..AMM_POSITION_SIZE]))
}
