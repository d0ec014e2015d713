use bytemuck::{Pod, Zeroable};
use solana_program::pubkey::Pubkey;

use crate::error::BoostError;
use crate::math;

/// Round status values. 0 means the account has never held a round.
pub const ROUND_UNINITIALIZED: u8 = 0;
pub const ROUND_ACTIVE: u8 = 1;
pub const ROUND_CLOSED: u8 = 2;
pub const ROUND_LIQUIDATED: u8 = 3;

/// Healthy-asset allowlist capacity.
pub const HEALTHY_ASSET_CAPACITY: usize = 16;

/// Global program configuration — one per deployment.
/// PDA seeds: [b"boost_config"]
///
/// Holds the fee configuration, the protocol-wide timing parameters,
/// and the owner-curated allowlist of reference assets eligible as
/// insurance collateral. Membership is checked only at round-open time;
/// removing an asset later does not break an open round.
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
#[repr(C)]
pub struct BoostConfig {
    /// Whether the config is initialized (1 = yes, 0 = no)
    pub is_initialized: u8,

    /// Bump seed for the config PDA
    pub bump: u8,

    /// Padding for alignment
    pub _padding: [u8; 6],

    /// Config owner (allowlist and fee-config mutation)
    pub owner: [u8; 32],

    /// Protocol fee payout address (owner of the fee token accounts)
    pub protocol_vault: [u8; 32],

    /// The external CLMM program whose pools and positions we accept
    pub amm_program: [u8; 32],

    /// Protocol fee in ppm (scale 1_000_000), taken at normal close
    pub protocol_fee: u64,

    /// Minimum `end_time - now` for a new round, in seconds
    pub min_boost_period: i64,

    /// Minimum staked time before a claim pays anything, in seconds
    pub min_staked_time: i64,

    /// Trailing TWAP window for liquidation checks, in seconds
    pub twap_interval: i64,

    /// Number of live entries in `healthy_assets`
    pub healthy_asset_count: u64,

    /// Approved reference-asset mints (first `healthy_asset_count` slots)
    pub healthy_assets: [[u8; 32]; HEALTHY_ASSET_CAPACITY],

    /// Reserved for future use
    pub _reserved: [u8; 64],
}

/// Size of BoostConfig in bytes
pub const BOOST_CONFIG_SIZE: usize = core::mem::size_of::<BoostConfig>();

/// Boost-round state — one account per pool, reused across rounds.
/// PDA seeds: [b"boost_round", pool_pubkey]
///
/// At most one Active round per pool, enforced structurally: opening a
/// round overwrites this account and is rejected while `status` is
/// Active. Closed and Liquidated are terminal for the round they end.
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
#[repr(C)]
pub struct BoostRound {
    /// Whether the account has ever been written (1 = yes)
    pub is_initialized: u8,

    /// Bump seed for the round PDA
    pub bump: u8,

    /// Bump seed for the round authority PDA (vault + custody owner)
    pub authority_bump: u8,

    /// Round status (ROUND_ACTIVE / ROUND_CLOSED / ROUND_LIQUIDATED)
    pub status: u8,

    /// 1 if the risk asset is the pool's token0
    pub risk_is_token0: u8,

    /// Padding for alignment
    pub _padding: [u8; 3],

    /// The CLMM pool this round boosts
    pub pool: [u8; 32],

    /// The project that opened the round (receives settlement)
    pub project: [u8; 32],

    /// The project's token being boosted
    pub risk_mint: [u8; 32],

    /// The allowlisted reference asset posted as insurance
    pub ref_mint: [u8; 32],

    /// Vault holding the locked boost deposit (risk mint)
    pub boost_vault: [u8; 32],

    /// Vault holding the insurance deposit (ref mint)
    pub insurance_vault: [u8; 32],

    /// Boost deposit supplied at open (immutable for the round)
    pub boost_amount: u64,

    /// Remaining boost deposit; every reward claim debits this
    pub boost_amount_remaining: u64,

    /// Insurance deposit supplied at open
    pub insurance_amount: u64,

    /// Reward multiplier in ppm (3_000_000 = 3x the risk-side fee)
    pub reward_rate: u64,

    /// Liquidation trigger tick, in the pool's canonical orientation
    pub insurance_tick: i32,

    /// Padding for alignment
    pub _padding2: [u8; 4],

    /// Round open timestamp
    pub start_time: i64,

    /// Round expiry; close is permitted from here on
    pub end_time: i64,

    /// Reserved for future use
    pub _reserved: [u8; 64],
}

/// Size of BoostRound in bytes
pub const BOOST_ROUND_SIZE: usize = core::mem::size_of::<BoostRound>();

/// Staked-position record — one per custodied position.
/// PDA seeds: [b"staked_position", position_mint]
///
/// Created on stake, baselines advanced on each claim, zeroed on
/// unstake. Re-staking after unstake re-initializes with fresh
/// baselines. The round open timestamp is stamped at stake time so a
/// stake that outlives its round cannot claim against a successor
/// round on the same pool.
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
#[repr(C)]
pub struct StakedPosition {
    /// Whether this record is live (1 = staked)
    pub is_initialized: u8,

    /// Bump seed for the stake PDA
    pub bump: u8,

    /// Padding
    pub _padding: [u8; 6],

    /// The custodied position's mint (its identifier in the AMM)
    pub position_mint: [u8; 32],

    /// The staking user; custody returns only to them
    pub owner: [u8; 32],

    /// The pool (and therefore the round) this stake is against
    pub pool: [u8; 32],

    /// Stake timestamp — start of the claim time gate
    pub stake_start_time: i64,

    /// Cumulative token0 fees settled up to the last claim
    pub fee_baseline_0: u64,

    /// Cumulative token1 fees settled up to the last claim
    pub fee_baseline_1: u64,

    /// `start_time` of the round this stake was recorded against;
    /// claims require it to match the pool's current round
    pub round_start_time: i64,

    /// Reserved for future use
    pub _reserved: [u8; 56],
}

/// Size of StakedPosition in bytes
pub const STAKED_POSITION_SIZE: usize = core::mem::size_of::<StakedPosition>();

impl BoostConfig {
    pub fn owner_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.owner)
    }

    pub fn protocol_vault_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.protocol_vault)
    }

    pub fn amm_program_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.amm_program)
    }

    /// Allowlist membership check, read at round-open time only.
    pub fn is_healthy_asset(&self, mint: &[u8; 32]) -> bool {
        let count = (self.healthy_asset_count as usize).min(HEALTHY_ASSET_CAPACITY);
        self.healthy_assets[..count].iter().any(|m| m == mint)
    }

    /// Add a mint to the allowlist. Idempotent for present entries.
    pub fn add_healthy_asset(&mut self, mint: &[u8; 32]) -> Result<(), BoostError> {
        if self.is_healthy_asset(mint) {
            return Ok(());
        }
        let count = self.healthy_asset_count as usize;
        if count >= HEALTHY_ASSET_CAPACITY {
            return Err(BoostError::RegistryFull);
        }
        self.healthy_assets[count] = *mint;
        self.healthy_asset_count += 1;
        Ok(())
    }

    /// Remove a mint from the allowlist (swap-remove). Absent entries
    /// are a no-op; open rounds are unaffected either way.
    pub fn remove_healthy_asset(&mut self, mint: &[u8; 32]) {
        let count = (self.healthy_asset_count as usize).min(HEALTHY_ASSET_CAPACITY);
        if let Some(idx) = self.healthy_assets[..count].iter().position(|m| m == mint) {
            self.healthy_assets[idx] = self.healthy_assets[count - 1];
            self.healthy_assets[count - 1] = [0u8; 32];
            self.healthy_asset_count -= 1;
        }
    }
}

impl BoostRound {
    pub fn pool_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.pool)
    }

    pub fn project_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.project)
    }

    pub fn risk_mint_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.risk_mint)
    }

    pub fn ref_mint_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.ref_mint)
    }

    pub fn is_active(&self) -> bool {
        self.status == ROUND_ACTIVE
    }

    /// Decrease the remaining boost deposit for a reward payout.
    /// The hard solvency gate: cumulative rewards can never exceed the
    /// deposit locked at open.
    pub fn debit_reward(&mut self, amount: u64) -> Result<(), BoostError> {
        self.boost_amount_remaining = math::debit_remaining(self.boost_amount_remaining, amount)
            .ok_or(BoostError::InsufficientLockedDeposit)?;
        Ok(())
    }

    /// Normal-close settlement split of the remaining deposit.
    ///
    /// # Returns
    /// (protocol_cut, project_refund) with cut + refund == remaining
    pub fn close_split(&self, protocol_fee: u64) -> Option<(u64, u64)> {
        let cut = math::protocol_cut(self.boost_amount_remaining, protocol_fee)?;
        Some((cut, self.boost_amount_remaining - cut))
    }
}

/// Derive the config PDA.
pub fn derive_config_pda(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[b"boost_config"], program_id)
}

/// Derive the round PDA for a pool.
pub fn derive_round_pda(program_id: &Pubkey, pool: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[b"boost_round", pool.as_ref()], program_id)
}

/// Derive the round authority PDA for a round.
/// Owns the boost/insurance vault token accounts and custodies staked
/// positions in the AMM.
pub fn derive_round_authority(program_id: &Pubkey, round: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[b"round_auth", round.as_ref()], program_id)
}

/// Derive the per-position stake PDA.
pub fn derive_stake_pda(program_id: &Pubkey, position_mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[b"staked_position", position_mint.as_ref()], program_id)
}
