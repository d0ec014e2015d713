//! Handler account-validation tests.
//!
//! Drives the processor directly with hand-built accounts and verifies
//! that forged or stale accounts are rejected before any state change.
//! Account data buffers are backed by the Pod structs themselves so the
//! 8-byte alignment bytemuck requires holds off-chain too.

use bytemuck::Zeroable;
use clmm_boost::error::BoostError;
use clmm_boost::processor;
use clmm_boost::state::{self, BoostConfig, BoostRound, StakedPosition, ROUND_ACTIVE};
use solana_program::account_info::AccountInfo;
use solana_program::program_error::ProgramError;
use solana_program::pubkey::Pubkey;

const TAG_CLAIM: u8 = 7;
const TAG_LIQUIDATE: u8 = 8;

// ═══════════════════════════════════════════════════════════════
// Forged config account
// ═══════════════════════════════════════════════════════════════

#[test]
fn test_liquidate_rejects_forged_config() {
    let program_id = Pubkey::new_unique();
    let attacker_program = Pubkey::new_unique();
    let system = solana_program::system_program::id();

    // A genuine Active round, price nowhere near its insurance tick
    let pool_key = Pubkey::new_unique();
    let (round_key, _) = state::derive_round_pda(&program_id, &pool_key);
    let mut round = BoostRound::zeroed();
    round.is_initialized = 1;
    round.status = ROUND_ACTIVE;
    round.pool = pool_key.to_bytes();
    round.boost_amount = 10_000;
    round.boost_amount_remaining = 10_000;
    round.insurance_amount = 5_000;
    round.insurance_tick = -800_000;

    // A config forged by the attacker: their own program as owner,
    // themselves as protocol vault, at an address of their choosing
    let forged_key = Pubkey::new_unique();
    let mut forged = BoostConfig::zeroed();
    forged.is_initialized = 1;
    forged.protocol_vault = Pubkey::new_unique().to_bytes();
    forged.amm_program = attacker_program.to_bytes();

    let caller_key = Pubkey::new_unique();
    let k_pool = pool_key;
    let k_auth = Pubkey::new_unique();
    let k_boost_vault = Pubkey::new_unique();
    let k_ins_vault = Pubkey::new_unique();
    let k_attacker_ata = Pubkey::new_unique();
    let k_project_ata = Pubkey::new_unique();
    let k_token = Pubkey::new_unique();
    let k_clock = Pubkey::new_unique();

    let mut caller_lam = 0u64;
    let mut config_lam = 0u64;
    let mut round_lam = 0u64;
    let mut other_lams = [0u64; 8];

    let mut caller_data: Vec<u8> = vec![];
    let mut pool_data: Vec<u8> = vec![];
    let mut auth_data: Vec<u8> = vec![];
    let mut bv_data: Vec<u8> = vec![];
    let mut iv_data: Vec<u8> = vec![];
    let mut aata_data: Vec<u8> = vec![];
    let mut pata_data: Vec<u8> = vec![];
    let mut token_data: Vec<u8> = vec![];
    let mut clock_data: Vec<u8> = vec![];

    let result = {
        let [l0, l1, l2, l3, l4, l5, l6, l7] = &mut other_lams;
        let accounts = vec![
            AccountInfo::new(&caller_key, true, false, &mut caller_lam, &mut caller_data, &system, false, 0),
            AccountInfo::new(&forged_key, false, false, &mut config_lam, bytemuck::bytes_of_mut(&mut forged), &attacker_program, false, 0),
            AccountInfo::new(&round_key, false, true, &mut round_lam, bytemuck::bytes_of_mut(&mut round), &program_id, false, 0),
            AccountInfo::new(&k_pool, false, false, l0, &mut pool_data, &attacker_program, false, 0),
            AccountInfo::new(&k_auth, false, false, l1, &mut auth_data, &system, false, 0),
            AccountInfo::new(&k_boost_vault, false, true, l2, &mut bv_data, &system, false, 0),
            AccountInfo::new(&k_ins_vault, false, true, l3, &mut iv_data, &system, false, 0),
            AccountInfo::new(&k_attacker_ata, false, true, l4, &mut aata_data, &system, false, 0),
            AccountInfo::new(&k_project_ata, false, true, l5, &mut pata_data, &system, false, 0),
            AccountInfo::new(&k_token, false, false, l6, &mut token_data, &system, false, 0),
            AccountInfo::new(&k_clock, false, false, l7, &mut clock_data, &system, false, 0),
        ];
        processor::process(&program_id, &accounts, &[TAG_LIQUIDATE])
    };

    assert_eq!(
        result,
        Err(ProgramError::Custom(BoostError::InvalidPda as u32)),
        "forged config must be rejected before the oracle is consulted"
    );
    // The round is untouched: still Active, deposits intact
    assert_eq!(round.status, ROUND_ACTIVE);
    assert_eq!(round.boost_amount_remaining, 10_000);
    assert_eq!(round.insurance_amount, 5_000);
}

#[test]
fn test_claim_rejects_forged_config() {
    let program_id = Pubkey::new_unique();
    let attacker_program = Pubkey::new_unique();
    let system = solana_program::system_program::id();

    // Forged config with min_staked_time = 0 and a fake AMM program,
    // the setup for claiming against fabricated position fees
    let forged_key = Pubkey::new_unique();
    let mut forged = BoostConfig::zeroed();
    forged.is_initialized = 1;
    forged.amm_program = attacker_program.to_bytes();

    let owner_key = Pubkey::new_unique();
    let keys: Vec<Pubkey> = (0..12).map(|_| Pubkey::new_unique()).collect();
    let mut owner_lam = 0u64;
    let mut config_lam = 0u64;
    let mut lams = [0u64; 12];
    let mut datas: Vec<Vec<u8>> = vec![vec![]; 12];
    let mut owner_data: Vec<u8> = vec![];

    let result = {
        let mut accounts = vec![
            AccountInfo::new(&owner_key, true, false, &mut owner_lam, &mut owner_data, &system, false, 0),
            AccountInfo::new(&forged_key, false, false, &mut config_lam, bytemuck::bytes_of_mut(&mut forged), &attacker_program, false, 0),
        ];
        for ((key, lam), data) in keys.iter().zip(lams.iter_mut()).zip(datas.iter_mut()) {
            accounts.push(AccountInfo::new(key, false, false, lam, data, &system, false, 0));
        }
        processor::process(&program_id, &accounts, &[TAG_CLAIM])
    };

    assert_eq!(
        result,
        Err(ProgramError::Custom(BoostError::InvalidPda as u32))
    );
}

// ═══════════════════════════════════════════════════════════════
// Stake carried over from an earlier round
// ═══════════════════════════════════════════════════════════════

#[test]
fn test_claim_rejects_stake_from_prior_round() {
    let program_id = Pubkey::new_unique();
    let amm_program_key = Pubkey::new_unique();
    let system = solana_program::system_program::id();

    let owner_key = Pubkey::new_unique();
    let pool_key = Pubkey::new_unique();
    let position_mint = Pubkey::new_unique();

    let (config_key, _) = state::derive_config_pda(&program_id);
    let (round_key, _) = state::derive_round_pda(&program_id, &pool_key);
    let (stake_key, _) = state::derive_stake_pda(&program_id, &position_mint);

    let mut config = BoostConfig::zeroed();
    config.is_initialized = 1;
    config.amm_program = amm_program_key.to_bytes();
    config.min_staked_time = 0;

    // The pool's current round opened at t = 200_000
    let mut round = BoostRound::zeroed();
    round.is_initialized = 1;
    round.status = ROUND_ACTIVE;
    round.pool = pool_key.to_bytes();
    round.boost_amount_remaining = 10_000;
    round.reward_rate = 3_000_000;
    round.start_time = 200_000;

    // The stake was recorded against the previous round (t = 100_000)
    // and never unstaked; its gate is long open and its baselines
    // predate the current round entirely
    let mut stake = StakedPosition::zeroed();
    stake.is_initialized = 1;
    stake.position_mint = position_mint.to_bytes();
    stake.owner = owner_key.to_bytes();
    stake.pool = pool_key.to_bytes();
    stake.stake_start_time = 100_500;
    stake.round_start_time = 100_000;

    let k_position = Pubkey::new_unique();
    let k_auth = Pubkey::new_unique();
    let k_boost_vault = Pubkey::new_unique();
    let k_ata0 = Pubkey::new_unique();
    let k_ata1 = Pubkey::new_unique();
    let k_ata_risk = Pubkey::new_unique();
    let k_token = Pubkey::new_unique();
    let k_clock = Pubkey::new_unique();

    let mut owner_lam = 0u64;
    let mut config_lam = 0u64;
    let mut round_lam = 0u64;
    let mut stake_lam = 0u64;
    let mut other_lams = [0u64; 10];

    let mut owner_data: Vec<u8> = vec![];
    let mut position_data: Vec<u8> = vec![];
    let mut pool_data: Vec<u8> = vec![];
    let mut auth_data: Vec<u8> = vec![];
    let mut bv_data: Vec<u8> = vec![];
    let mut ata0_data: Vec<u8> = vec![];
    let mut ata1_data: Vec<u8> = vec![];
    let mut atar_data: Vec<u8> = vec![];
    let mut amm_data: Vec<u8> = vec![];
    let mut token_data: Vec<u8> = vec![];
    let mut clock_data: Vec<u8> = vec![];

    let result = {
        let [l0, l1, l2, l3, l4, l5, l6, l7, l8, l9] = &mut other_lams;
        let accounts = vec![
            AccountInfo::new(&owner_key, true, false, &mut owner_lam, &mut owner_data, &system, false, 0),
            AccountInfo::new(&config_key, false, false, &mut config_lam, bytemuck::bytes_of_mut(&mut config), &program_id, false, 0),
            AccountInfo::new(&round_key, false, true, &mut round_lam, bytemuck::bytes_of_mut(&mut round), &program_id, false, 0),
            AccountInfo::new(&stake_key, false, true, &mut stake_lam, bytemuck::bytes_of_mut(&mut stake), &program_id, false, 0),
            AccountInfo::new(&k_position, false, true, l0, &mut position_data, &amm_program_key, false, 0),
            AccountInfo::new(&pool_key, false, false, l1, &mut pool_data, &amm_program_key, false, 0),
            AccountInfo::new(&k_auth, false, false, l2, &mut auth_data, &system, false, 0),
            AccountInfo::new(&k_boost_vault, false, true, l3, &mut bv_data, &system, false, 0),
            AccountInfo::new(&k_ata0, false, true, l4, &mut ata0_data, &system, false, 0),
            AccountInfo::new(&k_ata1, false, true, l5, &mut ata1_data, &system, false, 0),
            AccountInfo::new(&k_ata_risk, false, true, l6, &mut atar_data, &system, false, 0),
            AccountInfo::new(&amm_program_key, false, false, l7, &mut amm_data, &system, true, 0),
            AccountInfo::new(&k_token, false, false, l8, &mut token_data, &system, false, 0),
            AccountInfo::new(&k_clock, false, false, l9, &mut clock_data, &system, false, 0),
        ];
        processor::process(&program_id, &accounts, &[TAG_CLAIM])
    };

    assert_eq!(
        result,
        Err(ProgramError::Custom(BoostError::StaleStake as u32)),
        "a stake from a prior round must not claim against the successor"
    );
    // Nothing settled: deposit and baselines untouched
    assert_eq!(round.boost_amount_remaining, 10_000);
    assert_eq!(stake.fee_baseline_0, 0);
    assert_eq!(stake.round_start_time, 100_000);
}
