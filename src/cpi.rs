//! CPI helpers for the external CLMM position manager.
//!
//! We construct raw instruction data manually since we don't depend on
//! the AMM's crate. Tags match the position manager's instruction
//! decoder; account orders match its documented layouts.

use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    instruction::{AccountMeta, Instruction},
    program::{invoke, invoke_signed},
    pubkey::Pubkey,
};

// ═══════════════════════════════════════════════════════════════
// Position manager instruction tags
// ═══════════════════════════════════════════════════════════════

const TAG_SET_POSITION_AUTHORITY: u8 = 7;
const TAG_COLLECT_FEES: u8 = 8;

// ═══════════════════════════════════════════════════════════════
// SetPositionAuthority (Tag 7) — current authority reassigns custody
// ═══════════════════════════════════════════════════════════════
// Accounts: [authority(signer), position(w)]
// Data: tag(1) + new_authority(32)

/// Move position custody from the staking user to the round authority.
/// The user is the signer of the outer transaction.
pub fn cpi_transfer_position<'a>(
    amm_program: &AccountInfo<'a>,
    current_authority: &AccountInfo<'a>,
    position: &AccountInfo<'a>,
    new_authority: &Pubkey,
) -> ProgramResult {
    let mut data = Vec::with_capacity(33);
    data.push(TAG_SET_POSITION_AUTHORITY);
    data.extend_from_slice(new_authority.as_ref());

    let ix = Instruction {
        program_id: *amm_program.key,
        accounts: vec![
            AccountMeta::new_readonly(*current_authority.key, true),
            AccountMeta::new(*position.key, false),
        ],
        data,
    };

    invoke(&ix, &[current_authority.clone(), position.clone()])
}

/// Return custody from the round authority PDA to the recorded owner.
/// The round authority signs via seeds.
pub fn cpi_release_position<'a>(
    amm_program: &AccountInfo<'a>,
    round_authority: &AccountInfo<'a>,
    position: &AccountInfo<'a>,
    owner: &Pubkey,
    authority_seeds: &[&[u8]],
) -> ProgramResult {
    let mut data = Vec::with_capacity(33);
    data.push(TAG_SET_POSITION_AUTHORITY);
    data.extend_from_slice(owner.as_ref());

    let ix = Instruction {
        program_id: *amm_program.key,
        accounts: vec![
            AccountMeta::new_readonly(*round_authority.key, true),
            AccountMeta::new(*position.key, false),
        ],
        data,
    };

    invoke_signed(
        &ix,
        &[round_authority.clone(), position.clone()],
        &[authority_seeds],
    )
}

// ═══════════════════════════════════════════════════════════════
// CollectFees (Tag 8) — authority collects owed fees to recipients
// ═══════════════════════════════════════════════════════════════
// Accounts: [authority(signer), position(w), pool(w),
//            recipient_0(w), recipient_1(w), token_program]
// Data: tag(1) + amount_0(8) + amount_1(8)
//
// Amounts are exact requests; the manager rejects collection beyond
// what the position is owed. We always request the deltas we just
// settled against the baselines, so the two stay in lockstep.

pub fn cpi_collect_fees<'a>(
    amm_program: &AccountInfo<'a>,
    round_authority: &AccountInfo<'a>,
    position: &AccountInfo<'a>,
    pool: &AccountInfo<'a>,
    recipient_0: &AccountInfo<'a>,
    recipient_1: &AccountInfo<'a>,
    token_program: &AccountInfo<'a>,
    amount_0: u64,
    amount_1: u64,
    authority_seeds: &[&[u8]],
) -> ProgramResult {
    let mut data = Vec::with_capacity(17);
    data.push(TAG_COLLECT_FEES);
    data.extend_from_slice(&amount_0.to_le_bytes());
    data.extend_from_slice(&amount_1.to_le_bytes());

    let ix = Instruction {
        program_id: *amm_program.key,
        accounts: vec![
            AccountMeta::new_readonly(*round_authority.key, true),
            AccountMeta::new(*position.key, false),
            AccountMeta::new(*pool.key, false),
            AccountMeta::new(*recipient_0.key, false),
            AccountMeta::new(*recipient_1.key, false),
            AccountMeta::new_readonly(*token_program.key, false),
        ],
        data,
    };

    invoke_signed(
        &ix,
        &[
            round_authority.clone(),
            position.clone(),
            pool.clone(),
            recipient_0.clone(),
            recipient_1.clone(),
            token_program.clone(),
        ],
        &[authority_seeds],
    )
}
