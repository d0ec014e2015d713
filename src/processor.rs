use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::invoke,
    program::invoke_signed,
    program_error::ProgramError,
    program_pack::Pack,
    pubkey::Pubkey,
    rent::Rent,
    system_instruction,
    sysvar::{clock::Clock, Sysvar},
};

use bytemuck::Zeroable;

use crate::amm;
use crate::cpi;
use crate::error::BoostError;
use crate::instruction::BoostInstruction;
use crate::math;
use crate::state::{
    self, BoostConfig, BoostRound, StakedPosition, BOOST_CONFIG_SIZE, BOOST_ROUND_SIZE,
    ROUND_ACTIVE, ROUND_CLOSED, ROUND_LIQUIDATED, STAKED_POSITION_SIZE,
};

/// Verify the token program is the real SPL Token program.
/// CRITICAL: Without this check, an attacker can pass a fake token
/// program, receive PDA signer authority via invoke_signed, and drain
/// the vaults.
fn verify_token_program(token_program: &AccountInfo) -> ProgramResult {
    if *token_program.key != spl_token::id() {
        msg!("Error: invalid token program {}", token_program.key);
        return Err(ProgramError::IncorrectProgramId);
    }
    Ok(())
}

/// Verify an SPL token account has the expected authority and mint.
/// Settlement destinations are caller-supplied on the permissionless
/// paths (close, liquidate); without this check a closer could route
/// the project's refund to themselves.
fn verify_token_account(
    info: &AccountInfo,
    expected_authority: &Pubkey,
    expected_mint: &Pubkey,
) -> ProgramResult {
    if *info.owner != spl_token::id() {
        return Err(BoostError::InvalidVault.into());
    }
    let data = info.try_borrow_data()?;
    let account = spl_token::state::Account::unpack(&data)?;
    if account.owner != *expected_authority || account.mint != *expected_mint {
        return Err(BoostError::InvalidVault.into());
    }
    Ok(())
}

/// Verify the config account is the program's own config PDA.
/// CRITICAL: Every handler trusts the parameters it reads from config
/// (protocol vault, AMM program, fee and timing values). A forged
/// config account would substitute attacker-chosen values for all of
/// them. The PDA address can only be created by this program, so the
/// key check also pins ownership.
fn verify_config_account(program_id: &Pubkey, config_pda: &AccountInfo) -> ProgramResult {
    let (expected, _) = state::derive_config_pda(program_id);
    if *config_pda.key != expected {
        return Err(BoostError::InvalidPda.into());
    }
    if config_pda.data_len() < BOOST_CONFIG_SIZE {
        return Err(BoostError::NotInitialized.into());
    }
    Ok(())
}

pub fn process(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    let instruction = BoostInstruction::unpack(instruction_data)?;

    match instruction {
        BoostInstruction::Initialize {
            protocol_fee,
            min_boost_period,
            min_staked_time,
            twap_interval,
        } => process_initialize(
            program_id,
            accounts,
            protocol_fee,
            min_boost_period,
            min_staked_time,
            twap_interval,
        ),
        BoostInstruction::AddHealthyAsset { mint } => {
            process_add_healthy_asset(program_id, accounts, &mint)
        }
        BoostInstruction::RemoveHealthyAsset { mint } => {
            process_remove_healthy_asset(program_id, accounts, &mint)
        }
        BoostInstruction::OpenRound {
            boost_amount,
            insurance_amount,
            insurance_tick,
            reward_rate,
            end_time,
        } => process_open_round(
            program_id,
            accounts,
            boost_amount,
            insurance_amount,
            insurance_tick,
            reward_rate,
            end_time,
        ),
        BoostInstruction::CloseRound => process_close_round(program_id, accounts),
        BoostInstruction::Stake => process_stake(program_id, accounts),
        BoostInstruction::Unstake => process_unstake(program_id, accounts),
        BoostInstruction::Claim => process_claim(program_id, accounts),
        BoostInstruction::Liquidate => process_liquidate(program_id, accounts),
        BoostInstruction::UpdateFeeConfig {
            new_protocol_vault,
            new_protocol_fee,
        } => process_update_fee_config(program_id, accounts, new_protocol_vault, new_protocol_fee),
    }
}

// ═══════════════════════════════════════════════════════════════
// Helper: read config, validate owner signature
// ═══════════════════════════════════════════════════════════════

/// Validate config is initialized and the signer is its owner.
fn validate_config_owner(config: &BoostConfig, owner: &AccountInfo) -> ProgramResult {
    if !owner.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }
    if config.is_initialized != 1 {
        return Err(BoostError::NotInitialized.into());
    }
    if config.owner != owner.key.to_bytes() {
        return Err(BoostError::Unauthorized.into());
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════
// 0: Initialize
// ═══════════════════════════════════════════════════════════════

fn process_initialize(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    protocol_fee: u64,
    min_boost_period: i64,
    min_staked_time: i64,
    twap_interval: i64,
) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();

    let owner = next_account_info(accounts_iter)?;
    let config_pda = next_account_info(accounts_iter)?;
    let protocol_vault = next_account_info(accounts_iter)?;
    let amm_program = next_account_info(accounts_iter)?;
    let system_program = next_account_info(accounts_iter)?;
    let rent_sysvar = next_account_info(accounts_iter)?;

    if !owner.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }
    if protocol_fee > math::RATE_SCALE {
        return Err(ProgramError::InvalidArgument);
    }
    if min_boost_period < 0 || min_staked_time < 0 || twap_interval <= 0 {
        return Err(ProgramError::InvalidArgument);
    }

    let (expected_config, bump) = state::derive_config_pda(program_id);
    if *config_pda.key != expected_config {
        return Err(BoostError::InvalidPda.into());
    }
    if !config_pda.data_is_empty() {
        return Err(BoostError::AlreadyInitialized.into());
    }

    let rent = Rent::from_account_info(rent_sysvar)?;
    let config_seeds: &[&[u8]] = &[b"boost_config", &[bump]];
    invoke_signed(
        &system_instruction::create_account(
            owner.key,
            config_pda.key,
            rent.minimum_balance(BOOST_CONFIG_SIZE),
            BOOST_CONFIG_SIZE as u64,
            program_id,
        ),
        &[owner.clone(), config_pda.clone(), system_program.clone()],
        &[config_seeds],
    )?;

    let mut config_data = config_pda.try_borrow_mut_data()?;
    let config: &mut BoostConfig = bytemuck::from_bytes_mut(&mut config_data[..BOOST_CONFIG_SIZE]);

    config.is_initialized = 1;
    config.bump = bump;
    config.owner = owner.key.to_bytes();
    config.protocol_vault = protocol_vault.key.to_bytes();
    config.amm_program = amm_program.key.to_bytes();
    config.protocol_fee = protocol_fee;
    config.min_boost_period = min_boost_period;
    config.min_staked_time = min_staked_time;
    config.twap_interval = twap_interval;
    config.healthy_asset_count = 0;

    msg!("Boost config initialized, owner {}", owner.key);
    Ok(())
}

// ═══════════════════════════════════════════════════════════════
// 1/2: Healthy-asset allowlist
// ═══════════════════════════════════════════════════════════════

fn process_add_healthy_asset(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    mint: &Pubkey,
) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();

    let owner = next_account_info(accounts_iter)?;
    let config_pda = next_account_info(accounts_iter)?;

    verify_config_account(program_id, config_pda)?;
    let mut config_data = config_pda.try_borrow_mut_data()?;
    let config: &mut BoostConfig = bytemuck::from_bytes_mut(&mut config_data[..BOOST_CONFIG_SIZE]);

    validate_config_owner(config, owner)?;
    config.add_healthy_asset(&mint.to_bytes())?;

    msg!("Healthy asset added: {}", mint);
    Ok(())
}

fn process_remove_healthy_asset(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    mint: &Pubkey,
) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();

    let owner = next_account_info(accounts_iter)?;
    let config_pda = next_account_info(accounts_iter)?;

    verify_config_account(program_id, config_pda)?;
    let mut config_data = config_pda.try_borrow_mut_data()?;
    let config: &mut BoostConfig = bytemuck::from_bytes_mut(&mut config_data[..BOOST_CONFIG_SIZE]);

    validate_config_owner(config, owner)?;
    // Removal never breaks a round already opened against this asset
    config.remove_healthy_asset(&mint.to_bytes());

    msg!("Healthy asset removed: {}", mint);
    Ok(())
}

// ═══════════════════════════════════════════════════════════════
// 3: OpenRound
// ═══════════════════════════════════════════════════════════════

fn process_open_round(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    boost_amount: u64,
    insurance_amount: u64,
    insurance_tick: i32,
    reward_rate: u64,
    end_time: i64,
) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();

    let project = next_account_info(accounts_iter)?;
    let config_pda = next_account_info(accounts_iter)?;
    let pool_acc = next_account_info(accounts_iter)?;
    let round_pda = next_account_info(accounts_iter)?;
    let round_auth = next_account_info(accounts_iter)?;
    let risk_mint = next_account_info(accounts_iter)?;
    let ref_mint = next_account_info(accounts_iter)?;
    let boost_vault = next_account_info(accounts_iter)?;
    let insurance_vault = next_account_info(accounts_iter)?;
    let project_risk_ata = next_account_info(accounts_iter)?;
    let project_ref_ata = next_account_info(accounts_iter)?;
    let token_program = next_account_info(accounts_iter)?;
    let clock_sysvar = next_account_info(accounts_iter)?;
    let system_program = next_account_info(accounts_iter)?;

    if !project.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }
    if boost_amount == 0 || insurance_amount == 0 {
        return Err(BoostError::ZeroAmount.into());
    }

    verify_config_account(program_id, config_pda)?;

    // Config reads: allowlist membership is checked here and only here
    let amm_program_key;
    {
        let config_data = config_pda.try_borrow_data()?;
        let config: &BoostConfig = bytemuck::from_bytes(&config_data[..BOOST_CONFIG_SIZE]);
        if config.is_initialized != 1 {
            return Err(BoostError::NotInitialized.into());
        }
        if !config.is_healthy_asset(&ref_mint.key.to_bytes()) {
            return Err(BoostError::AssetNotApproved.into());
        }

        let clock = Clock::from_account_info(clock_sysvar)?;
        let window = end_time
            .checked_sub(clock.unix_timestamp)
            .ok_or(BoostError::Overflow)?;
        if window < config.min_boost_period {
            return Err(BoostError::RoundWindowTooShort.into());
        }
        amm_program_key = config.amm_program_pubkey();
    }

    // The pair must be exactly the pool's two mints, in either order
    let risk_is_token0;
    {
        let pool_data = pool_acc.try_borrow_data()?;
        let pool = amm::load_pool(pool_acc, &amm_program_key, &pool_data)?;
        let t0 = pool.token_0_mint_pubkey();
        let t1 = pool.token_1_mint_pubkey();
        risk_is_token0 = if t0 == *risk_mint.key && t1 == *ref_mint.key {
            true
        } else if t1 == *risk_mint.key && t0 == *ref_mint.key {
            false
        } else {
            return Err(BoostError::InvalidMint.into());
        };
    }

    let (expected_round, round_bump) = state::derive_round_pda(program_id, pool_acc.key);
    if *round_pda.key != expected_round {
        return Err(BoostError::InvalidPda.into());
    }
    let (expected_auth, auth_bump) = state::derive_round_authority(program_id, round_pda.key);
    if *round_auth.key != expected_auth {
        return Err(BoostError::InvalidPda.into());
    }

    if round_pda.data_is_empty() {
        let round_seeds: &[&[u8]] = &[b"boost_round", pool_acc.key.as_ref(), &[round_bump]];
        let rent = Rent::get()?;
        invoke_signed(
            &system_instruction::create_account(
                project.key,
                round_pda.key,
                rent.minimum_balance(BOOST_ROUND_SIZE),
                BOOST_ROUND_SIZE as u64,
                program_id,
            ),
            &[project.clone(), round_pda.clone(), system_program.clone()],
            &[round_seeds],
        )?;
    } else {
        // Account reuse across rounds: only a terminal round may be replaced
        let round_data = round_pda.try_borrow_data()?;
        let round: &BoostRound = bytemuck::from_bytes(&round_data[..BOOST_ROUND_SIZE]);
        if round.is_active() {
            return Err(BoostError::RoundAlreadyActive.into());
        }
    }

    verify_token_program(token_program)?;
    verify_token_account(boost_vault, round_auth.key, risk_mint.key)?;
    verify_token_account(insurance_vault, round_auth.key, ref_mint.key)?;

    // Pull both deposits from the project into custody
    invoke(
        &spl_token::instruction::transfer(
            token_program.key,
            project_risk_ata.key,
            boost_vault.key,
            project.key,
            &[],
            boost_amount,
        )?,
        &[
            project_risk_ata.clone(),
            boost_vault.clone(),
            project.clone(),
            token_program.clone(),
        ],
    )?;
    invoke(
        &spl_token::instruction::transfer(
            token_program.key,
            project_ref_ata.key,
            insurance_vault.key,
            project.key,
            &[],
            insurance_amount,
        )?,
        &[
            project_ref_ata.clone(),
            insurance_vault.clone(),
            project.clone(),
            token_program.clone(),
        ],
    )?;

    let clock = Clock::from_account_info(clock_sysvar)?;
    let mut round_data = round_pda.try_borrow_mut_data()?;
    let round: &mut BoostRound = bytemuck::from_bytes_mut(&mut round_data[..BOOST_ROUND_SIZE]);

    round.is_initialized = 1;
    round.bump = round_bump;
    round.authority_bump = auth_bump;
    round.status = ROUND_ACTIVE;
    round.risk_is_token0 = risk_is_token0 as u8;
    round.pool = pool_acc.key.to_bytes();
    round.project = project.key.to_bytes();
    round.risk_mint = risk_mint.key.to_bytes();
    round.ref_mint = ref_mint.key.to_bytes();
    round.boost_vault = boost_vault.key.to_bytes();
    round.insurance_vault = insurance_vault.key.to_bytes();
    round.boost_amount = boost_amount;
    round.boost_amount_remaining = boost_amount;
    round.insurance_amount = insurance_amount;
    round.reward_rate = reward_rate;
    round.insurance_tick = insurance_tick;
    round.start_time = clock.unix_timestamp;
    round.end_time = end_time;

    msg!(
        "Boost round opened for pool {}: {} locked, {} insurance",
        pool_acc.key,
        boost_amount,
        insurance_amount,
    );
    Ok(())
}

// ═══════════════════════════════════════════════════════════════
// 4: CloseRound — permissionless once the round has expired
// ═══════════════════════════════════════════════════════════════

fn process_close_round(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();

    let caller = next_account_info(accounts_iter)?;
    let config_pda = next_account_info(accounts_iter)?;
    let round_pda = next_account_info(accounts_iter)?;
    let round_auth = next_account_info(accounts_iter)?;
    let boost_vault = next_account_info(accounts_iter)?;
    let insurance_vault = next_account_info(accounts_iter)?;
    let protocol_risk_ata = next_account_info(accounts_iter)?;
    let project_risk_ata = next_account_info(accounts_iter)?;
    let project_ref_ata = next_account_info(accounts_iter)?;
    let token_program = next_account_info(accounts_iter)?;
    let clock_sysvar = next_account_info(accounts_iter)?;

    if !caller.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }
    verify_config_account(program_id, config_pda)?;

    let protocol_fee;
    let protocol_vault_key;
    {
        let config_data = config_pda.try_borrow_data()?;
        let config: &BoostConfig = bytemuck::from_bytes(&config_data[..BOOST_CONFIG_SIZE]);
        if config.is_initialized != 1 {
            return Err(BoostError::NotInitialized.into());
        }
        protocol_fee = config.protocol_fee;
        protocol_vault_key = config.protocol_vault_pubkey();
    }

    let cut;
    let refund;
    let insurance_amount;
    let project_key;
    let risk_mint_key;
    let ref_mint_key;
    {
        let round_data = round_pda.try_borrow_data()?;
        let round: &BoostRound = bytemuck::from_bytes(&round_data[..BOOST_ROUND_SIZE]);
        if !round.is_active() {
            return Err(BoostError::RoundNotActive.into());
        }
        let clock = Clock::from_account_info(clock_sysvar)?;
        if clock.unix_timestamp < round.end_time {
            return Err(BoostError::RoundNotExpired.into());
        }

        let (expected_round, _) = state::derive_round_pda(program_id, &round.pool_pubkey());
        if *round_pda.key != expected_round {
            return Err(BoostError::InvalidPda.into());
        }
        if round.boost_vault != boost_vault.key.to_bytes()
            || round.insurance_vault != insurance_vault.key.to_bytes()
        {
            return Err(BoostError::InvalidVault.into());
        }

        let (c, r) = round
            .close_split(protocol_fee)
            .ok_or(BoostError::Overflow)?;
        cut = c;
        refund = r;
        insurance_amount = round.insurance_amount;
        project_key = round.project_pubkey();
        risk_mint_key = round.risk_mint_pubkey();
        ref_mint_key = round.ref_mint_pubkey();
    }

    verify_token_program(token_program)?;
    // Caller-supplied destinations on a permissionless path — pin them
    verify_token_account(protocol_risk_ata, &protocol_vault_key, &risk_mint_key)?;
    verify_token_account(project_risk_ata, &project_key, &risk_mint_key)?;
    verify_token_account(project_ref_ata, &project_key, &ref_mint_key)?;

    let (expected_auth, auth_bump) = state::derive_round_authority(program_id, round_pda.key);
    if *round_auth.key != expected_auth {
        return Err(BoostError::InvalidPda.into());
    }
    let auth_seeds: &[&[u8]] = &[b"round_auth", round_pda.key.as_ref(), &[auth_bump]];

    if cut > 0 {
        invoke_signed(
            &spl_token::instruction::transfer(
                token_program.key,
                boost_vault.key,
                protocol_risk_ata.key,
                round_auth.key,
                &[],
                cut,
            )?,
            &[
                boost_vault.clone(),
                protocol_risk_ata.clone(),
                round_auth.clone(),
                token_program.clone(),
            ],
            &[auth_seeds],
        )?;
    }
    if refund > 0 {
        invoke_signed(
            &spl_token::instruction::transfer(
                token_program.key,
                boost_vault.key,
                project_risk_ata.key,
                round_auth.key,
                &[],
                refund,
            )?,
            &[
                boost_vault.clone(),
                project_risk_ata.clone(),
                round_auth.clone(),
                token_program.clone(),
            ],
            &[auth_seeds],
        )?;
    }
    invoke_signed(
        &spl_token::instruction::transfer(
            token_program.key,
            insurance_vault.key,
            project_ref_ata.key,
            round_auth.key,
            &[],
            insurance_amount,
        )?,
        &[
            insurance_vault.clone(),
            project_ref_ata.clone(),
            round_auth.clone(),
            token_program.clone(),
        ],
        &[auth_seeds],
    )?;

    let mut round_data = round_pda.try_borrow_mut_data()?;
    let round: &mut BoostRound = bytemuck::from_bytes_mut(&mut round_data[..BOOST_ROUND_SIZE]);
    round.boost_amount_remaining = 0;
    round.status = ROUND_CLOSED;

    msg!(
        "Boost round closed: {} protocol cut, {} + {} insurance settled to project",
        cut,
        refund,
        insurance_amount,
    );
    Ok(())
}

// ═══════════════════════════════════════════════════════════════
// 5: Stake
// ═══════════════════════════════════════════════════════════════

fn process_stake(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();

    let owner = next_account_info(accounts_iter)?;
    let config_pda = next_account_info(accounts_iter)?;
    let round_pda = next_account_info(accounts_iter)?;
    let stake_pda = next_account_info(accounts_iter)?;
    let position_acc = next_account_info(accounts_iter)?;
    let round_auth = next_account_info(accounts_iter)?;
    let amm_program = next_account_info(accounts_iter)?;
    let system_program = next_account_info(accounts_iter)?;
    let clock_sysvar = next_account_info(accounts_iter)?;

    if !owner.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }
    verify_config_account(program_id, config_pda)?;

    let amm_program_key;
    {
        let config_data = config_pda.try_borrow_data()?;
        let config: &BoostConfig = bytemuck::from_bytes(&config_data[..BOOST_CONFIG_SIZE]);
        if config.is_initialized != 1 {
            return Err(BoostError::NotInitialized.into());
        }
        amm_program_key = config.amm_program_pubkey();
    }
    if *amm_program.key != amm_program_key {
        return Err(BoostError::InvalidAmmProgram.into());
    }

    let round_pool;
    let round_start_time;
    {
        let round_data = round_pda.try_borrow_data()?;
        let round: &BoostRound = bytemuck::from_bytes(&round_data[..BOOST_ROUND_SIZE]);
        if !round.is_active() {
            return Err(BoostError::RoundNotActive.into());
        }
        round_pool = round.pool_pubkey();
        round_start_time = round.start_time;
    }
    let (expected_round, _) = state::derive_round_pda(program_id, &round_pool);
    if *round_pda.key != expected_round {
        return Err(BoostError::InvalidPda.into());
    }

    // The position must belong to the round's pool and to the caller
    let position_mint;
    let baseline_0;
    let baseline_1;
    {
        let position_data = position_acc.try_borrow_data()?;
        let position = amm::load_position(position_acc, &amm_program_key, &position_data)?;
        if position.pool != round_pool.to_bytes() {
            return Err(BoostError::PositionPoolMismatch.into());
        }
        if position.authority != owner.key.to_bytes() {
            return Err(BoostError::NotPositionOwner.into());
        }
        position_mint = Pubkey::new_from_array(position.position_mint);
        baseline_0 = position.fees_earned_0;
        baseline_1 = position.fees_earned_1;
    }

    let (expected_stake, stake_bump) = state::derive_stake_pda(program_id, &position_mint);
    if *stake_pda.key != expected_stake {
        return Err(BoostError::InvalidPda.into());
    }
    let (expected_auth, _) = state::derive_round_authority(program_id, round_pda.key);
    if *round_auth.key != expected_auth {
        return Err(BoostError::InvalidPda.into());
    }

    if stake_pda.data_is_empty() {
        let stake_seeds: &[&[u8]] = &[b"staked_position", position_mint.as_ref(), &[stake_bump]];
        let rent = Rent::get()?;
        invoke_signed(
            &system_instruction::create_account(
                owner.key,
                stake_pda.key,
                rent.minimum_balance(STAKED_POSITION_SIZE),
                STAKED_POSITION_SIZE as u64,
                program_id,
            ),
            &[owner.clone(), stake_pda.clone(), system_program.clone()],
            &[stake_seeds],
        )?;
    } else {
        let stake_data = stake_pda.try_borrow_data()?;
        let stake: &StakedPosition = bytemuck::from_bytes(&stake_data[..STAKED_POSITION_SIZE]);
        if stake.is_initialized == 1 {
            return Err(BoostError::AlreadyStaked.into());
        }
    }

    // Custody moves to the round authority; the user signs
    cpi::cpi_transfer_position(amm_program, owner, position_acc, round_auth.key)?;

    let clock = Clock::from_account_info(clock_sysvar)?;
    let mut stake_data = stake_pda.try_borrow_mut_data()?;
    let stake: &mut StakedPosition =
        bytemuck::from_bytes_mut(&mut stake_data[..STAKED_POSITION_SIZE]);

    stake.is_initialized = 1;
    stake.bump = stake_bump;
    stake.position_mint = position_mint.to_bytes();
    stake.owner = owner.key.to_bytes();
    stake.pool = round_pool.to_bytes();
    stake.stake_start_time = clock.unix_timestamp;
    stake.fee_baseline_0 = baseline_0;
    stake.fee_baseline_1 = baseline_1;
    stake.round_start_time = round_start_time;

    msg!("Position {} staked by {}", position_mint, owner.key);
    Ok(())
}

// ═══════════════════════════════════════════════════════════════
// 6: Unstake — always returns custody, whatever the round status
// ═══════════════════════════════════════════════════════════════

fn process_unstake(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();

    let owner = next_account_info(accounts_iter)?;
    let config_pda = next_account_info(accounts_iter)?;
    let round_pda = next_account_info(accounts_iter)?;
    let stake_pda = next_account_info(accounts_iter)?;
    let position_acc = next_account_info(accounts_iter)?;
    let round_auth = next_account_info(accounts_iter)?;
    let amm_program = next_account_info(accounts_iter)?;

    if !owner.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }
    verify_config_account(program_id, config_pda)?;

    let amm_program_key;
    {
        let config_data = config_pda.try_borrow_data()?;
        let config: &BoostConfig = bytemuck::from_bytes(&config_data[..BOOST_CONFIG_SIZE]);
        if config.is_initialized != 1 {
            return Err(BoostError::NotInitialized.into());
        }
        amm_program_key = config.amm_program_pubkey();
    }
    if *amm_program.key != amm_program_key {
        return Err(BoostError::InvalidAmmProgram.into());
    }

    let stake_pool;
    let position_mint;
    {
        let stake_data = stake_pda.try_borrow_data()?;
        let stake: &StakedPosition = bytemuck::from_bytes(&stake_data[..STAKED_POSITION_SIZE]);
        if stake.is_initialized != 1 {
            return Err(BoostError::NotStaked.into());
        }
        if stake.owner != owner.key.to_bytes() {
            return Err(BoostError::NotPositionOwner.into());
        }
        stake_pool = Pubkey::new_from_array(stake.pool);
        position_mint = Pubkey::new_from_array(stake.position_mint);
    }

    let (expected_stake, _) = state::derive_stake_pda(program_id, &position_mint);
    if *stake_pda.key != expected_stake {
        return Err(BoostError::InvalidPda.into());
    }
    let (expected_round, _) = state::derive_round_pda(program_id, &stake_pool);
    if *round_pda.key != expected_round {
        return Err(BoostError::InvalidPda.into());
    }
    let (expected_auth, auth_bump) = state::derive_round_authority(program_id, round_pda.key);
    if *round_auth.key != expected_auth {
        return Err(BoostError::InvalidPda.into());
    }

    {
        let position_data = position_acc.try_borrow_data()?;
        let position = amm::load_position(position_acc, &amm_program_key, &position_data)?;
        if position.position_mint != position_mint.to_bytes() {
            return Err(BoostError::InvalidMint.into());
        }
    }

    // No round-status check: custody return is unconditional
    let auth_seeds: &[&[u8]] = &[b"round_auth", round_pda.key.as_ref(), &[auth_bump]];
    cpi::cpi_release_position(amm_program, round_auth, position_acc, owner.key, auth_seeds)?;

    let mut stake_data = stake_pda.try_borrow_mut_data()?;
    let stake: &mut StakedPosition =
        bytemuck::from_bytes_mut(&mut stake_data[..STAKED_POSITION_SIZE]);
    *stake = StakedPosition::zeroed();

    msg!("Position {} unstaked by {}", position_mint, owner.key);
    Ok(())
}

// ═══════════════════════════════════════════════════════════════
// 7: Claim — fees + boosted bonus, atomic all-or-nothing
// ═══════════════════════════════════════════════════════════════

fn process_claim(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();

    let owner = next_account_info(accounts_iter)?;
    let config_pda = next_account_info(accounts_iter)?;
    let round_pda = next_account_info(accounts_iter)?;
    let stake_pda = next_account_info(accounts_iter)?;
    let position_acc = next_account_info(accounts_iter)?;
    let pool_acc = next_account_info(accounts_iter)?;
    let round_auth = next_account_info(accounts_iter)?;
    let boost_vault = next_account_info(accounts_iter)?;
    let owner_token0_ata = next_account_info(accounts_iter)?;
    let owner_token1_ata = next_account_info(accounts_iter)?;
    let owner_risk_ata = next_account_info(accounts_iter)?;
    let amm_program = next_account_info(accounts_iter)?;
    let token_program = next_account_info(accounts_iter)?;
    let clock_sysvar = next_account_info(accounts_iter)?;

    if !owner.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }
    verify_config_account(program_id, config_pda)?;

    let amm_program_key;
    let min_staked_time;
    {
        let config_data = config_pda.try_borrow_data()?;
        let config: &BoostConfig = bytemuck::from_bytes(&config_data[..BOOST_CONFIG_SIZE]);
        if config.is_initialized != 1 {
            return Err(BoostError::NotInitialized.into());
        }
        amm_program_key = config.amm_program_pubkey();
        min_staked_time = config.min_staked_time;
    }
    if *amm_program.key != amm_program_key {
        return Err(BoostError::InvalidAmmProgram.into());
    }

    let stake_pool;
    let position_mint;
    let stake_start_time;
    let stake_round_start;
    let fee_baseline_0;
    let fee_baseline_1;
    {
        let stake_data = stake_pda.try_borrow_data()?;
        let stake: &StakedPosition = bytemuck::from_bytes(&stake_data[..STAKED_POSITION_SIZE]);
        if stake.is_initialized != 1 {
            return Err(BoostError::NotStaked.into());
        }
        if stake.owner != owner.key.to_bytes() {
            return Err(BoostError::NotPositionOwner.into());
        }
        stake_pool = Pubkey::new_from_array(stake.pool);
        position_mint = Pubkey::new_from_array(stake.position_mint);
        stake_start_time = stake.stake_start_time;
        stake_round_start = stake.round_start_time;
        fee_baseline_0 = stake.fee_baseline_0;
        fee_baseline_1 = stake.fee_baseline_1;
    }

    let (expected_stake, _) = state::derive_stake_pda(program_id, &position_mint);
    if *stake_pda.key != expected_stake {
        return Err(BoostError::InvalidPda.into());
    }
    let (expected_round, _) = state::derive_round_pda(program_id, &stake_pool);
    if *round_pda.key != expected_round {
        return Err(BoostError::InvalidPda.into());
    }
    if *pool_acc.key != stake_pool {
        return Err(BoostError::PositionPoolMismatch.into());
    }

    // The round account is reused across rounds on the same pool. A
    // stake carried over from an earlier round must not draw on the
    // successor's deposit: its gate and baselines predate this round.
    {
        let round_data = round_pda.try_borrow_data()?;
        let round: &BoostRound = bytemuck::from_bytes(&round_data[..BOOST_ROUND_SIZE]);
        if !round.is_active() {
            return Err(BoostError::RoundNotActive.into());
        }
        if round.start_time != stake_round_start {
            return Err(BoostError::StaleStake.into());
        }
    }

    // Anti-flash-stake gate: success with (0, 0, 0), nothing mutated,
    // the AMM untouched
    let clock = Clock::from_account_info(clock_sysvar)?;
    if !math::claim_gate_open(clock.unix_timestamp, stake_start_time, min_staked_time) {
        msg!("Claimed 0 token0 fees, 0 token1 fees, 0 boost reward (time gate)");
        return Ok(());
    }

    // Settle fee deltas against the baselines
    let delta_0;
    let delta_1;
    {
        let position_data = position_acc.try_borrow_data()?;
        let position = amm::load_position(position_acc, &amm_program_key, &position_data)?;
        if position.position_mint != position_mint.to_bytes() {
            return Err(BoostError::InvalidMint.into());
        }
        delta_0 = math::fee_delta(position.fees_earned_0, fee_baseline_0)
            .ok_or(BoostError::Overflow)?;
        delta_1 = math::fee_delta(position.fees_earned_1, fee_baseline_1)
            .ok_or(BoostError::Overflow)?;
    }

    // Compute the bonus and debit the round under the solvency gate.
    // A failed debit aborts the whole claim: no fees move either.
    let reward;
    {
        let mut round_data = round_pda.try_borrow_mut_data()?;
        let round: &mut BoostRound = bytemuck::from_bytes_mut(&mut round_data[..BOOST_ROUND_SIZE]);
        if round.boost_vault != boost_vault.key.to_bytes() {
            return Err(BoostError::InvalidVault.into());
        }
        let risk_fee = math::risk_side_fee(delta_0, delta_1, round.risk_is_token0 == 1);
        reward = math::reward_amount(risk_fee, round.reward_rate).ok_or(BoostError::Overflow)?;
        round.debit_reward(reward)?;
    }

    // Baselines advance to the settled snapshot (monotonic)
    {
        let mut stake_data = stake_pda.try_borrow_mut_data()?;
        let stake: &mut StakedPosition =
            bytemuck::from_bytes_mut(&mut stake_data[..STAKED_POSITION_SIZE]);
        stake.fee_baseline_0 = stake
            .fee_baseline_0
            .checked_add(delta_0)
            .ok_or(BoostError::Overflow)?;
        stake.fee_baseline_1 = stake
            .fee_baseline_1
            .checked_add(delta_1)
            .ok_or(BoostError::Overflow)?;
    }

    verify_token_program(token_program)?;
    let (expected_auth, auth_bump) = state::derive_round_authority(program_id, round_pda.key);
    if *round_auth.key != expected_auth {
        return Err(BoostError::InvalidPda.into());
    }
    let auth_seeds: &[&[u8]] = &[b"round_auth", round_pda.key.as_ref(), &[auth_bump]];

    if delta_0 > 0 || delta_1 > 0 {
        cpi::cpi_collect_fees(
            amm_program,
            round_auth,
            position_acc,
            pool_acc,
            owner_token0_ata,
            owner_token1_ata,
            token_program,
            delta_0,
            delta_1,
            auth_seeds,
        )?;
    }
    if reward > 0 {
        invoke_signed(
            &spl_token::instruction::transfer(
                token_program.key,
                boost_vault.key,
                owner_risk_ata.key,
                round_auth.key,
                &[],
                reward,
            )?,
            &[
                boost_vault.clone(),
                owner_risk_ata.clone(),
                round_auth.clone(),
                token_program.clone(),
            ],
            &[auth_seeds],
        )?;
    }

    msg!(
        "Claimed {} token0 fees, {} token1 fees, {} boost reward",
        delta_0,
        delta_1,
        reward,
    );
    Ok(())
}

// ═══════════════════════════════════════════════════════════════
// 8: Liquidate — permissionless, price-triggered early termination
// ═══════════════════════════════════════════════════════════════

fn process_liquidate(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();

    let caller = next_account_info(accounts_iter)?;
    let config_pda = next_account_info(accounts_iter)?;
    let round_pda = next_account_info(accounts_iter)?;
    let pool_acc = next_account_info(accounts_iter)?;
    let round_auth = next_account_info(accounts_iter)?;
    let boost_vault = next_account_info(accounts_iter)?;
    let insurance_vault = next_account_info(accounts_iter)?;
    let protocol_ref_ata = next_account_info(accounts_iter)?;
    let project_risk_ata = next_account_info(accounts_iter)?;
    let token_program = next_account_info(accounts_iter)?;
    let clock_sysvar = next_account_info(accounts_iter)?;

    if !caller.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }
    verify_config_account(program_id, config_pda)?;

    let amm_program_key;
    let twap_interval;
    let protocol_vault_key;
    {
        let config_data = config_pda.try_borrow_data()?;
        let config: &BoostConfig = bytemuck::from_bytes(&config_data[..BOOST_CONFIG_SIZE]);
        if config.is_initialized != 1 {
            return Err(BoostError::NotInitialized.into());
        }
        amm_program_key = config.amm_program_pubkey();
        twap_interval = config.twap_interval;
        protocol_vault_key = config.protocol_vault_pubkey();
    }

    let remaining;
    let insurance_amount;
    let project_key;
    let risk_mint_key;
    let ref_mint_key;
    {
        let round_data = round_pda.try_borrow_data()?;
        let round: &BoostRound = bytemuck::from_bytes(&round_data[..BOOST_ROUND_SIZE]);
        if !round.is_active() {
            return Err(BoostError::RoundNotActive.into());
        }
        if round.pool != pool_acc.key.to_bytes() {
            return Err(BoostError::InvalidPda.into());
        }
        let (expected_round, _) = state::derive_round_pda(program_id, &round.pool_pubkey());
        if *round_pda.key != expected_round {
            return Err(BoostError::InvalidPda.into());
        }
        if round.boost_vault != boost_vault.key.to_bytes()
            || round.insurance_vault != insurance_vault.key.to_bytes()
        {
            return Err(BoostError::InvalidVault.into());
        }

        // The trigger is a pure function of oracle state: TWAP past the
        // insurance tick in the direction that devalues the risk asset
        let clock = Clock::from_account_info(clock_sysvar)?;
        let twap = {
            let pool_data = pool_acc.try_borrow_data()?;
            let pool = amm::load_pool(pool_acc, &amm_program_key, &pool_data)?;
            pool.twap_tick(clock.unix_timestamp, twap_interval)?
        };
        if !math::price_breached(twap, round.insurance_tick, round.risk_is_token0 == 1) {
            return Err(BoostError::PriceNotBreached.into());
        }

        remaining = round.boost_amount_remaining;
        insurance_amount = round.insurance_amount;
        project_key = round.project_pubkey();
        risk_mint_key = round.risk_mint_pubkey();
        ref_mint_key = round.ref_mint_pubkey();
    }

    verify_token_program(token_program)?;
    verify_token_account(protocol_ref_ata, &protocol_vault_key, &ref_mint_key)?;
    verify_token_account(project_risk_ata, &project_key, &risk_mint_key)?;

    let (expected_auth, auth_bump) = state::derive_round_authority(program_id, round_pda.key);
    if *round_auth.key != expected_auth {
        return Err(BoostError::InvalidPda.into());
    }
    let auth_seeds: &[&[u8]] = &[b"round_auth", round_pda.key.as_ref(), &[auth_bump]];

    // Insurance goes to the protocol vault for policy distribution to
    // affected stakers; the unspent boost deposit returns to the project
    invoke_signed(
        &spl_token::instruction::transfer(
            token_program.key,
            insurance_vault.key,
            protocol_ref_ata.key,
            round_auth.key,
            &[],
            insurance_amount,
        )?,
        &[
            insurance_vault.clone(),
            protocol_ref_ata.clone(),
            round_auth.clone(),
            token_program.clone(),
        ],
        &[auth_seeds],
    )?;
    if remaining > 0 {
        invoke_signed(
            &spl_token::instruction::transfer(
                token_program.key,
                boost_vault.key,
                project_risk_ata.key,
                round_auth.key,
                &[],
                remaining,
            )?,
            &[
                boost_vault.clone(),
                project_risk_ata.clone(),
                round_auth.clone(),
                token_program.clone(),
            ],
            &[auth_seeds],
        )?;
    }

    let mut round_data = round_pda.try_borrow_mut_data()?;
    let round: &mut BoostRound = bytemuck::from_bytes_mut(&mut round_data[..BOOST_ROUND_SIZE]);
    round.boost_amount_remaining = 0;
    round.status = ROUND_LIQUIDATED;

    msg!(
        "Boost round liquidated: {} insurance to protocol vault, {} returned to project",
        insurance_amount,
        remaining,
    );
    Ok(())
}

// ═══════════════════════════════════════════════════════════════
// 9: UpdateFeeConfig
// ═══════════════════════════════════════════════════════════════

fn process_update_fee_config(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    new_protocol_vault: Option<Pubkey>,
    new_protocol_fee: Option<u64>,
) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();

    let owner = next_account_info(accounts_iter)?;
    let config_pda = next_account_info(accounts_iter)?;

    verify_config_account(program_id, config_pda)?;
    let mut config_data = config_pda.try_borrow_mut_data()?;
    let config: &mut BoostConfig = bytemuck::from_bytes_mut(&mut config_data[..BOOST_CONFIG_SIZE]);

    validate_config_owner(config, owner)?;

    if let Some(vault) = new_protocol_vault {
        config.protocol_vault = vault.to_bytes();
    }
    if let Some(fee) = new_protocol_fee {
        if fee > math::RATE_SCALE {
            return Err(ProgramError::InvalidArgument);
        }
        config.protocol_fee = fee;
    }

    msg!("Fee config updated");
    Ok(())
}
