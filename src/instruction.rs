use solana_program::{program_error::ProgramError, pubkey::Pubkey};

/// Instructions for the CLMM boost-round program.
#[derive(Debug)]
pub enum BoostInstruction {
    /// Initialize the global config PDA.
    ///
    /// Accounts:
    ///   0. `[signer, writable]` Owner (pays rent, becomes config owner)
    ///   1. `[writable]` Config PDA (boost_config, to be created)
    ///   2. `[]` Protocol vault (fee payout address)
    ///   3. `[]` AMM program (the CLMM whose pools/positions we accept)
    ///   4. `[]` System program
    ///   5. `[]` Rent sysvar
    Initialize {
        /// Protocol fee in ppm, at most 1_000_000
        protocol_fee: u64,
        /// Minimum round duration in seconds
        min_boost_period: i64,
        /// Minimum staked time before claims pay, in seconds
        min_staked_time: i64,
        /// Trailing TWAP window in seconds
        twap_interval: i64,
    },

    /// Add a reference-asset mint to the healthy-asset allowlist.
    ///
    /// Accounts:
    ///   0. `[signer]` Config owner
    ///   1. `[writable]` Config PDA
    AddHealthyAsset { mint: Pubkey },

    /// Remove a reference-asset mint from the allowlist. Does not
    /// affect rounds already opened against it.
    ///
    /// Accounts:
    ///   0. `[signer]` Config owner
    ///   1. `[writable]` Config PDA
    RemoveHealthyAsset { mint: Pubkey },

    /// Open a boost round for a pool. The caller (the project) supplies
    /// both deposits; at most one Active round per pool.
    ///
    /// Accounts:
    ///   0. `[signer, writable]` Project (pays rent, funds both deposits)
    ///   1. `[]` Config PDA
    ///   2. `[]` AMM pool account
    ///   3. `[writable]` Round PDA (boost_round, created or reused)
    ///   4. `[]` Round authority PDA
    ///   5. `[]` Risk mint (the project's token)
    ///   6. `[]` Reference mint (must be allowlisted)
    ///   7. `[writable]` Boost vault (risk-mint token account, authority = round authority)
    ///   8. `[writable]` Insurance vault (ref-mint token account, authority = round authority)
    ///   9. `[writable]` Project's risk-mint token account (source)
    ///  10. `[writable]` Project's ref-mint token account (source)
    ///  11. `[]` Token program
    ///  12. `[]` Clock sysvar
    ///  13. `[]` System program
    OpenRound {
        boost_amount: u64,
        insurance_amount: u64,
        insurance_tick: i32,
        reward_rate: u64,
        end_time: i64,
    },

    /// Close the current round after its end time. Permissionless.
    /// Pays the protocol cut, then settles the remaining boost deposit
    /// and the full insurance deposit back to the project.
    ///
    /// Accounts:
    ///   0. `[signer]` Caller (anyone, pays tx fee)
    ///   1. `[]` Config PDA
    ///   2. `[writable]` Round PDA
    ///   3. `[]` Round authority PDA
    ///   4. `[writable]` Boost vault
    ///   5. `[writable]` Insurance vault
    ///   6. `[writable]` Protocol vault's risk-mint token account
    ///   7. `[writable]` Project's risk-mint token account
    ///   8. `[writable]` Project's ref-mint token account
    ///   9. `[]` Token program
    ///  10. `[]` Clock sysvar
    CloseRound,

    /// Stake a CLMM position against the pool's active round. Custody
    /// of the position moves to the round authority; the fee baselines
    /// snapshot the position's current cumulative fees.
    ///
    /// Accounts:
    ///   0. `[signer, writable]` Position owner (pays stake PDA rent)
    ///   1. `[]` Config PDA
    ///   2. `[]` Round PDA
    ///   3. `[writable]` Stake PDA (staked_position, created or reused)
    ///   4. `[writable]` AMM position account
    ///   5. `[]` Round authority PDA (receives custody)
    ///   6. `[]` AMM program (position manager)
    ///   7. `[]` System program
    ///   8. `[]` Clock sysvar
    Stake,

    /// Return a staked position to its owner and drop the stake record.
    /// Permitted regardless of round status.
    ///
    /// Accounts:
    ///   0. `[signer]` Recorded owner
    ///   1. `[]` Config PDA
    ///   2. `[]` Round PDA
    ///   3. `[writable]` Stake PDA
    ///   4. `[writable]` AMM position account
    ///   5. `[]` Round authority PDA (current custodian, signs CPI)
    ///   6. `[]` AMM program
    Unstake,

    /// Claim accrued fees plus the boosted bonus for a staked position.
    /// Before the minimum staked time this succeeds with (0, 0, 0) and
    /// mutates nothing. The bonus debit is solvency-gated; on failure
    /// the whole claim aborts and no fees move.
    ///
    /// Accounts:
    ///   0. `[signer]` Recorded owner
    ///   1. `[]` Config PDA
    ///   2. `[writable]` Round PDA
    ///   3. `[writable]` Stake PDA
    ///   4. `[writable]` AMM position account
    ///   5. `[]` AMM pool account
    ///   6. `[]` Round authority PDA (signs fee collection + reward transfer)
    ///   7. `[writable]` Boost vault (reward source)
    ///   8. `[writable]` Owner's token0 token account (fee destination)
    ///   9. `[writable]` Owner's token1 token account (fee destination)
    ///  10. `[writable]` Owner's risk-mint token account (reward destination)
    ///  11. `[]` AMM program
    ///  12. `[]` Token program
    ///  13. `[]` Clock sysvar
    Claim,

    /// Liquidate the round if the TWAP tick has crossed the insurance
    /// tick in the direction that devalues the risk asset.
    /// Permissionless; fails with no state change while price is healthy.
    ///
    /// Accounts:
    ///   0. `[signer]` Caller (anyone)
    ///   1. `[]` Config PDA
    ///   2. `[writable]` Round PDA
    ///   3. `[]` AMM pool account
    ///   4. `[]` Round authority PDA
    ///   5. `[writable]` Boost vault
    ///   6. `[writable]` Insurance vault
    ///   7. `[writable]` Protocol vault's ref-mint token account (insurance destination)
    ///   8. `[writable]` Project's risk-mint token account (boost refund)
    ///   9. `[]` Token program
    ///  10. `[]` Clock sysvar
    Liquidate,

    /// Owner updates the fee configuration.
    ///
    /// Accounts:
    ///   0. `[signer]` Config owner
    ///   1. `[writable]` Config PDA
    UpdateFeeConfig {
        new_protocol_vault: Option<Pubkey>,
        new_protocol_fee: Option<u64>,
    },
}

impl BoostInstruction {
    pub fn unpack(data: &[u8]) -> Result<Self, ProgramError> {
        let (&tag, rest) = data.split_first().ok_or(ProgramError::InvalidInstructionData)?;

        match tag {
            0 => {
                // Initialize: protocol_fee(8) + min_boost_period(8)
                //           + min_staked_time(8) + twap_interval(8)
                if rest.len() < 32 {
                    return Err(ProgramError::InvalidInstructionData);
                }
                let protocol_fee = u64::from_le_bytes(rest[0..8].try_into().unwrap());
                let min_boost_period = i64::from_le_bytes(rest[8..16].try_into().unwrap());
                let min_staked_time = i64::from_le_bytes(rest[16..24].try_into().unwrap());
                let twap_interval = i64::from_le_bytes(rest[24..32].try_into().unwrap());
                Ok(Self::Initialize {
                    protocol_fee,
                    min_boost_period,
                    min_staked_time,
                    twap_interval,
                })
            }
            1 => {
                if rest.len() < 32 {
                    return Err(ProgramError::InvalidInstructionData);
                }
                let mint = Pubkey::try_from(&rest[0..32])
                    .map_err(|_| ProgramError::InvalidInstructionData)?;
                Ok(Self::AddHealthyAsset { mint })
            }
            2 => {
                if rest.len() < 32 {
                    return Err(ProgramError::InvalidInstructionData);
                }
                let mint = Pubkey::try_from(&rest[0..32])
                    .map_err(|_| ProgramError::InvalidInstructionData)?;
                Ok(Self::RemoveHealthyAsset { mint })
            }
            3 => {
                // OpenRound: boost_amount(8) + insurance_amount(8)
                //          + insurance_tick(4) + reward_rate(8) + end_time(8)
                if rest.len() < 36 {
                    return Err(ProgramError::InvalidInstructionData);
                }
                let boost_amount = u64::from_le_bytes(rest[0..8].try_into().unwrap());
                let insurance_amount = u64::from_le_bytes(rest[8..16].try_into().unwrap());
                let insurance_tick = i32::from_le_bytes(rest[16..20].try_into().unwrap());
                let reward_rate = u64::from_le_bytes(rest[20..28].try_into().unwrap());
                let end_time = i64::from_le_bytes(rest[28..36].try_into().unwrap());
                Ok(Self::OpenRound {
                    boost_amount,
                    insurance_amount,
                    insurance_tick,
                    reward_rate,
                    end_time,
                })
            }
            4 => Ok(Self::CloseRound),
            5 => Ok(Self::Stake),
            6 => Ok(Self::Unstake),
            7 => Ok(Self::Claim),
            8 => Ok(Self::Liquidate),
            9 => {
                // UpdateFeeConfig: flag(1) + vault(32) + flag(1) + fee(8)
                if rest.len() < 42 {
                    return Err(ProgramError::InvalidInstructionData);
                }
                let has_vault = rest[0] != 0;
                let vault = Pubkey::try_from(&rest[1..33])
                    .map_err(|_| ProgramError::InvalidInstructionData)?;
                let has_fee = rest[33] != 0;
                let fee = u64::from_le_bytes(rest[34..42].try_into().unwrap());
                Ok(Self::UpdateFeeConfig {
                    new_protocol_vault: if has_vault { Some(vault) } else { None },
                    new_protocol_fee: if has_fee { Some(fee) } else { None },
                })
            }
            _ => Err(ProgramError::InvalidInstructionData),
        }
    }
}
