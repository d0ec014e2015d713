use solana_program::program_error::ProgramError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum BoostError {
    /// A round is already active for this pool
    RoundAlreadyActive = 0,
    /// Reference asset not in the healthy-asset allowlist
    AssetNotApproved = 1,
    /// Requested round duration below the minimum boost period
    RoundWindowTooShort = 2,
    /// Round is not active
    RoundNotActive = 3,
    /// Round end time has not passed yet
    RoundNotExpired = 4,
    /// Position's pool doesn't match the round's pool
    PositionPoolMismatch = 5,
    /// Caller is not the position owner
    NotPositionOwner = 6,
    /// Reward debit would exceed the locked boost deposit
    InsufficientLockedDeposit = 7,
    /// TWAP has not crossed the insurance tick
    PriceNotBreached = 8,
    /// Oracle lacks observation history for the requested interval
    InsufficientOracleHistory = 9,
    /// Config already initialized
    AlreadyInitialized = 10,
    /// Config not initialized
    NotInitialized = 11,
    /// Unauthorized — not the config owner
    Unauthorized = 12,
    /// Zero amount
    ZeroAmount = 13,
    /// Arithmetic overflow
    Overflow = 14,
    /// Invalid PDA derivation
    InvalidPda = 15,
    /// Mint mismatch against the round's token pair
    InvalidMint = 16,
    /// Account not owned by the configured AMM program
    InvalidAmmProgram = 17,
    /// Healthy-asset allowlist is full
    RegistryFull = 18,
    /// Position is already staked
    AlreadyStaked = 19,
    /// Position is not staked
    NotStaked = 20,
    /// Vault token account mismatch
    InvalidVault = 21,
    /// Stake was recorded against an earlier round on this pool
    StaleStake = 22,
}

impl From<BoostError> for ProgramError {
    fn from(e: BoostError) -> Self {
        ProgramError::Custom(e as u32)
    }
}
