//! Error code uniqueness and completeness tests.

use clmm_boost::error::BoostError;
use solana_program::program_error::ProgramError;

#[test]
fn test_all_error_codes_unique() {
    let codes: Vec<u32> = vec![
        BoostError::RoundAlreadyActive as u32,
        BoostError::AssetNotApproved as u32,
        BoostError::RoundWindowTooShort as u32,
        BoostError::RoundNotActive as u32,
        BoostError::RoundNotExpired as u32,
        BoostError::PositionPoolMismatch as u32,
        BoostError::NotPositionOwner as u32,
        BoostError::InsufficientLockedDeposit as u32,
        BoostError::PriceNotBreached as u32,
        BoostError::InsufficientOracleHistory as u32,
        BoostError::AlreadyInitialized as u32,
        BoostError::NotInitialized as u32,
        BoostError::Unauthorized as u32,
        BoostError::ZeroAmount as u32,
        BoostError::Overflow as u32,
        BoostError::InvalidPda as u32,
        BoostError::InvalidMint as u32,
        BoostError::InvalidAmmProgram as u32,
        BoostError::RegistryFull as u32,
        BoostError::AlreadyStaked as u32,
        BoostError::NotStaked as u32,
        BoostError::InvalidVault as u32,
        BoostError::StaleStake as u32,
    ];

    // Check uniqueness
    let mut sorted = codes.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), codes.len(), "Duplicate error codes detected!");

    // Check sequential (0..23)
    for (i, &code) in codes.iter().enumerate() {
        assert_eq!(code, i as u32, "Error code {} expected {}, got {}", i, i, code);
    }
}

#[test]
fn test_error_to_program_error() {
    let err: ProgramError = BoostError::RoundAlreadyActive.into();
    assert_eq!(err, ProgramError::Custom(0));

    let err: ProgramError = BoostError::InsufficientOracleHistory.into();
    assert_eq!(err, ProgramError::Custom(9));

    let err: ProgramError = BoostError::InvalidVault.into();
    assert_eq!(err, ProgramError::Custom(21));

    let err: ProgramError = BoostError::StaleStake.into();
    assert_eq!(err, ProgramError::Custom(22));
}
