//! CLMM Boost Program
//!
//! Yield-boosting rounds on top of an external concentrated-liquidity
//! AMM. A project locks a deposit of its own token plus an insurance
//! deposit quoted in an approved healthy asset, and in exchange LPs who
//! stake their positions in the project's pool earn their trading fees
//! plus a bonus proportional to the risk-token side of those fees.
//!
//! Architecture:
//! - The AMM is an external program; this program never prices anything
//!   itself. Pools and positions are read as borrowed views, the pool's
//!   observation ring buffer supplies the TWAP oracle.
//! - One round PDA per pool, reused across rounds; a per-round authority
//!   PDA holds custody of staked positions and the two deposit vaults.
//! - Claims are time-gated and atomic: the bonus debit against the
//!   locked deposit either succeeds in full or the whole claim aborts.
//! - If the pool TWAP crosses the round's insurance tick in the
//!   direction that devalues the risk token, anyone may liquidate: the
//!   insurance deposit moves to the protocol vault for distribution and
//!   the unspent boost deposit returns to the project.
//!
//! Instructions:
//!   0 - Initialize:         Create the global config, set fee and time parameters
//!   1 - AddHealthyAsset:    Admit a mint to the insurance-asset allowlist
//!   2 - RemoveHealthyAsset: Remove a mint from the allowlist
//!   3 - OpenRound:          Project locks boost + insurance deposits, round goes live
//!   4 - CloseRound:         Settle an expired round (permissionless)
//!   5 - Stake:              Move an LP position into round custody, snapshot fees
//!   6 - Unstake:            Return a staked position to its owner
//!   7 - Claim:              Collect fee deltas + boosted bonus (time-gated)
//!   8 - Liquidate:          Terminate an active round on TWAP breach (permissionless)
//!   9 - UpdateFeeConfig:    Admin updates protocol vault / fee rate

pub mod amm;
pub mod cpi;
pub mod error;
pub mod instruction;
pub mod math;
pub mod processor;
pub mod state;

#[cfg(not(feature = "no-entrypoint"))]
mod entrypoint;
