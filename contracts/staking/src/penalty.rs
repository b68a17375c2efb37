//! Early-exit penalty split.
//!
//! `penalty = floor(principal × penalty_bps / 10_000)` and the staker receives
//! the rest, so `payout + penalty == principal` holds exactly.

use soroban_sdk::contracttype;

use crate::{rewards::BPS_DENOMINATOR, ContractError};

/// Upper bound for `emergency_penalty_bps` (100 %).
pub const MAX_PENALTY_BPS: u32 = 10_000;

/// Result of an emergency exit, returned to the caller of `emergency_withdraw`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyExit {
    /// Stake tokens returned to the staker.
    pub payout: i128,
    /// Stake tokens retained by the protocol.
    pub penalty: i128,
    /// Unclaimed rewards given up by the exit.
    pub forfeited_rewards: i128,
}

/// Split `principal` into `(payout, penalty)`.
pub fn emergency_exit(principal: i128, penalty_bps: u32) -> Result<(i128, i128), ContractError> {
    if penalty_bps > MAX_PENALTY_BPS {
        return Err(ContractError::InvalidConfiguration);
    }
    if principal < 0 {
        return Err(ContractError::InvariantViolation);
    }

    // P × b / D = (P / D) × b + (P mod D) × b / D, and neither term can
    // exceed P because b <= D.
    let bps = i128::from(penalty_bps);
    let penalty = (principal / BPS_DENOMINATOR) * bps
        + (principal % BPS_DENOMINATOR) * bps / BPS_DENOMINATOR;
    let payout = principal - penalty;

    Ok((payout, penalty))
}
