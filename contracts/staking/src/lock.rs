use soroban_sdk::{contracttype, Env, I256};

use crate::{position::StakePosition, ContractError};

/// How an additional deposit moves the lock clock of an existing position.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LockResetPolicy {
    /// Every deposit restarts the clock for the whole principal.
    ResetOnDeposit,
    /// The clock moves to the principal-weighted average of the old start and
    /// the deposit time, so only the new increment pushes it forward.
    WeightedAverage,
}

/// A position may leave through `withdraw` once it has aged `min_lock_duration`
/// seconds since `staked_at`. The boundary itself is unlocked.
pub fn can_withdraw(position: &StakePosition, now: u64, min_lock_duration: u64) -> bool {
    now.saturating_sub(position.staked_at) >= min_lock_duration
}

/// First timestamp at which [`can_withdraw`] holds.
pub fn unlock_timestamp(position: &StakePosition, min_lock_duration: u64) -> u64 {
    position.staked_at.saturating_add(min_lock_duration)
}

/// New `staked_at` for a deposit of `amount` at `now`.
///
/// A position with no principal (first stake, or re-stake after a full
/// withdrawal) always starts a fresh clock. Withdrawals never call this, so a
/// partial withdrawal leaves the clock where it was.
///
/// The weighted average is taken as
///
/// ```text
/// staked_at + floor(amount × (now − staked_at) / (principal + amount))
/// ```
///
/// with the product held in an `I256`, so any principal and timestamp the
/// ledger can store is accepted. The shift never exceeds `now − staked_at`.
pub fn staked_at_after_deposit(
    env: &Env,
    position: &StakePosition,
    amount: i128,
    now: u64,
    policy: LockResetPolicy,
) -> Result<u64, ContractError> {
    if position.principal == 0 {
        return Ok(now.max(position.staked_at));
    }

    match policy {
        LockResetPolicy::ResetOnDeposit => Ok(now.max(position.staked_at)),
        LockResetPolicy::WeightedAverage => {
            let elapsed = now.saturating_sub(position.staked_at);
            let total = position
                .principal
                .checked_add(amount)
                .ok_or(ContractError::ArithmeticOverflow)?;
            if total <= 0 || amount < 0 {
                return Err(ContractError::InvariantViolation);
            }

            let shift = I256::from_i128(env, amount)
                .mul(&I256::from_i128(env, i128::from(elapsed)))
                .div(&I256::from_i128(env, total))
                .to_i128()
                .and_then(|v| u64::try_from(v).ok())
                .ok_or(ContractError::ArithmeticOverflow)?;

            Ok(position.staked_at.saturating_add(shift))
        }
    }
}
