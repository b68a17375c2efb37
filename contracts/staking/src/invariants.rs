//! Ledger invariant checks.
//!
//! Every mutating operation calls [`check_transition`] on its in-memory
//! before/after values before anything is written. Because `total_staked`
//! starts at zero with no positions, a transition that moves a principal and
//! the total by the same delta preserves `sum(principal) == total_staked`
//! globally. [`audit_total_staked`] recomputes the sum directly.

use soroban_sdk::{Address, Env, Map, Vec};

use crate::{
    position::{self, StakePosition},
    protocol::ProtocolState,
    rewards::SCALE,
    ContractError,
};

/// Per-record invariants.
pub fn check_position(position: &StakePosition) -> Result<(), ContractError> {
    // PrincipalNonNegative
    if position.principal < 0 {
        return Err(ContractError::InvariantViolation);
    }
    // RewardsNonNegative
    if position.accrued_rewards < 0 {
        return Err(ContractError::InvariantViolation);
    }
    // ActiveIffPrincipal
    if position.active != (position.principal > 0) {
        return Err(ContractError::InvariantViolation);
    }
    // RemainderBelowOneUnit
    if position.reward_remainder < 0 || position.reward_remainder >= SCALE {
        return Err(ContractError::InvariantViolation);
    }
    Ok(())
}

/// Conservation check for one operation touching one position.
///
/// `principal_before` is zero for an account with no stored position.
/// `after` is `None` when the operation removed the position.
pub fn check_transition(
    principal_before: i128,
    total_before: i128,
    after: Option<&StakePosition>,
    state_after: &ProtocolState,
) -> Result<(), ContractError> {
    let principal_after = match after {
        Some(p) => {
            check_position(p)?;
            p.principal
        }
        None => 0,
    };

    if state_after.total_staked < 0 {
        return Err(ContractError::InvariantViolation);
    }

    let position_delta = principal_after
        .checked_sub(principal_before)
        .ok_or(ContractError::ArithmeticOverflow)?;
    let total_delta = state_after
        .total_staked
        .checked_sub(total_before)
        .ok_or(ContractError::ArithmeticOverflow)?;

    if position_delta != total_delta {
        return Err(ContractError::InvariantViolation);
    }
    Ok(())
}

/// Sum the principal held by `accounts` and compare against the stored total.
///
/// The caller must name every account with a stored position: the number of
/// distinct positions found is compared with the ledger's own count, so an
/// omitted account is detected rather than silently under-summed.
pub fn audit_total_staked(
    env: &Env,
    state: &ProtocolState,
    accounts: &Vec<Address>,
) -> Result<i128, ContractError> {
    let mut seen: Map<Address, bool> = Map::new(env);
    let mut found: u32 = 0;
    let mut sum: i128 = 0;

    for account in accounts.iter() {
        if seen.contains_key(account.clone()) {
            continue;
        }
        seen.set(account.clone(), true);

        if let Some(p) = position::load(env, &account) {
            check_position(&p)?;
            found = found.saturating_add(1);
            sum = sum
                .checked_add(p.principal)
                .ok_or(ContractError::ArithmeticOverflow)?;
        }
    }

    if found != position::count(env) || sum != state.total_staked {
        return Err(ContractError::InvariantViolation);
    }
    Ok(sum)
}
