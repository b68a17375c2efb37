#![no_std]

pub mod asset;
pub mod events;
pub mod invariants;
pub mod lock;
pub mod penalty;
pub mod position;
pub mod protocol;
pub mod rewards;

use soroban_sdk::{contract, contractimpl, contracttype, Address, Env, Vec};

use asset::AssetVault;
use lock::LockResetPolicy;
use penalty::{EmergencyExit, MAX_PENALTY_BPS};
use position::StakePosition;
use protocol::{ProtocolState, StakingConfig};

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    ZeroAmount = 4,
    InsufficientBalance = 5,
    StillLocked = 6,
    NothingStaked = 7,
    ArithmeticOverflow = 8,
    InvalidConfiguration = 9,
    InsufficientRewards = 10,
    Paused = 11,
    InvariantViolation = 12,
    NoPendingAdmin = 13,
}

// ── Public-facing types ──────────────────────────────────────────────────────

/// Snapshot of an account's position returned by `get_position`.
///
/// An account with no position reads as all zeroes, with `can_withdraw` false.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionView {
    pub principal: i128,
    pub staked_at: u64,
    pub pending_rewards: i128,
    pub unlock_timestamp: u64,
    pub can_withdraw: bool,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct StakingContract;

#[contractimpl]
impl StakingContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the contract.
    ///
    /// * `stake_token`  – SAC address of the token users stake.
    /// * `reward_token` – SAC address of the token paid as rewards.
    /// * `config`       – rate, lock, penalty and clock-reset settings.
    pub fn initialize(
        env: Env,
        admin: Address,
        stake_token: Address,
        reward_token: Address,
        config: StakingConfig,
    ) -> Result<(), ContractError> {
        if protocol::is_initialized(&env) {
            return Err(ContractError::AlreadyInitialized);
        }
        if stake_token == reward_token {
            return Err(ContractError::InvalidConfiguration);
        }
        config.validate()?;

        let now = env.ledger().timestamp();
        let state = ProtocolState::new(
            admin.clone(),
            stake_token.clone(),
            reward_token.clone(),
            config.clone(),
            now,
        );
        protocol::save(&env, &state);

        events::publish_initialized(&env, admin, stake_token, reward_token, config);

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` stake tokens.
    ///
    /// Pending rewards are checkpointed first, so the new tokens only earn
    /// from this moment on.
    pub fn stake(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        staker.require_auth();
        let mut state = protocol::load(&env)?;

        if state.paused {
            return Err(ContractError::Paused);
        }
        if amount <= 0 {
            return Err(ContractError::ZeroAmount);
        }

        let vault = AssetVault::new(&env, &state.stake_token);
        if vault.balance_of(&staker) < amount {
            return Err(ContractError::InsufficientBalance);
        }

        // 1. Flush the index at the pre-operation rate and checkpoint.
        let now = env.ledger().timestamp();
        let (before, mut position) = Self::checkpoint(&env, &mut state, &staker, now)?;
        let total_before = state.total_staked;

        // 2. Apply the deposit.
        position.staked_at = lock::staked_at_after_deposit(
            &env,
            &position,
            amount,
            now,
            state.config.lock_reset_policy,
        )?;
        position.principal = position
            .principal
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        position.active = true;
        let new_total = state.credit_stake(amount)?;

        invariants::check_transition(before, total_before, Some(&position), &state)?;

        // 3. Effects, then interaction.
        position::upsert(&env, &position);
        protocol::save(&env, &state);
        vault.transfer_in(&staker, amount);

        events::publish_staked(&env, staker, amount, new_total);

        Ok(())
    }

    /// Take back `amount` of unlocked principal.
    ///
    /// Accrued rewards stay on the position and remain claimable. A partial
    /// withdrawal leaves the lock clock untouched.
    pub fn withdraw(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        staker.require_auth();
        let mut state = protocol::load(&env)?;

        if amount <= 0 {
            return Err(ContractError::ZeroAmount);
        }

        let now = env.ledger().timestamp();
        let (before, mut position) = Self::checkpoint(&env, &mut state, &staker, now)?;
        let total_before = state.total_staked;

        if position.principal == 0 {
            return Err(ContractError::NothingStaked);
        }
        if amount > position.principal {
            return Err(ContractError::InsufficientBalance);
        }
        if !lock::can_withdraw(&position, now, state.config.min_lock_duration) {
            return Err(ContractError::StillLocked);
        }

        position.principal -= amount;
        position.active = position.principal > 0;
        state.debit_stake(amount)?;

        invariants::check_transition(before, total_before, Some(&position), &state)?;

        position::upsert(&env, &position);
        protocol::save(&env, &state);
        AssetVault::new(&env, &state.stake_token).transfer_out(&staker, amount);

        events::publish_withdrawn(&env, staker, amount, position.accrued_rewards);

        Ok(())
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Claim all accumulated rewards for `staker`.
    ///
    /// Returns the amount paid; `0` (not an error) when nothing is owed.
    pub fn claim_rewards(env: Env, staker: Address) -> Result<i128, ContractError> {
        staker.require_auth();
        let mut state = protocol::load(&env)?;

        if state.paused {
            return Err(ContractError::Paused);
        }
        if position::load(&env, &staker).is_none() {
            return Ok(0);
        }

        let now = env.ledger().timestamp();
        let (before, mut position) = Self::checkpoint(&env, &mut state, &staker, now)?;
        let total_before = state.total_staked;

        let earned = position.accrued_rewards;
        if earned > 0 {
            state.record_reward_payment(earned)?;
            position.accrued_rewards = 0;
        }

        invariants::check_transition(before, total_before, Some(&position), &state)?;

        position::upsert(&env, &position);
        protocol::save(&env, &state);

        if earned > 0 {
            AssetVault::new(&env, &state.reward_token).transfer_out(&staker, earned);
            events::publish_rewards_claimed(&env, staker, earned);
        }

        Ok(earned)
    }

    /// Exit immediately, regardless of lock state.
    ///
    /// Returns principal minus the configured penalty. Unclaimed rewards are
    /// forfeited and the position is closed.
    pub fn emergency_withdraw(env: Env, staker: Address) -> Result<EmergencyExit, ContractError> {
        staker.require_auth();
        let mut state = protocol::load(&env)?;

        let position = match position::load(&env, &staker) {
            Some(p) if p.principal > 0 => p,
            _ => return Err(ContractError::NothingStaked),
        };
        let before = position.principal;
        let total_before = state.total_staked;

        // The index is not flushed here; if the projection fails the recorded
        // rewards are reported as forfeited.
        let now = env.ledger().timestamp();
        let forfeited_rewards = state
            .projected_index(now)
            .and_then(|index| rewards::pending(&position, index))
            .unwrap_or(position.accrued_rewards);

        let (payout, penalty) =
            penalty::emergency_exit(position.principal, state.config.emergency_penalty_bps)?;

        state.debit_stake(position.principal)?;
        state.record_penalty(penalty)?;
        state.record_forfeit(forfeited_rewards);

        invariants::check_transition(before, total_before, None, &state)?;

        position::remove(&env, &staker);
        protocol::save(&env, &state);
        AssetVault::new(&env, &state.stake_token).transfer_out(&staker, payout);

        events::publish_emergency_withdrawn(&env, staker, payout, penalty, forfeited_rewards);

        Ok(EmergencyExit {
            payout,
            penalty,
            forfeited_rewards,
        })
    }

    /// Deposit reward tokens into the reserve that backs claims.
    pub fn fund_rewards(env: Env, funder: Address, amount: i128) -> Result<(), ContractError> {
        funder.require_auth();
        let mut state = protocol::load(&env)?;

        if amount <= 0 {
            return Err(ContractError::ZeroAmount);
        }
        let vault = AssetVault::new(&env, &state.reward_token);
        if vault.balance_of(&funder) < amount {
            return Err(ContractError::InsufficientBalance);
        }

        state.record_funding(amount)?;
        protocol::save(&env, &state);
        vault.transfer_in(&funder, amount);

        events::publish_rewards_funded(&env, funder, amount, state.available_rewards());

        Ok(())
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Return the position held by `account`, with rewards projected to now.
    pub fn get_position(env: Env, account: Address) -> Result<PositionView, ContractError> {
        let state = protocol::load(&env)?;
        let position = match position::load(&env, &account) {
            Some(p) => p,
            None => {
                return Ok(PositionView {
                    principal: 0,
                    staked_at: 0,
                    pending_rewards: 0,
                    unlock_timestamp: 0,
                    can_withdraw: false,
                })
            }
        };

        let now = env.ledger().timestamp();
        let index = state.projected_index(now)?;
        let pending_rewards = rewards::pending(&position, index)?;

        // A drained position only holds rewards; it has no lock clock.
        if position.principal == 0 {
            return Ok(PositionView {
                principal: 0,
                staked_at: 0,
                pending_rewards,
                unlock_timestamp: 0,
                can_withdraw: false,
            });
        }

        let min_lock = state.config.min_lock_duration;
        Ok(PositionView {
            principal: position.principal,
            staked_at: position.staked_at,
            pending_rewards,
            unlock_timestamp: lock::unlock_timestamp(&position, min_lock),
            can_withdraw: lock::can_withdraw(&position, now, min_lock),
        })
    }

    /// Return the sum of all currently staked tokens.
    pub fn total_staked(env: Env) -> Result<i128, ContractError> {
        Ok(protocol::load(&env)?.total_staked)
    }

    /// Return the per-second reward rate, scaled by `rewards::SCALE`.
    pub fn current_reward_rate(env: Env) -> Result<i128, ContractError> {
        Ok(protocol::load(&env)?.config.reward_rate)
    }

    /// Return the annualised reward rate in basis points (display only).
    pub fn current_apr_bps(env: Env) -> Result<i128, ContractError> {
        protocol::load(&env)?.current_apr_bps()
    }

    pub fn get_config(env: Env) -> Result<StakingConfig, ContractError> {
        Ok(protocol::load(&env)?.config)
    }

    pub fn get_protocol_state(env: Env) -> Result<ProtocolState, ContractError> {
        protocol::load(&env)
    }

    /// Return funded reward tokens not yet paid out.
    pub fn available_rewards(env: Env) -> Result<i128, ContractError> {
        Ok(protocol::load(&env)?.available_rewards())
    }

    /// Return the number of positions held in storage.
    pub fn position_count(env: Env) -> u32 {
        position::count(&env)
    }

    /// Recompute `total_staked` from the positions of `accounts`.
    ///
    /// `accounts` must cover every account with a stored position; the call
    /// fails with `InvariantViolation` if the sum or the count disagrees.
    pub fn audit_total_staked(env: Env, accounts: Vec<Address>) -> Result<i128, ContractError> {
        let state = protocol::load(&env)?;
        invariants::audit_total_staked(&env, &state, &accounts)
    }

    pub fn is_initialized(env: Env) -> bool {
        protocol::is_initialized(&env)
    }

    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        Ok(protocol::load(&env)?.admin)
    }

    /// Get the pending admin address, if any.
    pub fn get_pending_admin(env: Env) -> Option<Address> {
        protocol::pending_admin(&env)
    }

    // ── Admin transfer (two-step) ──────────────────────────────────────────

    /// Propose a new admin address. Only the current admin can call this.
    /// The new admin must call `accept_admin` to complete the transfer.
    pub fn propose_admin(
        env: Env,
        current_admin: Address,
        new_admin: Address,
    ) -> Result<(), ContractError> {
        current_admin.require_auth();
        Self::require_admin(&env, &current_admin)?;

        protocol::set_pending_admin(&env, &new_admin);

        events::publish_admin_transfer_proposed(&env, current_admin, new_admin);

        Ok(())
    }

    /// Accept the pending admin transfer. Only the proposed new admin can call this.
    pub fn accept_admin(env: Env, new_admin: Address) -> Result<(), ContractError> {
        new_admin.require_auth();
        let mut state = protocol::load(&env)?;

        let pending = protocol::pending_admin(&env).ok_or(ContractError::NoPendingAdmin)?;
        if new_admin != pending {
            return Err(ContractError::Unauthorized);
        }

        let old_admin = state.admin.clone();
        state.admin = new_admin.clone();
        protocol::save(&env, &state);
        protocol::clear_pending_admin(&env);

        events::publish_admin_transfer_accepted(&env, old_admin, new_admin);

        Ok(())
    }

    /// Cancel a pending admin transfer. Only the current admin can call this.
    pub fn cancel_admin_transfer(env: Env, current_admin: Address) -> Result<(), ContractError> {
        current_admin.require_auth();
        Self::require_admin(&env, &current_admin)?;

        let pending = protocol::pending_admin(&env).ok_or(ContractError::NoPendingAdmin)?;
        protocol::clear_pending_admin(&env);

        events::publish_admin_transfer_cancelled(&env, current_admin, pending);

        Ok(())
    }

    // ── Admin functions ──────────────────────────────────────────────────────

    /// Update the reward rate (per staked unit per second, scaled by `SCALE`).
    ///
    /// The reward index is flushed at the old rate first, so no position,
    /// touched or idle, is re-priced for time already elapsed.
    pub fn set_reward_rate(env: Env, caller: Address, new_rate: i128) -> Result<(), ContractError> {
        caller.require_auth();
        let mut state = Self::require_admin(&env, &caller)?;

        if new_rate < 0 {
            return Err(ContractError::InvalidConfiguration);
        }

        state.sync_index(env.ledger().timestamp())?;
        let old_rate = state.config.reward_rate;
        state.config.reward_rate = new_rate;
        protocol::save(&env, &state);

        events::publish_reward_rate_updated(&env, old_rate, new_rate);

        Ok(())
    }

    /// Update the lock duration. Locks are evaluated against the current
    /// duration, so the change applies to every position at its next check.
    pub fn set_min_lock_duration(
        env: Env,
        caller: Address,
        new_duration: u64,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        let mut state = Self::require_admin(&env, &caller)?;

        let old_duration = state.config.min_lock_duration;
        state.config.min_lock_duration = new_duration;
        protocol::save(&env, &state);

        events::publish_min_lock_duration_updated(&env, old_duration, new_duration);

        Ok(())
    }

    /// Update the emergency-exit penalty, in basis points (at most 10_000).
    pub fn set_emergency_penalty_bps(
        env: Env,
        caller: Address,
        new_bps: u32,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        let mut state = Self::require_admin(&env, &caller)?;

        if new_bps > MAX_PENALTY_BPS {
            return Err(ContractError::InvalidConfiguration);
        }

        let old_bps = state.config.emergency_penalty_bps;
        state.config.emergency_penalty_bps = new_bps;
        protocol::save(&env, &state);

        events::publish_emergency_penalty_updated(&env, old_bps, new_bps);

        Ok(())
    }

    /// Choose how deposits onto an existing position move its lock clock.
    pub fn set_lock_reset_policy(
        env: Env,
        caller: Address,
        policy: LockResetPolicy,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        let mut state = Self::require_admin(&env, &caller)?;

        let old_policy = state.config.lock_reset_policy;
        state.config.lock_reset_policy = policy;
        protocol::save(&env, &state);

        events::publish_lock_reset_policy_updated(&env, old_policy, policy);

        Ok(())
    }

    /// Engage or release the circuit breaker.
    ///
    /// While paused, `stake` and `claim_rewards` are rejected; `withdraw` and
    /// `emergency_withdraw` stay open so principal can always leave.
    pub fn set_paused(env: Env, caller: Address, paused: bool) -> Result<(), ContractError> {
        caller.require_auth();
        let mut state = Self::require_admin(&env, &caller)?;

        state.paused = paused;
        protocol::save(&env, &state);

        events::publish_pause_updated(&env, caller, paused);

        Ok(())
    }

    /// Send every retained emergency-exit penalty to `to`. Returns the amount sent.
    pub fn sweep_penalties(env: Env, caller: Address, to: Address) -> Result<i128, ContractError> {
        caller.require_auth();
        let mut state = Self::require_admin(&env, &caller)?;

        let amount = state.unswept_penalties();
        if amount == 0 {
            return Ok(0);
        }

        state.record_sweep(amount)?;
        protocol::save(&env, &state);
        AssetVault::new(&env, &state.stake_token).transfer_out(&to, amount);

        events::publish_penalties_swept(&env, to, amount);

        Ok(amount)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// Guard: revert if `caller` is not the stored admin. Returns the loaded
    /// state so the caller can mutate it.
    fn require_admin(env: &Env, caller: &Address) -> Result<ProtocolState, ContractError> {
        let state = protocol::load(env)?;
        if *caller != state.admin {
            return Err(ContractError::Unauthorized);
        }
        Ok(state)
    }

    /// First step of every position operation.
    ///
    /// 1. Flush the global index to `now` at the rate in force before the call.
    /// 2. Load the caller's position, or a fresh zero position if none exists.
    /// 3. Accrue the position against the flushed index.
    ///
    /// Nothing is written; returns the principal held before the call and the
    /// accrued position.
    fn checkpoint(
        env: &Env,
        state: &mut ProtocolState,
        owner: &Address,
        now: u64,
    ) -> Result<(i128, StakePosition), ContractError> {
        let index = state.sync_index(now)?;
        let existing = position::load(env, owner);
        let before = existing.as_ref().map(|p| p.principal).unwrap_or(0);
        let current = existing.unwrap_or_else(|| StakePosition::open(owner.clone(), now, index));
        let (accrued, _) = rewards::accrue(&current, index, now)?;
        Ok((before, accrued))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_admin;
