use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::{lock::LockResetPolicy, penalty::MAX_PENALTY_BPS, rewards, ContractError};

// ── Storage keys ────────────────────────────────────────────────────────────

const STATE: Symbol = symbol_short!("STATE");
const PENDING_ADMIN: Symbol = symbol_short!("PEND_ADM");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

// ── Types ───────────────────────────────────────────────────────────────────

/// Admin-tunable parameters, supplied to `initialize` and changed only
/// through the admin setters.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakingConfig {
    /// Reward units per staked unit per second, scaled by `rewards::SCALE`.
    pub reward_rate: i128,
    /// Seconds a position must age before `withdraw` is allowed.
    pub min_lock_duration: u64,
    /// Share of principal forfeited on emergency exit (0–10_000).
    pub emergency_penalty_bps: u32,
    /// Clock behaviour for deposits onto an existing position.
    pub lock_reset_policy: LockResetPolicy,
}

impl StakingConfig {
    pub fn validate(&self) -> Result<(), ContractError> {
        if self.reward_rate < 0 {
            return Err(ContractError::InvalidConfiguration);
        }
        if self.emergency_penalty_bps > MAX_PENALTY_BPS {
            return Err(ContractError::InvalidConfiguration);
        }
        Ok(())
    }
}

/// Contract-wide singleton: wiring, configuration and running totals.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProtocolState {
    pub admin: Address,
    pub stake_token: Address,
    pub reward_token: Address,
    pub config: StakingConfig,
    /// Sum of every position's principal.
    pub total_staked: i128,
    /// Cumulative reward per staked unit, scaled by `rewards::SCALE`.
    pub reward_index: i128,
    pub index_updated_at: u64,
    /// Reward tokens deposited through `fund_rewards`.
    pub rewards_funded: i128,
    /// Reward tokens transferred out by claims.
    pub rewards_paid: i128,
    /// Accrued rewards given up by emergency exits.
    pub rewards_forfeited: i128,
    /// Stake tokens retained from emergency exits.
    pub penalties_collected: i128,
    /// Retained stake tokens already sent out by `sweep_penalties`.
    pub penalties_swept: i128,
    pub paused: bool,
}

impl ProtocolState {
    pub fn new(
        admin: Address,
        stake_token: Address,
        reward_token: Address,
        config: StakingConfig,
        now: u64,
    ) -> Self {
        ProtocolState {
            admin,
            stake_token,
            reward_token,
            config,
            total_staked: 0,
            reward_index: 0,
            index_updated_at: now,
            rewards_funded: 0,
            rewards_paid: 0,
            rewards_forfeited: 0,
            penalties_collected: 0,
            penalties_swept: 0,
            paused: false,
        }
    }

    // ── Reward index ────────────────────────────────────────────────────────

    /// Index value at `now` under the current rate, without mutating.
    pub fn projected_index(&self, now: u64) -> Result<i128, ContractError> {
        let elapsed = now.saturating_sub(self.index_updated_at);
        rewards::advance_index(self.reward_index, self.config.reward_rate, elapsed)
    }

    /// Flush the index to `now` at the rate currently configured.
    ///
    /// Must run before any rate change so the old rate covers exactly the
    /// time it was in force.
    pub fn sync_index(&mut self, now: u64) -> Result<i128, ContractError> {
        self.reward_index = self.projected_index(now)?;
        self.index_updated_at = self.index_updated_at.max(now);
        Ok(self.reward_index)
    }

    // ── Stake totals ────────────────────────────────────────────────────────

    pub fn credit_stake(&mut self, amount: i128) -> Result<i128, ContractError> {
        self.total_staked = self
            .total_staked
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        Ok(self.total_staked)
    }

    pub fn debit_stake(&mut self, amount: i128) -> Result<i128, ContractError> {
        let remaining = self
            .total_staked
            .checked_sub(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        if remaining < 0 {
            return Err(ContractError::InvariantViolation);
        }
        self.total_staked = remaining;
        Ok(remaining)
    }

    // ── Reward reserve ──────────────────────────────────────────────────────

    /// Funded reward tokens not yet paid out.
    pub fn available_rewards(&self) -> i128 {
        self.rewards_funded.saturating_sub(self.rewards_paid)
    }

    pub fn record_funding(&mut self, amount: i128) -> Result<(), ContractError> {
        self.rewards_funded = self
            .rewards_funded
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Book a reward payout, refusing anything the reserve cannot cover.
    pub fn record_reward_payment(&mut self, amount: i128) -> Result<(), ContractError> {
        if amount > self.available_rewards() {
            return Err(ContractError::InsufficientRewards);
        }
        self.rewards_paid = self
            .rewards_paid
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Informational total; saturates so it can never block an exit.
    pub fn record_forfeit(&mut self, amount: i128) {
        self.rewards_forfeited = self.rewards_forfeited.saturating_add(amount.max(0));
    }

    // ── Penalties ───────────────────────────────────────────────────────────

    pub fn record_penalty(&mut self, amount: i128) -> Result<(), ContractError> {
        self.penalties_collected = self
            .penalties_collected
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Retained penalties still held by the contract.
    pub fn unswept_penalties(&self) -> i128 {
        self.penalties_collected.saturating_sub(self.penalties_swept)
    }

    pub fn record_sweep(&mut self, amount: i128) -> Result<(), ContractError> {
        self.penalties_swept = self
            .penalties_swept
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Display-only annualised rate. Accrual always uses the raw per-second rate.
    pub fn current_apr_bps(&self) -> Result<i128, ContractError> {
        rewards::apr_bps(self.config.reward_rate)
    }
}

// ── Storage helpers ─────────────────────────────────────────────────────────

fn extend_ttl_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&STATE)
}

pub fn load(env: &Env) -> Result<ProtocolState, ContractError> {
    env.storage()
        .instance()
        .get(&STATE)
        .ok_or(ContractError::NotInitialized)
}

pub fn save(env: &Env, state: &ProtocolState) {
    env.storage().instance().set(&STATE, state);
    extend_ttl_instance(env);
}

pub fn pending_admin(env: &Env) -> Option<Address> {
    env.storage().instance().get(&PENDING_ADMIN)
}

pub fn set_pending_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&PENDING_ADMIN, admin);
}

pub fn clear_pending_admin(env: &Env) {
    env.storage().instance().remove(&PENDING_ADMIN);
}
