use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

// ── Storage keys ────────────────────────────────────────────────────────────

const POSITION_PREFIX: Symbol = symbol_short!("POS");
const POSITION_COUNT: Symbol = symbol_short!("POS_CNT");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

// ── Types ───────────────────────────────────────────────────────────────────

/// One account's staked balance and reward bookkeeping.
///
/// A stored position is never "empty": once both `principal` and
/// `accrued_rewards` reach zero the record is removed, so an absent entry and
/// a drained one cannot be confused.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakePosition {
    pub owner: Address,
    /// Staked amount in the smallest unit of the stake token.
    pub principal: i128,
    /// Start of the lock clock.
    pub staked_at: u64,
    /// Ledger timestamp of the last accrual checkpoint.
    pub last_accrual: u64,
    /// Global reward index at the last checkpoint (scaled by `rewards::SCALE`).
    pub reward_index_paid: i128,
    /// Scaled remainder below one reward unit, carried to the next checkpoint.
    pub reward_remainder: i128,
    /// Rewards computed but not yet paid.
    pub accrued_rewards: i128,
    /// `principal > 0`.
    pub active: bool,
}

impl StakePosition {
    /// Zero-valued position for an account's first deposit.
    pub fn open(owner: Address, now: u64, reward_index: i128) -> Self {
        StakePosition {
            owner,
            principal: 0,
            staked_at: now,
            last_accrual: now,
            reward_index_paid: reward_index,
            reward_remainder: 0,
            accrued_rewards: 0,
            active: false,
        }
    }

    /// Nothing staked and nothing owed.
    pub fn is_closed(&self) -> bool {
        self.principal == 0 && self.accrued_rewards == 0
    }
}

// ── Storage helpers ─────────────────────────────────────────────────────────

fn position_key(owner: &Address) -> (Symbol, Address) {
    (POSITION_PREFIX, owner.clone())
}

fn extend_ttl(env: &Env, key: &(Symbol, Address)) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Retrieve the position held by `owner`, or `None` if the account has never
/// staked or has fully exited.
pub fn load(env: &Env, owner: &Address) -> Option<StakePosition> {
    let key = position_key(owner);
    let position: Option<StakePosition> = env.storage().persistent().get(&key);
    if position.is_some() {
        extend_ttl(env, &key);
    }
    position
}

/// Persist `position`, or drop it from storage when it is closed.
///
/// Keeps the stored-position counter in step with inserts and removals.
pub fn upsert(env: &Env, position: &StakePosition) {
    if position.is_closed() {
        remove(env, &position.owner);
        return;
    }

    let key = position_key(&position.owner);
    let existed = env.storage().persistent().has(&key);
    env.storage().persistent().set(&key, position);
    extend_ttl(env, &key);

    if !existed {
        set_count(env, count(env).saturating_add(1));
    }
}

/// Delete the position held by `owner`. A no-op when none exists.
pub fn remove(env: &Env, owner: &Address) {
    let key = position_key(owner);
    if env.storage().persistent().has(&key) {
        env.storage().persistent().remove(&key);
        set_count(env, count(env).saturating_sub(1));
    }
}

/// Number of positions currently held in storage.
pub fn count(env: &Env) -> u32 {
    env.storage().instance().get(&POSITION_COUNT).unwrap_or(0)
}

fn set_count(env: &Env, value: u32) {
    env.storage().instance().set(&POSITION_COUNT, &value);
}
