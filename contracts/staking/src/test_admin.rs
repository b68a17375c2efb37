extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Ledger as _},
    Address, Env, IntoVal, Symbol, TryFromVal, TryIntoVal, Val,
};

use crate::{
    events::{
        EmergencyPenaltyUpdatedEvent, LockResetPolicyUpdatedEvent, MinLockDurationUpdatedEvent,
        RewardRateUpdatedEvent,
    },
    lock::LockResetPolicy,
    protocol::StakingConfig,
    ContractError, StakingContract, StakingContractClient,
};

// ── Test helpers ─────────────────────────────────────────────────────────────

fn setup() -> (Env, StakingContractClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();

    let stake_token = env.register_stellar_asset_contract_v2(Address::generate(&env));
    let reward_token = env.register_stellar_asset_contract_v2(Address::generate(&env));

    let contract_id = env.register(StakingContract, ());
    let client = StakingContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    client.initialize(
        &admin,
        &stake_token.address(),
        &reward_token.address(),
        &StakingConfig {
            reward_rate: 10,
            min_lock_duration: 86_400,
            emergency_penalty_bps: 1_000,
            lock_reset_policy: LockResetPolicy::ResetOnDeposit,
        },
    );

    (env, client, admin)
}

/// Payload of the last event, after checking it carries the single `topic`.
fn last_update<T: TryFromVal<Env, Val>>(env: &Env, topic: Symbol) -> T {
    let events: soroban_sdk::Vec<(Address, soroban_sdk::Vec<Val>, Val)> = crate::test::raw_events(env);
    let (_, topics, data) = events.get(events.len() - 1).unwrap();
    assert_eq!(topics, (topic,).into_val(env));
    data.try_into_val(env).unwrap()
}

// ── Setters by admin ─────────────────────────────────────────────────────────

#[test]
fn test_admin_updates_configuration() {
    let (env, client, admin) = setup();
    env.ledger().set_timestamp(1_000);

    client.set_reward_rate(&admin, &25);
    let rate: RewardRateUpdatedEvent = last_update(&env, symbol_short!("RATE_UPD"));
    assert_eq!((rate.old_rate, rate.new_rate), (10, 25));
    assert_eq!(rate.timestamp, 1_000);

    client.set_min_lock_duration(&admin, &172_800);
    let lock: MinLockDurationUpdatedEvent = last_update(&env, symbol_short!("LOCK_UPD"));
    assert_eq!((lock.old_duration, lock.new_duration), (86_400, 172_800));

    client.set_emergency_penalty_bps(&admin, &2_500);
    let penalty: EmergencyPenaltyUpdatedEvent = last_update(&env, symbol_short!("PNLTY_UPD"));
    assert_eq!((penalty.old_bps, penalty.new_bps), (1_000, 2_500));

    client.set_lock_reset_policy(&admin, &LockResetPolicy::WeightedAverage);
    let policy: LockResetPolicyUpdatedEvent = last_update(&env, symbol_short!("RESET_UPD"));
    assert_eq!(policy.old_policy, LockResetPolicy::ResetOnDeposit);
    assert_eq!(policy.new_policy, LockResetPolicy::WeightedAverage);

    let config = client.get_config();
    assert_eq!(config.reward_rate, 25);
    assert_eq!(config.min_lock_duration, 172_800);
    assert_eq!(config.emergency_penalty_bps, 2_500);
    assert_eq!(config.lock_reset_policy, LockResetPolicy::WeightedAverage);
}

#[test]
fn test_setters_validate_bounds() {
    let (_env, client, admin) = setup();

    assert_eq!(
        client.try_set_emergency_penalty_bps(&admin, &10_001),
        Err(Ok(ContractError::InvalidConfiguration))
    );
    assert_eq!(
        client.try_set_reward_rate(&admin, &-1),
        Err(Ok(ContractError::InvalidConfiguration))
    );

    // Boundaries are accepted.
    client.set_emergency_penalty_bps(&admin, &10_000);
    client.set_reward_rate(&admin, &0);
    assert_eq!(client.get_config().emergency_penalty_bps, 10_000);
    assert_eq!(client.current_reward_rate(), 0);
}

// ── Non-admin is rejected ────────────────────────────────────────────────────

#[test]
fn test_non_admin_cannot_configure() {
    let (env, client, _admin) = setup();
    let intruder = Address::generate(&env);

    assert_eq!(
        client.try_set_reward_rate(&intruder, &999),
        Err(Ok(ContractError::Unauthorized))
    );
    assert_eq!(
        client.try_set_min_lock_duration(&intruder, &0),
        Err(Ok(ContractError::Unauthorized))
    );
    assert_eq!(
        client.try_set_emergency_penalty_bps(&intruder, &0),
        Err(Ok(ContractError::Unauthorized))
    );
    assert_eq!(
        client.try_set_lock_reset_policy(&intruder, &LockResetPolicy::WeightedAverage),
        Err(Ok(ContractError::Unauthorized))
    );
    assert_eq!(
        client.try_set_paused(&intruder, &true),
        Err(Ok(ContractError::Unauthorized))
    );
    assert_eq!(
        client.try_sweep_penalties(&intruder, &intruder),
        Err(Ok(ContractError::Unauthorized))
    );

    assert_eq!(client.current_reward_rate(), 10);
    assert!(!client.get_protocol_state().paused);
}

// ── Two-step admin transfer ──────────────────────────────────────────────────

#[test]
fn test_admin_transfer_flow() {
    let (env, client, admin) = setup();
    let successor = Address::generate(&env);

    client.propose_admin(&admin, &successor);
    assert_eq!(client.get_pending_admin(), Some(successor.clone()));
    // Nothing changes until the nominee accepts.
    assert_eq!(client.get_admin(), admin);

    client.accept_admin(&successor);
    assert_eq!(client.get_admin(), successor);
    assert_eq!(client.get_pending_admin(), None);

    // Powers moved with the role.
    client.set_reward_rate(&successor, &42);
    assert_eq!(
        client.try_set_reward_rate(&admin, &1),
        Err(Ok(ContractError::Unauthorized))
    );
}

#[test]
fn test_only_nominee_can_accept() {
    let (env, client, admin) = setup();
    let successor = Address::generate(&env);
    let stranger = Address::generate(&env);

    assert_eq!(
        client.try_accept_admin(&successor),
        Err(Ok(ContractError::NoPendingAdmin))
    );

    client.propose_admin(&admin, &successor);
    assert_eq!(
        client.try_accept_admin(&stranger),
        Err(Ok(ContractError::Unauthorized))
    );
    assert_eq!(
        client.try_propose_admin(&stranger, &stranger),
        Err(Ok(ContractError::Unauthorized))
    );
}

#[test]
fn test_cancel_admin_transfer() {
    let (env, client, admin) = setup();
    let successor = Address::generate(&env);

    assert_eq!(
        client.try_cancel_admin_transfer(&admin),
        Err(Ok(ContractError::NoPendingAdmin))
    );

    client.propose_admin(&admin, &successor);
    client.cancel_admin_transfer(&admin);

    assert_eq!(client.get_pending_admin(), None);
    assert_eq!(
        client.try_accept_admin(&successor),
        Err(Ok(ContractError::NoPendingAdmin))
    );
    assert_eq!(client.get_admin(), admin);
}
