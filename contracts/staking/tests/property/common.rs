use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::StellarAssetClient,
    Address, Env,
};
use staking_core::{
    lock::LockResetPolicy, protocol::StakingConfig, StakingContract, StakingContractClient,
};

pub const RESERVE: i128 = 1_000_000_000_000_000_000;

pub struct TestContext {
    pub env: Env,
    pub client: StakingContractClient<'static>,
    pub admin: Address,
    pub stake_token: Address,
    pub reward_token: Address,
}

/// Deploys two SAC tokens and an initialised staking contract with a large
/// funded reward reserve.
pub fn setup(reward_rate: i128, min_lock_duration: u64, emergency_penalty_bps: u32) -> TestContext {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(0);

    let stake_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();

    let contract_id = env.register(StakingContract, ());
    let client = StakingContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    client.initialize(
        &admin,
        &stake_token,
        &reward_token,
        &StakingConfig {
            reward_rate,
            min_lock_duration,
            emergency_penalty_bps,
            lock_reset_policy: LockResetPolicy::ResetOnDeposit,
        },
    );

    StellarAssetClient::new(&env, &reward_token).mint(&admin, &RESERVE);
    client.fund_rewards(&admin, &RESERVE);

    TestContext {
        env,
        client,
        admin,
        stake_token,
        reward_token,
    }
}

/// Generates a staker holding `amount` stake tokens.
pub fn staker_with(ctx: &TestContext, amount: i128) -> Address {
    let staker = Address::generate(&ctx.env);
    StellarAssetClient::new(&ctx.env, &ctx.stake_token).mint(&staker, &amount);
    staker
}

pub fn advance_to(ctx: &TestContext, timestamp: u64) {
    ctx.env.ledger().set_timestamp(timestamp);
}
