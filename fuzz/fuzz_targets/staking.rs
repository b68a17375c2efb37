#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env, Vec as SorobanVec,
};
use staking_core::{
    lock::LockResetPolicy, protocol::StakingConfig, StakingContract, StakingContractClient,
};

#[derive(Arbitrary, Debug)]
pub struct FuzzConfig {
    reward_rate: u64,
    min_lock_duration: u16,
    emergency_penalty_bps: u16,
    weighted_lock: bool,
}

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Stake { who: u8, amount: u32 },
    Withdraw { who: u8, amount: u32 },
    ClaimRewards { who: u8 },
    EmergencyWithdraw { who: u8 },
    SetRewardRate { rate: u64 },
    SetPaused { paused: bool },
    SweepPenalties,
    Advance { secs: u16 },
}

const USERS: usize = 4;

fuzz_target!(|input: (FuzzConfig, Vec<FuzzAction>)| {
    let (config, actions) = input;
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(0);

    let admin = Address::generate(&env);
    let stake_token = env
        .register_stellar_asset_contract_v2(admin.clone())
        .address();
    let reward_token = env
        .register_stellar_asset_contract_v2(admin.clone())
        .address();

    let contract_id = env.register(StakingContract, ());
    let client = StakingContractClient::new(&env, &contract_id);

    let policy = if config.weighted_lock {
        LockResetPolicy::WeightedAverage
    } else {
        LockResetPolicy::ResetOnDeposit
    };
    let initialized = client.try_initialize(
        &admin,
        &stake_token,
        &reward_token,
        &StakingConfig {
            reward_rate: i128::from(config.reward_rate),
            min_lock_duration: u64::from(config.min_lock_duration),
            emergency_penalty_bps: u32::from(config.emergency_penalty_bps),
            lock_reset_policy: policy,
        },
    );
    // Out-of-range penalties must be rejected up front.
    if initialized.is_err() {
        assert!(config.emergency_penalty_bps > 10_000);
        return;
    }

    StellarAssetClient::new(&env, &reward_token).mint(&admin, &i128::from(u64::MAX));
    client.fund_rewards(&admin, &i128::from(u64::MAX));

    let mut users = SorobanVec::new(&env);
    for _ in 0..USERS {
        let user = Address::generate(&env);
        StellarAssetClient::new(&env, &stake_token).mint(&user, &i128::from(u32::MAX));
        users.push_back(user);
    }
    let user = |who: u8| users.get_unchecked(u32::from(who) % USERS as u32);

    let stake_balance = TokenClient::new(&env, &stake_token);
    let mut now = 0u64;

    for action in actions {
        match action {
            FuzzAction::Stake { who, amount } => {
                let _ = client.try_stake(&user(who), &i128::from(amount));
            }
            FuzzAction::Withdraw { who, amount } => {
                let _ = client.try_withdraw(&user(who), &i128::from(amount));
            }
            FuzzAction::ClaimRewards { who } => {
                let _ = client.try_claim_rewards(&user(who));
            }
            FuzzAction::EmergencyWithdraw { who } => {
                let _ = client.try_emergency_withdraw(&user(who));
            }
            FuzzAction::SetRewardRate { rate } => {
                let _ = client.try_set_reward_rate(&admin, &i128::from(rate));
            }
            FuzzAction::SetPaused { paused } => {
                let _ = client.try_set_paused(&admin, &paused);
            }
            FuzzAction::SweepPenalties => {
                let _ = client.try_sweep_penalties(&admin, &admin);
            }
            FuzzAction::Advance { secs } => {
                now += u64::from(secs);
                env.ledger().set_timestamp(now);
            }
        }

        // Ledger and token balances must agree after every step.
        let total = client.total_staked();
        assert_eq!(client.audit_total_staked(&users), total);

        let state = client.get_protocol_state();
        let retained = state.penalties_collected - state.penalties_swept;
        assert_eq!(stake_balance.balance(&contract_id), total + retained);
        assert!(state.rewards_paid <= state.rewards_funded);
    }
});
