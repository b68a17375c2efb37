//! Property-based tests for lock gating and the emergency exit path.
//!
//! Invariants tested:
//! - `payout + penalty == principal` for every principal and penalty rate
//! - emergency payouts match `P − floor(P × b / 10_000)` on-chain
//! - ordinary withdrawals are refused strictly before `staked_at + min_lock`
//!   and allowed from that instant on

use proptest::prelude::*;
use soroban_sdk::token::Client as TokenClient;
use staking_core::{penalty, rewards::SCALE, ContractError};

use crate::common::{advance_to, setup, staker_with};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_penalty_split_conserves_principal(
        principal in 0i128..=i128::MAX,
        bps in 0u32..=penalty::MAX_PENALTY_BPS,
    ) {
        let (payout, fee) = penalty::emergency_exit(principal, bps).unwrap();

        prop_assert_eq!(payout + fee, principal);
        prop_assert!(fee >= 0 && payout >= 0);
        if let Some(product) = principal.checked_mul(i128::from(bps)) {
            prop_assert_eq!(fee, product / 10_000);
        }
    }

    #[test]
    fn prop_emergency_payout_matches_formula(
        principal in 1i128..1_000_000_000_000_000_000_000_000_000_000,
        bps in 0u32..=penalty::MAX_PENALTY_BPS,
        held_for in 0u64..100_000,
    ) {
        let ctx = setup(SCALE / 10_000, 1_000_000, bps);
        let staker = staker_with(&ctx, principal);
        ctx.client.stake(&staker, &principal);
        advance_to(&ctx, held_for);

        let pending = ctx.client.get_position(&staker).pending_rewards;
        let exit = ctx.client.emergency_withdraw(&staker);

        let expected_penalty = principal * i128::from(bps) / 10_000;
        prop_assert_eq!(exit.penalty, expected_penalty);
        prop_assert_eq!(exit.payout, principal - expected_penalty);
        prop_assert_eq!(exit.forfeited_rewards, pending);

        let stake_token = TokenClient::new(&ctx.env, &ctx.stake_token);
        prop_assert_eq!(stake_token.balance(&staker), exit.payout);
        prop_assert_eq!(stake_token.balance(&ctx.client.address), exit.penalty);
        prop_assert_eq!(ctx.client.get_position(&staker).principal, 0);
    }

    #[test]
    fn prop_lock_gates_withdrawal_at_boundary(
        principal in 1i128..1_000_000,
        start in 0u64..1_000_000,
        lock in 1u64..1_000_000,
        early_by in 1u64..1_000_000,
    ) {
        let ctx = setup(0, lock, 0);
        let staker = staker_with(&ctx, principal);
        advance_to(&ctx, start);
        ctx.client.stake(&staker, &principal);

        let unlock = start + lock;
        prop_assert_eq!(ctx.client.get_position(&staker).unlock_timestamp, unlock);

        advance_to(&ctx, unlock - early_by.min(lock));
        prop_assert_eq!(
            ctx.client.try_withdraw(&staker, &principal),
            Err(Ok(ContractError::StillLocked))
        );

        advance_to(&ctx, unlock);
        ctx.client.withdraw(&staker, &principal);
        prop_assert_eq!(ctx.client.total_staked(), 0);
    }
}
