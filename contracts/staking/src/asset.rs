use soroban_sdk::{token, Address, Env};

/// Token movements in and out of the contract for one asset.
///
/// Callers finish their storage writes before calling `transfer_out`, so a
/// token contract that calls back into staking sees settled balances.
pub struct AssetVault<'a> {
    env: &'a Env,
    client: token::Client<'a>,
}

impl<'a> AssetVault<'a> {
    pub fn new(env: &'a Env, token: &Address) -> Self {
        AssetVault {
            env,
            client: token::Client::new(env, token),
        }
    }

    /// Pull `amount` from `from` into the contract. `from` must have authorised it.
    pub fn transfer_in(&self, from: &Address, amount: i128) {
        if amount > 0 {
            self.client
                .transfer(from, &self.env.current_contract_address(), &amount);
        }
    }

    /// Send `amount` held by the contract to `to`.
    pub fn transfer_out(&self, to: &Address, amount: i128) {
        if amount > 0 {
            self.client
                .transfer(&self.env.current_contract_address(), to, &amount);
        }
    }

    pub fn balance_of(&self, account: &Address) -> i128 {
        self.client.balance(account)
    }
}
