//! Calls into the registry, price oracle and security token.

use soroban_sdk::{vec, Address, Env, IntoVal, Symbol};

pub fn registry_minter_of(env: &Env, registry: &Address, token: &Address) -> Option<Address> {
    env.invoke_contract(
        registry,
        &Symbol::new(env, "get_minter"),
        vec![env, token.to_val()],
    )
}

pub fn registry_is_minter(env: &Env, registry: &Address, minter: &Address) -> bool {
    env.invoke_contract(
        registry,
        &Symbol::new(env, "is_minter"),
        vec![env, minter.to_val()],
    )
}

pub fn registry_treasury(env: &Env, registry: &Address) -> Address {
    env.invoke_contract(registry, &Symbol::new(env, "treasury"), vec![env])
}

pub fn registry_reward_pool(env: &Env, registry: &Address) -> Address {
    env.invoke_contract(registry, &Symbol::new(env, "reward_pool"), vec![env])
}

pub fn registry_increase_stake(env: &Env, registry: &Address, token: &Address, amount: i128) {
    env.invoke_contract::<i128>(
        registry,
        &Symbol::new(env, "increase_stake"),
        vec![
            env,
            env.current_contract_address().to_val(),
            token.to_val(),
            amount.into_val(env),
        ],
    );
}

pub fn oracle_price(env: &Env, oracle: &Address) -> (i128, i128) {
    env.invoke_contract(oracle, &Symbol::new(env, "get_price"), vec![env])
}

pub fn token_nav(env: &Env, token: &Address) -> i128 {
    env.invoke_contract(token, &Symbol::new(env, "nav"), vec![env])
}

pub fn token_owner(env: &Env, token: &Address) -> Address {
    env.invoke_contract(token, &Symbol::new(env, "owner"), vec![env])
}

pub fn token_total_supply(env: &Env, token: &Address) -> i128 {
    env.invoke_contract(token, &Symbol::new(env, "total_supply"), vec![env])
}

pub fn token_max_total_supply(env: &Env, token: &Address) -> i128 {
    env.invoke_contract(token, &Symbol::new(env, "max_total_supply"), vec![env])
}

pub fn token_balance_of(env: &Env, token: &Address, account: &Address) -> i128 {
    env.invoke_contract(
        token,
        &Symbol::new(env, "balance_of"),
        vec![env, account.to_val()],
    )
}

pub fn token_is_owner_or_delegate(env: &Env, token: &Address, account: &Address) -> bool {
    env.invoke_contract(
        token,
        &Symbol::new(env, "is_owner_or_delegate"),
        vec![env, account.to_val()],
    )
}

pub fn token_mint(env: &Env, token: &Address, to: &Address, amount: i128) {
    env.invoke_contract::<()>(
        token,
        &Symbol::new(env, "mint"),
        vec![env, to.to_val(), amount.into_val(env)],
    );
}

pub fn token_burn(env: &Env, token: &Address, from: &Address, amount: i128) {
    env.invoke_contract::<()>(
        token,
        &Symbol::new(env, "burn"),
        vec![env, from.to_val(), amount.into_val(env)],
    );
}
