//! Calls into the transfer rules contract.

use soroban_sdk::{vec, Address, Env, IntoVal, Symbol};

pub fn rules_authorize(env: &Env, rules: &Address, from: &Address, to: &Address) -> bool {
    env.invoke_contract(
        rules,
        &Symbol::new(env, "authorize"),
        vec![env, from.to_val(), to.to_val()],
    )
}

pub fn rules_requires_approval(env: &Env, rules: &Address, from: &Address, to: &Address) -> bool {
    env.invoke_contract(
        rules,
        &Symbol::new(env, "requires_approval"),
        vec![env, from.to_val(), to.to_val()],
    )
}

pub fn rules_request_transfer(
    env: &Env,
    rules: &Address,
    from: &Address,
    to: &Address,
    amount: i128,
) -> u64 {
    env.invoke_contract(
        rules,
        &Symbol::new(env, "request_transfer"),
        vec![env, from.to_val(), to.to_val(), amount.into_val(env)],
    )
}
