use soroban_sdk::{vec, Address, Env, IntoVal, Symbol};

use crate::storage::Limits;

/// Promote the account's pending funds on the fundraiser
pub fn accept_contributor(env: &Env, fundraiser: &Address, account: &Address, limits: &Limits) {
    env.invoke_contract::<i128>(
        fundraiser,
        &Symbol::new(env, "accept_contributor"),
        vec![env, account.to_val(), limits.clone().into_val(env)],
    );
}

/// Demote the account's qualified funds back to pending
pub fn remove_contributor(env: &Env, fundraiser: &Address, account: &Address) {
    env.invoke_contract::<()>(
        fundraiser,
        &Symbol::new(env, "remove_contributor"),
        vec![env, account.to_val()],
    );
}
