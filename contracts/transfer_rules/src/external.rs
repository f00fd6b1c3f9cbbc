use soroban_sdk::{vec, Address, Env, IntoVal, Symbol};

/// Move tokens the token contract holds under this contract's address
pub fn execute_transfer(env: &Env, token: &Address, to: &Address, amount: i128) {
    env.invoke_contract::<()>(
        token,
        &Symbol::new(env, "execute_transfer"),
        vec![
            env,
            env.current_contract_address().to_val(),
            to.to_val(),
            amount.into_val(env),
        ],
    );
}
