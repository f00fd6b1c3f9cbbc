//! Calls into the restrictions, affiliate manager, fee manager, minter and
//! security token. The mirrored types match the field layout of the called
//! contracts.

use soroban_sdk::{contracttype, vec, Address, Env, IntoVal, String, Symbol};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Limits {
    pub max_count: u32,
    pub min_amount: i128,
    pub max_amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Affiliate {
    pub account: Address,
    pub percentage: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PlatformTerms {
    pub fee: i128,
    pub expiration_time: u64,
    pub fee_collector: Address,
}

pub fn is_whitelisted(env: &Env, restrictions: &Address, account: &Address) -> bool {
    env.invoke_contract(
        restrictions,
        &Symbol::new(env, "is_whitelisted"),
        vec![env, account.to_val()],
    )
}

pub fn limits(env: &Env, restrictions: &Address) -> Limits {
    env.invoke_contract(restrictions, &Symbol::new(env, "limits"), vec![env])
}

pub fn affiliate_by_referral(env: &Env, manager: &Address, referral: &String) -> Option<Affiliate> {
    env.invoke_contract(
        manager,
        &Symbol::new(env, "get_by_referral"),
        vec![env, referral.clone().into_val(env)],
    )
}

pub fn platform_terms(env: &Env, fee_manager: &Address) -> PlatformTerms {
    env.invoke_contract(fee_manager, &Symbol::new(env, "terms"), vec![env])
}

/// Mint `amount` of `token` to this contract; returns the collateral fee charged
pub fn mint_supply(env: &Env, minter: &Address, token: &Address, amount: i128) -> i128 {
    let this = env.current_contract_address();
    env.invoke_contract(
        minter,
        &Symbol::new(env, "mint"),
        vec![
            env,
            this.to_val(),
            token.to_val(),
            this.to_val(),
            amount.into_val(env),
        ],
    )
}

pub fn transfer_tokens(env: &Env, token: &Address, to: &Address, amount: i128) {
    env.invoke_contract::<()>(
        token,
        &Symbol::new(env, "transfer"),
        vec![
            env,
            env.current_contract_address().to_val(),
            to.to_val(),
            amount.into_val(env),
        ],
    );
}
