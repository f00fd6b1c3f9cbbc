use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WhitelistEvent {
    pub account: Address,
    pub issuer: Address,
}
