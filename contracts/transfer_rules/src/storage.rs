use soroban_sdk::{contracttype, Address};

/// Transfer held back until the owner approves or denies it
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransferRequest {
    pub from: Address,
    pub to: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Owner,
    Token,
    Whitelisted(Address),
    Greylisted(Address),
    RequestCounter,
    Request(u64),
}
