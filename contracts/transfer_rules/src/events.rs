use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ListingEvent {
    pub account: Address,
    pub owner: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransferRequestEvent {
    pub id: u64,
    pub from: Address,
    pub to: Address,
    pub amount: i128,
}
