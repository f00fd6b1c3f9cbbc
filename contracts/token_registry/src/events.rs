use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct TokenRegisteredEvent {
    pub token: Address,
    pub minter: Address,
    pub factory: Address,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct StakeIncreasedEvent {
    pub token: Address,
    pub amount: i128,
    pub stake: i128,
}
