use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct SupplyMintedEvent {
    pub token: Address,
    pub recipient: Address,
    pub amount: i128,
    pub fee: i128,
    pub nav: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct SupplyBurnedEvent {
    pub token: Address,
    pub holder: Address,
    pub amount: i128,
}
