use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Balance {
    pub amount: i128,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Owner,
    Minter,
    Name,
    Symbol,
    MaxTotalSupply,
    TotalSupply,
    Nav,
    Features,
    Paused,
    Frozen(Address),
    Delegate(Address),
    Balance(Address),
    TransferRules,
    Initialized,
}
