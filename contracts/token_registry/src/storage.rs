use soroban_sdk::{contracttype, Address};

/// Registration record of one token; presence in storage means registered
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenRecord {
    /// Minter contract allowed to change the token's supply
    pub minter: Address,
    /// Factory that registered the token
    pub factory: Address,
    /// Collateral paid in for the token so far
    pub stake: i128,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Treasury,
    RewardPool,
    Minter(Address),
    Factory(Address),
    Token(Address),
    Initialized,
}
