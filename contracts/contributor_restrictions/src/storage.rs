use soroban_sdk::{contracttype, Address};

/// Per-contributor limits of a fundraise; zero means unlimited
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Limits {
    /// Most qualified contributors the fundraise accepts
    pub max_count: u32,
    /// Least total a contributor may hold
    pub min_amount: i128,
    /// Most total a contributor may hold
    pub max_amount: i128,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Issuer,
    Fundraiser,
    Limits,
    Whitelisted(Address),
}
