use soroban_sdk::{contracttype, Address};

/// Platform terms a fundraiser snapshots at setup
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PlatformTerms {
    /// Fee in base-currency units
    pub fee: i128,
    /// Seconds after the end date during which a fundraise may still conclude
    pub expiration_time: u64,
    pub fee_collector: Address,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Fee,
    ExpirationTime,
    FeeCollector,
}
