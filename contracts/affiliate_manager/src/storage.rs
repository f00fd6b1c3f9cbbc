use soroban_sdk::{contracttype, Address, String};

/// Scale of affiliate percentages: 1_000_000 is 100%
pub const PERCENT_SCALE: i128 = 1_000_000;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Affiliate {
    pub account: Address,
    /// Share of referred contributions, in parts of `PERCENT_SCALE`
    pub percentage: i128,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Owner,
    /// referral code -> affiliate
    ByReferral(String),
    /// account -> its current referral code
    Referral(Address),
}
