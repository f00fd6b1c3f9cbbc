use soroban_sdk::{contracttype, Address, String};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AffiliateUpdatedEvent {
    pub account: Address,
    pub referral: String,
    pub percentage: i128,
}
