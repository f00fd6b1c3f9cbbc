use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct ContributionEvent {
    pub contributor: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct ContributorRemovedEvent {
    pub contributor: Address,
    pub amount_pending: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct FeePaidEvent {
    pub payer: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct FundraiserFinishedEvent {
    pub amount_qualified: i128,
    pub supply: i128,
    pub token_price: i128,
    pub withdrawn: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct TokensClaimedEvent {
    pub contributor: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct ReferralClaimedEvent {
    pub affiliate: Address,
    pub amount: i128,
}
