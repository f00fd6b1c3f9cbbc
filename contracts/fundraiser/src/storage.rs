use soroban_sdk::{contracttype, Address, String};

// Constants
pub const TOKEN_SCALE: i128 = 1_000_000_000_000_000_000; // 18 decimals
pub const PERCENT_SCALE: i128 = 1_000_000; // 100% = 1,000,000

/// Fixed at initialization
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Terms {
    pub issuer: Address,
    pub label: String,
    /// Security token being sold
    pub token: Address,
    pub start_date: u64,
    pub end_date: u64,
    /// Least qualified amount for the fundraise to conclude
    pub soft_cap: i128,
    /// Most qualified amount the fundraise accepts
    pub hard_cap: i128,
}

/// Fixed at setup, including the platform terms read from the fee manager
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// SEP-41 token contributions are made in
    pub base_currency: Address,
    pub affiliate_manager: Option<Address>,
    pub restrictions: Address,
    pub fee_manager: Address,
    pub minter: Address,
    pub fee: i128,
    pub expiration_time: u64,
    pub fee_collector: Address,
}

/// Running totals and lifecycle flags
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct State {
    /// Token supply sold; derived from the qualified total at conclusion if 0
    pub supply: i128,
    /// Base-currency units per whole token; derived at conclusion if 0
    pub token_price: i128,
    /// Accounts holding qualified funds
    pub num_contributors: u32,
    pub amount_qualified: i128,
    pub amount_pending: i128,
    pub amount_refunded: i128,
    /// Paid out to the issuer at conclusion
    pub amount_withdrawn: i128,
    pub total_contributed: i128,
    /// Unclaimed and claimed referral shares accrued on qualified funds
    pub total_affiliate_shares: i128,
    pub referrals_claimed: i128,
    pub total_fee_paid: i128,
    /// Tokens handed out to contributors so far
    pub tokens_released: i128,
    /// Contributors that have received their tokens
    pub num_claimed: u32,
    pub is_setup: bool,
    pub is_fee_paid: bool,
    pub is_hardcap_reached: bool,
    pub is_finished: bool,
    pub is_canceled: bool,
    pub contributions_locked: bool,
}

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Contribution {
    pub pending: i128,
    pub qualified: i128,
    /// Counted in `num_contributors`
    pub is_contributor: bool,
    /// Affiliate the contributor was referred by
    pub affiliate: Option<Address>,
    /// Referral percentage locked in with the affiliate; 0 when there is none
    pub percentage: i128,
    /// Referral share generated by this contributor's qualified funds
    pub share: i128,
    pub tokens_claimed: bool,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Terms,
    Config,
    State,
    Contribution(Address),
    AffiliateShare(Address),
    Contributors, // every account that ever qualified, in order
}
