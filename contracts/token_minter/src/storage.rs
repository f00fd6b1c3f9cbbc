use soroban_sdk::{contracttype, Address};

// Constants
pub const BASIS_POINTS: i128 = 10_000; // 100% = 10,000 basis points
pub const TREASURY_SHARE_BPS: i128 = 2_000; // 20% of every fee, the rest goes to the reward pool
pub const PERCENT_SCALE: i128 = 1_000_000; // 100% = 1,000,000 ppm
pub const TOKEN_SCALE: i128 = 1_000_000_000_000_000_000; // 18 decimals

/// One step of a stake or fee schedule
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tier {
    /// Lowest NAV (fiat) the tier applies to
    pub nav_floor: i128,
    /// Proportional rate in parts per million of NAV
    pub rate_ppm: i128,
    /// Floor of the tier's output, in fiat
    pub minimum: i128,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Registry,
    Oracle,
    Collateral,
    StakeTiers,
    FeeTiers,
    LastFeeNav(Address), // token → NAV the last fee was charged at
    Initialized,
}
