use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // ============================================
    // INITIALIZATION ERRORS (1-9)
    // ============================================
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,

    // ============================================
    // AUTHORIZATION ERRORS (10-19)
    // ============================================
    /// Token not registered to this minter, or caller not its owner/delegate
    Unauthorized = 10,

    // ============================================
    // AMOUNT ERRORS (40-49)
    // ============================================
    /// Amount is zero
    ZeroAmount = 40,
    /// Amount or NAV is negative
    InvalidAmount = 41,
    /// Payer's collateral balance or allowance is below the fee, or holder's
    /// token balance is below the burn amount
    InsufficientBalance = 42,
    /// Minting would exceed the token's max total supply
    MaxSupplyExceeded = 43,
    /// Fixed-point arithmetic overflowed
    ArithmeticOverflow = 44,

    // ============================================
    // VALIDATION ERRORS (60-69)
    // ============================================
    /// Tier floors must start at 0 and strictly increase; fee tiers must not
    /// decrease at a boundary
    InvalidTierTable = 60,
}
