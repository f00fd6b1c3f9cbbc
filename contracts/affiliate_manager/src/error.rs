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
    // LOOKUP ERRORS (50-59)
    // ============================================
    /// Account has no affiliate record
    NotFound = 50,
    /// Referral code is held by another account
    ReferralTaken = 51,

    // ============================================
    // VALIDATION ERRORS (60-69)
    // ============================================
    /// Percentage has to be > 0
    PercentageTooLow = 60,
    /// Percentage has to be < 100%
    PercentageTooHigh = 61,
    /// Referral code must not be empty
    InvalidReferral = 62,
}
