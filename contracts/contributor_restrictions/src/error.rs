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
    // WHITELIST ERRORS (20-29)
    // ============================================
    /// Account is already whitelisted
    AlreadyWhitelisted = 20,
    /// Account is not whitelisted
    NotWhitelisted = 21,

    // ============================================
    // VALIDATION ERRORS (60-69)
    // ============================================
    /// Negative amount, or min amount above a set max amount
    InvalidLimits = 60,
}
