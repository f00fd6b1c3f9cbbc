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
    /// Caller is neither the owner nor the requester
    Unauthorized = 10,

    // ============================================
    // AMOUNT ERRORS (40-49)
    // ============================================
    /// Amount must be positive
    InvalidAmount = 40,

    // ============================================
    // LOOKUP ERRORS (50-59)
    // ============================================
    /// No open transfer request under this id
    RequestNotFound = 50,
}
