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
    /// Caller is not an authorized factory, or not the token's minter
    Unauthorized = 10,

    // ============================================
    // MEMBERSHIP ERRORS (20-29)
    // ============================================
    /// Minter already in the authorized set
    MinterAlreadyAuthorized = 20,
    /// Minter not in the authorized set
    MinterNotAuthorized = 21,
    /// Factory already in the authorized set
    FactoryAlreadyAuthorized = 22,
    /// Factory not in the authorized set
    FactoryNotAuthorized = 23,

    // ============================================
    // TOKEN ERRORS (30-39)
    // ============================================
    /// Token is already registered
    TokenAlreadyRegistered = 30,
    /// Token is not registered
    TokenNotRegistered = 31,

    // ============================================
    // AMOUNT ERRORS (40-49)
    // ============================================
    /// Amount must be positive
    InvalidAmount = 40,
}
