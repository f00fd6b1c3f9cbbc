use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // Initialization errors (1-9)
    AlreadyInitialized = 1,
    NotInitialized = 2,

    // Authorization errors (10-19)
    Unauthorized = 10,

    // Feature / state errors (20-29)
    FeatureNotEnabled = 20,
    TransferBlocked = 21,
    TransferNotAuthorized = 22,

    // Balance errors (40-49)
    InvalidAmount = 40,
    InsufficientBalance = 41,
    MaxSupplyExceeded = 42,

    // Input errors (60-69)
    LengthMismatch = 60,
}
