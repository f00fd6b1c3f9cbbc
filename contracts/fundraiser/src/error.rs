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
    /// Setup already completed
    AlreadySetUp = 3,
    /// Fundraise setup not completed
    SetupIncomplete = 4,

    // ============================================
    // LIFECYCLE ERRORS (20-29)
    // ============================================
    /// Fundraise has been canceled
    Canceled = 20,
    /// Fundraise has finished
    AlreadyFinished = 21,
    /// Fundraise has not started yet
    NotStarted = 22,
    /// Fundraise has ended
    Ended = 23,
    /// Fundraise has not finished
    NotFinished = 24,
    /// A finished fundraise cannot be canceled
    CannotCancelWhenFinished = 25,
    /// Pending contributions are locked while the fundraise runs
    ContributionsLocked = 26,
    /// Neither the hard cap nor the end date has been reached
    NotYetEligible = 27,
    /// Conclusion window after the end date has passed
    ExpirationPassed = 28,

    // ============================================
    // LIMIT ERRORS (30-39)
    // ============================================
    /// Hard cap has been reached
    HardCapReached = 30,
    /// Soft cap not reached
    SoftCapNotReached = 31,
    /// Contributor already holds the max amount
    ExceedsMaxAmount = 32,
    /// Contributor's total would stay below the min amount
    BelowMinAmount = 33,
    /// Maximum number of contributors reached
    MaxContributorsReached = 34,

    // ============================================
    // AMOUNT ERRORS (40-49)
    // ============================================
    /// Amount is zero
    ZeroAmount = 40,
    /// Amount is negative
    InvalidAmount = 41,
    /// Fixed-point arithmetic overflowed
    ArithmeticOverflow = 42,
    /// Platform fee already paid
    FeeAlreadyPaid = 43,
    /// Platform fee must be fully paid
    FeeNotPaid = 44,

    // ============================================
    // CLAIM ERRORS (50-59)
    // ============================================
    /// There is nothing to claim
    NothingToClaim = 50,
    /// There is nothing to refund
    NothingToRefund = 51,

    // ============================================
    // VALIDATION ERRORS (60-69)
    // ============================================
    /// Hard cap must be positive and not below the soft cap
    InvalidCaps = 60,
    /// Start date must not be after the end date
    InvalidDates = 61,
    /// Exactly one of supply and token price must be set
    InvalidPricing = 62,
}
