//! Optional token behaviors, toggled independently through a bitmap fixed at
//! initialization.

/// Owner may move tokens between any two accounts.
pub const FEATURE_FORCE_TRANSFER: u32 = 1;
/// Owner may halt every holder-initiated transfer.
pub const FEATURE_PAUSABLE: u32 = 2;
/// Owner may burn tokens out of any account.
pub const FEATURE_ACCOUNT_BURN: u32 = 4;
/// Owner may block individual accounts from sending or receiving.
pub const FEATURE_ACCOUNT_FREEZE: u32 = 8;

pub const ALL_FEATURES: u32 =
    FEATURE_FORCE_TRANSFER | FEATURE_PAUSABLE | FEATURE_ACCOUNT_BURN | FEATURE_ACCOUNT_FREEZE;

pub fn is_enabled(features: u32, feature: u32) -> bool {
    feature != 0 && features & feature == feature
}
