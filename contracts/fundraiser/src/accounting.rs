use crate::storage::{PERCENT_SCALE, TOKEN_SCALE};

/// Referral share of a qualified amount
///
/// Formula: share = amount × percentage / PERCENT_SCALE
///
/// Example:
/// - amount: 1,000
/// - percentage: 100,000 (10%)
/// - share: 100
pub fn affiliate_share(amount: i128, percentage: i128) -> Option<i128> {
    amount.checked_mul(percentage)?.checked_div(PERCENT_SCALE)
}

/// Split `amount` into the part that fits in `room` and the excess
pub fn clip(amount: i128, room: i128) -> (i128, i128) {
    let accepted = amount.min(room.max(0));
    (accepted, amount - accepted)
}

/// Token supply bought by the qualified total at a fixed price
///
/// Formula: supply = qualified × TOKEN_SCALE / token_price
pub fn derive_supply(amount_qualified: i128, token_price: i128) -> Option<i128> {
    amount_qualified
        .checked_mul(TOKEN_SCALE)?
        .checked_div(token_price)
}

/// Price per whole token when a fixed supply is sold for the qualified total
///
/// Formula: token_price = qualified × TOKEN_SCALE / supply
pub fn derive_price(amount_qualified: i128, supply: i128) -> Option<i128> {
    amount_qualified.checked_mul(TOKEN_SCALE)?.checked_div(supply)
}

/// Contributor's pro-rata part of the sold supply
///
/// Formula: tokens = qualified × supply / amount_qualified
pub fn token_share(qualified: i128, supply: i128, amount_qualified: i128) -> Option<i128> {
    qualified.checked_mul(supply)?.checked_div(amount_qualified)
}
