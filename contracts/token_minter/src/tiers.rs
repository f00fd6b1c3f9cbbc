use soroban_sdk::{vec, Env, Vec};

use crate::storage::{Tier, BASIS_POINTS, PERCENT_SCALE, TOKEN_SCALE, TREASURY_SHARE_BPS};

/// Stake schedule: 2,500 flat up to 500,000 NAV, then a falling percentage
///
/// | NAV              | stake   |
/// |------------------|---------|
/// | ≤ 500,000        | 2,500   |
/// | ≤ 1,000,000      | 0.50%   |
/// | ≤ 5,000,000      | 0.45%   |
/// | ≤ 15,000,000     | 0.40%   |
/// | ≤ 50,000,000     | 0.25%   |
/// | ≤ 100,000,000    | 0.20%   |
/// | ≤ 150,000,000    | 0.15%   |
/// | above            | 0.10%   |
pub fn default_stake_tiers(env: &Env) -> Vec<Tier> {
    vec![
        env,
        tier(0, 0, 2_500),
        tier(500_001, 5_000, 0),
        tier(1_000_001, 4_500, 0),
        tier(5_000_001, 4_000, 0),
        tier(15_000_001, 2_500, 0),
        tier(50_000_001, 2_000, 0),
        tier(100_000_001, 1_500, 0),
        tier(150_000_001, 1_000, 0),
    ]
}

/// Mint fee schedule. Each tier's minimum equals the fee at the top of the
/// tier below it, so the fee never drops as NAV grows.
pub fn default_fee_tiers(env: &Env) -> Vec<Tier> {
    vec![
        env,
        tier(0, 1_000, 0),
        tier(1_000_001, 800, 1_000),
        tier(10_000_001, 500, 8_000),
        tier(100_000_001, 250, 50_000),
    ]
}

fn tier(nav_floor: i128, rate_ppm: i128, minimum: i128) -> Tier {
    Tier {
        nav_floor,
        rate_ppm,
        minimum,
    }
}

/// Tier with the highest floor not above `nav`
pub fn find_tier(tiers: &Vec<Tier>, nav: i128) -> Option<Tier> {
    let mut found = tiers.first()?;
    for t in tiers.iter() {
        if t.nav_floor > nav {
            break;
        }
        found = t;
    }
    Some(found)
}

/// Tier output in fiat, multiplied by `PERCENT_SCALE` to keep fractions
fn scaled_fiat(t: &Tier, nav: i128) -> Option<i128> {
    let proportional = nav.checked_mul(t.rate_ppm)?;
    let minimum = t.minimum.checked_mul(PERCENT_SCALE)?;
    Some(proportional.max(minimum))
}

/// Amount owed for `nav` under `tiers`, in collateral units (18 decimals)
///
/// Formula: max(nav × rate, minimum) × TOKEN_SCALE × denominator / numerator
///
/// Example at price 1/1:
/// - nav: 1,000, rate 0.1%
/// - fiat: 1
/// - collateral: 1 × 10^18
pub fn calculate(tiers: &Vec<Tier>, nav: i128, numerator: i128, denominator: i128) -> Option<i128> {
    if nav < 0 || numerator <= 0 || denominator <= 0 {
        return None;
    }
    let t = find_tier(tiers, nav)?;
    scaled_fiat(&t, nav)?
        .checked_mul(TOKEN_SCALE)?
        .checked_mul(denominator)?
        .checked_div(PERCENT_SCALE.checked_mul(numerator)?)
}

/// Treasury part of a fee; the reward pool receives the rest
///
/// Formula: treasury = fee × 20%, pool = fee - treasury
pub fn split_fee(fee: i128) -> Option<(i128, i128)> {
    let treasury = fee.checked_mul(TREASURY_SHARE_BPS)?.checked_div(BASIS_POINTS)?;
    let pool = fee.checked_sub(treasury)?;
    Some((treasury, pool))
}

/// Floors start at zero and strictly increase; rates and minimums are not negative
pub fn is_valid_table(tiers: &Vec<Tier>) -> bool {
    let mut previous: Option<Tier> = None;
    for t in tiers.iter() {
        if t.rate_ppm < 0 || t.minimum < 0 {
            return false;
        }
        match &previous {
            None if t.nav_floor != 0 => return false,
            Some(p) if t.nav_floor <= p.nav_floor => return false,
            _ => {}
        }
        previous = Some(t);
    }
    previous.is_some()
}

/// Valid table whose amount never decreases when crossing into the next tier
pub fn is_monotone_table(tiers: &Vec<Tier>) -> bool {
    if !is_valid_table(tiers) {
        return false;
    }
    for i in 1..tiers.len() {
        let (Some(prev), Some(next)) = (tiers.get(i - 1), tiers.get(i)) else {
            return false;
        };
        let before = scaled_fiat(&prev, next.nav_floor - 1);
        let after = scaled_fiat(&next, next.nav_floor);
        match (before, after) {
            (Some(before), Some(after)) if after >= before => {}
            _ => return false,
        }
    }
    true
}
