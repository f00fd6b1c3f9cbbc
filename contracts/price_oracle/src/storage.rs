use soroban_sdk::contracttype;

/// Fiat value of one collateral token, as `numerator / denominator`
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Price {
    pub numerator: i128,
    pub denominator: i128,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Price,
}
