#![no_std]

mod error;
mod events;
mod external;
mod storage;

pub use error::Error;
use events::WhitelistEvent;
pub use storage::Limits;
use storage::DataKey;

use soroban_sdk::{contract, contractimpl, Address, Env, Symbol, Vec};

/// Whitelist and per-contributor limits of one fundraise.
///
/// Whitelisting an account promotes whatever it already contributed on the
/// fundraiser; removing it moves its qualified funds back to pending.
#[contract]
pub struct ContributorRestrictions;

#[contractimpl]
impl ContributorRestrictions {
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidLimits`: Negative amount, or `min_amount > max_amount` with a max set
    pub fn initialize(
        env: Env,
        issuer: Address,
        fundraiser: Address,
        max_count: u32,
        min_amount: i128,
        max_amount: i128,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Issuer) {
            return Err(Error::AlreadyInitialized);
        }
        if min_amount < 0 || max_amount < 0 || (max_amount > 0 && min_amount > max_amount) {
            return Err(Error::InvalidLimits);
        }

        issuer.require_auth();

        env.storage().instance().set(&DataKey::Issuer, &issuer);
        env.storage().instance().set(&DataKey::Fundraiser, &fundraiser);
        env.storage().instance().set(
            &DataKey::Limits,
            &Limits {
                max_count,
                min_amount,
                max_amount,
            },
        );

        Ok(())
    }

    /// Whitelist `account` and promote its pending contributions
    ///
    /// # Errors
    /// - `AlreadyWhitelisted`: Account already whitelisted
    /// - Any failure of the fundraiser's acceptance reverts the whole call
    pub fn whitelist_account(env: Env, account: Address) -> Result<(), Error> {
        let issuer = Self::require_issuer(&env)?;
        Self::whitelist(&env, &issuer, account)
    }

    /// # Errors
    /// - `NotWhitelisted`: Account is not whitelisted
    pub fn un_whitelist_account(env: Env, account: Address) -> Result<(), Error> {
        let issuer = Self::require_issuer(&env)?;
        Self::un_whitelist(&env, &issuer, account)
    }

    /// Whitelist every account in order; one failure reverts all
    pub fn bulk_whitelist_account(env: Env, accounts: Vec<Address>) -> Result<(), Error> {
        let issuer = Self::require_issuer(&env)?;
        for account in accounts.iter() {
            Self::whitelist(&env, &issuer, account)?;
        }
        Ok(())
    }

    /// Remove every account in order; one failure reverts all
    pub fn bulk_un_whitelist_account(env: Env, accounts: Vec<Address>) -> Result<(), Error> {
        let issuer = Self::require_issuer(&env)?;
        for account in accounts.iter() {
            Self::un_whitelist(&env, &issuer, account)?;
        }
        Ok(())
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn is_whitelisted(env: Env, account: Address) -> bool {
        env.storage()
            .persistent()
            .get::<DataKey, bool>(&DataKey::Whitelisted(account))
            .unwrap_or(false)
    }

    pub fn limits(env: Env) -> Result<Limits, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Limits)
            .ok_or(Error::NotInitialized)
    }

    pub fn fundraiser(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Fundraiser)
            .ok_or(Error::NotInitialized)
    }

    pub fn issuer(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Issuer)
            .ok_or(Error::NotInitialized)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn require_issuer(env: &Env) -> Result<Address, Error> {
        let issuer = Self::issuer(env.clone())?;
        issuer.require_auth();
        Ok(issuer)
    }

    fn whitelist(env: &Env, issuer: &Address, account: Address) -> Result<(), Error> {
        if Self::is_whitelisted(env.clone(), account.clone()) {
            return Err(Error::AlreadyWhitelisted);
        }

        env.storage()
            .persistent()
            .set(&DataKey::Whitelisted(account.clone()), &true);

        let fundraiser = Self::fundraiser(env.clone())?;
        let limits = Self::limits(env.clone())?;
        external::accept_contributor(env, &fundraiser, &account, &limits);

        env.events().publish(
            (Symbol::new(env, "account_whitelisted"), account.clone()),
            WhitelistEvent {
                account,
                issuer: issuer.clone(),
            },
        );
        Ok(())
    }

    fn un_whitelist(env: &Env, issuer: &Address, account: Address) -> Result<(), Error> {
        if !Self::is_whitelisted(env.clone(), account.clone()) {
            return Err(Error::NotWhitelisted);
        }

        env.storage()
            .persistent()
            .remove(&DataKey::Whitelisted(account.clone()));

        let fundraiser = Self::fundraiser(env.clone())?;
        external::remove_contributor(env, &fundraiser, &account);

        env.events().publish(
            (Symbol::new(env, "account_unwhitelisted"), account.clone()),
            WhitelistEvent {
                account,
                issuer: issuer.clone(),
            },
        );
        Ok(())
    }
}
