#![no_std]

mod error;
mod events;
mod storage;

pub use error::Error;
use events::AffiliateUpdatedEvent;
pub use storage::{Affiliate, PERCENT_SCALE};
use storage::DataKey;

use soroban_sdk::{contract, contractimpl, Address, Env, String, Symbol};

/// Referral registry: every referral code maps to exactly one account and
/// every account holds at most one code.
#[contract]
pub struct AffiliateManager;

#[contractimpl]
impl AffiliateManager {
    pub fn initialize(env: Env, owner: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Owner) {
            return Err(Error::AlreadyInitialized);
        }
        owner.require_auth();
        env.storage().instance().set(&DataKey::Owner, &owner);
        Ok(())
    }

    /// Register `account` under `referral`, replacing any code it held before
    ///
    /// # Errors
    /// - `PercentageTooLow`: percentage <= 0
    /// - `PercentageTooHigh`: percentage >= 100%
    /// - `InvalidReferral`: empty referral code
    /// - `ReferralTaken`: code belongs to another account
    pub fn add_or_update(
        env: Env,
        account: Address,
        referral: String,
        percentage: i128,
    ) -> Result<(), Error> {
        Self::require_owner(&env)?;

        if percentage <= 0 {
            return Err(Error::PercentageTooLow);
        }
        if percentage >= PERCENT_SCALE {
            return Err(Error::PercentageTooHigh);
        }
        if referral.is_empty() {
            return Err(Error::InvalidReferral);
        }

        let code_key = DataKey::ByReferral(referral.clone());
        if let Some(holder) = env.storage().persistent().get::<_, Affiliate>(&code_key) {
            if holder.account != account {
                return Err(Error::ReferralTaken);
            }
        }

        // drop the previous code so it no longer resolves
        let account_key = DataKey::Referral(account.clone());
        if let Some(old) = env.storage().persistent().get::<_, String>(&account_key) {
            env.storage().persistent().remove(&DataKey::ByReferral(old));
        }

        env.storage().persistent().set(
            &code_key,
            &Affiliate {
                account: account.clone(),
                percentage,
            },
        );
        env.storage().persistent().set(&account_key, &referral);

        env.events().publish(
            (Symbol::new(&env, "affiliate_added_or_updated"), account.clone()),
            AffiliateUpdatedEvent {
                account,
                referral,
                percentage,
            },
        );

        Ok(())
    }

    /// # Errors
    /// - `NotFound`: account has no affiliate record
    pub fn remove(env: Env, account: Address) -> Result<(), Error> {
        Self::require_owner(&env)?;

        let account_key = DataKey::Referral(account.clone());
        let referral: String = env
            .storage()
            .persistent()
            .get(&account_key)
            .ok_or(Error::NotFound)?;

        env.storage().persistent().remove(&DataKey::ByReferral(referral));
        env.storage().persistent().remove(&account_key);

        env.events()
            .publish((Symbol::new(&env, "affiliate_removed"),), account);
        Ok(())
    }

    pub fn get_by_referral(env: Env, referral: String) -> Option<Affiliate> {
        env.storage()
            .persistent()
            .get(&DataKey::ByReferral(referral))
    }

    pub fn get_referral(env: Env, account: Address) -> Option<String> {
        env.storage().persistent().get(&DataKey::Referral(account))
    }

    pub fn owner(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Owner)
            .ok_or(Error::NotInitialized)
    }

    fn require_owner(env: &Env) -> Result<(), Error> {
        let owner: Address = env
            .storage()
            .instance()
            .get(&DataKey::Owner)
            .ok_or(Error::NotInitialized)?;
        owner.require_auth();
        Ok(())
    }
}
