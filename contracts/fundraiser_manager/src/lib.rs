#![no_std]

mod error;
mod storage;

pub use error::Error;
pub use storage::PlatformTerms;
use storage::DataKey;

use soroban_sdk::{contract, contractimpl, Address, Env, Symbol};

#[contract]
pub struct FundraiserManager;

#[contractimpl]
impl FundraiserManager {
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidFee`: Negative fee
    pub fn initialize(
        env: Env,
        admin: Address,
        fee_collector: Address,
        fee: i128,
        expiration_time: u64,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(Error::AlreadyInitialized);
        }
        if fee < 0 {
            return Err(Error::InvalidFee);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::FeeCollector, &fee_collector);
        env.storage().instance().set(&DataKey::Fee, &fee);
        env.storage()
            .instance()
            .set(&DataKey::ExpirationTime, &expiration_time);

        Ok(())
    }

    pub fn update_fee(env: Env, fee: i128) -> Result<(), Error> {
        Self::require_admin(&env)?;
        if fee < 0 {
            return Err(Error::InvalidFee);
        }

        env.storage().instance().set(&DataKey::Fee, &fee);
        env.events()
            .publish((Symbol::new(&env, "fee_updated"),), fee);
        Ok(())
    }

    pub fn update_expiration_time(env: Env, expiration_time: u64) -> Result<(), Error> {
        Self::require_admin(&env)?;

        env.storage()
            .instance()
            .set(&DataKey::ExpirationTime, &expiration_time);
        env.events()
            .publish((Symbol::new(&env, "expiration_time_updated"),), expiration_time);
        Ok(())
    }

    pub fn update_fee_collector(env: Env, fee_collector: Address) -> Result<(), Error> {
        Self::require_admin(&env)?;

        env.storage()
            .instance()
            .set(&DataKey::FeeCollector, &fee_collector);
        env.events()
            .publish((Symbol::new(&env, "fee_collector_updated"),), fee_collector);
        Ok(())
    }

    pub fn fee(env: Env) -> Result<i128, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Fee)
            .ok_or(Error::NotInitialized)
    }

    pub fn expiration_time(env: Env) -> Result<u64, Error> {
        env.storage()
            .instance()
            .get(&DataKey::ExpirationTime)
            .ok_or(Error::NotInitialized)
    }

    pub fn fee_collector(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::FeeCollector)
            .ok_or(Error::NotInitialized)
    }

    /// All three platform terms in one read
    pub fn terms(env: Env) -> Result<PlatformTerms, Error> {
        Ok(PlatformTerms {
            fee: Self::fee(env.clone())?,
            expiration_time: Self::expiration_time(env.clone())?,
            fee_collector: Self::fee_collector(env)?,
        })
    }

    fn require_admin(env: &Env) -> Result<(), Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();
        Ok(())
    }
}
