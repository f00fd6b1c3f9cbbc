#![no_std]

mod error;
mod events;
mod storage;

pub use error::Error;
use events::{StakeIncreasedEvent, TokenRegisteredEvent};
pub use storage::TokenRecord;
use storage::DataKey;

use soroban_sdk::{contract, contractimpl, Address, Env, Symbol};

#[contract]
pub struct TokenRegistry;

#[contractimpl]
impl TokenRegistry {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    /// Initialize the registry
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(
        env: Env,
        admin: Address,
        treasury: Address,
        reward_pool: Address,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Treasury, &treasury);
        env.storage().instance().set(&DataKey::RewardPool, &reward_pool);

        Ok(())
    }

    pub fn update_treasury(env: Env, treasury: Address) -> Result<(), Error> {
        Self::require_admin(&env)?;

        env.storage().instance().set(&DataKey::Treasury, &treasury);
        env.events()
            .publish((Symbol::new(&env, "treasury_updated"),), treasury);
        Ok(())
    }

    pub fn update_reward_pool(env: Env, reward_pool: Address) -> Result<(), Error> {
        Self::require_admin(&env)?;

        env.storage().instance().set(&DataKey::RewardPool, &reward_pool);
        env.events()
            .publish((Symbol::new(&env, "reward_pool_updated"),), reward_pool);
        Ok(())
    }

    // ============================================
    // MINTERS & FACTORIES
    // ============================================

    /// # Errors
    /// - `MinterAlreadyAuthorized`: Minter already added
    pub fn add_minter(env: Env, minter: Address) -> Result<(), Error> {
        Self::require_admin(&env)?;

        if Self::is_minter(env.clone(), minter.clone()) {
            return Err(Error::MinterAlreadyAuthorized);
        }

        env.storage()
            .persistent()
            .set(&DataKey::Minter(minter.clone()), &true);
        env.events()
            .publish((Symbol::new(&env, "minter_added"),), minter);
        Ok(())
    }

    /// # Errors
    /// - `MinterNotAuthorized`: Minter was never added
    pub fn remove_minter(env: Env, minter: Address) -> Result<(), Error> {
        Self::require_admin(&env)?;

        if !Self::is_minter(env.clone(), minter.clone()) {
            return Err(Error::MinterNotAuthorized);
        }

        env.storage()
            .persistent()
            .remove(&DataKey::Minter(minter.clone()));
        env.events()
            .publish((Symbol::new(&env, "minter_removed"),), minter);
        Ok(())
    }

    /// # Errors
    /// - `FactoryAlreadyAuthorized`: Factory already added
    pub fn add_factory(env: Env, factory: Address) -> Result<(), Error> {
        Self::require_admin(&env)?;

        if Self::is_factory(env.clone(), factory.clone()) {
            return Err(Error::FactoryAlreadyAuthorized);
        }

        env.storage()
            .persistent()
            .set(&DataKey::Factory(factory.clone()), &true);
        env.events()
            .publish((Symbol::new(&env, "factory_added"),), factory);
        Ok(())
    }

    /// # Errors
    /// - `FactoryNotAuthorized`: Factory was never added
    pub fn remove_factory(env: Env, factory: Address) -> Result<(), Error> {
        Self::require_admin(&env)?;

        if !Self::is_factory(env.clone(), factory.clone()) {
            return Err(Error::FactoryNotAuthorized);
        }

        env.storage()
            .persistent()
            .remove(&DataKey::Factory(factory.clone()));
        env.events()
            .publish((Symbol::new(&env, "factory_removed"),), factory);
        Ok(())
    }

    // ============================================
    // TOKEN REGISTRATION
    // ============================================

    /// Register a token, binding it to one minter
    ///
    /// # Errors
    /// - `Unauthorized`: `factory` is not an authorized factory
    /// - `MinterNotAuthorized`: `minter` is not an authorized minter
    /// - `TokenAlreadyRegistered`: Token already in the registry
    pub fn register(
        env: Env,
        factory: Address,
        token: Address,
        minter: Address,
    ) -> Result<(), Error> {
        Self::require_initialized(&env)?;
        factory.require_auth();

        if !Self::is_factory(env.clone(), factory.clone()) {
            return Err(Error::Unauthorized);
        }
        if !Self::is_minter(env.clone(), minter.clone()) {
            return Err(Error::MinterNotAuthorized);
        }
        if Self::contains(env.clone(), token.clone()) {
            return Err(Error::TokenAlreadyRegistered);
        }

        let record = TokenRecord {
            minter: minter.clone(),
            factory: factory.clone(),
            stake: 0,
        };
        env.storage()
            .persistent()
            .set(&DataKey::Token(token.clone()), &record);

        env.events().publish(
            (Symbol::new(&env, "token_registered"), token.clone()),
            TokenRegisteredEvent {
                token,
                minter,
                factory,
            },
        );

        Ok(())
    }

    /// # Errors
    /// - `TokenNotRegistered`: Unknown token
    pub fn unregister(env: Env, token: Address) -> Result<(), Error> {
        Self::require_admin(&env)?;

        if !Self::contains(env.clone(), token.clone()) {
            return Err(Error::TokenNotRegistered);
        }

        env.storage()
            .persistent()
            .remove(&DataKey::Token(token.clone()));
        env.events()
            .publish((Symbol::new(&env, "token_unregistered"),), token);
        Ok(())
    }

    /// Record collateral paid in for a token (its bound minter only)
    ///
    /// # Errors
    /// - `InvalidAmount`: Amount <= 0
    /// - `TokenNotRegistered`: Unknown token
    /// - `Unauthorized`: `minter` is not the token's minter
    pub fn increase_stake(
        env: Env,
        minter: Address,
        token: Address,
        amount: i128,
    ) -> Result<i128, Error> {
        minter.require_auth();

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let key = DataKey::Token(token.clone());
        let mut record: TokenRecord = env
            .storage()
            .persistent()
            .get(&key)
            .ok_or(Error::TokenNotRegistered)?;

        if record.minter != minter {
            return Err(Error::Unauthorized);
        }

        record.stake = record
            .stake
            .checked_add(amount)
            .ok_or(Error::InvalidAmount)?;
        env.storage().persistent().set(&key, &record);

        env.events().publish(
            (Symbol::new(&env, "stake_increased"), token.clone()),
            StakeIncreasedEvent {
                token,
                amount,
                stake: record.stake,
            },
        );

        Ok(record.stake)
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn is_minter(env: Env, minter: Address) -> bool {
        env.storage()
            .persistent()
            .get::<DataKey, bool>(&DataKey::Minter(minter))
            .unwrap_or(false)
    }

    pub fn is_factory(env: Env, factory: Address) -> bool {
        env.storage()
            .persistent()
            .get::<DataKey, bool>(&DataKey::Factory(factory))
            .unwrap_or(false)
    }

    pub fn contains(env: Env, token: Address) -> bool {
        env.storage().persistent().has(&DataKey::Token(token))
    }

    pub fn get_record(env: Env, token: Address) -> Option<TokenRecord> {
        env.storage().persistent().get(&DataKey::Token(token))
    }

    pub fn get_minter(env: Env, token: Address) -> Option<Address> {
        Self::get_record(env, token).map(|record| record.minter)
    }

    pub fn get_factory(env: Env, token: Address) -> Option<Address> {
        Self::get_record(env, token).map(|record| record.factory)
    }

    pub fn get_stake(env: Env, token: Address) -> i128 {
        Self::get_record(env, token)
            .map(|record| record.stake)
            .unwrap_or(0)
    }

    pub fn treasury(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Treasury)
            .ok_or(Error::NotInitialized)
    }

    pub fn reward_pool(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::RewardPool)
            .ok_or(Error::NotInitialized)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn require_initialized(env: &Env) -> Result<(), Error> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::NotInitialized);
        }
        Ok(())
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
