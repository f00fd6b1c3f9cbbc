#![no_std]

mod error;
mod events;
mod storage;

pub use error::Error;
use events::PriceUpdatedEvent;
use storage::{DataKey, Price};

use soroban_sdk::{contract, contractimpl, Address, Env, Symbol};

#[contract]
pub struct PriceOracle;

#[contractimpl]
impl PriceOracle {
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidPrice`: Either side of the ratio is not positive
    pub fn initialize(
        env: Env,
        admin: Address,
        numerator: i128,
        denominator: i128,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();
        let price = Self::validate(numerator, denominator)?;

        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Price, &price);

        Ok(())
    }

    /// Current rate as `(numerator, denominator)`
    pub fn get_price(env: Env) -> Result<(i128, i128), Error> {
        let price: Price = env
            .storage()
            .instance()
            .get(&DataKey::Price)
            .ok_or(Error::NotInitialized)?;
        Ok((price.numerator, price.denominator))
    }

    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidPrice`: Either side of the ratio is not positive
    pub fn update_price(env: Env, numerator: i128, denominator: i128) -> Result<(), Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();

        let price = Self::validate(numerator, denominator)?;
        env.storage().instance().set(&DataKey::Price, &price);

        env.events().publish(
            (Symbol::new(&env, "price_updated"),),
            PriceUpdatedEvent {
                numerator,
                denominator,
            },
        );

        Ok(())
    }

    pub fn admin(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)
    }

    fn validate(numerator: i128, denominator: i128) -> Result<Price, Error> {
        if numerator <= 0 || denominator <= 0 {
            return Err(Error::InvalidPrice);
        }
        Ok(Price {
            numerator,
            denominator,
        })
    }
}
