#![no_std]

mod error;
mod events;
mod external;
pub mod features;
mod storage;

pub use error::Error;
use events::{
    AccountFrozenEvent, BurnEvent, MintEvent, NavUpdatedEvent, TransferEvent,
    TransferRulesUpdatedEvent,
};
use features::{
    is_enabled, FEATURE_ACCOUNT_BURN, FEATURE_ACCOUNT_FREEZE, FEATURE_FORCE_TRANSFER,
    FEATURE_PAUSABLE,
};
use storage::{Balance, DataKey};

use soroban_sdk::{contract, contractimpl, Address, Env, String, Symbol, Vec};

#[contract]
pub struct SecurityToken;

/// Where a holder-initiated transfer goes
enum Route {
    Direct,
    /// Held by the transfer rules contract until the owner decides
    Escrow(Address),
}

#[contractimpl]
impl SecurityToken {
    /// Initialize the token
    ///
    /// `minter` is the only address allowed to change supply; `features` is a
    /// bitmap of the optional behaviors in [`features`].
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidAmount`: Max supply <= 0 or negative NAV
    pub fn initialize(
        env: Env,
        owner: Address,
        minter: Address,
        name: String,
        symbol: String,
        max_total_supply: i128,
        nav: i128,
        features: u32,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        owner.require_auth();

        if max_total_supply <= 0 || nav < 0 {
            return Err(Error::InvalidAmount);
        }

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage().instance().set(&DataKey::Minter, &minter);
        env.storage().instance().set(&DataKey::Name, &name);
        env.storage().instance().set(&DataKey::Symbol, &symbol);
        env.storage()
            .instance()
            .set(&DataKey::MaxTotalSupply, &max_total_supply);
        env.storage().instance().set(&DataKey::TotalSupply, &0i128);
        env.storage().instance().set(&DataKey::Nav, &nav);
        env.storage().instance().set(&DataKey::Features, &features);
        env.storage().instance().set(&DataKey::Paused, &false);

        Ok(())
    }

    // ============================================
    // SUPPLY (MINTER ONLY)
    // ============================================

    /// Mint tokens
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidAmount`: Amount <= 0
    /// - `MaxSupplyExceeded`: Supply would pass `max_total_supply`
    pub fn mint(env: Env, to: Address, amount: i128) -> Result<(), Error> {
        let minter = Self::load_minter(&env)?;
        minter.require_auth();

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let total_supply = Self::total_supply(env.clone());
        let new_supply = total_supply
            .checked_add(amount)
            .ok_or(Error::InvalidAmount)?;
        if new_supply > Self::max_total_supply(env.clone()) {
            return Err(Error::MaxSupplyExceeded);
        }

        let balance = Self::balance_of(env.clone(), to.clone());
        let new_balance = balance.checked_add(amount).ok_or(Error::InvalidAmount)?;

        Self::write_balance(&env, &to, new_balance);
        env.storage()
            .instance()
            .set(&DataKey::TotalSupply, &new_supply);

        env.events().publish(
            (Symbol::new(&env, "mint"), to.clone()),
            MintEvent {
                to,
                amount,
                total_supply: new_supply,
            },
        );

        Ok(())
    }

    /// Burn tokens
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidAmount`: Amount <= 0
    /// - `InsufficientBalance`: Not enough balance
    pub fn burn(env: Env, from: Address, amount: i128) -> Result<(), Error> {
        let minter = Self::load_minter(&env)?;
        minter.require_auth();

        Self::burn_from(&env, &from, amount)
    }

    // ============================================
    // TRANSFERS
    // ============================================

    /// Transfer tokens between holders
    ///
    /// With transfer rules configured, both accounts must be listed there.
    /// When either is greylisted the tokens move to the rules contract and
    /// wait for the owner's approval. Owner and delegates are not bound by
    /// the rules.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidAmount`: Amount <= 0
    /// - `TransferBlocked`: Token paused or an account frozen
    /// - `TransferNotAuthorized`: Transfer rules do not list both accounts
    /// - `InsufficientBalance`: Not enough balance
    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), Error> {
        Self::require_initialized(&env)?;
        from.require_auth();

        match Self::route(&env, &from, &to)? {
            Route::Direct => Self::move_balance(&env, &from, &to, amount),
            Route::Escrow(rules) => {
                Self::move_balance(&env, &from, &rules, amount)?;
                external::rules_request_transfer(&env, &rules, &from, &to, amount);
                Ok(())
            }
        }
    }

    /// Settle a transfer held by the transfer rules contract; no rule checks
    ///
    /// # Errors
    /// - `Unauthorized`: No transfer rules configured
    /// - `InvalidAmount`: Amount <= 0
    /// - `InsufficientBalance`: Not enough balance
    pub fn execute_transfer(
        env: Env,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), Error> {
        let rules = Self::transfer_rules(env.clone()).ok_or(Error::Unauthorized)?;
        rules.require_auth();

        Self::move_balance(&env, &from, &to, amount)
    }

    /// Transfer to many recipients at once (owner or delegate only)
    ///
    /// # Errors
    /// - `Unauthorized`: Sender is neither owner nor delegate
    /// - `LengthMismatch`: Recipients and amounts differ in length
    pub fn bulk_transfer(
        env: Env,
        from: Address,
        recipients: Vec<Address>,
        amounts: Vec<i128>,
    ) -> Result<(), Error> {
        Self::require_initialized(&env)?;
        from.require_auth();

        if !Self::is_owner_or_delegate(env.clone(), from.clone()) {
            return Err(Error::Unauthorized);
        }

        if recipients.len() != amounts.len() {
            return Err(Error::LengthMismatch);
        }

        // owner and delegates route directly
        for (to, amount) in recipients.iter().zip(amounts.iter()) {
            Self::route(&env, &from, &to)?;
            Self::move_balance(&env, &from, &to, amount)?;
        }

        Ok(())
    }

    /// Move tokens without the holder's consent
    ///
    /// # Errors
    /// - `FeatureNotEnabled`: FORCE_TRANSFER not set
    pub fn force_transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), Error> {
        Self::require_owner(&env)?;
        Self::require_feature(&env, FEATURE_FORCE_TRANSFER)?;

        Self::move_balance(&env, &from, &to, amount)
    }

    /// Burn tokens out of any account
    ///
    /// # Errors
    /// - `FeatureNotEnabled`: ACCOUNT_BURN not set
    /// - `InsufficientBalance`: Not enough balance
    pub fn burn_account(env: Env, account: Address, amount: i128) -> Result<(), Error> {
        Self::require_owner(&env)?;
        Self::require_feature(&env, FEATURE_ACCOUNT_BURN)?;

        Self::burn_from(&env, &account, amount)
    }

    // ============================================
    // FEATURE CONTROLS (OWNER ONLY)
    // ============================================

    pub fn pause(env: Env) -> Result<(), Error> {
        Self::require_owner(&env)?;
        Self::require_feature(&env, FEATURE_PAUSABLE)?;

        env.storage().instance().set(&DataKey::Paused, &true);
        env.events().publish((Symbol::new(&env, "paused"),), true);
        Ok(())
    }

    pub fn unpause(env: Env) -> Result<(), Error> {
        Self::require_owner(&env)?;
        Self::require_feature(&env, FEATURE_PAUSABLE)?;

        env.storage().instance().set(&DataKey::Paused, &false);
        env.events().publish((Symbol::new(&env, "paused"),), false);
        Ok(())
    }

    pub fn freeze_account(env: Env, account: Address) -> Result<(), Error> {
        Self::set_frozen(&env, account, true)
    }

    pub fn unfreeze_account(env: Env, account: Address) -> Result<(), Error> {
        Self::set_frozen(&env, account, false)
    }

    /// Set or clear the transfer rules contract holder transfers go through
    pub fn update_transfer_rules(env: Env, rules: Option<Address>) -> Result<(), Error> {
        Self::require_owner(&env)?;

        match &rules {
            Some(rules) => env.storage().instance().set(&DataKey::TransferRules, rules),
            None => env.storage().instance().remove(&DataKey::TransferRules),
        }
        env.events().publish(
            (Symbol::new(&env, "transfer_rules_updated"),),
            TransferRulesUpdatedEvent { rules },
        );
        Ok(())
    }

    pub fn add_delegate(env: Env, delegate: Address) -> Result<(), Error> {
        Self::require_owner(&env)?;

        env.storage()
            .persistent()
            .set(&DataKey::Delegate(delegate), &true);
        Ok(())
    }

    pub fn remove_delegate(env: Env, delegate: Address) -> Result<(), Error> {
        Self::require_owner(&env)?;

        env.storage()
            .persistent()
            .remove(&DataKey::Delegate(delegate));
        Ok(())
    }

    /// Update the net asset value backing the token
    ///
    /// # Errors
    /// - `Unauthorized`: Caller is neither owner nor delegate
    /// - `InvalidAmount`: Negative NAV
    pub fn update_nav(env: Env, caller: Address, nav: i128) -> Result<(), Error> {
        Self::require_initialized(&env)?;
        caller.require_auth();

        if !Self::is_owner_or_delegate(env.clone(), caller) {
            return Err(Error::Unauthorized);
        }
        if nav < 0 {
            return Err(Error::InvalidAmount);
        }

        env.storage().instance().set(&DataKey::Nav, &nav);
        env.events()
            .publish((Symbol::new(&env, "nav_updated"),), NavUpdatedEvent { nav });

        Ok(())
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn balance_of(env: Env, account: Address) -> i128 {
        env.storage()
            .persistent()
            .get::<DataKey, Balance>(&DataKey::Balance(account))
            .unwrap_or(Balance { amount: 0 })
            .amount
    }

    pub fn total_supply(env: Env) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::TotalSupply)
            .unwrap_or(0)
    }

    pub fn max_total_supply(env: Env) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::MaxTotalSupply)
            .unwrap_or(0)
    }

    pub fn nav(env: Env) -> i128 {
        env.storage().instance().get(&DataKey::Nav).unwrap_or(0)
    }

    pub fn owner(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Owner)
            .ok_or(Error::NotInitialized)
    }

    pub fn minter(env: Env) -> Result<Address, Error> {
        Self::load_minter(&env)
    }

    pub fn name(env: Env) -> Result<String, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Name)
            .ok_or(Error::NotInitialized)
    }

    pub fn symbol(env: Env) -> Result<String, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Symbol)
            .ok_or(Error::NotInitialized)
    }

    pub fn is_delegate(env: Env, account: Address) -> bool {
        env.storage()
            .persistent()
            .get::<DataKey, bool>(&DataKey::Delegate(account))
            .unwrap_or(false)
    }

    pub fn is_owner_or_delegate(env: Env, account: Address) -> bool {
        let owner: Option<Address> = env.storage().instance().get(&DataKey::Owner);
        owner == Some(account.clone()) || Self::is_delegate(env, account)
    }

    pub fn features(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::Features)
            .unwrap_or(0)
    }

    pub fn is_enabled(env: Env, feature: u32) -> bool {
        is_enabled(Self::features(env), feature)
    }

    pub fn is_paused(env: Env) -> bool {
        env.storage()
            .instance()
            .get(&DataKey::Paused)
            .unwrap_or(false)
    }

    pub fn is_frozen(env: Env, account: Address) -> bool {
        env.storage()
            .persistent()
            .get::<DataKey, bool>(&DataKey::Frozen(account))
            .unwrap_or(false)
    }

    pub fn transfer_rules(env: Env) -> Option<Address> {
        env.storage().instance().get(&DataKey::TransferRules)
    }

    /// Whether a holder-initiated transfer between the two accounts is allowed
    pub fn check_transfer(env: Env, from: Address, to: Address) -> bool {
        Self::route(&env, &from, &to).is_ok()
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn route(env: &Env, from: &Address, to: &Address) -> Result<Route, Error> {
        if Self::is_paused(env.clone())
            || Self::is_frozen(env.clone(), from.clone())
            || Self::is_frozen(env.clone(), to.clone())
        {
            return Err(Error::TransferBlocked);
        }

        let rules = match Self::transfer_rules(env.clone()) {
            Some(rules) => rules,
            None => return Ok(Route::Direct),
        };
        if Self::is_owner_or_delegate(env.clone(), from.clone()) {
            return Ok(Route::Direct);
        }
        if !external::rules_authorize(env, &rules, from, to) {
            return Err(Error::TransferNotAuthorized);
        }
        if external::rules_requires_approval(env, &rules, from, to) {
            return Ok(Route::Escrow(rules));
        }
        Ok(Route::Direct)
    }

    fn require_initialized(env: &Env) -> Result<(), Error> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::NotInitialized);
        }
        Ok(())
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

    fn require_feature(env: &Env, feature: u32) -> Result<(), Error> {
        if !Self::is_enabled(env.clone(), feature) {
            return Err(Error::FeatureNotEnabled);
        }
        Ok(())
    }

    fn load_minter(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Minter)
            .ok_or(Error::NotInitialized)
    }

    fn set_frozen(env: &Env, account: Address, frozen: bool) -> Result<(), Error> {
        Self::require_owner(env)?;
        Self::require_feature(env, FEATURE_ACCOUNT_FREEZE)?;

        let key = DataKey::Frozen(account.clone());
        if frozen {
            env.storage().persistent().set(&key, &true);
        } else {
            env.storage().persistent().remove(&key);
        }

        env.events().publish(
            (Symbol::new(env, "account_frozen"), account.clone()),
            AccountFrozenEvent { account, frozen },
        );
        Ok(())
    }

    fn write_balance(env: &Env, account: &Address, amount: i128) {
        let key = DataKey::Balance(account.clone());
        if amount == 0 {
            env.storage().persistent().remove(&key);
        } else {
            env.storage().persistent().set(&key, &Balance { amount });
        }
    }

    fn move_balance(env: &Env, from: &Address, to: &Address, amount: i128) -> Result<(), Error> {
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let from_balance = Self::balance_of(env.clone(), from.clone());
        if from_balance < amount {
            return Err(Error::InsufficientBalance);
        }

        Self::write_balance(env, from, from_balance - amount);
        let to_balance = Self::balance_of(env.clone(), to.clone());
        let new_to_balance = to_balance.checked_add(amount).ok_or(Error::InvalidAmount)?;
        Self::write_balance(env, to, new_to_balance);

        env.events().publish(
            (Symbol::new(env, "transfer"), from.clone()),
            TransferEvent {
                from: from.clone(),
                to: to.clone(),
                amount,
            },
        );

        Ok(())
    }

    fn burn_from(env: &Env, from: &Address, amount: i128) -> Result<(), Error> {
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let balance = Self::balance_of(env.clone(), from.clone());
        if balance < amount {
            return Err(Error::InsufficientBalance);
        }

        let new_supply = Self::total_supply(env.clone()) - amount;
        Self::write_balance(env, from, balance - amount);
        env.storage()
            .instance()
            .set(&DataKey::TotalSupply, &new_supply);

        env.events().publish(
            (Symbol::new(env, "burn"), from.clone()),
            BurnEvent {
                from: from.clone(),
                amount,
                total_supply: new_supply,
            },
        );

        Ok(())
    }
}
