#![no_std]

mod error;
mod events;
mod external;
mod storage;

pub use error::Error;
use events::{ListingEvent, TransferRequestEvent};
use storage::DataKey;
pub use storage::TransferRequest;

use soroban_sdk::{contract, contractimpl, Address, Env, Symbol, Vec};

/// Transfer rules a security token consults for holder transfers.
///
/// A transfer is authorized only when both accounts are whitelisted or
/// greylisted. If either side is greylisted the token parks the amount here
/// as a request the owner approves or denies.
#[contract]
pub struct TransferRules;

#[contractimpl]
impl TransferRules {
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(env: Env, owner: Address, token: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Owner) {
            return Err(Error::AlreadyInitialized);
        }

        owner.require_auth();

        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage().instance().set(&DataKey::Token, &token);
        env.storage().instance().set(&DataKey::RequestCounter, &0u64);

        Ok(())
    }

    // ============================================
    // LISTS (OWNER ONLY)
    // ============================================

    pub fn whitelist_account(env: Env, account: Address) -> Result<(), Error> {
        let owner = Self::require_owner(&env)?;
        Self::set_listed(&env, &owner, DataKey::Whitelisted(account.clone()), account, true);
        Ok(())
    }

    pub fn un_whitelist_account(env: Env, account: Address) -> Result<(), Error> {
        let owner = Self::require_owner(&env)?;
        Self::set_listed(&env, &owner, DataKey::Whitelisted(account.clone()), account, false);
        Ok(())
    }

    pub fn bulk_whitelist_account(env: Env, accounts: Vec<Address>) -> Result<(), Error> {
        let owner = Self::require_owner(&env)?;
        for account in accounts.iter() {
            Self::set_listed(&env, &owner, DataKey::Whitelisted(account.clone()), account, true);
        }
        Ok(())
    }

    pub fn bulk_un_whitelist_account(env: Env, accounts: Vec<Address>) -> Result<(), Error> {
        let owner = Self::require_owner(&env)?;
        for account in accounts.iter() {
            Self::set_listed(&env, &owner, DataKey::Whitelisted(account.clone()), account, false);
        }
        Ok(())
    }

    pub fn greylist_account(env: Env, account: Address) -> Result<(), Error> {
        let owner = Self::require_owner(&env)?;
        Self::set_listed(&env, &owner, DataKey::Greylisted(account.clone()), account, true);
        Ok(())
    }

    pub fn un_greylist_account(env: Env, account: Address) -> Result<(), Error> {
        let owner = Self::require_owner(&env)?;
        Self::set_listed(&env, &owner, DataKey::Greylisted(account.clone()), account, false);
        Ok(())
    }

    pub fn bulk_greylist_account(env: Env, accounts: Vec<Address>) -> Result<(), Error> {
        let owner = Self::require_owner(&env)?;
        for account in accounts.iter() {
            Self::set_listed(&env, &owner, DataKey::Greylisted(account.clone()), account, true);
        }
        Ok(())
    }

    pub fn bulk_un_greylist_account(env: Env, accounts: Vec<Address>) -> Result<(), Error> {
        let owner = Self::require_owner(&env)?;
        for account in accounts.iter() {
            Self::set_listed(&env, &owner, DataKey::Greylisted(account.clone()), account, false);
        }
        Ok(())
    }

    // ============================================
    // TRANSFER REQUESTS
    // ============================================

    /// Record a transfer the token already parked under this contract
    /// (token only)
    ///
    /// # Returns
    /// The request id, counting up from 1
    ///
    /// # Errors
    /// - `InvalidAmount`: Amount <= 0
    pub fn request_transfer(
        env: Env,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<u64, Error> {
        let token = Self::token(env.clone())?;
        token.require_auth();

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let id = Self::request_counter(env.clone()) + 1;
        env.storage().instance().set(&DataKey::RequestCounter, &id);
        env.storage().persistent().set(
            &DataKey::Request(id),
            &TransferRequest {
                from: from.clone(),
                to: to.clone(),
                amount,
            },
        );

        env.events().publish(
            (Symbol::new(&env, "transfer_requested"), id),
            TransferRequestEvent {
                id,
                from,
                to,
                amount,
            },
        );

        Ok(id)
    }

    /// Release a parked transfer to its recipient (owner only)
    ///
    /// # Errors
    /// - `RequestNotFound`: No open request under `id`
    pub fn approve_transfer(env: Env, id: u64) -> Result<(), Error> {
        Self::require_owner(&env)?;

        let request = Self::take_request(&env, id)?;
        let token = Self::token(env.clone())?;
        external::execute_transfer(&env, &token, &request.to, request.amount);

        env.events().publish(
            (Symbol::new(&env, "transfer_approved"), id),
            TransferRequestEvent {
                id,
                from: request.from,
                to: request.to,
                amount: request.amount,
            },
        );
        Ok(())
    }

    /// Send a parked transfer back to its sender; the owner or the sender may
    /// deny
    ///
    /// # Errors
    /// - `RequestNotFound`: No open request under `id`
    /// - `Unauthorized`: Caller is neither the owner nor the sender
    pub fn deny_transfer(env: Env, caller: Address, id: u64) -> Result<(), Error> {
        caller.require_auth();

        let request = Self::request(env.clone(), id).ok_or(Error::RequestNotFound)?;
        if caller != Self::owner(env.clone())? && caller != request.from {
            return Err(Error::Unauthorized);
        }
        env.storage().persistent().remove(&DataKey::Request(id));

        let token = Self::token(env.clone())?;
        external::execute_transfer(&env, &token, &request.from, request.amount);

        env.events().publish(
            (Symbol::new(&env, "transfer_denied"), id),
            TransferRequestEvent {
                id,
                from: request.from,
                to: request.to,
                amount: request.amount,
            },
        );
        Ok(())
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn is_whitelisted(env: Env, account: Address) -> bool {
        Self::is_listed(&env, &DataKey::Whitelisted(account))
    }

    pub fn is_greylisted(env: Env, account: Address) -> bool {
        Self::is_listed(&env, &DataKey::Greylisted(account))
    }

    /// Whether both accounts are on either list
    pub fn authorize(env: Env, from: Address, to: Address) -> bool {
        Self::is_known(&env, &from) && Self::is_known(&env, &to)
    }

    /// Whether a transfer between the accounts has to wait for the owner
    pub fn requires_approval(env: Env, from: Address, to: Address) -> bool {
        Self::is_greylisted(env.clone(), from) || Self::is_greylisted(env, to)
    }

    pub fn request(env: Env, id: u64) -> Option<TransferRequest> {
        env.storage().persistent().get(&DataKey::Request(id))
    }

    /// Id of the latest request; 0 before the first
    pub fn request_counter(env: Env) -> u64 {
        env.storage()
            .instance()
            .get(&DataKey::RequestCounter)
            .unwrap_or(0)
    }

    pub fn owner(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Owner)
            .ok_or(Error::NotInitialized)
    }

    pub fn token(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Token)
            .ok_or(Error::NotInitialized)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn require_owner(env: &Env) -> Result<Address, Error> {
        let owner = Self::owner(env.clone())?;
        owner.require_auth();
        Ok(owner)
    }

    fn is_listed(env: &Env, key: &DataKey) -> bool {
        env.storage()
            .persistent()
            .get::<DataKey, bool>(key)
            .unwrap_or(false)
    }

    fn is_known(env: &Env, account: &Address) -> bool {
        Self::is_listed(env, &DataKey::Whitelisted(account.clone()))
            || Self::is_listed(env, &DataKey::Greylisted(account.clone()))
    }

    fn set_listed(env: &Env, owner: &Address, key: DataKey, account: Address, listed: bool) {
        let topic = match (&key, listed) {
            (DataKey::Whitelisted(_), true) => "account_whitelisted",
            (DataKey::Whitelisted(_), false) => "account_unwhitelisted",
            (_, true) => "account_greylisted",
            (_, false) => "account_ungreylisted",
        };

        if listed {
            env.storage().persistent().set(&key, &true);
        } else {
            env.storage().persistent().remove(&key);
        }

        env.events().publish(
            (Symbol::new(env, topic), account.clone()),
            ListingEvent {
                account,
                owner: owner.clone(),
            },
        );
    }

    fn take_request(env: &Env, id: u64) -> Result<TransferRequest, Error> {
        let key = DataKey::Request(id);
        let request: TransferRequest = env
            .storage()
            .persistent()
            .get(&key)
            .ok_or(Error::RequestNotFound)?;
        env.storage().persistent().remove(&key);
        Ok(request)
    }
}
