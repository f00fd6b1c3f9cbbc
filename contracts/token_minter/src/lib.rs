#![no_std]

mod error;
mod events;
mod external;
mod storage;
mod tiers;

pub use error::Error;
use events::{SupplyBurnedEvent, SupplyMintedEvent};
pub use storage::{Tier, PERCENT_SCALE, TOKEN_SCALE};
use storage::DataKey;

use soroban_sdk::{contract, contractimpl, log, token, Address, Env, Symbol, Vec};

#[contract]
pub struct TokenMinter;

#[contractimpl]
impl TokenMinter {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    /// Initialize the minter with the default stake and fee schedules
    ///
    /// `collateral` is the SEP-41 token fees are paid in.
    pub fn initialize(
        env: Env,
        admin: Address,
        registry: Address,
        oracle: Address,
        collateral: Address,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Registry, &registry);
        env.storage().instance().set(&DataKey::Oracle, &oracle);
        env.storage().instance().set(&DataKey::Collateral, &collateral);
        env.storage()
            .instance()
            .set(&DataKey::StakeTiers, &tiers::default_stake_tiers(&env));
        env.storage()
            .instance()
            .set(&DataKey::FeeTiers, &tiers::default_fee_tiers(&env));

        Ok(())
    }

    /// # Errors
    /// - `InvalidTierTable`: Floors not starting at 0 or not strictly increasing
    pub fn set_stake_tiers(env: Env, tiers: Vec<Tier>) -> Result<(), Error> {
        Self::require_admin(&env)?;

        if !tiers::is_valid_table(&tiers) {
            return Err(Error::InvalidTierTable);
        }

        env.storage().instance().set(&DataKey::StakeTiers, &tiers);
        env.events().publish(
            (Symbol::new(&env, "tiers_updated"), Symbol::new(&env, "stake")),
            tiers,
        );
        Ok(())
    }

    /// # Errors
    /// - `InvalidTierTable`: Invalid table, or the fee would drop at a tier boundary
    pub fn set_fee_tiers(env: Env, tiers: Vec<Tier>) -> Result<(), Error> {
        Self::require_admin(&env)?;

        if !tiers::is_monotone_table(&tiers) {
            return Err(Error::InvalidTierTable);
        }

        env.storage().instance().set(&DataKey::FeeTiers, &tiers);
        env.events().publish(
            (Symbol::new(&env, "tiers_updated"), Symbol::new(&env, "fee")),
            tiers,
        );
        Ok(())
    }

    // ============================================
    // PRICING
    // ============================================

    /// Collateral stake for a token of the given NAV
    pub fn calc_stake(env: Env, nav: i128) -> Result<i128, Error> {
        let table = Self::load_tiers(&env, DataKey::StakeTiers)?;
        Self::price_in_collateral(&env, &table, nav)
    }

    /// Collateral fee for minting a token of the given NAV
    pub fn calc_fee(env: Env, nav: i128) -> Result<i128, Error> {
        let table = Self::load_tiers(&env, DataKey::FeeTiers)?;
        Self::price_in_collateral(&env, &table, nav)
    }

    // ============================================
    // SUPPLY
    // ============================================

    /// Mint `amount` of `token` to `recipient`, charging the token owner the
    /// mint fee when the token's NAV is new
    ///
    /// The fee is charged on the first mint and on every mint where NAV rose
    /// above the NAV of the last charged mint. It is pulled from the owner's
    /// allowance to this contract, 20% to the treasury and 80% to the reward
    /// pool, and recorded as the token's stake.
    ///
    /// # Returns
    /// The fee charged, in collateral units
    ///
    /// # Errors
    /// - `Unauthorized`: This minter is not authorized in the registry, the
    ///   token is not registered to it, or caller is not the token's owner or
    ///   delegate
    /// - `ZeroAmount`: Amount is zero
    /// - `MaxSupplyExceeded`: Supply would exceed the token's cap
    /// - `InsufficientBalance`: Owner's collateral balance or allowance < fee
    pub fn mint(
        env: Env,
        caller: Address,
        token: Address,
        recipient: Address,
        amount: i128,
    ) -> Result<i128, Error> {
        caller.require_auth();
        let registry = Self::registry(env.clone())?;

        Self::require_token_operator(&env, &registry, &token, &caller)?;
        Self::check_amount(amount)?;

        let supply = external::token_total_supply(&env, &token);
        let new_supply = supply.checked_add(amount).ok_or(Error::ArithmeticOverflow)?;
        if new_supply > external::token_max_total_supply(&env, &token) {
            return Err(Error::MaxSupplyExceeded);
        }

        let nav = external::token_nav(&env, &token);
        let last_fee_nav: Option<i128> = env
            .storage()
            .persistent()
            .get(&DataKey::LastFeeNav(token.clone()));

        let fee = match last_fee_nav {
            Some(last) if nav <= last => {
                log!(&env, "NAV not above last charged NAV, no fee", nav, last);
                0
            }
            _ => {
                let fee = Self::calc_fee(env.clone(), nav)?;
                Self::collect_fee(&env, &registry, &token, fee)?;
                env.storage()
                    .persistent()
                    .set(&DataKey::LastFeeNav(token.clone()), &nav);
                fee
            }
        };

        external::token_mint(&env, &token, &recipient, amount);

        env.events().publish(
            (Symbol::new(&env, "supply_minted"), token.clone()),
            SupplyMintedEvent {
                token,
                recipient,
                amount,
                fee,
                nav,
            },
        );

        Ok(fee)
    }

    /// Burn `amount` of `token` from the caller's own balance
    ///
    /// # Errors
    /// - `Unauthorized`: This minter is not authorized in the registry, the
    ///   token is not registered to it, or caller is not the token's owner or
    ///   delegate
    /// - `ZeroAmount`: Amount is zero
    /// - `InsufficientBalance`: Caller holds less than `amount`
    pub fn burn(env: Env, caller: Address, token: Address, amount: i128) -> Result<(), Error> {
        caller.require_auth();
        let registry = Self::registry(env.clone())?;

        Self::require_token_operator(&env, &registry, &token, &caller)?;
        Self::check_amount(amount)?;

        if external::token_balance_of(&env, &token, &caller) < amount {
            return Err(Error::InsufficientBalance);
        }

        external::token_burn(&env, &token, &caller, amount);

        env.events().publish(
            (Symbol::new(&env, "supply_burned"), token.clone()),
            SupplyBurnedEvent {
                token,
                holder: caller,
                amount,
            },
        );

        Ok(())
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn stake_tiers(env: Env) -> Result<Vec<Tier>, Error> {
        Self::load_tiers(&env, DataKey::StakeTiers)
    }

    pub fn fee_tiers(env: Env) -> Result<Vec<Tier>, Error> {
        Self::load_tiers(&env, DataKey::FeeTiers)
    }

    pub fn last_fee_nav(env: Env, token: Address) -> Option<i128> {
        env.storage().persistent().get(&DataKey::LastFeeNav(token))
    }

    pub fn registry(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Registry)
            .ok_or(Error::NotInitialized)
    }

    pub fn collateral(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Collateral)
            .ok_or(Error::NotInitialized)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn require_admin(env: &Env) -> Result<(), Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();
        Ok(())
    }

    fn load_tiers(env: &Env, key: DataKey) -> Result<Vec<Tier>, Error> {
        env.storage()
            .instance()
            .get(&key)
            .ok_or(Error::NotInitialized)
    }

    fn price_in_collateral(env: &Env, table: &Vec<Tier>, nav: i128) -> Result<i128, Error> {
        if nav < 0 {
            return Err(Error::InvalidAmount);
        }
        let oracle: Address = env
            .storage()
            .instance()
            .get(&DataKey::Oracle)
            .ok_or(Error::NotInitialized)?;
        let (numerator, denominator) = external::oracle_price(env, &oracle);

        tiers::calculate(table, nav, numerator, denominator).ok_or(Error::ArithmeticOverflow)
    }

    fn check_amount(amount: i128) -> Result<(), Error> {
        if amount == 0 {
            return Err(Error::ZeroAmount);
        }
        if amount < 0 {
            return Err(Error::InvalidAmount);
        }
        Ok(())
    }

    /// Token must be bound to this minter and `caller` must run it
    fn require_token_operator(
        env: &Env,
        registry: &Address,
        token: &Address,
        caller: &Address,
    ) -> Result<(), Error> {
        let this = env.current_contract_address();
        if !external::registry_is_minter(env, registry, &this) {
            return Err(Error::Unauthorized);
        }
        match external::registry_minter_of(env, registry, token) {
            Some(minter) if minter == this => {}
            _ => return Err(Error::Unauthorized),
        }
        if !external::token_is_owner_or_delegate(env, token, caller) {
            return Err(Error::Unauthorized);
        }
        Ok(())
    }

    fn collect_fee(env: &Env, registry: &Address, token: &Address, fee: i128) -> Result<(), Error> {
        if fee == 0 {
            return Ok(());
        }

        let collateral = Self::collateral(env.clone())?;
        let payer = external::token_owner(env, token);
        let this = env.current_contract_address();
        let collateral_client = token::Client::new(env, &collateral);

        if collateral_client.balance(&payer) < fee || collateral_client.allowance(&payer, &this) < fee
        {
            return Err(Error::InsufficientBalance);
        }

        let (treasury_part, pool_part) = tiers::split_fee(fee).ok_or(Error::ArithmeticOverflow)?;
        let treasury = external::registry_treasury(env, registry);
        let reward_pool = external::registry_reward_pool(env, registry);

        if treasury_part > 0 {
            collateral_client.transfer_from(&this, &payer, &treasury, &treasury_part);
        }
        if pool_part > 0 {
            collateral_client.transfer_from(&this, &payer, &reward_pool, &pool_part);
        }

        external::registry_increase_stake(env, registry, token, fee);
        Ok(())
    }
}
