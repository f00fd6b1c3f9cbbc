#![no_std]

mod accounting;
mod error;
mod events;
mod external;
mod storage;

pub use error::Error;
use events::*;
pub use external::Limits;
pub use storage::{Config, Contribution, State, Terms, PERCENT_SCALE, TOKEN_SCALE};
use storage::DataKey;

use soroban_sdk::{contract, contractimpl, log, token, Address, Env, String, Symbol, Vec};

/// One fundraising campaign for a security token.
///
/// Contributions from whitelisted accounts are qualified up to the hard cap;
/// others wait as pending until the restrictions contract whitelists them.
/// Concluding mints the sold supply through the token minter and pays the
/// qualified funds, less referral shares, to the issuer.
#[contract]
pub struct Fundraiser;

#[contractimpl]
impl Fundraiser {
    // ============================================
    // INITIALIZATION & SETUP
    // ============================================

    /// Initialize the fundraise terms
    ///
    /// Pass `supply = 0` to sell at a fixed token price instead; the supply is
    /// then derived at conclusion.
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidCaps`: `hard_cap <= 0`, `soft_cap < 0` or `soft_cap > hard_cap`
    /// - `InvalidDates`: `start_date > end_date`
    /// - `InvalidAmount`: Negative supply
    pub fn initialize(
        env: Env,
        issuer: Address,
        label: String,
        token: Address,
        supply: i128,
        start_date: u64,
        end_date: u64,
        soft_cap: i128,
        hard_cap: i128,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Terms) {
            return Err(Error::AlreadyInitialized);
        }
        if hard_cap <= 0 || soft_cap < 0 || soft_cap > hard_cap {
            return Err(Error::InvalidCaps);
        }
        if start_date > end_date {
            return Err(Error::InvalidDates);
        }
        if supply < 0 {
            return Err(Error::InvalidAmount);
        }

        issuer.require_auth();

        let terms = Terms {
            issuer,
            label,
            token,
            start_date,
            end_date,
            soft_cap,
            hard_cap,
        };
        env.storage().instance().set(&DataKey::Terms, &terms);
        env.storage().instance().set(
            &DataKey::State,
            &State {
                supply,
                ..State::default()
            },
        );

        Ok(())
    }

    /// Complete the setup; the fee manager's current terms are snapshotted
    ///
    /// # Errors
    /// - `Canceled`: Fundraise was canceled
    /// - `AlreadySetUp`: Setup already completed
    /// - `InvalidPricing`: Not exactly one of supply and token price set
    pub fn setup(
        env: Env,
        base_currency: Address,
        token_price: i128,
        affiliate_manager: Option<Address>,
        restrictions: Address,
        fee_manager: Address,
        minter: Address,
        contributions_locked: bool,
    ) -> Result<(), Error> {
        let terms = Self::load_terms(&env)?;
        terms.issuer.require_auth();

        let mut state = Self::load_state(&env)?;
        if state.is_canceled {
            return Err(Error::Canceled);
        }
        if state.is_setup {
            return Err(Error::AlreadySetUp);
        }
        if token_price < 0 || (token_price == 0) == (state.supply == 0) {
            return Err(Error::InvalidPricing);
        }

        let platform = external::platform_terms(&env, &fee_manager);
        let config = Config {
            base_currency,
            affiliate_manager,
            restrictions,
            fee_manager,
            minter,
            fee: platform.fee,
            expiration_time: platform.expiration_time,
            fee_collector: platform.fee_collector,
        };

        state.token_price = token_price;
        state.contributions_locked = contributions_locked;
        state.is_fee_paid = config.fee == 0;
        state.is_setup = true;

        env.storage().instance().set(&DataKey::Config, &config);
        Self::save_state(&env, &state);

        env.events()
            .publish((Symbol::new(&env, "fundraiser_setup"),), terms.token);

        Ok(())
    }

    // ============================================
    // CONTRIBUTIONS
    // ============================================

    /// Contribute `amount` of base currency
    ///
    /// The whole amount is transferred in. Whitelisted contributors are
    /// qualified right away, others are held as pending. Whatever exceeds the
    /// contributor's max amount or the hard cap is refunded in the same call.
    /// An empty `referral` means no affiliate.
    ///
    /// # Returns
    /// The amount kept (qualified or pending)
    ///
    /// # Errors
    /// - `SetupIncomplete`, `Canceled`, `AlreadyFinished`, `NotStarted`,
    ///   `Ended`, `HardCapReached`: Fundraise not open
    /// - `ZeroAmount`: Amount is zero
    /// - `ExceedsMaxAmount`: Contributor already holds the max amount
    /// - `BelowMinAmount`: Contributor's total would stay below the min amount
    /// - `MaxContributorsReached`: No room for another qualified contributor
    pub fn contribute(
        env: Env,
        contributor: Address,
        amount: i128,
        referral: String,
    ) -> Result<i128, Error> {
        contributor.require_auth();

        let terms = Self::load_terms(&env)?;
        let mut state = Self::load_state(&env)?;
        Self::check_open(&env, &terms, &state)?;

        if amount == 0 {
            return Err(Error::ZeroAmount);
        }
        if amount < 0 {
            return Err(Error::InvalidAmount);
        }

        let config = Self::load_config(&env)?;
        let limits = external::limits(&env, &config.restrictions);
        let whitelisted = external::is_whitelisted(&env, &config.restrictions, &contributor);

        let mut record = Self::load_contribution(&env, &contributor);
        let held = record
            .pending
            .checked_add(record.qualified)
            .ok_or(Error::ArithmeticOverflow)?;
        let offered = Self::apply_amount_limits(held, amount, &limits)?;

        let base_currency = token::Client::new(&env, &config.base_currency);
        base_currency.transfer(&contributor, &env.current_contract_address(), &amount);
        state.total_contributed = state
            .total_contributed
            .checked_add(amount)
            .ok_or(Error::ArithmeticOverflow)?;

        if record.affiliate.is_none() && !referral.is_empty() {
            if let Some(manager) = &config.affiliate_manager {
                if let Some(affiliate) = external::affiliate_by_referral(&env, manager, &referral)
                {
                    record.affiliate = Some(affiliate.account);
                    record.percentage = affiliate.percentage;
                }
            }
        }

        let accepted = if whitelisted {
            Self::qualify(&env, &terms, &mut state, &contributor, &mut record, offered, &limits)?
        } else {
            record.pending = record
                .pending
                .checked_add(offered)
                .ok_or(Error::ArithmeticOverflow)?;
            state.amount_pending = state
                .amount_pending
                .checked_add(offered)
                .ok_or(Error::ArithmeticOverflow)?;

            env.events().publish(
                (Symbol::new(&env, "contribution_pending"), contributor.clone()),
                ContributionEvent {
                    contributor: contributor.clone(),
                    amount: offered,
                },
            );
            offered
        };

        let excess = amount - accepted;
        state.amount_refunded = state
            .amount_refunded
            .checked_add(excess)
            .ok_or(Error::ArithmeticOverflow)?;

        Self::save_contribution(&env, &contributor, &record);
        Self::save_state(&env, &state);

        Self::refund_excess(&env, &config, &contributor, excess);

        Ok(accepted)
    }

    /// Promote the account's pending funds to qualified (restrictions contract only)
    ///
    /// # Returns
    /// The amount qualified
    ///
    /// # Errors
    /// - `SetupIncomplete`, `Canceled`, `AlreadyFinished`, `NotStarted`,
    ///   `Ended`, `HardCapReached`: Fundraise not open
    /// - `BelowMinAmount`: Account's total is below the min amount
    /// - `MaxContributorsReached`: No room for another qualified contributor
    pub fn accept_contributor(env: Env, account: Address, limits: Limits) -> Result<i128, Error> {
        let terms = Self::load_terms(&env)?;
        let mut state = Self::load_state(&env)?;
        Self::check_open(&env, &terms, &state)?;

        let config = Self::load_config(&env)?;
        config.restrictions.require_auth();

        let mut record = Self::load_contribution(&env, &account);
        let pending = record.pending;
        if pending == 0 {
            return Ok(0);
        }

        let total = record
            .qualified
            .checked_add(pending)
            .ok_or(Error::ArithmeticOverflow)?;
        if limits.min_amount > 0 && total < limits.min_amount {
            return Err(Error::BelowMinAmount);
        }
        let allowed = if limits.max_amount > 0 {
            pending.min((limits.max_amount - record.qualified).max(0))
        } else {
            pending
        };

        record.pending = 0;
        state.amount_pending -= pending;

        let accepted =
            Self::qualify(&env, &terms, &mut state, &account, &mut record, allowed, &limits)?;
        let excess = pending - accepted;
        state.amount_refunded = state
            .amount_refunded
            .checked_add(excess)
            .ok_or(Error::ArithmeticOverflow)?;

        Self::save_contribution(&env, &account, &record);
        Self::save_state(&env, &state);

        Self::refund_excess(&env, &config, &account, excess);

        Ok(accepted)
    }

    /// Move the account's qualified funds back to pending and drop its
    /// referral shares (restrictions contract only)
    ///
    /// # Errors
    /// - `SetupIncomplete`, `Canceled`, `AlreadyFinished`, `NotStarted`,
    ///   `Ended`, `HardCapReached`: Fundraise not open
    pub fn remove_contributor(env: Env, account: Address) -> Result<(), Error> {
        let terms = Self::load_terms(&env)?;
        let mut state = Self::load_state(&env)?;
        Self::check_open(&env, &terms, &state)?;

        let config = Self::load_config(&env)?;
        config.restrictions.require_auth();

        let mut record = Self::load_contribution(&env, &account);
        let moved = record.qualified;
        if moved > 0 {
            record.qualified = 0;
            record.pending = record
                .pending
                .checked_add(moved)
                .ok_or(Error::ArithmeticOverflow)?;
            state.amount_qualified -= moved;
            state.amount_pending = state
                .amount_pending
                .checked_add(moved)
                .ok_or(Error::ArithmeticOverflow)?;
        }
        Self::drop_contributor(&env, &mut state, &mut record)?;

        Self::save_contribution(&env, &account, &record);
        Self::save_state(&env, &state);

        env.events().publish(
            (Symbol::new(&env, "contributor_removed"), account.clone()),
            ContributorRemovedEvent {
                contributor: account,
                amount_pending: record.pending,
            },
        );

        Ok(())
    }

    // ============================================
    // FEE & CONCLUSION
    // ============================================

    /// Pay towards the platform fee; only the outstanding part is taken
    ///
    /// # Returns
    /// The amount taken
    ///
    /// # Errors
    /// - `SetupIncomplete`: Setup not completed
    /// - `Canceled`: Fundraise was canceled
    /// - `ZeroAmount`: Amount is zero
    /// - `FeeAlreadyPaid`: Fee fully paid already
    pub fn pay_fee(env: Env, amount: i128) -> Result<i128, Error> {
        let terms = Self::load_terms(&env)?;
        terms.issuer.require_auth();

        let mut state = Self::load_state(&env)?;
        if !state.is_setup {
            return Err(Error::SetupIncomplete);
        }
        if state.is_canceled {
            return Err(Error::Canceled);
        }
        if amount == 0 {
            return Err(Error::ZeroAmount);
        }
        if amount < 0 {
            return Err(Error::InvalidAmount);
        }
        if state.is_fee_paid {
            return Err(Error::FeeAlreadyPaid);
        }

        let config = Self::load_config(&env)?;
        let (paid, excess) = accounting::clip(amount, config.fee - state.total_fee_paid);
        if excess > 0 {
            log!(&env, "fee overpaid, taking outstanding part only", paid, excess);
        }

        token::Client::new(&env, &config.base_currency).transfer(
            &terms.issuer,
            &env.current_contract_address(),
            &paid,
        );

        state.total_fee_paid += paid;
        state.is_fee_paid = state.total_fee_paid >= config.fee;
        Self::save_state(&env, &state);

        env.events().publish(
            (Symbol::new(&env, "fee_paid"),),
            FeePaidEvent {
                payer: terms.issuer,
                amount: paid,
            },
        );

        Ok(paid)
    }

    /// Finish the fundraise
    ///
    /// Derives whichever of supply and token price was left open, mints the
    /// supply to this contract, forwards the platform fee to the fee collector
    /// and pays the qualified funds less referral shares to the issuer. With
    /// `distribute`, every contributor receives their tokens right away.
    ///
    /// # Errors
    /// - `SetupIncomplete`: Setup not completed
    /// - `AlreadyFinished`: Already finished
    /// - `Canceled`: Fundraise was canceled
    /// - `SoftCapNotReached`: Qualified total below the soft cap
    /// - `FeeNotPaid`: Platform fee not fully paid
    /// - `ExpirationPassed`: Past `end_date + expiration_time`
    /// - `NotYetEligible`: Neither the hard cap nor the end date reached
    pub fn conclude_fundraise(env: Env, distribute: bool) -> Result<(), Error> {
        let terms = Self::load_terms(&env)?;
        terms.issuer.require_auth();

        let mut state = Self::load_state(&env)?;
        if !state.is_setup {
            return Err(Error::SetupIncomplete);
        }
        if state.is_finished {
            return Err(Error::AlreadyFinished);
        }
        if state.is_canceled {
            return Err(Error::Canceled);
        }
        if state.amount_qualified < terms.soft_cap {
            return Err(Error::SoftCapNotReached);
        }
        if !state.is_fee_paid {
            return Err(Error::FeeNotPaid);
        }

        let config = Self::load_config(&env)?;
        let now = env.ledger().timestamp();
        if now > terms.end_date.saturating_add(config.expiration_time) {
            return Err(Error::ExpirationPassed);
        }
        if !state.is_hardcap_reached && now < terms.end_date {
            return Err(Error::NotYetEligible);
        }

        if state.supply == 0 {
            state.supply = accounting::derive_supply(state.amount_qualified, state.token_price)
                .ok_or(Error::ArithmeticOverflow)?;
        } else {
            state.token_price = accounting::derive_price(state.amount_qualified, state.supply)
                .ok_or(Error::ArithmeticOverflow)?;
        }
        if state.supply <= 0 {
            return Err(Error::InvalidPricing);
        }

        let withdrawn = state.amount_qualified - state.total_affiliate_shares;
        state.is_finished = true;
        state.contributions_locked = true;
        state.amount_withdrawn = withdrawn;
        Self::save_state(&env, &state);

        let mint_fee = external::mint_supply(&env, &config.minter, &terms.token, state.supply);
        log!(&env, "supply minted", state.supply, mint_fee);

        let this = env.current_contract_address();
        let base_currency = token::Client::new(&env, &config.base_currency);
        if state.total_fee_paid > 0 {
            base_currency.transfer(&this, &config.fee_collector, &state.total_fee_paid);
        }
        if withdrawn > 0 {
            base_currency.transfer(&this, &terms.issuer, &withdrawn);
        }

        if distribute {
            for account in Self::contributors(env.clone()).iter() {
                Self::release_tokens(&env, &terms, &mut state, &account)?;
            }
        }

        env.events().publish(
            (Symbol::new(&env, "fundraiser_finished"), terms.token),
            FundraiserFinishedEvent {
                amount_qualified: state.amount_qualified,
                supply: state.supply,
                token_price: state.token_price,
                withdrawn,
            },
        );

        Ok(())
    }

    /// Cancel the fundraise; any platform fee paid so far goes back to the
    /// issuer and contributors reclaim their funds through `get_refund`
    ///
    /// # Errors
    /// - `CannotCancelWhenFinished`: Fundraise already finished
    /// - `Canceled`: Already canceled
    pub fn cancel(env: Env) -> Result<(), Error> {
        let terms = Self::load_terms(&env)?;
        terms.issuer.require_auth();

        let mut state = Self::load_state(&env)?;
        if state.is_finished {
            return Err(Error::CannotCancelWhenFinished);
        }
        if state.is_canceled {
            return Err(Error::Canceled);
        }

        let fee_paid = state.total_fee_paid;
        state.is_canceled = true;
        state.total_fee_paid = 0;
        state.is_fee_paid = false;
        Self::save_state(&env, &state);

        if fee_paid > 0 {
            let config = Self::load_config(&env)?;
            token::Client::new(&env, &config.base_currency).transfer(
                &env.current_contract_address(),
                &terms.issuer,
                &fee_paid,
            );
            env.events().publish(
                (Symbol::new(&env, "fee_refunded"),),
                FeePaidEvent {
                    payer: terms.issuer.clone(),
                    amount: fee_paid,
                },
            );
        }

        env.events()
            .publish((Symbol::new(&env, "fundraiser_canceled"),), terms.token);
        Ok(())
    }

    // ============================================
    // CLAIMS & REFUNDS
    // ============================================

    /// Transfer the contributor's pro-rata share of the sold supply
    ///
    /// # Errors
    /// - `NotFinished`: Fundraise has not finished
    /// - `NothingToClaim`: No qualified funds, or already claimed
    pub fn claim_tokens(env: Env, contributor: Address) -> Result<i128, Error> {
        contributor.require_auth();

        let terms = Self::load_terms(&env)?;
        let mut state = Self::load_state(&env)?;
        if !state.is_finished {
            return Err(Error::NotFinished);
        }

        let amount = Self::release_tokens(&env, &terms, &mut state, &contributor)?;
        if amount == 0 {
            return Err(Error::NothingToClaim);
        }
        Ok(amount)
    }

    /// Pay out the affiliate's referral share in base currency
    ///
    /// # Errors
    /// - `NotFinished`: Fundraise has not finished
    /// - `NothingToClaim`: No referral share to collect
    pub fn claim_referrals(env: Env, affiliate: Address) -> Result<i128, Error> {
        affiliate.require_auth();

        let mut state = Self::load_state(&env)?;
        if !state.is_finished {
            return Err(Error::NotFinished);
        }

        let amount = Self::affiliate_share(env.clone(), affiliate.clone());
        if amount <= 0 {
            return Err(Error::NothingToClaim);
        }

        env.storage()
            .persistent()
            .remove(&DataKey::AffiliateShare(affiliate.clone()));
        state.referrals_claimed += amount;
        Self::save_state(&env, &state);

        let config = Self::load_config(&env)?;
        token::Client::new(&env, &config.base_currency).transfer(
            &env.current_contract_address(),
            &affiliate,
            &amount,
        );

        env.events().publish(
            (Symbol::new(&env, "referral_claimed"), affiliate.clone()),
            ReferralClaimedEvent { affiliate, amount },
        );

        Ok(amount)
    }

    /// Return whatever of the contributor's funds is refundable
    ///
    /// Pending funds are refundable unless contributions are locked while the
    /// fundraise still runs. Qualified funds are refundable once the
    /// fundraise is canceled, or expired without finishing.
    ///
    /// # Errors
    /// - `ContributionsLocked`: Only locked pending funds are held
    /// - `NothingToRefund`: Nothing is held
    pub fn get_refund(env: Env, contributor: Address) -> Result<i128, Error> {
        contributor.require_auth();

        let terms = Self::load_terms(&env)?;
        let mut state = Self::load_state(&env)?;
        let config = Self::load_config(&env)?;

        let now = env.ledger().timestamp();
        let running = !state.is_finished && !state.is_canceled && now <= terms.end_date;
        let expired =
            !state.is_finished && now > terms.end_date.saturating_add(config.expiration_time);

        let mut record = Self::load_contribution(&env, &contributor);
        let mut refund: i128 = 0;

        if record.pending > 0 && !(state.contributions_locked && running) {
            refund += record.pending;
            state.amount_pending -= record.pending;
            record.pending = 0;
        }
        if record.qualified > 0 && (state.is_canceled || expired) {
            refund = refund
                .checked_add(record.qualified)
                .ok_or(Error::ArithmeticOverflow)?;
            state.amount_qualified -= record.qualified;
            record.qualified = 0;
            Self::drop_contributor(&env, &mut state, &mut record)?;
        }

        if refund == 0 {
            return Err(if record.pending > 0 {
                Error::ContributionsLocked
            } else {
                Error::NothingToRefund
            });
        }

        state.amount_refunded = state
            .amount_refunded
            .checked_add(refund)
            .ok_or(Error::ArithmeticOverflow)?;
        Self::save_contribution(&env, &contributor, &record);
        Self::save_state(&env, &state);

        token::Client::new(&env, &config.base_currency).transfer(
            &env.current_contract_address(),
            &contributor,
            &refund,
        );

        env.events().publish(
            (Symbol::new(&env, "contribution_refunded"), contributor.clone()),
            ContributionEvent {
                contributor,
                amount: refund,
            },
        );

        Ok(refund)
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn terms(env: Env) -> Result<Terms, Error> {
        Self::load_terms(&env)
    }

    pub fn config(env: Env) -> Result<Config, Error> {
        Self::load_config(&env)
    }

    pub fn state(env: Env) -> Result<State, Error> {
        Self::load_state(&env)
    }

    pub fn num_contributors(env: Env) -> Result<u32, Error> {
        Ok(Self::load_state(&env)?.num_contributors)
    }

    pub fn amount_qualified(env: Env) -> Result<i128, Error> {
        Ok(Self::load_state(&env)?.amount_qualified)
    }

    pub fn amount_pending(env: Env) -> Result<i128, Error> {
        Ok(Self::load_state(&env)?.amount_pending)
    }

    pub fn supply(env: Env) -> Result<i128, Error> {
        Ok(Self::load_state(&env)?.supply)
    }

    pub fn token_price(env: Env) -> Result<i128, Error> {
        Ok(Self::load_state(&env)?.token_price)
    }

    pub fn total_fee_paid(env: Env) -> Result<i128, Error> {
        Ok(Self::load_state(&env)?.total_fee_paid)
    }

    pub fn is_fee_paid(env: Env) -> Result<bool, Error> {
        Ok(Self::load_state(&env)?.is_fee_paid)
    }

    pub fn is_hardcap_reached(env: Env) -> Result<bool, Error> {
        Ok(Self::load_state(&env)?.is_hardcap_reached)
    }

    pub fn is_finished(env: Env) -> Result<bool, Error> {
        Ok(Self::load_state(&env)?.is_finished)
    }

    pub fn is_canceled(env: Env) -> Result<bool, Error> {
        Ok(Self::load_state(&env)?.is_canceled)
    }

    pub fn contributions_locked(env: Env) -> Result<bool, Error> {
        Ok(Self::load_state(&env)?.contributions_locked)
    }

    pub fn fee(env: Env) -> Result<i128, Error> {
        Ok(Self::load_config(&env)?.fee)
    }

    pub fn contribution(env: Env, account: Address) -> Contribution {
        Self::load_contribution(&env, &account)
    }

    pub fn pending_contribution(env: Env, account: Address) -> i128 {
        Self::load_contribution(&env, &account).pending
    }

    pub fn qualified_contribution(env: Env, account: Address) -> i128 {
        Self::load_contribution(&env, &account).qualified
    }

    pub fn is_contributor(env: Env, account: Address) -> bool {
        Self::load_contribution(&env, &account).is_contributor
    }

    pub fn contributor_affiliate(env: Env, account: Address) -> Option<Address> {
        Self::load_contribution(&env, &account).affiliate
    }

    pub fn contributor_share(env: Env, account: Address) -> i128 {
        Self::load_contribution(&env, &account).share
    }

    pub fn affiliate_share(env: Env, affiliate: Address) -> i128 {
        env.storage()
            .persistent()
            .get(&DataKey::AffiliateShare(affiliate))
            .unwrap_or(0)
    }

    /// Every account that ever held qualified funds
    pub fn contributors(env: Env) -> Vec<Address> {
        env.storage()
            .persistent()
            .get(&DataKey::Contributors)
            .unwrap_or(Vec::new(&env))
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn load_terms(env: &Env) -> Result<Terms, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Terms)
            .ok_or(Error::NotInitialized)
    }

    fn load_state(env: &Env) -> Result<State, Error> {
        env.storage()
            .instance()
            .get(&DataKey::State)
            .ok_or(Error::NotInitialized)
    }

    fn save_state(env: &Env, state: &State) {
        env.storage().instance().set(&DataKey::State, state);
    }

    fn load_config(env: &Env) -> Result<Config, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(Error::SetupIncomplete)
    }

    fn load_contribution(env: &Env, account: &Address) -> Contribution {
        env.storage()
            .persistent()
            .get(&DataKey::Contribution(account.clone()))
            .unwrap_or_default()
    }

    fn save_contribution(env: &Env, account: &Address, record: &Contribution) {
        env.storage()
            .persistent()
            .set(&DataKey::Contribution(account.clone()), record);
    }

    /// Contribute, accept and remove all require an open fundraise
    fn check_open(env: &Env, terms: &Terms, state: &State) -> Result<(), Error> {
        if !state.is_setup {
            return Err(Error::SetupIncomplete);
        }
        if state.is_canceled {
            return Err(Error::Canceled);
        }
        if state.is_finished {
            return Err(Error::AlreadyFinished);
        }
        let now = env.ledger().timestamp();
        if now < terms.start_date {
            return Err(Error::NotStarted);
        }
        if now > terms.end_date {
            return Err(Error::Ended);
        }
        if state.is_hardcap_reached {
            return Err(Error::HardCapReached);
        }
        Ok(())
    }

    /// Part of `amount` a contributor already holding `held` may add
    fn apply_amount_limits(held: i128, amount: i128, limits: &Limits) -> Result<i128, Error> {
        if limits.max_amount > 0 && held >= limits.max_amount {
            return Err(Error::ExceedsMaxAmount);
        }
        let total = held.checked_add(amount).ok_or(Error::ArithmeticOverflow)?;
        if limits.min_amount > 0 && total < limits.min_amount {
            return Err(Error::BelowMinAmount);
        }
        if limits.max_amount > 0 {
            Ok(amount.min(limits.max_amount - held))
        } else {
            Ok(amount)
        }
    }

    /// Qualify up to `amount` for `account`, clipped to the hard cap
    ///
    /// Returns the qualified part; the caller refunds the rest.
    fn qualify(
        env: &Env,
        terms: &Terms,
        state: &mut State,
        account: &Address,
        record: &mut Contribution,
        amount: i128,
        limits: &Limits,
    ) -> Result<i128, Error> {
        if amount <= 0 {
            return Ok(0);
        }
        if !record.is_contributor
            && limits.max_count > 0
            && state.num_contributors >= limits.max_count
        {
            return Err(Error::MaxContributorsReached);
        }

        let (accepted, excess) =
            accounting::clip(amount, terms.hard_cap - state.amount_qualified);
        if excess > 0 {
            log!(env, "hard cap reached, refunding excess", account.clone(), excess);
        }
        if accepted == 0 {
            return Ok(0);
        }

        record.qualified = record
            .qualified
            .checked_add(accepted)
            .ok_or(Error::ArithmeticOverflow)?;
        state.amount_qualified += accepted;
        if state.amount_qualified >= terms.hard_cap {
            state.is_hardcap_reached = true;
        }

        if !record.is_contributor {
            record.is_contributor = true;
            state.num_contributors += 1;
            Self::remember_contributor(env, account);
        }

        if let Some(affiliate) = &record.affiliate {
            let share = accounting::affiliate_share(accepted, record.percentage)
                .ok_or(Error::ArithmeticOverflow)?;
            record.share += share;
            state.total_affiliate_shares += share;
            Self::add_affiliate_share(env, affiliate, share)?;
        }

        env.events().publish(
            (Symbol::new(env, "contribution_added"), account.clone()),
            ContributionEvent {
                contributor: account.clone(),
                amount: accepted,
            },
        );

        Ok(accepted)
    }

    /// Stop counting the account as a contributor and take back its
    /// referral share
    fn drop_contributor(
        env: &Env,
        state: &mut State,
        record: &mut Contribution,
    ) -> Result<(), Error> {
        if record.is_contributor {
            record.is_contributor = false;
            state.num_contributors -= 1;
        }
        if let Some(affiliate) = record.affiliate.take() {
            Self::add_affiliate_share(env, &affiliate, -record.share)?;
            state.total_affiliate_shares -= record.share;
            record.share = 0;
            record.percentage = 0;
        }
        Ok(())
    }

    fn add_affiliate_share(env: &Env, affiliate: &Address, delta: i128) -> Result<(), Error> {
        let key = DataKey::AffiliateShare(affiliate.clone());
        let current: i128 = env.storage().persistent().get(&key).unwrap_or(0);
        let updated = current.checked_add(delta).ok_or(Error::ArithmeticOverflow)?;
        if updated == 0 {
            env.storage().persistent().remove(&key);
        } else {
            env.storage().persistent().set(&key, &updated);
        }
        Ok(())
    }

    fn remember_contributor(env: &Env, account: &Address) {
        let mut contributors = Self::contributors(env.clone());
        if !contributors.contains(account) {
            contributors.push_back(account.clone());
            env.storage()
                .persistent()
                .set(&DataKey::Contributors, &contributors);
        }
    }

    /// Send back what did not fit; `amount_refunded` is updated by the caller
    fn refund_excess(env: &Env, config: &Config, account: &Address, excess: i128) {
        if excess <= 0 {
            return;
        }

        token::Client::new(env, &config.base_currency).transfer(
            &env.current_contract_address(),
            account,
            &excess,
        );

        env.events().publish(
            (Symbol::new(env, "contribution_refunded"), account.clone()),
            ContributionEvent {
                contributor: account.clone(),
                amount: excess,
            },
        );
    }

    /// Send the account its unclaimed tokens; 0 when there is nothing to send
    ///
    /// The last contributor to claim receives whatever rounding left over, so
    /// the whole supply leaves the contract.
    fn release_tokens(
        env: &Env,
        terms: &Terms,
        state: &mut State,
        account: &Address,
    ) -> Result<i128, Error> {
        let mut record = Self::load_contribution(env, account);
        if record.qualified == 0 || record.tokens_claimed {
            return Ok(0);
        }

        let amount = if state.num_claimed + 1 >= state.num_contributors {
            state.supply - state.tokens_released
        } else {
            accounting::token_share(record.qualified, state.supply, state.amount_qualified)
                .ok_or(Error::ArithmeticOverflow)?
        };
        if amount <= 0 {
            return Ok(0);
        }

        record.tokens_claimed = true;
        Self::save_contribution(env, account, &record);
        state.tokens_released += amount;
        state.num_claimed += 1;
        Self::save_state(env, state);

        external::transfer_tokens(env, &terms.token, account, amount);

        env.events().publish(
            (Symbol::new(env, "tokens_claimed"), account.clone()),
            TokensClaimedEvent {
                contributor: account.clone(),
                amount,
            },
        );

        Ok(amount)
    }
}

#[cfg(test)]
mod test;
