#![cfg(test)]

use super::*;
use affiliate_manager::{AffiliateManager, AffiliateManagerClient};
use contributor_restrictions::{ContributorRestrictions, ContributorRestrictionsClient};
use fundraiser_manager::{FundraiserManager, FundraiserManagerClient};
use price_oracle::{PriceOracle, PriceOracleClient};
use security_token::{SecurityToken, SecurityTokenClient};
use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token, Address, Env, String,
};
use token_minter::{TokenMinter, TokenMinterClient};
use token_registry::{TokenRegistry, TokenRegistryClient};

const USD: i128 = 1_000_000;
const FUNDS: i128 = 20_000 * USD;
const SOFT_CAP: i128 = 5_000 * USD;
const HARD_CAP: i128 = 10_000 * USD;
const START: u64 = 1_000;
const END: u64 = 2_000;
const EXPIRATION: u64 = 500;
const NAV: i128 = 1_000;
const MAX_SUPPLY: i128 = 1_000_000 * TOKEN_SCALE;
const COLLATERAL: i128 = 10_000 * TOKEN_SCALE;

struct Params {
    supply: i128,
    token_price: i128,
    fee: i128,
    max_count: u32,
    min_amount: i128,
    max_amount: i128,
    locked: bool,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            supply: 0,
            token_price: USD,
            fee: 0,
            max_count: 0,
            min_amount: 0,
            max_amount: 0,
            locked: false,
        }
    }
}

struct Setup<'a> {
    env: Env,
    fundraiser: FundraiserClient<'a>,
    restrictions: ContributorRestrictionsClient<'a>,
    affiliates: AffiliateManagerClient<'a>,
    token: SecurityTokenClient<'a>,
    base: token::Client<'a>,
    base_admin: token::StellarAssetClient<'a>,
    collateral: token::Client<'a>,
    issuer: Address,
    fee_collector: Address,
}

impl Setup<'_> {
    fn account(&self) -> Address {
        let account = Address::generate(&self.env);
        self.base_admin.mint(&account, &FUNDS);
        account
    }

    fn contributor(&self) -> Address {
        let account = self.account();
        self.restrictions.whitelist_account(&account);
        account
    }

    fn contribute(&self, account: &Address, amount: i128) -> i128 {
        self.contribute_with(account, amount, "")
    }

    fn contribute_with(&self, account: &Address, amount: i128, referral: &str) -> i128 {
        self.fundraiser
            .contribute(account, &amount, &String::from_str(&self.env, referral))
    }

    fn try_contribute(&self, account: &Address, amount: i128) -> Result<(), Error> {
        match self
            .fundraiser
            .try_contribute(account, &amount, &String::from_str(&self.env, ""))
        {
            Ok(_) => Ok(()),
            Err(Ok(err)) => Err(err),
            Err(Err(_)) => panic!("unexpected host error"),
        }
    }

    fn set_time(&self, timestamp: u64) {
        self.env.ledger().set_timestamp(timestamp);
    }
}

fn setup() -> Setup<'static> {
    setup_with(Params::default())
}

fn setup_with(params: Params) -> Setup<'static> {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let issuer = Address::generate(&env);
    let fee_collector = Address::generate(&env);
    let treasury = Address::generate(&env);
    let reward_pool = Address::generate(&env);
    let factory = Address::generate(&env);

    // minting stack
    let registry_id = env.register_contract(None, TokenRegistry);
    let registry = TokenRegistryClient::new(&env, &registry_id);
    registry.initialize(&admin, &treasury, &reward_pool);

    let oracle_id = env.register_contract(None, PriceOracle);
    PriceOracleClient::new(&env, &oracle_id).initialize(&admin, &1, &1);

    let collateral_id = env.register_stellar_asset_contract_v2(admin.clone()).address();
    let collateral = token::Client::new(&env, &collateral_id);

    let minter_id = env.register_contract(None, TokenMinter);
    TokenMinterClient::new(&env, &minter_id).initialize(
        &admin,
        &registry_id,
        &oracle_id,
        &collateral_id,
    );

    let fundraiser_id = env.register_contract(None, Fundraiser);
    let fundraiser = FundraiserClient::new(&env, &fundraiser_id);

    let token_id = env.register_contract(None, SecurityToken);
    let token = SecurityTokenClient::new(&env, &token_id);
    token.initialize(
        &issuer,
        &minter_id,
        &String::from_str(&env, "Testing Security Token"),
        &String::from_str(&env, "TST"),
        &MAX_SUPPLY,
        &NAV,
        &0,
    );
    token.add_delegate(&fundraiser_id);

    registry.add_minter(&minter_id);
    registry.add_factory(&factory);
    registry.register(&factory, &token_id, &minter_id);

    token::StellarAssetClient::new(&env, &collateral_id).mint(&issuer, &COLLATERAL);
    collateral.approve(&issuer, &minter_id, &COLLATERAL, &1000);

    // fundraise
    let base_id = env.register_stellar_asset_contract_v2(admin.clone()).address();
    let base = token::Client::new(&env, &base_id);
    let base_admin = token::StellarAssetClient::new(&env, &base_id);

    let fee_manager_id = env.register_contract(None, FundraiserManager);
    FundraiserManagerClient::new(&env, &fee_manager_id).initialize(
        &admin,
        &fee_collector,
        &params.fee,
        &EXPIRATION,
    );

    let affiliates_id = env.register_contract(None, AffiliateManager);
    let affiliates = AffiliateManagerClient::new(&env, &affiliates_id);
    affiliates.initialize(&admin);

    let restrictions_id = env.register_contract(None, ContributorRestrictions);
    let restrictions = ContributorRestrictionsClient::new(&env, &restrictions_id);
    restrictions.initialize(
        &issuer,
        &fundraiser_id,
        &params.max_count,
        &params.min_amount,
        &params.max_amount,
    );

    fundraiser.initialize(
        &issuer,
        &String::from_str(&env, "Series A"),
        &token_id,
        &params.supply,
        &START,
        &END,
        &SOFT_CAP,
        &HARD_CAP,
    );
    fundraiser.setup(
        &base_id,
        &params.token_price,
        &Some(affiliates_id),
        &restrictions_id,
        &fee_manager_id,
        &minter_id,
        &params.locked,
    );

    let s = Setup {
        env,
        fundraiser,
        restrictions,
        affiliates,
        token,
        base,
        base_admin,
        collateral,
        issuer,
        fee_collector,
    };
    s.set_time(START);
    s
}

#[test]
fn test_initialize_validation() {
    let env = Env::default();
    env.mock_all_auths();
    let client = FundraiserClient::new(&env, &env.register_contract(None, Fundraiser));

    let issuer = Address::generate(&env);
    let token = Address::generate(&env);
    let label = String::from_str(&env, "Seed");

    assert_eq!(
        client.try_initialize(&issuer, &label, &token, &0, &START, &END, &200, &100),
        Err(Ok(Error::InvalidCaps))
    );
    assert_eq!(
        client.try_initialize(&issuer, &label, &token, &0, &START, &END, &0, &0),
        Err(Ok(Error::InvalidCaps))
    );
    assert_eq!(
        client.try_initialize(&issuer, &label, &token, &0, &END, &START, &0, &100),
        Err(Ok(Error::InvalidDates))
    );

    client.initialize(&issuer, &label, &token, &0, &START, &END, &0, &100);
    assert_eq!(
        client.try_initialize(&issuer, &label, &token, &0, &START, &END, &0, &100),
        Err(Ok(Error::AlreadyInitialized))
    );

    // nothing works until setup
    assert_eq!(
        client.try_contribute(&issuer, &1, &String::from_str(&env, "")),
        Err(Ok(Error::SetupIncomplete))
    );
    assert_eq!(client.try_pay_fee(&1), Err(Ok(Error::SetupIncomplete)));
    assert_eq!(
        client.try_conclude_fundraise(&false),
        Err(Ok(Error::SetupIncomplete))
    );

    // neither supply nor price
    let any = Address::generate(&env);
    assert_eq!(
        client.try_setup(&any, &0, &None, &any, &any, &any, &false),
        Err(Ok(Error::InvalidPricing))
    );

    // both supply and price
    let fixed = FundraiserClient::new(&env, &env.register_contract(None, Fundraiser));
    fixed.initialize(&issuer, &label, &token, &TOKEN_SCALE, &START, &END, &0, &100);
    assert_eq!(
        fixed.try_setup(&any, &USD, &None, &any, &any, &any, &false),
        Err(Ok(Error::InvalidPricing))
    );
}

#[test]
fn test_setup_runs_once() {
    let s = setup();
    let any = Address::generate(&s.env);
    assert_eq!(
        s.fundraiser
            .try_setup(&any, &USD, &None, &any, &any, &any, &false),
        Err(Ok(Error::AlreadySetUp))
    );

    // a canceled fundraise cannot be set up
    let issuer = Address::generate(&s.env);
    let token = Address::generate(&s.env);
    let client = FundraiserClient::new(&s.env, &s.env.register_contract(None, Fundraiser));
    client.initialize(
        &issuer,
        &String::from_str(&s.env, "Seed"),
        &token,
        &0,
        &START,
        &END,
        &0,
        &100,
    );
    client.cancel();
    assert_eq!(
        client.try_setup(&any, &USD, &None, &any, &any, &any, &false),
        Err(Ok(Error::Canceled))
    );
}

#[test]
fn test_hard_cap_clips_and_refunds() {
    let s = setup();
    let alice = s.contributor();
    let bob = s.contributor();
    let carol = s.contributor();

    assert_eq!(s.contribute(&alice, 9_000 * USD), 9_000 * USD);
    assert!(!s.fundraiser.is_hardcap_reached());

    // only 1,000 fits, 2,000 comes straight back
    assert_eq!(s.contribute(&bob, 3_000 * USD), 1_000 * USD);
    assert_eq!(s.base.balance(&bob), FUNDS - 1_000 * USD);
    assert_eq!(s.fundraiser.qualified_contribution(&bob), 1_000 * USD);
    assert!(s.fundraiser.is_hardcap_reached());

    assert_eq!(
        s.try_contribute(&carol, 100 * USD),
        Err(Error::HardCapReached)
    );

    let state = s.fundraiser.state();
    assert_eq!(state.amount_qualified, HARD_CAP);
    assert_eq!(state.amount_refunded, 2_000 * USD);
    assert_eq!(state.total_contributed, 12_000 * USD);
    assert_eq!(s.fundraiser.num_contributors(), 2);
    assert_eq!(s.base.balance(&s.fundraiser.address), HARD_CAP);
}

#[test]
fn test_pending_until_whitelisted() {
    let s = setup();
    let alice = s.account();

    assert_eq!(s.contribute(&alice, 1_000 * USD), 1_000 * USD);
    assert_eq!(s.fundraiser.pending_contribution(&alice), 1_000 * USD);
    assert_eq!(s.fundraiser.amount_pending(), 1_000 * USD);
    assert_eq!(s.fundraiser.amount_qualified(), 0);
    assert!(!s.fundraiser.is_contributor(&alice));

    s.restrictions.whitelist_account(&alice);
    assert_eq!(s.fundraiser.pending_contribution(&alice), 0);
    assert_eq!(s.fundraiser.qualified_contribution(&alice), 1_000 * USD);
    assert_eq!(s.fundraiser.amount_pending(), 0);
    assert_eq!(s.fundraiser.num_contributors(), 1);

    // further contributions qualify right away
    s.contribute(&alice, 500 * USD);
    assert_eq!(s.fundraiser.qualified_contribution(&alice), 1_500 * USD);

    s.restrictions.un_whitelist_account(&alice);
    assert_eq!(s.fundraiser.pending_contribution(&alice), 1_500 * USD);
    assert_eq!(s.fundraiser.qualified_contribution(&alice), 0);
    assert_eq!(s.fundraiser.num_contributors(), 0);
    assert!(!s.fundraiser.is_contributor(&alice));

    assert_eq!(s.fundraiser.get_refund(&alice), 1_500 * USD);
    assert_eq!(s.base.balance(&alice), FUNDS);
}

#[test]
fn test_accepting_pending_clips_to_hard_cap() {
    let s = setup();
    let alice = s.contributor();
    let bob = s.account();

    s.contribute(&alice, 9_000 * USD);
    s.contribute(&bob, 3_000 * USD);
    assert_eq!(s.fundraiser.amount_pending(), 3_000 * USD);

    s.restrictions.whitelist_account(&bob);
    assert_eq!(s.fundraiser.qualified_contribution(&bob), 1_000 * USD);
    assert_eq!(s.fundraiser.pending_contribution(&bob), 0);
    assert_eq!(s.base.balance(&bob), FUNDS - 1_000 * USD);
    assert!(s.fundraiser.is_hardcap_reached());
}

#[test]
fn test_min_and_max_amount() {
    let s = setup_with(Params {
        min_amount: 100 * USD,
        max_amount: 2_000 * USD,
        ..Params::default()
    });
    let alice = s.contributor();

    assert_eq!(s.try_contribute(&alice, 50 * USD), Err(Error::BelowMinAmount));
    assert_eq!(s.contribute(&alice, 1_500 * USD), 1_500 * USD);
    // top-ups below the min are fine once the total clears it
    assert_eq!(s.contribute(&alice, 10 * USD), 10 * USD);
    assert_eq!(s.contribute(&alice, 1_000 * USD), 490 * USD);
    assert_eq!(s.try_contribute(&alice, USD), Err(Error::ExceedsMaxAmount));
    assert_eq!(s.base.balance(&alice), FUNDS - 2_000 * USD);

    // pending funds are held to the same limits
    let bob = s.account();
    assert_eq!(s.contribute(&bob, 3_000 * USD), 2_000 * USD);
    assert_eq!(s.fundraiser.pending_contribution(&bob), 2_000 * USD);
    assert_eq!(s.base.balance(&bob), FUNDS - 2_000 * USD);
}

#[test]
fn test_max_contributors() {
    let s = setup_with(Params {
        max_count: 2,
        ..Params::default()
    });
    let alice = s.contributor();
    let bob = s.contributor();
    let carol = s.contributor();

    s.contribute(&alice, 100 * USD);
    s.contribute(&bob, 100 * USD);
    assert_eq!(
        s.try_contribute(&carol, 100 * USD),
        Err(Error::MaxContributorsReached)
    );
    // existing contributors may keep adding
    s.contribute(&alice, 100 * USD);
    assert_eq!(s.fundraiser.num_contributors(), 2);

    // whitelisting a third pending account fails as a whole
    let dave = s.account();
    s.contribute(&dave, 100 * USD);
    assert!(s.restrictions.try_whitelist_account(&dave).is_err());
    assert!(!s.restrictions.is_whitelisted(&dave));
    assert_eq!(s.fundraiser.pending_contribution(&dave), 100 * USD);
}

#[test]
fn test_whitelist_changes_need_open_fundraise() {
    let s = setup();
    let alice = s.contributor();
    let bob = s.account();
    s.contribute(&alice, 1_000 * USD);
    s.contribute(&bob, 500 * USD);
    let limits = Limits {
        max_count: 0,
        min_amount: 0,
        max_amount: 0,
    };

    for (time, err) in [(START - 1, Error::NotStarted), (END + 1, Error::Ended)] {
        s.set_time(time);
        assert_eq!(
            s.fundraiser.try_accept_contributor(&bob, &limits),
            Err(Ok(err))
        );
        assert_eq!(s.fundraiser.try_remove_contributor(&alice), Err(Ok(err)));

        assert!(s.restrictions.try_whitelist_account(&bob).is_err());
        assert!(!s.restrictions.is_whitelisted(&bob));
        assert!(s.restrictions.try_un_whitelist_account(&alice).is_err());
        assert!(s.restrictions.is_whitelisted(&alice));
    }

    s.set_time(END);
    let carol = s.contributor();
    s.contribute(&carol, 9_000 * USD);
    assert!(s.fundraiser.is_hardcap_reached());

    assert_eq!(
        s.fundraiser.try_accept_contributor(&bob, &limits),
        Err(Ok(Error::HardCapReached))
    );
    assert_eq!(
        s.fundraiser.try_remove_contributor(&alice),
        Err(Ok(Error::HardCapReached))
    );
    assert!(s.restrictions.try_whitelist_account(&bob).is_err());
    assert!(s.restrictions.try_un_whitelist_account(&alice).is_err());
    assert!(s.restrictions.is_whitelisted(&alice));

    assert_eq!(s.fundraiser.pending_contribution(&bob), 500 * USD);
    assert_eq!(s.fundraiser.qualified_contribution(&alice), 1_000 * USD);
    assert_eq!(s.fundraiser.amount_qualified(), HARD_CAP);
    assert_eq!(s.fundraiser.num_contributors(), 2);
}

#[test]
fn test_contribution_window() {
    let s = setup();
    let alice = s.contributor();

    assert_eq!(s.try_contribute(&alice, 0), Err(Error::ZeroAmount));

    s.set_time(START - 1);
    assert_eq!(s.try_contribute(&alice, USD), Err(Error::NotStarted));

    s.set_time(END);
    s.contribute(&alice, USD);

    s.set_time(END + 1);
    assert_eq!(s.try_contribute(&alice, USD), Err(Error::Ended));

    s.set_time(END);
    s.fundraiser.cancel();
    assert_eq!(s.try_contribute(&alice, USD), Err(Error::Canceled));
    assert_eq!(s.fundraiser.try_cancel(), Err(Ok(Error::Canceled)));
}

#[test]
fn test_fee_gates_conclusion() {
    let s = setup_with(Params {
        fee: 100 * USD,
        ..Params::default()
    });
    s.base_admin.mint(&s.issuer, &(1_000 * USD));
    let alice = s.contributor();
    s.contribute(&alice, 6_000 * USD);
    s.set_time(END);

    assert!(!s.fundraiser.is_fee_paid());
    assert_eq!(
        s.fundraiser.try_conclude_fundraise(&false),
        Err(Ok(Error::FeeNotPaid))
    );

    assert_eq!(s.fundraiser.pay_fee(&(60 * USD)), 60 * USD);
    // only the outstanding part is taken
    assert_eq!(s.fundraiser.pay_fee(&(100 * USD)), 40 * USD);
    assert!(s.fundraiser.is_fee_paid());
    assert_eq!(s.fundraiser.total_fee_paid(), 100 * USD);
    assert_eq!(s.base.balance(&s.issuer), 900 * USD);
    assert_eq!(
        s.fundraiser.try_pay_fee(&USD),
        Err(Ok(Error::FeeAlreadyPaid))
    );

    s.fundraiser.conclude_fundraise(&false);
    assert_eq!(s.base.balance(&s.fee_collector), 100 * USD);
    assert_eq!(s.base.balance(&s.issuer), 900 * USD + 6_000 * USD);
}

#[test]
fn test_cancel_returns_paid_fee() {
    let s = setup_with(Params {
        fee: 100 * USD,
        ..Params::default()
    });
    s.base_admin.mint(&s.issuer, &(1_000 * USD));

    assert_eq!(s.fundraiser.pay_fee(&(40 * USD)), 40 * USD);
    assert_eq!(s.base.balance(&s.issuer), 960 * USD);

    s.fundraiser.cancel();
    assert_eq!(s.base.balance(&s.issuer), 1_000 * USD);
    assert_eq!(s.fundraiser.total_fee_paid(), 0);
    assert!(!s.fundraiser.is_fee_paid());

    assert_eq!(
        s.fundraiser.try_pay_fee(&(60 * USD)),
        Err(Ok(Error::Canceled))
    );
    assert_eq!(s.base.balance(&s.issuer), 1_000 * USD);
    assert_eq!(s.base.balance(&s.fundraiser.address), 0);
    assert_eq!(s.base.balance(&s.fee_collector), 0);
}

#[test]
fn test_conclude_at_fixed_price() {
    let s = setup();
    let alice = s.contributor();
    let bob = s.contributor();
    s.contribute(&alice, 4_000 * USD);
    s.contribute(&bob, 6_000 * USD);

    assert_eq!(
        s.fundraiser.try_claim_tokens(&alice),
        Err(Ok(Error::NotFinished))
    );

    // hard cap reached, no need to wait for the end date
    s.fundraiser.conclude_fundraise(&false);

    assert!(s.fundraiser.is_finished());
    assert!(s.fundraiser.contributions_locked());
    assert_eq!(s.fundraiser.supply(), 10_000 * TOKEN_SCALE);
    assert_eq!(s.token.total_supply(), 10_000 * TOKEN_SCALE);
    assert_eq!(
        s.token.balance_of(&s.fundraiser.address),
        10_000 * TOKEN_SCALE
    );
    assert_eq!(s.base.balance(&s.issuer), HARD_CAP);
    assert_eq!(s.fundraiser.state().amount_withdrawn, HARD_CAP);
    // mint fee paid by the issuer in collateral
    assert_eq!(s.collateral.balance(&s.issuer), COLLATERAL - TOKEN_SCALE);

    assert_eq!(s.fundraiser.claim_tokens(&alice), 4_000 * TOKEN_SCALE);
    assert_eq!(s.token.balance_of(&alice), 4_000 * TOKEN_SCALE);
    assert_eq!(
        s.fundraiser.try_claim_tokens(&alice),
        Err(Ok(Error::NothingToClaim))
    );
    assert_eq!(s.fundraiser.claim_tokens(&bob), 6_000 * TOKEN_SCALE);

    assert_eq!(
        s.fundraiser.try_conclude_fundraise(&false),
        Err(Ok(Error::AlreadyFinished))
    );

    // finished for good: no contributions, no whitelist changes
    let late = s.account();
    assert_eq!(s.try_contribute(&late, USD), Err(Error::AlreadyFinished));
    assert!(s.restrictions.try_whitelist_account(&late).is_err());
    assert!(s.restrictions.try_un_whitelist_account(&alice).is_err());

    assert_eq!(
        s.fundraiser.try_cancel(),
        Err(Ok(Error::CannotCancelWhenFinished))
    );
}

#[test]
fn test_conclude_fixed_supply_and_distribute() {
    let s = setup_with(Params {
        supply: 100_000 * TOKEN_SCALE,
        token_price: 0,
        ..Params::default()
    });
    let alice = s.contributor();
    let bob = s.contributor();
    s.contribute(&alice, 4_000 * USD);
    s.contribute(&bob, 6_000 * USD);

    s.fundraiser.conclude_fundraise(&true);

    // 10,000 USD for 100,000 tokens
    assert_eq!(s.fundraiser.token_price(), USD / 10);
    assert_eq!(s.token.balance_of(&alice), 40_000 * TOKEN_SCALE);
    assert_eq!(s.token.balance_of(&bob), 60_000 * TOKEN_SCALE);
    assert_eq!(s.token.balance_of(&s.fundraiser.address), 0);
    assert_eq!(s.fundraiser.contributors().len(), 2);
    assert_eq!(
        s.fundraiser.try_claim_tokens(&alice),
        Err(Ok(Error::NothingToClaim))
    );
}

#[test]
fn test_last_claimant_takes_rounding_remainder() {
    let supply = 1_000 * TOKEN_SCALE + 1;
    let s = setup_with(Params {
        supply,
        token_price: 0,
        ..Params::default()
    });
    let alice = s.contributor();
    let bob = s.contributor();
    let carol = s.contributor();
    s.contribute(&alice, 3_333 * USD);
    s.contribute(&bob, 3_333 * USD);
    s.contribute(&carol, 3_334 * USD);

    s.fundraiser.conclude_fundraise(&false);

    let share = 3_333 * TOKEN_SCALE / 10;
    assert_eq!(s.fundraiser.claim_tokens(&alice), share);
    assert_eq!(s.fundraiser.claim_tokens(&bob), share);
    // pro-rata would be 333.4 tokens, plus the unit lost to rounding
    assert_eq!(s.fundraiser.claim_tokens(&carol), 3_334 * TOKEN_SCALE / 10 + 1);

    assert_eq!(s.token.balance_of(&s.fundraiser.address), 0);
    let state = s.fundraiser.state();
    assert_eq!(state.tokens_released, supply);
    assert_eq!(state.num_claimed, 3);
}

#[test]
fn test_conclude_preconditions() {
    let s = setup();
    let alice = s.contributor();

    s.contribute(&alice, 1_000 * USD);
    s.set_time(END);
    assert_eq!(
        s.fundraiser.try_conclude_fundraise(&false),
        Err(Ok(Error::SoftCapNotReached))
    );

    s.contribute(&alice, 5_000 * USD);
    s.set_time(END - 1);
    assert_eq!(
        s.fundraiser.try_conclude_fundraise(&false),
        Err(Ok(Error::NotYetEligible))
    );

    s.set_time(END + EXPIRATION + 1);
    assert_eq!(
        s.fundraiser.try_conclude_fundraise(&false),
        Err(Ok(Error::ExpirationPassed))
    );

    // expired without finishing: qualified funds come back
    assert_eq!(s.fundraiser.get_refund(&alice), 6_000 * USD);
    assert_eq!(s.base.balance(&alice), FUNDS);
    assert_eq!(s.fundraiser.amount_qualified(), 0);
    assert_eq!(s.fundraiser.num_contributors(), 0);
}

#[test]
fn test_affiliate_shares() {
    let s = setup();
    let affiliate = Address::generate(&s.env);
    s.affiliates.add_or_update(
        &affiliate,
        &String::from_str(&s.env, "asdf"),
        &(PERCENT_SCALE / 10),
    );

    let alice = s.contributor();
    let bob = s.contributor();
    s.contribute_with(&alice, 1_000 * USD, "asdf");
    s.contribute_with(&bob, 5_000 * USD, "unknown");

    assert_eq!(s.fundraiser.contributor_affiliate(&alice), Some(affiliate.clone()));
    assert_eq!(s.fundraiser.contributor_affiliate(&bob), None);
    assert_eq!(s.fundraiser.contributor_share(&alice), 100 * USD);
    assert_eq!(s.fundraiser.affiliate_share(&affiliate), 100 * USD);

    assert_eq!(
        s.fundraiser.try_claim_referrals(&affiliate),
        Err(Ok(Error::NotFinished))
    );

    s.set_time(END);
    s.fundraiser.conclude_fundraise(&false);
    // referral share stays behind for the affiliate
    assert_eq!(s.base.balance(&s.issuer), 5_900 * USD);

    assert_eq!(s.fundraiser.claim_referrals(&affiliate), 100 * USD);
    assert_eq!(s.base.balance(&affiliate), 100 * USD);
    assert_eq!(s.fundraiser.affiliate_share(&affiliate), 0);
    assert_eq!(
        s.fundraiser.try_claim_referrals(&affiliate),
        Err(Ok(Error::NothingToClaim))
    );
    assert_eq!(s.base.balance(&s.fundraiser.address), 0);
}

#[test]
fn test_removal_clears_referral_share() {
    let s = setup();
    let affiliate = Address::generate(&s.env);
    s.affiliates.add_or_update(
        &affiliate,
        &String::from_str(&s.env, "asdf"),
        &(PERCENT_SCALE / 10),
    );

    let alice = s.contributor();
    s.contribute_with(&alice, 1_000 * USD, "asdf");
    assert_eq!(s.fundraiser.affiliate_share(&affiliate), 100 * USD);

    s.restrictions.un_whitelist_account(&alice);
    assert_eq!(s.fundraiser.affiliate_share(&affiliate), 0);
    assert_eq!(s.fundraiser.contributor_share(&alice), 0);
    assert_eq!(s.fundraiser.contributor_affiliate(&alice), None);
    assert_eq!(s.fundraiser.state().total_affiliate_shares, 0);
    assert_eq!(s.fundraiser.pending_contribution(&alice), 1_000 * USD);
}

#[test]
fn test_contributions_are_conserved() {
    let s = setup();
    let alice = s.contributor();
    let bob = s.account();
    let carol = s.contributor();

    s.contribute(&alice, 9_000 * USD);
    s.contribute(&bob, 500 * USD);
    s.contribute(&carol, 3_000 * USD);
    s.fundraiser.get_refund(&bob);

    let state = s.fundraiser.state();
    assert_eq!(state.total_contributed, 12_500 * USD);
    assert_eq!(
        state.total_contributed,
        state.amount_qualified + state.amount_pending + state.amount_refunded
    );
    assert_eq!(
        s.base.balance(&s.fundraiser.address),
        state.amount_qualified + state.amount_pending
    );
}

#[test]
fn test_cancel_refunds_everything() {
    let s = setup();
    let alice = s.contributor();
    let bob = s.account();
    s.contribute(&alice, 2_000 * USD);
    s.contribute(&bob, 300 * USD);

    // qualified funds stay while the fundraise runs
    assert_eq!(
        s.fundraiser.try_get_refund(&alice),
        Err(Ok(Error::NothingToRefund))
    );

    s.fundraiser.cancel();
    assert_eq!(s.fundraiser.get_refund(&alice), 2_000 * USD);
    assert_eq!(s.fundraiser.get_refund(&bob), 300 * USD);
    assert_eq!(
        s.fundraiser.try_get_refund(&alice),
        Err(Ok(Error::NothingToRefund))
    );
    assert_eq!(s.fundraiser.num_contributors(), 0);
    assert_eq!(s.base.balance(&s.fundraiser.address), 0);
    assert_eq!(
        s.fundraiser.try_conclude_fundraise(&false),
        Err(Ok(Error::Canceled))
    );
}

#[test]
fn test_pending_refund_after_conclusion() {
    let s = setup_with(Params {
        locked: true,
        ..Params::default()
    });
    let alice = s.contributor();
    let bob = s.account();
    s.contribute(&alice, 6_000 * USD);
    s.contribute(&bob, 500 * USD);

    s.set_time(END);
    assert_eq!(
        s.fundraiser.try_get_refund(&bob),
        Err(Ok(Error::ContributionsLocked))
    );

    s.fundraiser.conclude_fundraise(&false);
    assert_eq!(s.base.balance(&s.issuer), 6_000 * USD);

    // pending funds never qualified and come back in full
    assert_eq!(s.fundraiser.get_refund(&bob), 500 * USD);
    assert_eq!(s.base.balance(&bob), FUNDS);
    assert_eq!(s.fundraiser.amount_pending(), 0);
    assert_eq!(
        s.fundraiser.try_get_refund(&bob),
        Err(Ok(Error::NothingToRefund))
    );
    assert_eq!(
        s.fundraiser.try_get_refund(&alice),
        Err(Ok(Error::NothingToRefund))
    );
    assert_eq!(s.base.balance(&s.fundraiser.address), 0);
}

#[test]
fn test_locked_pending_funds() {
    let s = setup_with(Params {
        locked: true,
        ..Params::default()
    });
    let bob = s.account();
    s.contribute(&bob, 500 * USD);

    assert_eq!(
        s.fundraiser.try_get_refund(&bob),
        Err(Ok(Error::ContributionsLocked))
    );

    s.set_time(END + 1);
    assert_eq!(s.fundraiser.get_refund(&bob), 500 * USD);
    assert_eq!(s.fundraiser.amount_pending(), 0);
}
