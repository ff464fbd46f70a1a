#![allow(dead_code)]

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype,
    testutils::{Address as _, Ledger},
    token, Address, Env,
};
use narwhal_launch::*;

// Test constants
pub const T0: u64 = 1_700_000_000;
pub const QUOTE: i128 = 1_000_000; // 6 decimals
pub const TOKEN: i128 = 1_000_000_000_000_000_000;

/// Impact floor high enough that no test trade is checked
pub const IMPACT_CHECK_OFF: i128 = 1_000_000_000 * QUOTE;

pub struct TestLaunch<'a> {
    pub client: NarwhalLaunchClient<'a>,
    pub id: Address,
    pub authority: Address,
    pub creator: Address,
    pub fee_recipient: Address,
    pub token: Address,
    pub quote_token: Address,
    pub market: Address,
    pub registry: Address,
}

impl TestLaunch<'_> {
    pub fn token_client<'b>(&self, env: &'b Env) -> token::Client<'b> {
        token::Client::new(env, &self.token)
    }

    pub fn quote_client<'b>(&self, env: &'b Env) -> token::Client<'b> {
        token::Client::new(env, &self.quote_token)
    }
}

// ============================================================
// SETUP
// ============================================================

pub fn default_curve() -> CurveConfig {
    CurveConfig {
        virtual_quote: 2_000 * QUOTE,
        virtual_tokens: 6_000_000 * TOKEN,
        creator_reserve: 1_000_000 * TOKEN,
        liquidity_supply: 2_000_000 * TOKEN,
        curve_supply: 9_000_000 * TOKEN,
        max_supply: 12_000_000 * TOKEN,
        graduation_threshold: 10_000 * QUOTE,
    }
}

pub fn default_params(
    authority: &Address,
    creator: &Address,
    token: &Address,
    quote_token: &Address,
    market: &Address,
    registry: &Address,
    fee_recipient: &Address,
) -> LaunchParams {
    LaunchParams {
        authority: authority.clone(),
        creator: creator.clone(),
        token: token.clone(),
        quote_token: quote_token.clone(),
        market: market.clone(),
        registry: Some(registry.clone()),
        fee_recipient: fee_recipient.clone(),
        curve: default_curve(),
        fees: FeeConfig {
            buy_fee: 100,
            sell_fee: 100,
            max_fee: 500,
        },
        anti_bot: AntiBotConfig {
            anti_bot_duration: 300,
            max_buy_amount_early: 200 * QUOTE,
            max_wallet_percentage: 2_000,
            cooldown_period: 30,
            min_buy_amount: QUOTE,
        },
        breaker: CircuitBreakerConfig {
            max_price_impact: 5_000,
            volatility_window: 3_600,
            max_volatility_moves: 50,
            circuit_breaker_duration: 1_800,
            impact_check_floor: IMPACT_CHECK_OFF,
        },
        whale: WhaleLimitConfig {
            whale_threshold: 800 * QUOTE,
            whale_delay: 600,
            max_trade_size: 1_000 * QUOTE,
            max_sell_percentage: 2_000,
        },
    }
}

/// Deploy tokens, collaborators and an uninitialized launch
///
/// The launch is already admin of its token.
pub fn prepare(env: &Env) -> (TestLaunch<'_>, LaunchParams) {
    env.ledger().set_timestamp(T0);

    let authority = Address::generate(env);
    let creator = Address::generate(env);
    let fee_recipient = Address::generate(env);
    let token = create_token(env, &authority);
    let quote_token = create_token(env, &authority);
    let market = env.register(MockMarket, ());
    let registry = env.register(MockRegistry, ());

    let id = env.register(NarwhalLaunch, ());
    let client = NarwhalLaunchClient::new(env, &id);
    token::StellarAssetClient::new(env, &token).set_admin(&id);

    let params = default_params(
        &authority,
        &creator,
        &token,
        &quote_token,
        &market,
        &registry,
        &fee_recipient,
    );

    let launch = TestLaunch {
        client,
        id,
        authority,
        creator,
        fee_recipient,
        token,
        quote_token,
        market,
        registry,
    };
    (launch, params)
}

/// Setup launch with default parameters
pub fn setup(env: &Env) -> TestLaunch<'_> {
    setup_with(env, |_| {})
}

/// Setup launch with parameters adjusted by `customize`
pub fn setup_with(env: &Env, customize: impl FnOnce(&mut LaunchParams)) -> TestLaunch<'_> {
    let (mut launch, mut params) = prepare(env);
    customize(&mut params);
    launch.market = params.market.clone();
    launch.client.initialize(&params);
    launch
}

/// Create a test token
pub fn create_token(env: &Env, admin: &Address) -> Address {
    let token_id = env.register_stellar_asset_contract_v2(admin.clone());
    token_id.address()
}

/// Mint quote to a trader
pub fn fund(env: &Env, launch: &TestLaunch, to: &Address, amount: i128) {
    token::StellarAssetClient::new(env, &launch.quote_token).mint(to, &amount);
}

/// New ordinary trader
///
/// Generated addresses are contract addresses, which the launch treats as
/// intermediaries; listing them as trusted lets them trade like accounts.
pub fn trader(env: &Env, launch: &TestLaunch) -> Address {
    let trader = Address::generate(env);
    launch.client.set_trusted_relayer(&launch.authority, &trader, &true);
    trader
}

/// New trader holding `amount` quote
pub fn funded_trader(env: &Env, launch: &TestLaunch, amount: i128) -> Address {
    let trader = trader(env, launch);
    fund(env, launch, &trader, amount);
    trader
}

pub fn advance(env: &Env, seconds: u64) {
    let now = env.ledger().timestamp();
    env.ledger().set_timestamp(now + seconds);
}

/// Seconds past the anti-bot launch window
pub fn skip_launch_window(env: &Env) {
    advance(env, 301);
}

/// Direct buy that must execute
pub fn buy(launch: &TestLaunch, trader: &Address, quote_amount: i128) -> TradeReceipt {
    match launch.client.buy(trader, &None, &quote_amount, &0) {
        TradeOutcome::Executed(receipt) => receipt,
        other => panic!("buy did not execute: {:?}", other),
    }
}

/// Sell that must execute
pub fn sell(launch: &TestLaunch, trader: &Address, tokens_in: i128) -> TradeReceipt {
    match launch.client.sell(trader, &tokens_in, &0) {
        TradeOutcome::Executed(receipt) => receipt,
        other => panic!("sell did not execute: {:?}", other),
    }
}

// ============================================================
// MOCK COLLABORATORS
// ============================================================

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum MockError {
    Refused = 1,
}

#[contracttype]
pub enum MockKey {
    Failing,
    Skimming,
    Calls,
    Target,
}

/// Market that pulls the approved amounts and reports them all as used
#[contract]
pub struct MockMarket;

#[contractimpl]
impl MockMarket {
    pub fn set_failing(env: Env, failing: bool) {
        env.storage().instance().set(&MockKey::Failing, &failing);
    }

    /// Pull everything but report only half the tokens as used
    pub fn set_skimming(env: Env, skimming: bool) {
        env.storage().instance().set(&MockKey::Skimming, &skimming);
    }

    pub fn deploy_liquidity(
        env: Env,
        provider: Address,
        _recipient: Address,
        token: Address,
        quote_token: Address,
        token_amount: i128,
        quote_amount: i128,
        _min_token_amount: i128,
        _min_quote_amount: i128,
        _deadline: u64,
    ) -> Result<DeployedLiquidity, MockError> {
        let failing: bool = env
            .storage()
            .instance()
            .get(&MockKey::Failing)
            .unwrap_or(false);
        if failing {
            return Err(MockError::Refused);
        }

        let mut deployed = pull_liquidity(&env, &provider, &token, &quote_token, token_amount, quote_amount);
        let skimming: bool = env
            .storage()
            .instance()
            .get(&MockKey::Skimming)
            .unwrap_or(false);
        if skimming {
            deployed.tokens_used = token_amount / 2;
        }
        Ok(deployed)
    }
}

pub use reentrant::{ReentrantMarket, ReentrantMarketClient};

mod reentrant {
    use super::*;

    /// Market that tries to buy from the launch while receiving liquidity
    #[contract]
    pub struct ReentrantMarket;

    #[contractimpl]
    impl ReentrantMarket {
        pub fn set_target(env: Env, launch: Address, trader: Address) {
            env.storage().instance().set(&MockKey::Target, &(launch, trader));
        }

        pub fn deploy_liquidity(
            env: Env,
            provider: Address,
            _recipient: Address,
            token: Address,
            quote_token: Address,
            token_amount: i128,
            quote_amount: i128,
            _min_token_amount: i128,
            _min_quote_amount: i128,
            _deadline: u64,
        ) -> Result<DeployedLiquidity, MockError> {
            let (launch, trader): (Address, Address) = env
                .storage()
                .instance()
                .get(&MockKey::Target)
                .ok_or(MockError::Refused)?;

            let reentered = NarwhalLaunchClient::new(&env, &launch).try_buy(&trader, &None, &(10 * QUOTE), &0);
            if reentered.is_err() {
                return Err(MockError::Refused);
            }
            Ok(pull_liquidity(&env, &provider, &token, &quote_token, token_amount, quote_amount))
        }
    }
}

pub(crate) fn pull_liquidity(
    env: &Env,
    provider: &Address,
    token: &Address,
    quote_token: &Address,
    token_amount: i128,
    quote_amount: i128,
) -> DeployedLiquidity {
    let this = env.current_contract_address();
    token::Client::new(env, token).transfer_from(&this, provider, &this, &token_amount);
    token::Client::new(env, quote_token).transfer_from(&this, provider, &this, &quote_amount);

    DeployedLiquidity {
        quote_used: quote_amount,
        tokens_used: token_amount,
        liquidity_units: 1_000,
        pool: this,
    }
}

/// Contract that buys on its own behalf, as a bot wrapper would
#[contract]
pub struct Intermediary;

#[contractimpl]
impl Intermediary {
    pub fn forward_buy(env: Env, launch: Address, quote_amount: i128) -> bool {
        let this = env.current_contract_address();
        let outcome = NarwhalLaunchClient::new(&env, &launch).try_buy(&this, &None, &quote_amount, &0);
        matches!(outcome, Ok(Ok(TradeOutcome::Executed(_))))
    }
}

/// Registry that counts graduation notices
#[contract]
pub struct MockRegistry;

#[contractimpl]
impl MockRegistry {
    pub fn on_graduated(env: Env, _instance: Address, _pool: Address) {
        let calls: u32 = env.storage().instance().get(&MockKey::Calls).unwrap_or(0);
        env.storage().instance().set(&MockKey::Calls, &(calls + 1));
    }

    pub fn calls(env: Env) -> u32 {
        env.storage().instance().get(&MockKey::Calls).unwrap_or(0)
    }
}
