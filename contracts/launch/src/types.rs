use soroban_sdk::{contracttype, Address};

use narwhal_curve::CurvePoint;
use narwhal_guard::{AntiBotConfig, CircuitBreakerConfig, WhaleIntent, WhaleLimitConfig};

// ============================================================
// CONFIGURATION
// ============================================================

/// Bonding curve shape, fixed at initialization
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CurveConfig {
    pub virtual_quote: i128,
    pub virtual_tokens: i128,
    /// Minted to the creator at initialization
    pub creator_reserve: i128,
    /// Minted to the market at graduation
    pub liquidity_supply: i128,
    /// Maximum tokens the curve may sell
    pub curve_supply: i128,
    pub max_supply: i128,
    /// real_quote_reserves at or above this triggers graduation
    pub graduation_threshold: i128,
}

/// Trading fees (bps)
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeeConfig {
    pub buy_fee: u32,
    pub sell_fee: u32,
    pub max_fee: u32,
}

/// Instance configuration
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LaunchConfig {
    pub authority: Address,
    pub creator: Address,
    /// Traded token; this instance must be its admin
    pub token: Address,
    pub quote_token: Address,
    /// Receives liquidity at graduation
    pub market: Address,
    /// Notified after graduation, if set
    pub registry: Option<Address>,
    pub fee_recipient: Address,
    pub fees: FeeConfig,
    pub anti_bot: AntiBotConfig,
    pub breaker: CircuitBreakerConfig,
    pub whale: WhaleLimitConfig,
}

/// Parameters for initialize (bundled to stay within the argument limit)
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LaunchParams {
    pub authority: Address,
    pub creator: Address,
    pub token: Address,
    pub quote_token: Address,
    pub market: Address,
    pub registry: Option<Address>,
    pub fee_recipient: Address,
    pub curve: CurveConfig,
    pub fees: FeeConfig,
    pub anti_bot: AntiBotConfig,
    pub breaker: CircuitBreakerConfig,
    pub whale: WhaleLimitConfig,
}

// ============================================================
// STATE
// ============================================================

/// Mutable curve reserves
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ReserveState {
    pub real_quote_reserves: i128,
    pub real_token_supply: i128,
    pub has_graduated: bool,
    /// 0 if graduation was never attempted
    pub last_graduation_attempt: u64,
}

impl ReserveState {
    pub fn point(&self, curve: &CurveConfig) -> CurvePoint {
        CurvePoint::new(
            curve.virtual_quote,
            curve.virtual_tokens,
            self.real_quote_reserves,
            self.real_token_supply,
        )
    }

    pub fn apply(&mut self, point: &CurvePoint) {
        self.real_quote_reserves = point.real_quote_reserves;
        self.real_token_supply = point.real_token_supply;
    }
}

/// Completed graduation
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GraduationRecord {
    pub pool: Address,
    pub tokens_used: i128,
    pub quote_used: i128,
    pub liquidity_units: i128,
    pub final_price: i128,
    pub timestamp: u64,
}

// ============================================================
// RESULTS
// ============================================================

/// Executed trade
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TradeReceipt {
    pub is_buy: bool,
    pub trader: Address,
    /// Quote paid in (buy) or paid out net of fee (sell)
    pub quote_amount: i128,
    /// Tokens issued (buy) or burned (sell)
    pub token_amount: i128,
    pub fee: i128,
    pub price_after: i128,
    pub reserves_after: ReserveState,
    pub timestamp: u64,
    /// True if this trade triggered a successful graduation
    pub graduated: bool,
}

/// Result of a buy or sell call
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TradeOutcome {
    Executed(TradeReceipt),
    /// Whale-sized order; retry the same order after whale_delay
    IntentRegistered(WhaleIntent),
    /// The order's price impact tripped the breaker; nothing was traded
    CircuitBreakerTripped(u32),
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BuyPreview {
    pub tokens_out: i128,
    pub fee: i128,
    pub price_after: i128,
    pub price_impact_bps: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SellPreview {
    pub quote_out: i128,
    pub fee: i128,
    pub price_after: i128,
    pub price_impact_bps: i128,
}

/// Returned by the market's deploy_liquidity
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeployedLiquidity {
    pub quote_used: i128,
    pub tokens_used: i128,
    pub liquidity_units: i128,
    pub pool: Address,
}
