use soroban_sdk::{contracttype, Env, Vec};

// ============================================================
// CONFIGURATION
// ============================================================

/// Anti-bot limits applied to buys
#[contracttype]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AntiBotConfig {
    /// Seconds after launch during which early-buy caps apply
    pub anti_bot_duration: u64,
    /// Largest quote amount a buy may spend inside the launch window
    pub max_buy_amount_early: i128,
    /// Max wallet as a share of the curve supply (bps)
    pub max_wallet_percentage: u32,
    /// Seconds a trader must wait between buys
    pub cooldown_period: u64,
    /// Dust floor for buys (quote units)
    pub min_buy_amount: i128,
}

/// Circuit breaker and volatility tracking
#[contracttype]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CircuitBreakerConfig {
    /// Single-trade price impact that logs a warning (bps); twice this trips
    pub max_price_impact: u32,
    /// Seconds covered by one volatility window
    pub volatility_window: u64,
    /// Number of >5% moves inside a window that trips the breaker
    pub max_volatility_moves: u32,
    /// Seconds the breaker stays tripped
    pub circuit_breaker_duration: u64,
    /// Trades below this quote value skip the price impact check
    pub impact_check_floor: i128,
}

/// Whale limits
#[contracttype]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WhaleLimitConfig {
    /// Quote value at or above which a trade needs a registered intent
    pub whale_threshold: i128,
    /// Seconds between intent and execution, and between whale trades
    pub whale_delay: u64,
    /// Largest quote amount a non-whitelisted buy may spend
    pub max_trade_size: i128,
    /// Largest sell as a share of the circulating curve supply (bps)
    pub max_sell_percentage: u32,
}

// ============================================================
// STATE
// ============================================================

/// A pending two-phase whale order
#[contracttype]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WhaleIntent {
    /// Input amount: quote for buys, tokens for sells
    pub amount: i128,
    pub intent_time: u64,
    pub is_buy: bool,
    pub executed: bool,
}

/// Recorded post-trade price
#[contracttype]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PricePoint {
    pub price: i128,
    pub timestamp: u64,
}

/// Per-instance launch and volatility window
#[contracttype]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProtectionWindow {
    pub launch_time: u64,
    /// 0 while the breaker is not tripped
    pub circuit_breaker_triggered_at: u64,
    pub volatility_move_count: u32,
    pub last_volatility_reset: u64,
    pub recent_prices: Vec<PricePoint>,
}

impl ProtectionWindow {
    pub fn new(env: &Env, launch_time: u64) -> Self {
        Self {
            launch_time,
            circuit_breaker_triggered_at: 0,
            volatility_move_count: 0,
            last_volatility_reset: launch_time,
            recent_prices: Vec::new(env),
        }
    }

    pub fn is_tripped(&self) -> bool {
        self.circuit_breaker_triggered_at != 0
    }
}

/// Per-instance, per-trader protection state
#[contracttype]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TraderState {
    /// 0 if the trader never bought
    pub last_buy_time: u64,
    /// 0 if the trader never executed a whale trade
    pub last_whale_trade_time: u64,
    pub blacklisted: bool,
    pub whitelisted: bool,
}
