// Circuit breaker and volatility tracking
//
// The breaker trips on either too many >5% moves inside one volatility
// window, or a single trade whose price impact exceeds twice the
// configured limit. It clears itself on the first call after
// `circuit_breaker_duration` has elapsed.

use soroban_sdk::{Env, Vec};

use narwhal_curve::relative_change_bps;

use crate::error::GuardError;
use crate::types::{CircuitBreakerConfig, PricePoint, ProtectionWindow};

/// Recent prices kept in the window
pub const MAX_RECENT_PRICES: u32 = 20;

/// A price change above this counts as a volatility move (5%)
pub const VOLATILITY_MOVE_BPS: i128 = 500;

// ============================================================
// BREAKER STATE
// ============================================================

/// Fails while the breaker is tripped, self-resetting once it has expired
///
/// # Returns
/// `Ok(true)` if an expired trip was cleared by this call
pub fn check(
    env: &Env,
    config: &CircuitBreakerConfig,
    window: &mut ProtectionWindow,
    now: u64,
) -> Result<bool, GuardError> {
    if !window.is_tripped() {
        return Ok(false);
    }

    let expires_at = window
        .circuit_breaker_triggered_at
        .saturating_add(config.circuit_breaker_duration);
    if now < expires_at {
        return Err(GuardError::CircuitBreakerActive);
    }

    reset(env, window, now);
    Ok(true)
}

pub fn trip(window: &mut ProtectionWindow, now: u64) {
    // 0 is reserved for "not tripped"
    window.circuit_breaker_triggered_at = now.max(1);
}

/// Clears the trip, the move counter and the recorded prices
pub fn reset(env: &Env, window: &mut ProtectionWindow, now: u64) {
    window.circuit_breaker_triggered_at = 0;
    window.volatility_move_count = 0;
    window.last_volatility_reset = now;
    window.recent_prices = Vec::new(env);
}

// ============================================================
// PRICE IMPACT
// ============================================================

/// Outcome of the single-trade price impact check
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImpactVerdict {
    Ok,
    /// Above `max_price_impact`
    Warn,
    /// Above twice `max_price_impact`; the trade must not execute
    Trip,
}

/// Classifies a trade's price impact
///
/// Trades with a quote value below `impact_check_floor` are never checked.
pub fn assess_impact(config: &CircuitBreakerConfig, quote_value: i128, impact_bps: i128) -> ImpactVerdict {
    if quote_value < config.impact_check_floor {
        return ImpactVerdict::Ok;
    }

    let limit = config.max_price_impact as i128;
    if impact_bps > limit * 2 {
        ImpactVerdict::Trip
    } else if impact_bps > limit {
        ImpactVerdict::Warn
    } else {
        ImpactVerdict::Ok
    }
}

// ============================================================
// VOLATILITY
// ============================================================

/// Records a post-trade price and counts volatility moves
///
/// Rolls the window over first when it has aged past `volatility_window`.
///
/// # Returns
/// `true` if this price tripped the breaker
pub fn record_price(
    env: &Env,
    config: &CircuitBreakerConfig,
    window: &mut ProtectionWindow,
    price: i128,
    now: u64,
) -> bool {
    if now.saturating_sub(window.last_volatility_reset) > config.volatility_window {
        window.recent_prices = Vec::new(env);
        window.volatility_move_count = 0;
        window.last_volatility_reset = now;
    }

    if let Some(last) = window.recent_prices.last() {
        // A price too large to compare is treated as a move
        let change = relative_change_bps(env, last.price, price).unwrap_or(i128::MAX);
        if change > VOLATILITY_MOVE_BPS {
            window.volatility_move_count = window.volatility_move_count.saturating_add(1);
        }
    }

    window.recent_prices.push_back(PricePoint {
        price,
        timestamp: now,
    });
    while window.recent_prices.len() > MAX_RECENT_PRICES {
        window.recent_prices.pop_front();
    }

    if window.volatility_move_count >= config.max_volatility_moves && !window.is_tripped() {
        trip(window, now);
        return true;
    }

    false
}
