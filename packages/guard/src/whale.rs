// Two-phase whale intent protocol
//
//   NoIntent --(attempt >= threshold)--> Pending --(match after delay)--> Executed
//                                          |
//                                          +--(cancel)--> NoIntent

use crate::error::GuardError;
use crate::types::{TraderState, WhaleIntent, WhaleLimitConfig};

/// What the caller must do with a trade after the whale check
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WhaleGate {
    /// Sub-threshold or whitelisted, trade normally
    Bypass,
    /// No intent on file; store this one and do not trade
    Register(WhaleIntent),
    /// Intent matched and ripe; trade, then delete the stored intent
    Execute(WhaleIntent),
}

/// Routes a trade through the whale protocol
///
/// # Arguments
/// * `existing` - The trader's stored intent, if any
/// * `amount` - The caller's input amount (quote for buys, tokens for sells)
/// * `quote_value` - Quote value of the trade, compared against the threshold
/// * `is_buy` - Trade direction
///
/// # Returns
/// The gate to apply, or an error leaving any stored intent untouched
pub fn evaluate(
    config: &WhaleLimitConfig,
    existing: Option<WhaleIntent>,
    trader: &TraderState,
    whitelisted: bool,
    amount: i128,
    quote_value: i128,
    is_buy: bool,
    now: u64,
) -> Result<WhaleGate, GuardError> {
    if whitelisted || quote_value < config.whale_threshold {
        return Ok(WhaleGate::Bypass);
    }

    if trader.last_whale_trade_time != 0
        && now < trader.last_whale_trade_time.saturating_add(config.whale_delay)
    {
        return Err(GuardError::WhaleCooldownActive);
    }

    let intent = match existing {
        None => {
            return Ok(WhaleGate::Register(WhaleIntent {
                amount,
                intent_time: now,
                is_buy,
                executed: false,
            }));
        }
        Some(intent) => intent,
    };

    if intent.is_buy != is_buy || intent.amount != amount || intent.executed {
        return Err(GuardError::WhaleIntentMismatch);
    }

    if now < intent.intent_time.saturating_add(config.whale_delay) {
        return Err(GuardError::WhaleIntentNotReady);
    }

    Ok(WhaleGate::Execute(WhaleIntent {
        executed: true,
        ..intent
    }))
}

/// Starts the cooldown between whale trades
#[inline]
pub fn record_execution(trader: &mut TraderState, now: u64) {
    trader.last_whale_trade_time = now;
}
