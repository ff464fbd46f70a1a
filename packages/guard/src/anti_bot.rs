// Anti-bot checks: blacklist, relay filter, early-buy cap and buy cooldown

use crate::error::GuardError;
use crate::types::{AntiBotConfig, TraderState};

/// How the buy reached the contract
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelayStatus {
    /// The trader invoked the contract directly
    Direct,
    /// Forwarded by a relayer the authority trusts
    Trusted,
    /// Forwarded by any other relayer
    Untrusted,
}

/// Validates a buy against the anti-bot rules and records the buy time
///
/// Checks run in order: blacklist, relay filter (skipped for whitelisted
/// traders), early-buy cap inside the launch window, cooldown. On success
/// `state.last_buy_time` is set to `now` unless the trader is whitelisted.
///
/// # Arguments
/// * `whitelisted` - Effective whitelist status (explicit, creator or authority)
/// * `quote_amount` - Quote the trader intends to spend
pub fn check_buy(
    config: &AntiBotConfig,
    state: &mut TraderState,
    whitelisted: bool,
    relay: RelayStatus,
    quote_amount: i128,
    launch_time: u64,
    now: u64,
) -> Result<(), GuardError> {
    if state.blacklisted {
        return Err(GuardError::Blacklisted);
    }

    if whitelisted {
        return Ok(());
    }

    if relay == RelayStatus::Untrusted {
        return Err(GuardError::RelayedCallRejected);
    }

    if in_launch_window(config, launch_time, now) && quote_amount > config.max_buy_amount_early {
        return Err(GuardError::EarlyBuyLimitExceeded);
    }

    if state.last_buy_time != 0
        && now < state.last_buy_time.saturating_add(config.cooldown_period)
    {
        return Err(GuardError::CooldownActive);
    }

    state.last_buy_time = now;
    Ok(())
}

/// Sells only honour the blacklist
pub fn check_sell(state: &TraderState) -> Result<(), GuardError> {
    if state.blacklisted {
        return Err(GuardError::Blacklisted);
    }
    Ok(())
}

/// True while `now` is inside the launch protection window
#[inline]
pub fn in_launch_window(config: &AntiBotConfig, launch_time: u64, now: u64) -> bool {
    now < launch_time.saturating_add(config.anti_bot_duration)
}
