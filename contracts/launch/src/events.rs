// Events module for the launch contract
// All events use compact names to reduce storage costs

use soroban_sdk::{Address, Env, Symbol};

use narwhal_guard::WhaleIntent;

use crate::types::{FeeConfig, GraduationRecord, TradeReceipt};

// ============================================================
// LIFECYCLE
// ============================================================

/// Emitted when the instance is initialized
/// Topics: ("Deployed",)
/// Data: (token, quote_token, creator, creator_reserve)
pub fn emit_deployed(env: &Env, token: &Address, quote_token: &Address, creator: &Address, creator_reserve: i128) {
    env.events().publish(
        (Symbol::new(env, "Deployed"),),
        (token.clone(), quote_token.clone(), creator.clone(), creator_reserve),
    );
}

/// Topics: ("Graduated",)
/// Data: GraduationRecord
pub fn emit_graduated(env: &Env, record: &GraduationRecord) {
    env.events()
        .publish((Symbol::new(env, "Graduated"),), record.clone());
}

/// Emitted when the market rejects the handoff and state is rolled back
/// Topics: ("GradFailed",)
/// Data: (quote_amount, token_amount, timestamp)
pub fn emit_graduation_failed(env: &Env, quote_amount: i128, token_amount: i128, timestamp: u64) {
    env.events().publish(
        (Symbol::new(env, "GradFailed"),),
        (quote_amount, token_amount, timestamp),
    );
}

// ============================================================
// TRADING
// ============================================================

/// Topics: ("Trade", is_buy)
/// Data: TradeReceipt
pub fn emit_trade(env: &Env, receipt: &TradeReceipt) {
    env.events().publish(
        (Symbol::new(env, "Trade"), receipt.is_buy),
        receipt.clone(),
    );
}

/// Topics: ("CBTripped",)
/// Data: (timestamp, volatility_move_count, impact_bps)
///
/// `impact_bps` is 0 for trips caused by volatility or the authority.
pub fn emit_breaker_tripped(env: &Env, timestamp: u64, move_count: u32, impact_bps: i128) {
    env.events().publish(
        (Symbol::new(env, "CBTripped"),),
        (timestamp, move_count, impact_bps),
    );
}

/// Topics: ("CBReset",)
/// Data: timestamp
pub fn emit_breaker_reset(env: &Env, timestamp: u64) {
    env.events()
        .publish((Symbol::new(env, "CBReset"),), timestamp);
}

/// Topics: ("ImpactWarn", trader)
/// Data: (quote_value, impact_bps)
pub fn emit_impact_warning(env: &Env, trader: &Address, quote_value: i128, impact_bps: i128) {
    env.events().publish(
        (Symbol::new(env, "ImpactWarn"), trader.clone()),
        (quote_value, impact_bps),
    );
}

// ============================================================
// WHALE INTENTS
// ============================================================

/// Topics: ("WhaleReg", trader)
/// Data: WhaleIntent
pub fn emit_whale_registered(env: &Env, trader: &Address, intent: &WhaleIntent) {
    env.events().publish(
        (Symbol::new(env, "WhaleReg"), trader.clone()),
        intent.clone(),
    );
}

/// Topics: ("WhaleExec", trader)
/// Data: WhaleIntent
pub fn emit_whale_executed(env: &Env, trader: &Address, intent: &WhaleIntent) {
    env.events().publish(
        (Symbol::new(env, "WhaleExec"), trader.clone()),
        intent.clone(),
    );
}

/// Topics: ("WhaleCancel", trader)
/// Data: amount
pub fn emit_whale_cancelled(env: &Env, trader: &Address, amount: i128) {
    env.events().publish(
        (Symbol::new(env, "WhaleCancel"), trader.clone()),
        amount,
    );
}

// ============================================================
// ADMIN
// ============================================================

/// Topics: ("Blacklist", trader)
/// Data: blacklisted
pub fn emit_blacklist_updated(env: &Env, trader: &Address, blacklisted: bool) {
    env.events().publish(
        (Symbol::new(env, "Blacklist"), trader.clone()),
        blacklisted,
    );
}

/// Topics: ("Whitelist", trader)
/// Data: whitelisted
pub fn emit_whitelist_updated(env: &Env, trader: &Address, whitelisted: bool) {
    env.events().publish(
        (Symbol::new(env, "Whitelist"), trader.clone()),
        whitelisted,
    );
}

/// Topics: ("Relayer", relayer)
/// Data: trusted
pub fn emit_relayer_updated(env: &Env, relayer: &Address, trusted: bool) {
    env.events().publish(
        (Symbol::new(env, "Relayer"), relayer.clone()),
        trusted,
    );
}

/// Topics: ("Paused",) or ("Unpaused",)
/// Data: authority
pub fn emit_pause_changed(env: &Env, authority: &Address, paused: bool) {
    let name = if paused { "Paused" } else { "Unpaused" };
    env.events()
        .publish((Symbol::new(env, name),), authority.clone());
}

/// Topics: ("EmergencyWd",)
/// Data: (to, amount)
pub fn emit_emergency_withdraw(env: &Env, to: &Address, amount: i128) {
    env.events().publish(
        (Symbol::new(env, "EmergencyWd"),),
        (to.clone(), amount),
    );
}

/// Topics: ("FeeUpdate",)
/// Data: (buy_fee, sell_fee, max_fee)
pub fn emit_fees_updated(env: &Env, fees: &FeeConfig) {
    env.events().publish(
        (Symbol::new(env, "FeeUpdate"),),
        (fees.buy_fee, fees.sell_fee, fees.max_fee),
    );
}

/// Topics: ("AuthChanged",)
/// Data: (old_authority, new_authority)
pub fn emit_authority_changed(env: &Env, old: &Address, new: &Address) {
    env.events().publish(
        (Symbol::new(env, "AuthChanged"),),
        (old.clone(), new.clone()),
    );
}
