// Storage module for the launch contract

use soroban_sdk::{contracttype, Address, Env};

use narwhal_guard::{ProtectionWindow, TraderState, WhaleIntent};

use crate::error::LaunchError;
use crate::types::{CurveConfig, GraduationRecord, LaunchConfig, ReserveState};

// ============================================================
// STORAGE KEYS
// ============================================================

/// Per-trader keys are prefixed with the instance address
#[contracttype]
pub enum DataKey {
    Initialized,
    Config,
    Curve,
    Reserves,
    Window,
    Paused,
    /// Set while a mutating call is in progress
    Entered,
    Graduation,
    /// (instance, trader)
    Trader(Address, Address),
    /// (instance, trader)
    WhaleIntent(Address, Address),
    /// (instance, relayer)
    TrustedRelayer(Address, Address),
}

// ============================================================
// TTL CONFIGURATION
// ============================================================

/// Persistent storage lifetime in ledgers (~1 year at 5s/ledger)
const PERSISTENT_LIFETIME: u32 = 6_307_200;
const PERSISTENT_BUMP: u32 = 6_307_200;

fn extend_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME, PERSISTENT_BUMP);
}

fn write<V: soroban_sdk::IntoVal<Env, soroban_sdk::Val>>(env: &Env, key: &DataKey, value: &V) {
    env.storage().persistent().set(key, value);
    extend_ttl(env, key);
}

fn trader_key(env: &Env, trader: &Address) -> DataKey {
    DataKey::Trader(env.current_contract_address(), trader.clone())
}

fn intent_key(env: &Env, trader: &Address) -> DataKey {
    DataKey::WhaleIntent(env.current_contract_address(), trader.clone())
}

fn relayer_key(env: &Env, relayer: &Address) -> DataKey {
    DataKey::TrustedRelayer(env.current_contract_address(), relayer.clone())
}

// ============================================================
// INITIALIZATION
// ============================================================

pub fn is_initialized(env: &Env) -> bool {
    env.storage().persistent().has(&DataKey::Initialized)
}

pub fn set_initialized(env: &Env) {
    write(env, &DataKey::Initialized, &true);
}

// ============================================================
// CONFIG
// ============================================================

pub fn read_config(env: &Env) -> Result<LaunchConfig, LaunchError> {
    env.storage()
        .persistent()
        .get(&DataKey::Config)
        .ok_or(LaunchError::NotInitialized)
}

pub fn write_config(env: &Env, config: &LaunchConfig) {
    write(env, &DataKey::Config, config);
}

pub fn read_curve(env: &Env) -> Result<CurveConfig, LaunchError> {
    env.storage()
        .persistent()
        .get(&DataKey::Curve)
        .ok_or(LaunchError::NotInitialized)
}

pub fn write_curve(env: &Env, curve: &CurveConfig) {
    write(env, &DataKey::Curve, curve);
}

// ============================================================
// RESERVES & WINDOW
// ============================================================

pub fn read_reserves(env: &Env) -> Result<ReserveState, LaunchError> {
    env.storage()
        .persistent()
        .get(&DataKey::Reserves)
        .ok_or(LaunchError::NotInitialized)
}

pub fn write_reserves(env: &Env, reserves: &ReserveState) {
    write(env, &DataKey::Reserves, reserves);
}

pub fn read_window(env: &Env) -> Result<ProtectionWindow, LaunchError> {
    env.storage()
        .persistent()
        .get(&DataKey::Window)
        .ok_or(LaunchError::NotInitialized)
}

pub fn write_window(env: &Env, window: &ProtectionWindow) {
    write(env, &DataKey::Window, window);
}

pub fn read_graduation(env: &Env) -> Option<GraduationRecord> {
    env.storage().persistent().get(&DataKey::Graduation)
}

pub fn write_graduation(env: &Env, record: &GraduationRecord) {
    write(env, &DataKey::Graduation, record);
}

// ============================================================
// FLAGS
// ============================================================

pub fn is_paused(env: &Env) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::Paused)
        .unwrap_or(false)
}

pub fn set_paused(env: &Env, paused: bool) {
    write(env, &DataKey::Paused, &paused);
}

/// Claims the per-instance lock, failing if it is already held
pub fn enter(env: &Env) -> Result<(), LaunchError> {
    if env.storage().temporary().has(&DataKey::Entered) {
        return Err(LaunchError::Reentrancy);
    }
    env.storage().temporary().set(&DataKey::Entered, &true);
    Ok(())
}

pub fn exit(env: &Env) {
    env.storage().temporary().remove(&DataKey::Entered);
}

// ============================================================
// PER-TRADER STATE
// ============================================================

pub fn read_trader(env: &Env, trader: &Address) -> TraderState {
    env.storage()
        .persistent()
        .get(&trader_key(env, trader))
        .unwrap_or_default()
}

pub fn write_trader(env: &Env, trader: &Address, state: &TraderState) {
    write(env, &trader_key(env, trader), state);
}

pub fn read_whale_intent(env: &Env, trader: &Address) -> Option<WhaleIntent> {
    env.storage().persistent().get(&intent_key(env, trader))
}

pub fn write_whale_intent(env: &Env, trader: &Address, intent: &WhaleIntent) {
    write(env, &intent_key(env, trader), intent);
}

pub fn remove_whale_intent(env: &Env, trader: &Address) {
    env.storage().persistent().remove(&intent_key(env, trader));
}

pub fn is_trusted_relayer(env: &Env, relayer: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&relayer_key(env, relayer))
        .unwrap_or(false)
}

pub fn set_trusted_relayer(env: &Env, relayer: &Address, trusted: bool) {
    let key = relayer_key(env, relayer);
    if trusted {
        write(env, &key, &true);
    } else {
        env.storage().persistent().remove(&key);
    }
}
