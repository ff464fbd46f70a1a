#![no_std]

//! # Narwhal Launch
//!
//! Bonding-curve token launch with bot, whale and volatility protection.
//!
//! ## Lifecycle:
//! 1. Initialize (curve, fees, protection limits; creator reserve minted)
//! 2. Trade on the curve (buy / sell)
//! 3. Graduate once quote reserves cross the threshold (liquidity moves to the market)

use soroban_sdk::{contract, contractimpl, token, Address, Env};

use narwhal_curve::{current_price, share_bps, BPS_DENOMINATOR, MAX_FEE_BPS};
use narwhal_guard::breaker;

mod engine;
mod error;
mod events;
mod graduation;
mod market;
mod storage;
mod types;

pub use error::LaunchError;
pub use graduation::{GRADUATION_DEADLINE, GRADUATION_RETRY_COOLDOWN, GRADUATION_SLIPPAGE_BPS};
pub use narwhal_guard::{
    AntiBotConfig, CircuitBreakerConfig, PricePoint, ProtectionWindow, TraderState, WhaleIntent,
    WhaleLimitConfig, MAX_RECENT_PRICES,
};
pub use types::*;

use events::*;
use storage::*;

// ============================================================
// CONTRACT
// ============================================================

#[contract]
pub struct NarwhalLaunch;

#[contractimpl]
impl NarwhalLaunch {
    // ========================================================
    // INITIALIZATION
    // ========================================================

    /// Initialize the launch
    ///
    /// The instance must already be the admin of `params.token`; the
    /// creator reserve is minted to the creator here.
    ///
    /// # Arguments
    /// * `params` - Curve, fee and protection configuration (see LaunchParams)
    pub fn initialize(env: Env, params: LaunchParams) -> Result<(), LaunchError> {
        params.authority.require_auth();

        if is_initialized(&env) {
            return Err(LaunchError::AlreadyInitialized);
        }

        validate_curve(&params.curve)?;
        validate_fees(&params.fees)?;
        validate_protection(&params)?;

        let config = LaunchConfig {
            authority: params.authority,
            creator: params.creator,
            token: params.token,
            quote_token: params.quote_token,
            market: params.market,
            registry: params.registry,
            fee_recipient: params.fee_recipient,
            fees: params.fees,
            anti_bot: params.anti_bot,
            breaker: params.breaker,
            whale: params.whale,
        };
        let now = env.ledger().timestamp();

        write_config(&env, &config);
        write_curve(&env, &params.curve);
        write_reserves(&env, &ReserveState::default());
        write_window(&env, &ProtectionWindow::new(&env, now));
        set_paused(&env, false);
        set_initialized(&env);

        if params.curve.creator_reserve > 0 {
            token::StellarAssetClient::new(&env, &config.token)
                .mint(&config.creator, &params.curve.creator_reserve);
        }

        emit_deployed(
            &env,
            &config.token,
            &config.quote_token,
            &config.creator,
            params.curve.creator_reserve,
        );

        Ok(())
    }

    // ========================================================
    // TRADING
    // ========================================================

    /// Buy tokens with `quote_amount` of the quote asset
    ///
    /// # Arguments
    /// * `trader` - Buyer; pays and receives
    /// * `relayer` - Forwarding account, if the call was relayed
    /// * `quote_amount` - Quote spent, fee included
    /// * `min_tokens_out` - Slippage floor
    ///
    /// # Returns
    /// `Executed` for a completed trade, `IntentRegistered` for a first
    /// whale-sized attempt, `CircuitBreakerTripped` if the trade's price
    /// impact halted trading
    pub fn buy(
        env: Env,
        trader: Address,
        relayer: Option<Address>,
        quote_amount: i128,
        min_tokens_out: i128,
    ) -> Result<TradeOutcome, LaunchError> {
        trader.require_auth();
        if let Some(r) = &relayer {
            r.require_auth();
        }
        ensure_trading(&env)?;

        with_lock(&env, || engine::buy(&env, &trader, relayer, quote_amount, min_tokens_out))
    }

    /// Sell `tokens_in` back to the curve
    pub fn sell(
        env: Env,
        trader: Address,
        tokens_in: i128,
        min_quote_out: i128,
    ) -> Result<TradeOutcome, LaunchError> {
        trader.require_auth();
        ensure_trading(&env)?;

        with_lock(&env, || engine::sell(&env, &trader, tokens_in, min_quote_out))
    }

    /// Drop a pending whale intent
    pub fn cancel_whale_intent(env: Env, trader: Address) -> Result<(), LaunchError> {
        trader.require_auth();
        if !is_initialized(&env) {
            return Err(LaunchError::NotInitialized);
        }

        let intent = read_whale_intent(&env, &trader).ok_or(LaunchError::NoWhaleIntent)?;
        remove_whale_intent(&env, &trader);
        emit_whale_cancelled(&env, &trader, intent.amount);

        Ok(())
    }

    // ========================================================
    // VIEW FUNCTIONS
    // ========================================================

    pub fn get_config(env: Env) -> Result<LaunchConfig, LaunchError> {
        read_config(&env)
    }

    pub fn get_curve(env: Env) -> Result<CurveConfig, LaunchError> {
        read_curve(&env)
    }

    pub fn get_reserves(env: Env) -> Result<ReserveState, LaunchError> {
        read_reserves(&env)
    }

    pub fn get_protection_window(env: Env) -> Result<ProtectionWindow, LaunchError> {
        read_window(&env)
    }

    pub fn get_trader_state(env: Env, trader: Address) -> TraderState {
        read_trader(&env, &trader)
    }

    pub fn get_whale_intent(env: Env, trader: Address) -> Option<WhaleIntent> {
        read_whale_intent(&env, &trader)
    }

    pub fn get_graduation(env: Env) -> Option<GraduationRecord> {
        read_graduation(&env)
    }

    /// Spot price in quote base units per whole token
    pub fn current_price(env: Env) -> Result<i128, LaunchError> {
        let curve = read_curve(&env)?;
        let reserves = read_reserves(&env)?;
        Ok(current_price(&env, &reserves.point(&curve))?)
    }

    /// Quote a buy without executing it
    ///
    /// Fails with WhaleIntentRequired for a whale-sized order that has no
    /// matching intent past its delay.
    pub fn preview_buy(env: Env, trader: Address, quote_amount: i128) -> Result<BuyPreview, LaunchError> {
        engine::preview_buy(&env, &trader, quote_amount)
    }

    /// Quote a sell without executing it
    pub fn preview_sell(env: Env, trader: Address, tokens_in: i128) -> Result<SellPreview, LaunchError> {
        engine::preview_sell(&env, &trader, tokens_in)
    }

    /// Quote reserves as a share of the graduation threshold (bps, capped)
    pub fn graduation_progress_bps(env: Env) -> Result<u32, LaunchError> {
        let curve = read_curve(&env)?;
        let reserves = read_reserves(&env)?;
        Ok(share_bps(
            &env,
            reserves.real_quote_reserves,
            curve.graduation_threshold,
        )?)
    }

    pub fn is_paused(env: Env) -> bool {
        is_paused(&env)
    }

    pub fn is_trusted_relayer(env: Env, relayer: Address) -> bool {
        is_trusted_relayer(&env, &relayer)
    }

    // ========================================================
    // ADMIN FUNCTIONS
    // ========================================================

    pub fn pause(env: Env, caller: Address) -> Result<(), LaunchError> {
        require_authority(&env, &caller)?;
        set_paused(&env, true);
        emit_pause_changed(&env, &caller, true);
        Ok(())
    }

    pub fn unpause(env: Env, caller: Address) -> Result<(), LaunchError> {
        require_authority(&env, &caller)?;
        set_paused(&env, false);
        emit_pause_changed(&env, &caller, false);
        Ok(())
    }

    pub fn set_blacklist(env: Env, caller: Address, trader: Address, blacklisted: bool) -> Result<(), LaunchError> {
        require_authority(&env, &caller)?;
        let mut state = read_trader(&env, &trader);
        state.blacklisted = blacklisted;
        write_trader(&env, &trader, &state);
        emit_blacklist_updated(&env, &trader, blacklisted);
        Ok(())
    }

    pub fn set_whitelist(env: Env, caller: Address, trader: Address, whitelisted: bool) -> Result<(), LaunchError> {
        require_authority(&env, &caller)?;
        let mut state = read_trader(&env, &trader);
        state.whitelisted = whitelisted;
        write_trader(&env, &trader, &state);
        emit_whitelist_updated(&env, &trader, whitelisted);
        Ok(())
    }

    pub fn set_trusted_relayer(env: Env, caller: Address, relayer: Address, trusted: bool) -> Result<(), LaunchError> {
        require_authority(&env, &caller)?;
        set_trusted_relayer(&env, &relayer, trusted);
        emit_relayer_updated(&env, &relayer, trusted);
        Ok(())
    }

    /// Halt trading for circuit_breaker_duration
    pub fn trip_circuit_breaker(env: Env, caller: Address) -> Result<(), LaunchError> {
        require_authority(&env, &caller)?;
        let mut window = read_window(&env)?;
        let now = env.ledger().timestamp();

        breaker::trip(&mut window, now);
        write_window(&env, &window);
        emit_breaker_tripped(&env, now, window.volatility_move_count, 0);
        Ok(())
    }

    pub fn reset_circuit_breaker(env: Env, caller: Address) -> Result<(), LaunchError> {
        require_authority(&env, &caller)?;
        let mut window = read_window(&env)?;
        let now = env.ledger().timestamp();

        breaker::reset(&env, &mut window, now);
        write_window(&env, &window);
        emit_breaker_reset(&env, now);
        Ok(())
    }

    /// Graduate now, ignoring the retry cooldown
    ///
    /// Unlike the automatic path, a failed handoff is returned as
    /// GraduationFailed.
    pub fn force_graduate(env: Env, caller: Address) -> Result<GraduationRecord, LaunchError> {
        require_authority(&env, &caller)?;

        with_lock(&env, || {
            let config = read_config(&env)?;
            let curve = read_curve(&env)?;
            let mut reserves = read_reserves(&env)?;

            if reserves.has_graduated {
                return Err(LaunchError::AlreadyGraduated);
            }
            if reserves.real_quote_reserves < curve.graduation_threshold {
                return Err(LaunchError::ThresholdNotMet);
            }

            let now = env.ledger().timestamp();
            graduation::run(&env, &config, &curve, &mut reserves, now)
        })
    }

    /// Replace the fee schedule; `max_fee` may be lowered but never raised
    pub fn update_fee_config(env: Env, caller: Address, fees: FeeConfig) -> Result<(), LaunchError> {
        require_authority(&env, &caller)?;
        validate_fees(&fees)?;

        let mut config = read_config(&env)?;
        // The fee cap can only come down
        if fees.max_fee > config.fees.max_fee {
            return Err(LaunchError::InvalidFeeConfig);
        }
        config.fees = fees;
        write_config(&env, &config);
        emit_fees_updated(&env, &config.fees);
        Ok(())
    }

    /// Move the instance's whole quote balance to `to` (paused only)
    ///
    /// Real quote reserves are zeroed; the curve keeps pricing off its
    /// virtual reserves.
    pub fn emergency_withdraw(env: Env, caller: Address, to: Address) -> Result<i128, LaunchError> {
        require_authority(&env, &caller)?;
        if !is_paused(&env) {
            return Err(LaunchError::NotPaused);
        }

        let config = read_config(&env)?;
        let quote = token::Client::new(&env, &config.quote_token);
        let this = env.current_contract_address();
        let amount = quote.balance(&this);

        if amount > 0 {
            match quote.try_transfer(&this, &to, &amount) {
                Ok(Ok(())) => {}
                _ => return Err(LaunchError::TransferFailed),
            }
        }

        let mut reserves = read_reserves(&env)?;
        reserves.real_quote_reserves = 0;
        write_reserves(&env, &reserves);

        emit_emergency_withdraw(&env, &to, amount);
        Ok(amount)
    }

    /// Hand the authority role over; both sides sign
    pub fn set_authority(env: Env, new_authority: Address) -> Result<(), LaunchError> {
        let mut config = read_config(&env)?;
        config.authority.require_auth();
        new_authority.require_auth();

        let old = config.authority.clone();
        config.authority = new_authority;
        write_config(&env, &config);
        emit_authority_changed(&env, &old, &config.authority);
        Ok(())
    }
}

// ========================================================
// HELPER FUNCTIONS
// ========================================================

fn require_authority(env: &Env, caller: &Address) -> Result<(), LaunchError> {
    caller.require_auth();
    let config = read_config(env)?;
    if *caller != config.authority {
        return Err(LaunchError::Unauthorized);
    }
    Ok(())
}

fn ensure_trading(env: &Env) -> Result<(), LaunchError> {
    if !is_initialized(env) {
        return Err(LaunchError::NotInitialized);
    }
    if is_paused(env) {
        return Err(LaunchError::Paused);
    }
    Ok(())
}

/// Runs `f` holding the per-instance lock
fn with_lock<T>(env: &Env, f: impl FnOnce() -> Result<T, LaunchError>) -> Result<T, LaunchError> {
    enter(env)?;
    let result = f();
    exit(env);
    result
}

fn validate_curve(curve: &CurveConfig) -> Result<(), LaunchError> {
    if curve.virtual_quote <= 0
        || curve.virtual_tokens <= 0
        || curve.curve_supply <= 0
        || curve.liquidity_supply <= 0
        || curve.creator_reserve < 0
        || curve.graduation_threshold <= 0
    {
        return Err(LaunchError::InvalidCurveConfig);
    }

    let total = curve
        .curve_supply
        .checked_add(curve.liquidity_supply)
        .and_then(|v| v.checked_add(curve.creator_reserve))
        .ok_or(LaunchError::InvalidCurveConfig)?;
    if total != curve.max_supply {
        return Err(LaunchError::InvalidCurveConfig);
    }
    Ok(())
}

fn validate_fees(fees: &FeeConfig) -> Result<(), LaunchError> {
    if fees.max_fee >= MAX_FEE_BPS || fees.buy_fee > fees.max_fee || fees.sell_fee > fees.max_fee {
        return Err(LaunchError::InvalidFeeConfig);
    }
    Ok(())
}

fn validate_protection(params: &LaunchParams) -> Result<(), LaunchError> {
    let bps = BPS_DENOMINATOR as u32;
    let anti_bot = &params.anti_bot;
    let breaker = &params.breaker;
    let whale = &params.whale;

    let valid = anti_bot.max_buy_amount_early > 0
        && anti_bot.max_wallet_percentage > 0
        && anti_bot.max_wallet_percentage <= bps
        && anti_bot.min_buy_amount >= 0
        && breaker.max_price_impact > 0
        && breaker.max_volatility_moves > 0
        && breaker.volatility_window > 0
        && breaker.impact_check_floor >= 0
        && whale.whale_threshold > 0
        && whale.max_trade_size > 0
        && whale.max_sell_percentage > 0
        && whale.max_sell_percentage <= bps;

    if !valid {
        return Err(LaunchError::InvalidProtectionConfig);
    }
    Ok(())
}
