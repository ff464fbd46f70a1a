// Trading engine
//
// buy / sell run the protection checks, price the trade on the curve,
// move funds, update reserves and volatility tracking, and trigger
// graduation. Any error aborts the invocation and the host discards every
// write made so far; outcomes that must persist without trading (whale
// intent registration, an impact trip) return Ok with a TradeOutcome.

use soroban_sdk::{log, token, Address, Env};

use narwhal_curve::{apply_bps, current_price, price_impact_bps, quote_out, tokens_out};
use narwhal_guard::anti_bot::{self, RelayStatus};
use narwhal_guard::{breaker, whale, ImpactVerdict, ProtectionWindow, TraderState, WhaleGate};

use crate::error::LaunchError;
use crate::events::*;
use crate::graduation;
use crate::storage::*;
use crate::types::{BuyPreview, LaunchConfig, SellPreview, TradeOutcome, TradeReceipt};

// ============================================================
// BUY
// ============================================================

pub fn buy(
    env: &Env,
    trader: &Address,
    relayer: Option<Address>,
    quote_amount: i128,
    min_tokens_out: i128,
) -> Result<TradeOutcome, LaunchError> {
    let config = read_config(env)?;
    let curve = read_curve(env)?;
    let mut reserves = read_reserves(env)?;
    let mut window = read_window(env)?;
    let now = env.ledger().timestamp();

    if quote_amount <= 0 {
        return Err(LaunchError::InvalidAmount);
    }

    let mut state = read_trader(env, trader);
    let whitelisted = is_whitelisted(&config, trader, &state);
    let relay = relay_status(env, trader, relayer.as_ref());

    anti_bot::check_buy(
        &config.anti_bot,
        &mut state,
        whitelisted,
        relay,
        quote_amount,
        window.launch_time,
        now,
    )?;
    check_breaker(env, &config, &mut window, now)?;

    if !whitelisted && quote_amount > config.whale.max_trade_size {
        return Err(LaunchError::TradeSizeTooLarge);
    }
    if reserves.has_graduated {
        return Err(LaunchError::AlreadyGraduated);
    }
    if quote_amount < config.anti_bot.min_buy_amount {
        return Err(LaunchError::AmountTooSmall);
    }

    let gate = whale::evaluate(
        &config.whale,
        read_whale_intent(env, trader),
        &state,
        whitelisted,
        quote_amount,
        quote_amount,
        true,
        now,
    )?;
    if let WhaleGate::Register(intent) = gate {
        write_whale_intent(env, trader, &intent);
        write_window(env, &window);
        emit_whale_registered(env, trader, &intent);
        return Ok(TradeOutcome::IntentRegistered(intent));
    }

    let point = reserves.point(&curve);
    let quote = tokens_out(env, &point, quote_amount, config.fees.buy_fee)?;
    let after = point.after_buy(quote.net_quote, quote.tokens_out)?;

    let impact = price_impact_bps(env, &point, &after)?;
    if let Some(tripped) = gate_impact(env, &config, &mut window, trader, quote_amount, impact, now) {
        return Ok(tripped);
    }

    if quote.tokens_out <= 0 {
        return Err(LaunchError::AmountTooSmall);
    }
    if quote.tokens_out < min_tokens_out {
        return Err(LaunchError::SlippageTooHigh);
    }
    if after.real_token_supply > curve.curve_supply {
        return Err(LaunchError::ExceedsMaxSupply);
    }

    let traded = token::Client::new(env, &config.token);
    if !whitelisted {
        let cap = apply_bps(curve.curve_supply, config.anti_bot.max_wallet_percentage)?;
        let holding = traded
            .balance(trader)
            .checked_add(quote.tokens_out)
            .ok_or(LaunchError::MathOverflow)?;
        if holding > cap {
            return Err(LaunchError::ExceedsMaxWallet);
        }
    }

    // Funds
    let this = env.current_contract_address();
    transfer(env, &config.quote_token, trader, &this, quote_amount)?;
    if quote.fee > 0 {
        transfer(env, &config.quote_token, &this, &config.fee_recipient, quote.fee)?;
    }

    reserves.apply(&after);
    write_reserves(env, &reserves);
    token::StellarAssetClient::new(env, &config.token).mint(trader, &quote.tokens_out);

    let price_after = current_price(env, &after)?;
    settle_trade(env, &config, &mut window, &mut state, trader, gate, price_after, now);

    let mut graduated = false;
    if graduation::is_due(&curve, &reserves, now) {
        graduated = graduation::run(env, &config, &curve, &mut reserves, now).is_ok();
    }

    let receipt = TradeReceipt {
        is_buy: true,
        trader: trader.clone(),
        quote_amount,
        token_amount: quote.tokens_out,
        fee: quote.fee,
        price_after,
        reserves_after: reserves,
        timestamp: now,
        graduated,
    };
    emit_trade(env, &receipt);

    Ok(TradeOutcome::Executed(receipt))
}

// ============================================================
// SELL
// ============================================================

pub fn sell(
    env: &Env,
    trader: &Address,
    tokens_in: i128,
    min_quote_out: i128,
) -> Result<TradeOutcome, LaunchError> {
    let config = read_config(env)?;
    let curve = read_curve(env)?;
    let mut reserves = read_reserves(env)?;
    let mut window = read_window(env)?;
    let now = env.ledger().timestamp();

    if reserves.has_graduated {
        return Err(LaunchError::AlreadyGraduated);
    }
    if tokens_in <= 0 {
        return Err(LaunchError::InvalidAmount);
    }

    let mut state = read_trader(env, trader);
    anti_bot::check_sell(&state)?;

    // The creator reserve stays locked until graduation
    if *trader == config.creator {
        return Err(LaunchError::CreatorLocked);
    }

    if tokens_in > reserves.real_token_supply {
        return Err(LaunchError::InsufficientLiquidity);
    }
    let traded = token::Client::new(env, &config.token);
    if traded.balance(trader) < tokens_in {
        return Err(LaunchError::InsufficientBalance);
    }

    check_breaker(env, &config, &mut window, now)?;

    let whitelisted = is_whitelisted(&config, trader, &state);
    if !whitelisted {
        let cap = apply_bps(reserves.real_token_supply, config.whale.max_sell_percentage)?;
        if tokens_in > cap {
            return Err(LaunchError::SellTooLarge);
        }
    }

    let point = reserves.point(&curve);
    let quote = quote_out(env, &point, tokens_in, config.fees.sell_fee)?;

    let gate = whale::evaluate(
        &config.whale,
        read_whale_intent(env, trader),
        &state,
        whitelisted,
        tokens_in,
        quote.gross_out,
        false,
        now,
    )?;
    if let WhaleGate::Register(intent) = gate {
        write_whale_intent(env, trader, &intent);
        write_window(env, &window);
        emit_whale_registered(env, trader, &intent);
        return Ok(TradeOutcome::IntentRegistered(intent));
    }

    if quote.gross_out > reserves.real_quote_reserves {
        return Err(LaunchError::InsufficientLiquidity);
    }
    let after = point.after_sell(quote.gross_out, tokens_in)?;

    let impact = price_impact_bps(env, &point, &after)?;
    if let Some(tripped) = gate_impact(env, &config, &mut window, trader, quote.gross_out, impact, now) {
        return Ok(tripped);
    }

    if quote.net_out < min_quote_out {
        return Err(LaunchError::SlippageTooHigh);
    }

    // Funds
    let this = env.current_contract_address();
    traded.burn(trader, &tokens_in);
    if quote.net_out > 0 {
        transfer(env, &config.quote_token, &this, trader, quote.net_out)?;
    }
    if quote.fee > 0 {
        transfer(env, &config.quote_token, &this, &config.fee_recipient, quote.fee)?;
    }

    reserves.apply(&after);
    write_reserves(env, &reserves);

    let price_after = current_price(env, &after)?;
    settle_trade(env, &config, &mut window, &mut state, trader, gate, price_after, now);

    let receipt = TradeReceipt {
        is_buy: false,
        trader: trader.clone(),
        quote_amount: quote.net_out,
        token_amount: tokens_in,
        fee: quote.fee,
        price_after,
        reserves_after: reserves,
        timestamp: now,
        graduated: false,
    };
    emit_trade(env, &receipt);

    Ok(TradeOutcome::Executed(receipt))
}

// ============================================================
// PREVIEWS
// ============================================================

pub fn preview_buy(env: &Env, trader: &Address, quote_amount: i128) -> Result<BuyPreview, LaunchError> {
    let config = read_config(env)?;
    let curve = read_curve(env)?;
    let reserves = read_reserves(env)?;

    if reserves.has_graduated {
        return Err(LaunchError::AlreadyGraduated);
    }
    if quote_amount <= 0 {
        return Err(LaunchError::InvalidAmount);
    }
    require_ready_intent(env, &config, trader, quote_amount, quote_amount, true)?;

    let point = reserves.point(&curve);
    let quote = tokens_out(env, &point, quote_amount, config.fees.buy_fee)?;
    let after = point.after_buy(quote.net_quote, quote.tokens_out)?;

    Ok(BuyPreview {
        tokens_out: quote.tokens_out,
        fee: quote.fee,
        price_after: current_price(env, &after)?,
        price_impact_bps: price_impact_bps(env, &point, &after)?,
    })
}

pub fn preview_sell(env: &Env, trader: &Address, tokens_in: i128) -> Result<SellPreview, LaunchError> {
    let config = read_config(env)?;
    let curve = read_curve(env)?;
    let reserves = read_reserves(env)?;

    if reserves.has_graduated {
        return Err(LaunchError::AlreadyGraduated);
    }
    if tokens_in <= 0 {
        return Err(LaunchError::InvalidAmount);
    }
    if *trader == config.creator {
        return Err(LaunchError::CreatorLocked);
    }
    if tokens_in > reserves.real_token_supply {
        return Err(LaunchError::InsufficientLiquidity);
    }

    let point = reserves.point(&curve);
    let quote = quote_out(env, &point, tokens_in, config.fees.sell_fee)?;
    require_ready_intent(env, &config, trader, tokens_in, quote.gross_out, false)?;
    let after = point.after_sell(quote.gross_out, tokens_in)?;

    Ok(SellPreview {
        quote_out: quote.net_out,
        fee: quote.fee,
        price_after: current_price(env, &after)?,
        price_impact_bps: price_impact_bps(env, &point, &after)?,
    })
}

// ============================================================
// HELPERS
// ============================================================

/// Creator and authority are always whitelisted
pub fn is_whitelisted(config: &LaunchConfig, trader: &Address, state: &TraderState) -> bool {
    state.whitelisted || *trader == config.creator || *trader == config.authority
}

/// Classifies how an order reached the instance
///
/// An explicit relayer is checked against the trusted list. A contract
/// trader is itself an intermediary and must be on the list.
fn relay_status(env: &Env, trader: &Address, relayer: Option<&Address>) -> RelayStatus {
    let via = match relayer {
        Some(r) => r,
        None if is_contract(trader) => trader,
        None => return RelayStatus::Direct,
    };
    if is_trusted_relayer(env, via) {
        RelayStatus::Trusted
    } else {
        RelayStatus::Untrusted
    }
}

/// Contract strkeys start with 'C'
fn is_contract(address: &Address) -> bool {
    let strkey = address.to_string();
    let mut buf = [0u8; 56];
    if strkey.len() as usize != buf.len() {
        return false;
    }
    strkey.copy_into_slice(&mut buf);
    buf[0] == b'C'
}

/// Transfers on a ledger, mapping any refusal to TransferFailed
fn transfer(env: &Env, asset: &Address, from: &Address, to: &Address, amount: i128) -> Result<(), LaunchError> {
    match token::Client::new(env, asset).try_transfer(from, to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(LaunchError::TransferFailed),
    }
}

fn check_breaker(
    env: &Env,
    config: &LaunchConfig,
    window: &mut ProtectionWindow,
    now: u64,
) -> Result<(), LaunchError> {
    if breaker::check(env, &config.breaker, window, now)? {
        emit_breaker_reset(env, now);
    }
    Ok(())
}

/// Applies the single-trade price impact check
///
/// Returns the outcome to hand back when the trade tripped the breaker.
fn gate_impact(
    env: &Env,
    config: &LaunchConfig,
    window: &mut ProtectionWindow,
    trader: &Address,
    quote_value: i128,
    impact_bps: i128,
    now: u64,
) -> Option<TradeOutcome> {
    match breaker::assess_impact(&config.breaker, quote_value, impact_bps) {
        ImpactVerdict::Ok => None,
        ImpactVerdict::Warn => {
            log!(env, "price impact warning", impact_bps);
            emit_impact_warning(env, trader, quote_value, impact_bps);
            None
        }
        ImpactVerdict::Trip => {
            breaker::trip(window, now);
            write_window(env, window);
            log!(env, "price impact tripped circuit breaker", impact_bps);
            emit_breaker_tripped(env, now, window.volatility_move_count, impact_bps);
            let reported = impact_bps.min(u32::MAX as i128) as u32;
            Some(TradeOutcome::CircuitBreakerTripped(reported))
        }
    }
}

/// Post-trade bookkeeping shared by buy and sell
fn settle_trade(
    env: &Env,
    config: &LaunchConfig,
    window: &mut ProtectionWindow,
    state: &mut TraderState,
    trader: &Address,
    gate: WhaleGate,
    price_after: i128,
    now: u64,
) {
    if breaker::record_price(env, &config.breaker, window, price_after, now) {
        log!(env, "volatility tripped circuit breaker", window.volatility_move_count);
        emit_breaker_tripped(env, now, window.volatility_move_count, 0);
    }
    write_window(env, window);

    if let WhaleGate::Execute(intent) = gate {
        whale::record_execution(state, now);
        remove_whale_intent(env, trader);
        emit_whale_executed(env, trader, &intent);
    }
    write_trader(env, trader, state);
}

/// Fails with WhaleIntentRequired unless a whale-sized order has a ripe,
/// matching intent on file
fn require_ready_intent(
    env: &Env,
    config: &LaunchConfig,
    trader: &Address,
    amount: i128,
    quote_value: i128,
    is_buy: bool,
) -> Result<(), LaunchError> {
    let state = read_trader(env, trader);
    if is_whitelisted(config, trader, &state) || quote_value < config.whale.whale_threshold {
        return Ok(());
    }

    let now = env.ledger().timestamp();
    let ready = read_whale_intent(env, trader).map_or(false, |intent| {
        intent.is_buy == is_buy
            && intent.amount == amount
            && now >= intent.intent_time.saturating_add(config.whale.whale_delay)
    });
    if ready {
        Ok(())
    } else {
        Err(LaunchError::WhaleIntentRequired)
    }
}
