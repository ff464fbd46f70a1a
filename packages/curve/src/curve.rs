// Constant-product bonding curve over virtual + real reserves
//
//   k = (virtual_quote + real_quote) * (virtual_tokens - real_tokens)
//
// Buys add quote and remove tokens; sells do the reverse. Outputs are
// floored so k never decreases across a trade.

use soroban_sdk::{Env, U256};

use crate::constants::{BPS_DENOMINATOR, MAX_FEE_BPS, TOKEN_UNIT};
use crate::error::CurveError;
use crate::fixed::{apply_bps, mul_div, relative_change_bps, widen};

// ============================================================
// CURVE POINT
// ============================================================

/// Snapshot of the reserves the curve prices against
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurvePoint {
    pub virtual_quote: i128,
    pub virtual_tokens: i128,
    pub real_quote_reserves: i128,
    pub real_token_supply: i128,
}

impl CurvePoint {
    pub fn new(
        virtual_quote: i128,
        virtual_tokens: i128,
        real_quote_reserves: i128,
        real_token_supply: i128,
    ) -> Self {
        Self {
            virtual_quote,
            virtual_tokens,
            real_quote_reserves,
            real_token_supply,
        }
    }

    /// virtual_quote + real_quote_reserves
    pub fn quote_side(&self) -> Result<i128, CurveError> {
        if self.virtual_quote <= 0 || self.real_quote_reserves < 0 {
            return Err(CurveError::InvalidAmount);
        }
        self.virtual_quote
            .checked_add(self.real_quote_reserves)
            .ok_or(CurveError::Overflow)
    }

    /// virtual_tokens - real_token_supply, always positive
    pub fn token_side(&self) -> Result<i128, CurveError> {
        if self.real_token_supply < 0 {
            return Err(CurveError::InvalidAmount);
        }
        let side = self.virtual_tokens - self.real_token_supply;
        if side <= 0 {
            return Err(CurveError::InsufficientDepth);
        }
        Ok(side)
    }

    /// Reserves after a buy that added `net_quote` and issued `tokens_out`
    pub fn after_buy(&self, net_quote: i128, tokens_out: i128) -> Result<Self, CurveError> {
        Ok(Self {
            real_quote_reserves: self
                .real_quote_reserves
                .checked_add(net_quote)
                .ok_or(CurveError::Overflow)?,
            real_token_supply: self
                .real_token_supply
                .checked_add(tokens_out)
                .ok_or(CurveError::Overflow)?,
            ..*self
        })
    }

    /// Reserves after a sell that removed `gross_quote` and burned `tokens_in`
    pub fn after_sell(&self, gross_quote: i128, tokens_in: i128) -> Result<Self, CurveError> {
        if gross_quote > self.real_quote_reserves || tokens_in > self.real_token_supply {
            return Err(CurveError::InsufficientDepth);
        }
        Ok(Self {
            real_quote_reserves: self.real_quote_reserves - gross_quote,
            real_token_supply: self.real_token_supply - tokens_in,
            ..*self
        })
    }
}

// ============================================================
// QUOTES
// ============================================================

/// Result of pricing a buy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuyQuote {
    /// Tokens issued to the buyer
    pub tokens_out: i128,
    /// Quote entering the reserves after the fee
    pub net_quote: i128,
    /// Fee taken from the quote input
    pub fee: i128,
}

/// Result of pricing a sell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SellQuote {
    /// Quote paid to the seller
    pub net_out: i128,
    /// Fee taken from the gross output
    pub fee: i128,
    /// Quote leaving the reserves (net_out + fee)
    pub gross_out: i128,
}

fn check_fee(fee_bps: u32) -> Result<(), CurveError> {
    if fee_bps >= MAX_FEE_BPS {
        return Err(CurveError::InvalidFee);
    }
    Ok(())
}

/// Tokens received for `quote_in`, after the buy fee
///
/// tokens_out = floor(T * net / (Q + net))
pub fn tokens_out(
    env: &Env,
    point: &CurvePoint,
    quote_in: i128,
    buy_fee_bps: u32,
) -> Result<BuyQuote, CurveError> {
    check_fee(buy_fee_bps)?;
    if quote_in < 0 {
        return Err(CurveError::InvalidAmount);
    }
    if quote_in == 0 {
        return Ok(BuyQuote { tokens_out: 0, net_quote: 0, fee: 0 });
    }

    let fee = apply_bps(quote_in, buy_fee_bps)?;
    let net_quote = quote_in - fee;

    let quote_side = point.quote_side()?;
    let token_side = point.token_side()?;
    let new_quote_side = quote_side.checked_add(net_quote).ok_or(CurveError::Overflow)?;

    let tokens_out = mul_div(env, token_side, net_quote, new_quote_side)?;

    Ok(BuyQuote { tokens_out, net_quote, fee })
}

/// Gross quote needed to receive exactly `tokens_wanted`
///
/// net = floor(Q * t / (T - t)), gross = floor(net * 10000 / (10000 - fee))
pub fn quote_in(
    env: &Env,
    point: &CurvePoint,
    tokens_wanted: i128,
    buy_fee_bps: u32,
) -> Result<i128, CurveError> {
    check_fee(buy_fee_bps)?;
    if tokens_wanted < 0 {
        return Err(CurveError::InvalidAmount);
    }
    if tokens_wanted == 0 {
        return Ok(0);
    }

    let quote_side = point.quote_side()?;
    let token_side = point.token_side()?;
    if tokens_wanted >= token_side {
        return Err(CurveError::InsufficientDepth);
    }

    let net = mul_div(env, quote_side, tokens_wanted, token_side - tokens_wanted)?;
    mul_div(env, net, BPS_DENOMINATOR, BPS_DENOMINATOR - buy_fee_bps as i128)
}

/// Quote paid out for selling `tokens_in`, split into (net, fee)
///
/// gross = floor(Q * t / (T + t)), fee = floor(gross * fee / 10000)
pub fn quote_out(
    env: &Env,
    point: &CurvePoint,
    tokens_in: i128,
    sell_fee_bps: u32,
) -> Result<SellQuote, CurveError> {
    check_fee(sell_fee_bps)?;
    if tokens_in < 0 || tokens_in > point.real_token_supply {
        return Err(CurveError::InvalidAmount);
    }
    if tokens_in == 0 {
        return Ok(SellQuote { net_out: 0, fee: 0, gross_out: 0 });
    }

    let quote_side = point.quote_side()?;
    let token_side = point.token_side()?;
    let new_token_side = token_side.checked_add(tokens_in).ok_or(CurveError::Overflow)?;

    let gross_out = mul_div(env, quote_side, tokens_in, new_token_side)?;
    let fee = apply_bps(gross_out, sell_fee_bps)?;

    Ok(SellQuote {
        net_out: gross_out - fee,
        fee,
        gross_out,
    })
}

// ============================================================
// PRICE
// ============================================================

/// Spot price in quote base units per whole token
pub fn current_price(env: &Env, point: &CurvePoint) -> Result<i128, CurveError> {
    mul_div(env, point.quote_side()?, TOKEN_UNIT, point.token_side()?)
}

/// The constant-product value k for a point
pub fn invariant(env: &Env, point: &CurvePoint) -> Result<U256, CurveError> {
    Ok(widen(env, point.quote_side()?)?.mul(&widen(env, point.token_side()?)?))
}

/// Price impact of moving from `before` to `after`, in basis points
pub fn price_impact_bps(
    env: &Env,
    before: &CurvePoint,
    after: &CurvePoint,
) -> Result<i128, CurveError> {
    let from = current_price(env, before)?;
    let to = current_price(env, after)?;
    relative_change_bps(env, from, to)
}
