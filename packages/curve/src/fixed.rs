// Fixed-point helpers for curve arithmetic
//
// Every division floors. Products of two reserves can exceed i128, so
// they are widened to U256 before dividing back down.

use soroban_sdk::{Env, U256};

use crate::constants::BPS_DENOMINATOR;
use crate::error::CurveError;

/// Widen a non-negative i128 into U256
#[inline]
pub fn widen(env: &Env, x: i128) -> Result<U256, CurveError> {
    if x < 0 {
        return Err(CurveError::InvalidAmount);
    }
    Ok(U256::from_u128(env, x as u128))
}

/// Narrow a U256 back into i128, failing if it does not fit
#[inline]
pub fn narrow(x: &U256) -> Result<i128, CurveError> {
    match x.to_u128() {
        Some(v) if v <= i128::MAX as u128 => Ok(v as i128),
        _ => Err(CurveError::Overflow),
    }
}

/// Calculates floor((a * b) / denominator) with a 256-bit intermediate
pub fn mul_div(env: &Env, a: i128, b: i128, denominator: i128) -> Result<i128, CurveError> {
    if denominator <= 0 {
        return Err(CurveError::DivisionByZero);
    }

    let product = widen(env, a)?.mul(&widen(env, b)?);
    let result = product.div(&widen(env, denominator)?);

    narrow(&result)
}

/// floor(amount * bps / 10000)
#[inline]
pub fn apply_bps(amount: i128, bps: u32) -> Result<i128, CurveError> {
    if amount < 0 {
        return Err(CurveError::InvalidAmount);
    }
    amount
        .checked_mul(bps as i128)
        .map(|v| v / BPS_DENOMINATOR)
        .ok_or(CurveError::Overflow)
}

/// Relative change between two prices in basis points, floored
///
/// Returns 0 when the reference price is zero.
pub fn relative_change_bps(env: &Env, from: i128, to: i128) -> Result<i128, CurveError> {
    if from <= 0 {
        return Ok(0);
    }
    let delta = from.abs_diff(to);
    if delta > i128::MAX as u128 {
        return Err(CurveError::Overflow);
    }
    mul_div(env, delta as i128, BPS_DENOMINATOR, from)
}

/// `part` as a share of `whole` in basis points, floored and capped at 100%
pub fn share_bps(env: &Env, part: i128, whole: i128) -> Result<u32, CurveError> {
    if whole <= 0 || part >= whole {
        return Ok(BPS_DENOMINATOR as u32);
    }
    let share = mul_div(env, part.max(0), BPS_DENOMINATOR, whole)?;
    Ok(share as u32)
}
