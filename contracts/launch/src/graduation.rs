// Graduation coordinator
//
// One-shot move of the curve's liquidity into the external market, run as
// a unit of work:
//
//   begin    snapshot reserves, mark graduated (trading stops)
//   attempt  mint liquidity_supply, approve the market, deploy_liquidity
//   commit   settle reserves, revoke leftover approvals, record, notify
//   rollback burn what was minted, revoke approvals, restore the snapshot
//
// A failed handoff restores trading; only last_graduation_attempt survives
// so the retry cooldown applies.

use soroban_sdk::{log, token, Address, Env};

use narwhal_curve::{apply_bps, current_price};

use crate::error::LaunchError;
use crate::events::{emit_graduated, emit_graduation_failed};
use crate::market::{deploy_liquidity, notify_registry, LiquidityRequest};
use crate::storage::{write_graduation, write_reserves};
use crate::types::{CurveConfig, DeployedLiquidity, GraduationRecord, LaunchConfig, ReserveState};

/// Seconds between failed automatic graduation attempts
pub const GRADUATION_RETRY_COOLDOWN: u64 = 300;

/// Market may use down to 95% of each amount
pub const GRADUATION_SLIPPAGE_BPS: u32 = 500;

/// Seconds the market has to complete the deployment
pub const GRADUATION_DEADLINE: u64 = 300;

/// Ledgers the market approvals stay valid for
const APPROVAL_LEDGERS: u32 = 100;

/// True when an automatic graduation should run after a buy
pub fn is_due(curve: &CurveConfig, reserves: &ReserveState, now: u64) -> bool {
    if reserves.has_graduated || reserves.real_quote_reserves < curve.graduation_threshold {
        return false;
    }
    reserves.last_graduation_attempt == 0
        || now >= reserves.last_graduation_attempt.saturating_add(GRADUATION_RETRY_COOLDOWN)
}

/// Runs the full graduation unit of work
///
/// On success `reserves` holds the settled post-graduation state. On
/// failure the rollback has already been written and `reserves` holds the
/// restored state.
pub fn run(
    env: &Env,
    config: &LaunchConfig,
    curve: &CurveConfig,
    reserves: &mut ReserveState,
    now: u64,
) -> Result<GraduationRecord, LaunchError> {
    let final_price = current_price(env, &reserves.point(curve))?;

    let mut unit = GraduationUnit::begin(env, reserves, now);
    match unit.attempt(env, config, curve, reserves, now) {
        Some(deployed) => Ok(unit.commit(env, config, reserves, deployed, final_price, now)),
        None => {
            unit.rollback(env, config, reserves, now);
            Err(LaunchError::GraduationFailed)
        }
    }
}

struct GraduationUnit {
    snapshot: ReserveState,
    minted: i128,
    token_approved: bool,
    quote_approved: bool,
}

impl GraduationUnit {
    fn begin(env: &Env, reserves: &mut ReserveState, now: u64) -> Self {
        let snapshot = reserves.clone();

        reserves.has_graduated = true;
        reserves.last_graduation_attempt = now;
        write_reserves(env, reserves);

        Self {
            snapshot,
            minted: 0,
            token_approved: false,
            quote_approved: false,
        }
    }

    fn attempt(
        &mut self,
        env: &Env,
        config: &LaunchConfig,
        curve: &CurveConfig,
        reserves: &ReserveState,
        now: u64,
    ) -> Option<DeployedLiquidity> {
        let this = env.current_contract_address();
        let token_amount = curve.liquidity_supply;
        let quote_amount = reserves.real_quote_reserves;
        let expiration = env.ledger().sequence().saturating_add(APPROVAL_LEDGERS);

        let minted = token::StellarAssetClient::new(env, &config.token).try_mint(&this, &token_amount);
        if !matches!(minted, Ok(Ok(()))) {
            return None;
        }
        self.minted = token_amount;

        let approved = token::Client::new(env, &config.token)
            .try_approve(&this, &config.market, &token_amount, &expiration);
        if !matches!(approved, Ok(Ok(()))) {
            return None;
        }
        self.token_approved = true;

        let approved = token::Client::new(env, &config.quote_token)
            .try_approve(&this, &config.market, &quote_amount, &expiration);
        if !matches!(approved, Ok(Ok(()))) {
            return None;
        }
        self.quote_approved = true;

        let min_token_amount = min_after_slippage(token_amount)?;
        let min_quote_amount = min_after_slippage(quote_amount)?;

        let request = LiquidityRequest {
            recipient: &config.creator,
            token: &config.token,
            quote_token: &config.quote_token,
            token_amount,
            quote_amount,
            min_token_amount,
            min_quote_amount,
            deadline: now.saturating_add(GRADUATION_DEADLINE),
        };
        let deployed = deploy_liquidity(env, &config.market, &request)?;

        if deployed.tokens_used < 0
            || deployed.quote_used < 0
            || deployed.tokens_used > token_amount
            || deployed.quote_used > quote_amount
        {
            return None;
        }
        Some(deployed)
    }

    fn commit(
        self,
        env: &Env,
        config: &LaunchConfig,
        reserves: &mut ReserveState,
        deployed: DeployedLiquidity,
        final_price: i128,
        now: u64,
    ) -> GraduationRecord {
        let unused_tokens = self.minted - deployed.tokens_used;
        if unused_tokens > 0 {
            burn_held(env, config, unused_tokens);
        }
        self.revoke_approvals(env, config);

        reserves.real_quote_reserves -= deployed.quote_used;
        write_reserves(env, reserves);

        let record = GraduationRecord {
            pool: deployed.pool.clone(),
            tokens_used: deployed.tokens_used,
            quote_used: deployed.quote_used,
            liquidity_units: deployed.liquidity_units,
            final_price,
            timestamp: now,
        };
        write_graduation(env, &record);
        emit_graduated(env, &record);

        if let Some(registry) = &config.registry {
            if !notify_registry(env, registry, &deployed.pool) {
                log!(env, "registry notification failed", registry.clone(), deployed.pool.clone());
            }
        }

        record
    }

    fn rollback(self, env: &Env, config: &LaunchConfig, reserves: &mut ReserveState, now: u64) {
        if self.minted > 0 {
            burn_held(env, config, self.minted);
        }
        self.revoke_approvals(env, config);

        *reserves = ReserveState {
            last_graduation_attempt: now,
            ..self.snapshot
        };
        write_reserves(env, reserves);

        log!(env, "graduation handoff failed", reserves.real_quote_reserves);
        emit_graduation_failed(env, reserves.real_quote_reserves, self.minted, now);
    }

    fn revoke_approvals(&self, env: &Env, config: &LaunchConfig) {
        if self.token_approved {
            revoke(env, config, &config.token);
        }
        if self.quote_approved {
            revoke(env, config, &config.quote_token);
        }
    }
}

/// Burns liquidity tokens still held by the instance
fn burn_held(env: &Env, config: &LaunchConfig, amount: i128) {
    let this = env.current_contract_address();
    let burned = token::Client::new(env, &config.token).try_burn(&this, &amount);
    if !matches!(burned, Ok(Ok(()))) {
        log!(env, "liquidity burn failed", amount);
    }
}

/// Zeroes the market's allowance on `asset`
fn revoke(env: &Env, config: &LaunchConfig, asset: &Address) {
    let this = env.current_contract_address();
    let expiration = env.ledger().sequence();
    let revoked = token::Client::new(env, asset).try_approve(&this, &config.market, &0, &expiration);
    if !matches!(revoked, Ok(Ok(()))) {
        log!(env, "approval revoke failed", asset.clone());
    }
}

fn min_after_slippage(amount: i128) -> Option<i128> {
    let slack = apply_bps(amount, GRADUATION_SLIPPAGE_BPS).ok()?;
    Some(amount - slack)
}
