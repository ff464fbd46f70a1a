// Calls into the external market and registry contracts
//
// Both are invoked with try_invoke_contract so a failing collaborator
// surfaces as a value the caller can roll back on, not a trap.

use soroban_sdk::{vec, Address, Env, IntoVal, Symbol};

use crate::types::DeployedLiquidity;

/// Arguments for the market's deploy_liquidity
pub struct LiquidityRequest<'a> {
    pub recipient: &'a Address,
    pub token: &'a Address,
    pub quote_token: &'a Address,
    pub token_amount: i128,
    pub quote_amount: i128,
    pub min_token_amount: i128,
    pub min_quote_amount: i128,
    pub deadline: u64,
}

/// deploy_liquidity(provider, recipient, token, quote_token, token_amount,
///                  quote_amount, min_token_amount, min_quote_amount, deadline)
///
/// The market pulls both amounts from `provider` with transfer_from.
/// Returns None if the market call failed for any reason.
pub fn deploy_liquidity(env: &Env, market: &Address, req: &LiquidityRequest) -> Option<DeployedLiquidity> {
    let result = env.try_invoke_contract::<DeployedLiquidity, soroban_sdk::Error>(
        market,
        &Symbol::new(env, "deploy_liquidity"),
        vec![
            env,
            env.current_contract_address().into_val(env),
            req.recipient.clone().into_val(env),
            req.token.clone().into_val(env),
            req.quote_token.clone().into_val(env),
            req.token_amount.into_val(env),
            req.quote_amount.into_val(env),
            req.min_token_amount.into_val(env),
            req.min_quote_amount.into_val(env),
            req.deadline.into_val(env),
        ],
    );

    match result {
        Ok(Ok(deployed)) => Some(deployed),
        _ => None,
    }
}

/// on_graduated(instance, pool); best effort
pub fn notify_registry(env: &Env, registry: &Address, pool: &Address) -> bool {
    let result = env.try_invoke_contract::<(), soroban_sdk::Error>(
        registry,
        &Symbol::new(env, "on_graduated"),
        vec![
            env,
            env.current_contract_address().into_val(env),
            pool.clone().into_val(env),
        ],
    );

    matches!(result, Ok(Ok(())))
}
