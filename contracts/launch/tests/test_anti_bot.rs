mod common;

use common::*;
use narwhal_launch::*;
use soroban_sdk::{testutils::Address as _, Address, Env};

#[test]
fn test_early_buy_cap() {
    let env = Env::default();
    env.mock_all_auths();

    let launch = setup(&env);
    let alice = funded_trader(&env, &launch, 1_000 * QUOTE);

    assert_eq!(
        launch.client.try_buy(&alice, &None, &(200 * QUOTE + 1), &0),
        Err(Ok(LaunchError::EarlyBuyLimitExceeded))
    );
    buy(&launch, &alice, 200 * QUOTE);
}

#[test]
fn test_early_cap_lifts_after_window() {
    let env = Env::default();
    env.mock_all_auths();

    let launch = setup(&env);
    let alice = funded_trader(&env, &launch, 1_000 * QUOTE);

    advance(&env, 300);
    buy(&launch, &alice, 500 * QUOTE);
}

#[test]
fn test_buy_cooldown() {
    let env = Env::default();
    env.mock_all_auths();

    let launch = setup(&env);
    let alice = funded_trader(&env, &launch, 100 * QUOTE);

    buy(&launch, &alice, 10 * QUOTE);
    assert_eq!(launch.client.get_trader_state(&alice).last_buy_time, T0);

    advance(&env, 29);
    assert_eq!(
        launch.client.try_buy(&alice, &None, &(10 * QUOTE), &0),
        Err(Ok(LaunchError::CooldownActive))
    );

    advance(&env, 1);
    buy(&launch, &alice, 10 * QUOTE);
    assert_eq!(launch.client.get_trader_state(&alice).last_buy_time, T0 + 30);
}

#[test]
fn test_creator_and_authority_are_whitelisted() {
    let env = Env::default();
    env.mock_all_auths();

    let launch = setup(&env);
    fund(&env, &launch, &launch.creator, 2_000 * QUOTE);
    fund(&env, &launch, &launch.authority, 2_000 * QUOTE);

    // Above the early cap, trade size and whale threshold, back to back
    buy(&launch, &launch.creator, 1_500 * QUOTE);
    buy(&launch, &launch.authority, 1_500 * QUOTE);
    buy(&launch, &launch.creator, 10 * QUOTE);

    // Whitelisted buys leave no cooldown behind
    assert_eq!(launch.client.get_trader_state(&launch.creator).last_buy_time, 0);
}

#[test]
fn test_explicit_whitelist() {
    let env = Env::default();
    env.mock_all_auths();

    let launch = setup(&env);
    let alice = funded_trader(&env, &launch, 1_000 * QUOTE);

    launch.client.set_whitelist(&launch.authority, &alice, &true);
    assert!(launch.client.get_trader_state(&alice).whitelisted);

    buy(&launch, &alice, 500 * QUOTE);
    buy(&launch, &alice, 10 * QUOTE);

    launch.client.set_whitelist(&launch.authority, &alice, &false);
    assert_eq!(
        launch.client.try_buy(&alice, &None, &(300 * QUOTE), &0),
        Err(Ok(LaunchError::EarlyBuyLimitExceeded))
    );
}

#[test]
fn test_blacklist_blocks_buy_and_sell() {
    let env = Env::default();
    env.mock_all_auths();

    let launch = setup(&env);
    let alice = funded_trader(&env, &launch, 100 * QUOTE);
    let bought = buy(&launch, &alice, 50 * QUOTE);

    launch.client.set_blacklist(&launch.authority, &alice, &true);
    advance(&env, 60);

    assert_eq!(
        launch.client.try_buy(&alice, &None, &(10 * QUOTE), &0),
        Err(Ok(LaunchError::Blacklisted))
    );
    assert_eq!(
        launch.client.try_sell(&alice, &(bought.token_amount / 10), &0),
        Err(Ok(LaunchError::Blacklisted))
    );

    launch.client.set_blacklist(&launch.authority, &alice, &false);
    buy(&launch, &alice, 10 * QUOTE);
}

#[test]
fn test_blacklist_overrides_whitelist() {
    let env = Env::default();
    env.mock_all_auths();

    let launch = setup(&env);
    fund(&env, &launch, &launch.creator, 100 * QUOTE);
    launch.client.set_blacklist(&launch.authority, &launch.creator, &true);

    assert_eq!(
        launch.client.try_buy(&launch.creator, &None, &(10 * QUOTE), &0),
        Err(Ok(LaunchError::Blacklisted))
    );
}

#[test]
fn test_untrusted_relayer_rejected() {
    let env = Env::default();
    env.mock_all_auths();

    let launch = setup(&env);
    let alice = funded_trader(&env, &launch, 100 * QUOTE);
    let relayer = Address::generate(&env);

    assert_eq!(
        launch.client.try_buy(&alice, &Some(relayer.clone()), &(10 * QUOTE), &0),
        Err(Ok(LaunchError::RelayedCallRejected))
    );

    launch.client.set_trusted_relayer(&launch.authority, &relayer, &true);
    assert!(launch.client.is_trusted_relayer(&relayer));

    let outcome = launch.client.buy(&alice, &Some(relayer.clone()), &(10 * QUOTE), &0);
    assert!(matches!(outcome, TradeOutcome::Executed(_)));

    launch.client.set_trusted_relayer(&launch.authority, &relayer, &false);
    assert!(!launch.client.is_trusted_relayer(&relayer));
}

#[test]
fn test_whitelisted_trader_may_use_any_relayer() {
    let env = Env::default();
    env.mock_all_auths();

    let launch = setup(&env);
    fund(&env, &launch, &launch.creator, 100 * QUOTE);
    let relayer = Address::generate(&env);

    let outcome = launch.client.buy(&launch.creator, &Some(relayer), &(10 * QUOTE), &0);
    assert!(matches!(outcome, TradeOutcome::Executed(_)));
}

#[test]
fn test_contract_trader_counts_as_relayed() {
    let env = Env::default();
    env.mock_all_auths();

    let launch = setup(&env);
    let bot = Address::generate(&env);
    fund(&env, &launch, &bot, 100 * QUOTE);

    // No relayer named, but the trader is itself a contract
    assert_eq!(
        launch.client.try_buy(&bot, &None, &(10 * QUOTE), &0),
        Err(Ok(LaunchError::RelayedCallRejected))
    );

    launch.client.set_trusted_relayer(&launch.authority, &bot, &true);
    buy(&launch, &bot, 10 * QUOTE);
}

#[test]
fn test_whitelisted_contract_trader_skips_relay_check() {
    let env = Env::default();
    env.mock_all_auths();

    let launch = setup(&env);
    let desk = Address::generate(&env);
    fund(&env, &launch, &desk, 100 * QUOTE);

    launch.client.set_whitelist(&launch.authority, &desk, &true);
    buy(&launch, &desk, 10 * QUOTE);
}

#[test]
fn test_buy_through_intermediary_contract() {
    let env = Env::default();
    env.mock_all_auths_allowing_non_root_auth();

    let launch = setup(&env);
    let bot = env.register(Intermediary, ());
    let bot_client = IntermediaryClient::new(&env, &bot);
    fund(&env, &launch, &bot, 100 * QUOTE);

    assert!(!bot_client.forward_buy(&launch.id, &(10 * QUOTE)));
    assert_eq!(launch.token_client(&env).balance(&bot), 0);
    assert_eq!(launch.client.get_reserves(), ReserveState::default());

    launch.client.set_trusted_relayer(&launch.authority, &bot, &true);
    assert!(bot_client.forward_buy(&launch.id, &(10 * QUOTE)));
    assert!(launch.token_client(&env).balance(&bot) > 0);
}

#[test]
fn test_only_authority_manages_lists() {
    let env = Env::default();
    env.mock_all_auths();

    let launch = setup(&env);
    let stranger = Address::generate(&env);
    let alice = Address::generate(&env);

    assert_eq!(
        launch.client.try_set_blacklist(&stranger, &alice, &true),
        Err(Ok(LaunchError::Unauthorized))
    );
    assert_eq!(
        launch.client.try_set_whitelist(&launch.creator, &alice, &true),
        Err(Ok(LaunchError::Unauthorized))
    );
    assert_eq!(
        launch.client.try_set_trusted_relayer(&stranger, &alice, &true),
        Err(Ok(LaunchError::Unauthorized))
    );
}
