use narwhal_guard::whale::{evaluate, record_execution};
use narwhal_guard::*;

const NOW: u64 = 5_000;

fn config() -> WhaleLimitConfig {
    WhaleLimitConfig {
        whale_threshold: 800,
        whale_delay: 600,
        max_trade_size: 1_000,
        max_sell_percentage: 2_000,
    }
}

fn pending(amount: i128, is_buy: bool) -> WhaleIntent {
    WhaleIntent {
        amount,
        intent_time: NOW,
        is_buy,
        executed: false,
    }
}

#[test]
fn test_below_threshold_bypasses() {
    let gate = evaluate(&config(), None, &TraderState::default(), false, 799, 799, true, NOW);
    assert_eq!(gate, Ok(WhaleGate::Bypass));
}

#[test]
fn test_whitelisted_bypasses() {
    let gate = evaluate(&config(), None, &TraderState::default(), true, 5_000, 5_000, true, NOW);
    assert_eq!(gate, Ok(WhaleGate::Bypass));
}

#[test]
fn test_first_attempt_registers() {
    let gate = evaluate(&config(), None, &TraderState::default(), false, 800, 800, true, NOW);
    assert_eq!(gate, Ok(WhaleGate::Register(pending(800, true))));
}

#[test]
fn test_retry_before_delay_not_ready() {
    let gate = evaluate(
        &config(),
        Some(pending(900, true)),
        &TraderState::default(),
        false,
        900,
        900,
        true,
        NOW + 599,
    );
    assert_eq!(gate, Err(GuardError::WhaleIntentNotReady));
}

#[test]
fn test_retry_at_delay_executes() {
    let gate = evaluate(
        &config(),
        Some(pending(900, true)),
        &TraderState::default(),
        false,
        900,
        900,
        true,
        NOW + 600,
    );
    let mut expected = pending(900, true);
    expected.executed = true;
    assert_eq!(gate, Ok(WhaleGate::Execute(expected)));
}

#[test]
fn test_mismatched_amount_or_direction_rejected() {
    let cfg = config();
    let trader = TraderState::default();

    let wrong_amount = evaluate(&cfg, Some(pending(900, true)), &trader, false, 901, 901, true, NOW + 700);
    assert_eq!(wrong_amount, Err(GuardError::WhaleIntentMismatch));

    let wrong_side = evaluate(&cfg, Some(pending(900, true)), &trader, false, 900, 900, false, NOW + 700);
    assert_eq!(wrong_side, Err(GuardError::WhaleIntentMismatch));
}

#[test]
fn test_sell_intent_matches_on_token_amount() {
    // Quote value drifted between intent and execution; the token amount still matches
    let gate = evaluate(
        &config(),
        Some(pending(42_000, false)),
        &TraderState::default(),
        false,
        42_000,
        850,
        false,
        NOW + 600,
    );
    assert!(matches!(gate, Ok(WhaleGate::Execute(_))));
}

#[test]
fn test_whale_cooldown_after_execution() {
    let cfg = config();
    let mut trader = TraderState::default();
    record_execution(&mut trader, NOW);
    assert_eq!(trader.last_whale_trade_time, NOW);

    let blocked = evaluate(&cfg, None, &trader, false, 900, 900, false, NOW + 599);
    assert_eq!(blocked, Err(GuardError::WhaleCooldownActive));

    let allowed = evaluate(&cfg, None, &trader, false, 900, 900, false, NOW + 600);
    assert!(matches!(allowed, Ok(WhaleGate::Register(_))));

    // Cooldown does not apply to sub-threshold trades
    let small = evaluate(&cfg, None, &trader, false, 10, 10, true, NOW + 1);
    assert_eq!(small, Ok(WhaleGate::Bypass));
}
