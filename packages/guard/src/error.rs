use soroban_sdk::contracterror;

/// Rejections raised by the protection layer
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum GuardError {
    // Anti-bot (1-9)
    Blacklisted = 1,
    RelayedCallRejected = 2,
    EarlyBuyLimitExceeded = 3,
    CooldownActive = 4,

    // Circuit breaker (10-19)
    CircuitBreakerActive = 10,

    // Whale intent (20-29)
    WhaleIntentNotReady = 20,
    WhaleIntentMismatch = 21,
    WhaleCooldownActive = 22,
}
