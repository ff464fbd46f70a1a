// Narwhal Guard Package
//
// Per-trader and per-instance protection state for the launch engine:
// anti-bot limits, the whale intent protocol and the circuit breaker.

#![no_std]

pub mod anti_bot;
pub mod breaker;
pub mod error;
pub mod types;
pub mod whale;

pub use error::GuardError;

pub use types::{
    AntiBotConfig,
    CircuitBreakerConfig,
    PricePoint,
    ProtectionWindow,
    TraderState,
    WhaleIntent,
    WhaleLimitConfig,
};

pub use anti_bot::RelayStatus;
pub use breaker::{ImpactVerdict, MAX_RECENT_PRICES, VOLATILITY_MOVE_BPS};
pub use whale::WhaleGate;
