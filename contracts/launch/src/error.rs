// Error handling for the launch contract
//
// Codes are grouped by hundreds. The guard and curve packages carry their
// own error enums; both convert into LaunchError so `?` propagates.

use soroban_sdk::contracterror;

use narwhal_curve::CurveError;
use narwhal_guard::GuardError;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum LaunchError {
    // Initialization errors (100-199)
    /// Instance has already been initialized
    AlreadyInitialized = 100,
    /// Instance has not been initialized
    NotInitialized = 101,
    /// Curve supplies, virtual reserves or threshold are inconsistent
    InvalidCurveConfig = 102,
    /// A fee exceeds max_fee, or max_fee is out of range
    InvalidFeeConfig = 103,
    /// Anti-bot, breaker or whale limits are out of range
    InvalidProtectionConfig = 104,

    // Validation errors (200-299)
    /// Amount must be positive
    InvalidAmount = 200,
    /// Buy is below min_buy_amount
    AmountTooSmall = 201,
    /// Trader holds fewer tokens than they are selling
    InsufficientBalance = 202,

    // Policy errors (300-399)
    Paused = 300,
    NotPaused = 301,
    Blacklisted = 302,
    /// Relayer is not on the trusted list
    RelayedCallRejected = 303,
    EarlyBuyLimitExceeded = 304,
    CooldownActive = 305,
    TradeSizeTooLarge = 306,
    SellTooLarge = 307,
    ExceedsMaxWallet = 308,
    ExceedsMaxSupply = 309,
    AlreadyGraduated = 310,
    Unauthorized = 311,
    /// Creator tokens cannot be sold back before graduation
    CreatorLocked = 312,

    // Protocol state errors (400-499)
    CircuitBreakerActive = 400,
    /// Whale-sized order needs a registered intent first
    WhaleIntentRequired = 401,
    WhaleIntentNotReady = 402,
    WhaleIntentMismatch = 403,
    WhaleCooldownActive = 404,
    NoWhaleIntent = 405,
    /// A mutating call is already in progress on this instance
    Reentrancy = 406,

    // Slippage and liquidity errors (500-599)
    SlippageTooHigh = 500,
    InsufficientLiquidity = 501,

    // Collaborator errors (600-699)
    /// A ledger refused a transfer
    TransferFailed = 600,
    /// The market rejected the graduation handoff
    GraduationFailed = 601,
    /// Reserves are below the graduation threshold
    ThresholdNotMet = 602,

    // Math errors (700-799)
    MathOverflow = 700,
    DivisionByZero = 701,
}

impl From<GuardError> for LaunchError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::Blacklisted => LaunchError::Blacklisted,
            GuardError::RelayedCallRejected => LaunchError::RelayedCallRejected,
            GuardError::EarlyBuyLimitExceeded => LaunchError::EarlyBuyLimitExceeded,
            GuardError::CooldownActive => LaunchError::CooldownActive,
            GuardError::CircuitBreakerActive => LaunchError::CircuitBreakerActive,
            GuardError::WhaleIntentNotReady => LaunchError::WhaleIntentNotReady,
            GuardError::WhaleIntentMismatch => LaunchError::WhaleIntentMismatch,
            GuardError::WhaleCooldownActive => LaunchError::WhaleCooldownActive,
        }
    }
}

impl From<CurveError> for LaunchError {
    fn from(err: CurveError) -> Self {
        match err {
            CurveError::InvalidAmount => LaunchError::InvalidAmount,
            CurveError::InvalidFee => LaunchError::InvalidFeeConfig,
            CurveError::InsufficientDepth => LaunchError::InsufficientLiquidity,
            CurveError::DivisionByZero => LaunchError::DivisionByZero,
            CurveError::Overflow => LaunchError::MathOverflow,
        }
    }
}
