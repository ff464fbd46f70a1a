use soroban_sdk::contracterror;

/// Errors produced by the pure curve math
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum CurveError {
    /// Amount is negative or otherwise unusable
    InvalidAmount = 1,
    /// Fee must be below 100%
    InvalidFee = 2,
    /// Trade would drain the token side of the curve
    InsufficientDepth = 3,
    /// Zero or negative denominator
    DivisionByZero = 4,
    /// Result does not fit in i128
    Overflow = 5,
}
