// Constants module for the Narwhal bonding curve
//
// - Grouped by functionality
// - Uses the same integer types as the amounts they scale

// ============================================================
// BASIS POINTS
// ============================================================

/// Basis point denominator (100% = 10000 bps)
pub const BPS_DENOMINATOR: i128 = 10_000;

/// Maximum configurable fee in basis points (100%)
pub const MAX_FEE_BPS: u32 = 10_000;

// ============================================================
// PRICE SCALING
// ============================================================

/// One whole traded token in base units (18 decimals)
/// Prices are expressed as quote base units per whole token
pub const TOKEN_UNIT: i128 = 1_000_000_000_000_000_000;
