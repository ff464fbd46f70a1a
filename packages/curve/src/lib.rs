// Narwhal Curve Math Package

#![no_std]

pub mod constants;
pub mod curve;
pub mod error;
pub mod fixed;

pub use constants::*;
pub use error::CurveError;

pub use fixed::{apply_bps, mul_div, relative_change_bps, share_bps};

pub use curve::{
    current_price,
    invariant,
    price_impact_bps,
    quote_in,
    quote_out,
    tokens_out,
    BuyQuote,
    CurvePoint,
    SellQuote,
};
