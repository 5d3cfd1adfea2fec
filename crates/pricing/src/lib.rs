//! Quantity-break pricing.
//!
//! This crate holds the price table loaded from the pricing endpoint and the
//! resolution of a unit price for a SKU at a given order quantity. Pure
//! domain logic: no IO, no HTTP.

pub mod catalog;
pub mod error;
pub mod resolver;
pub mod tier;

pub use catalog::PricingCatalog;
pub use error::PriceError;
pub use resolver::{Quote, format_price, quote, resolve_price};
pub use tier::{PriceBreak, PriceTier};
