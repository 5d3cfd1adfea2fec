//! Unit price resolution over quantity breaks.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use packcart_core::Sku;

use crate::catalog::PricingCatalog;
use crate::error::PriceError;

/// Resolve the unit price of `sku` when ordering `quantity` units.
///
/// The price starts at the first matching tier in catalog order and is then
/// overwritten by every matching tier whose threshold is `<= quantity`. The
/// last qualifying tier *in catalog order* wins, not the one with the highest
/// threshold: for tiers `[1 => 10, 10 => 8, 5 => 9]` and quantity 10 the result
/// is 9. Feeds are caller-ordered and that order is honoured as-is.
///
/// The returned value keeps full precision; use [`format_price`] for display.
pub fn resolve_price(catalog: &PricingCatalog, sku: &Sku, quantity: u32) -> Result<Decimal, PriceError> {
    let mut tiers = catalog.tiers_for(sku);
    let first = tiers
        .next()
        .ok_or_else(|| PriceError::SkuNotFound(sku.clone()))?;

    let price = tiers
        .filter(|tier| tier.quantity_threshold <= quantity)
        .fold(first.unit_price, |_, tier| tier.unit_price);

    tracing::debug!(%sku, quantity, %price, "resolved unit price");
    Ok(price)
}

/// Display form of a unit price: `$` and two decimals, halves rounded away
/// from zero.
pub fn format_price(price: Decimal) -> String {
    let rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${rounded:.2}")
}

/// A resolved unit price together with the line total it implies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub sku: Sku,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl Quote {
    pub fn display_unit_price(&self) -> String {
        format_price(self.unit_price)
    }

    pub fn display_line_total(&self) -> String {
        format_price(self.line_total)
    }
}

/// Resolve the unit price and compute the line total at full precision.
pub fn quote(catalog: &PricingCatalog, sku: &Sku, quantity: u32) -> Result<Quote, PriceError> {
    let unit_price = resolve_price(catalog, sku, quantity)?;
    Ok(Quote {
        sku: sku.clone(),
        quantity,
        unit_price,
        line_total: unit_price * Decimal::from(quantity),
    })
}
