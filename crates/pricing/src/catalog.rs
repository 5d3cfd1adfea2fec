//! The pricing table served by the pricing endpoint.
//!
//! The feed is a JSON document whose `record` field lists entries in one of two
//! shapes, which may be mixed freely:
//!
//! ```json
//! { "record": [
//!     { "sku": "A", "qtyBreak": 1, "priceBreak": 10.0 },
//!     { "sku": "B", "prices": [ { "qtyBreak": 1, "priceBreak": 4.0 },
//!                               { "qtyBreak": 12, "priceBreak": 3.5 } ] }
//! ] }
//! ```
//!
//! Both are flattened into one tier per breakpoint, in document order. Order
//! matters: see [`crate::resolver::resolve_price`].

use rust_decimal::Decimal;
use serde::Deserialize;

use packcart_core::{DomainError, Sku};

use crate::error::PriceError;
use crate::tier::{PriceBreak, PriceTier, deserialize_qty_break};

/// Read-only list of price tiers for every SKU, in feed order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "CatalogDocument")]
pub struct PricingCatalog {
    tiers: Vec<PriceTier>,
}

impl PricingCatalog {
    pub fn new(tiers: Vec<PriceTier>) -> Self {
        Self { tiers }
    }

    /// Parse a pricing feed body.
    pub fn from_json(body: &str) -> Result<Self, PriceError> {
        serde_json::from_str(body).map_err(|e| PriceError::catalog_unavailable(e.to_string()))
    }

    pub fn tiers(&self) -> &[PriceTier] {
        &self.tiers
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Tiers for `sku`, in catalog order.
    pub fn tiers_for<'a>(&'a self, sku: &'a Sku) -> impl Iterator<Item = &'a PriceTier> + 'a {
        self.tiers.iter().filter(move |tier| tier.sku == *sku)
    }

    /// Flattened threshold/price list for `sku`, as attached to a cart line.
    pub fn price_breaks(&self, sku: &Sku) -> Vec<PriceBreak> {
        self.tiers_for(sku).map(PriceTier::price_break).collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    Wrapped { record: Vec<CatalogEntry> },
    Bare(Vec<CatalogEntry>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogEntry {
    Nested {
        sku: Sku,
        prices: Vec<PriceBreak>,
    },
    Flat {
        sku: Sku,
        #[serde(rename = "qtyBreak", deserialize_with = "deserialize_qty_break")]
        qty_break: u32,
        #[serde(rename = "priceBreak")]
        price_break: Decimal,
    },
}

impl TryFrom<CatalogDocument> for PricingCatalog {
    type Error = DomainError;

    fn try_from(doc: CatalogDocument) -> Result<Self, Self::Error> {
        let entries = match doc {
            CatalogDocument::Wrapped { record } => record,
            CatalogDocument::Bare(entries) => entries,
        };

        let mut tiers = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry {
                CatalogEntry::Nested { sku, prices } => {
                    for price in prices {
                        tiers.push(PriceTier::new(sku.clone(), price.qty_break, price.price_break)?);
                    }
                }
                CatalogEntry::Flat {
                    sku,
                    qty_break,
                    price_break,
                } => tiers.push(PriceTier::new(sku, qty_break, price_break)?),
            }
        }

        tracing::debug!(tiers = tiers.len(), "pricing catalog loaded");
        Ok(Self { tiers })
    }
}
