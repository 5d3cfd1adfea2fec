use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use packcart_core::{DomainError, DomainResult, Sku, ValueObject};

/// One quantity breakpoint: at or above `quantity_threshold` units the unit
/// price is `unit_price`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceTier {
    pub sku: Sku,
    pub quantity_threshold: u32,
    pub unit_price: Decimal,
}

impl PriceTier {
    pub fn new(sku: impl Into<Sku>, quantity_threshold: u32, unit_price: Decimal) -> DomainResult<Self> {
        let tier = Self {
            sku: sku.into(),
            quantity_threshold,
            unit_price,
        };
        tier.validate()?;
        Ok(tier)
    }

    pub(crate) fn validate(&self) -> DomainResult<()> {
        if self.quantity_threshold == 0 {
            return Err(DomainError::validation(format!(
                "quantity break for SKU `{}` must be at least 1",
                self.sku
            )));
        }
        if self.unit_price.is_sign_negative() {
            return Err(DomainError::validation(format!(
                "price break for SKU `{}` cannot be negative",
                self.sku
            )));
        }
        Ok(())
    }

    pub fn price_break(&self) -> PriceBreak {
        PriceBreak {
            qty_break: self.quantity_threshold,
            price_break: self.unit_price,
        }
    }
}

impl ValueObject for PriceTier {}

/// Threshold/price pair as it appears on the wire, both in the pricing feed and
/// in the `_prices` line-item property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreak {
    #[serde(rename = "qtyBreak", deserialize_with = "deserialize_qty_break")]
    pub qty_break: u32,
    #[serde(rename = "priceBreak", serialize_with = "rust_decimal::serde::float::serialize")]
    pub price_break: Decimal,
}

impl ValueObject for PriceBreak {}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawQtyBreak {
    Integer(u64),
    Float(f64),
    Text(String),
}

/// Accepts `6`, `6.0`, `"6"` and `"6.0"`, the same leniency `priceBreak` gets.
/// Fractional, negative or out-of-range thresholds are rejected.
pub(crate) fn deserialize_qty_break<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match RawQtyBreak::deserialize(deserializer)? {
        RawQtyBreak::Integer(n) => return u32::try_from(n).map_err(D::Error::custom),
        RawQtyBreak::Float(f) => f,
        RawQtyBreak::Text(text) => {
            let text = text.trim();
            match text.parse::<u32>() {
                Ok(n) => return Ok(n),
                Err(_) => text
                    .parse::<f64>()
                    .map_err(|_| D::Error::custom(format!("qtyBreak `{text}` is not a number")))?,
            }
        }
    };

    if value.is_finite() && value.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&value) {
        Ok(value as u32)
    } else {
        Err(D::Error::custom(format!("qtyBreak {value} is not a whole quantity")))
    }
}
