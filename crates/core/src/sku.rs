//! Stock-keeping unit identifier.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// A SKU, stored in its trimmed form.
///
/// Page attributes and catalog rows are compared after trimming surrounding
/// whitespace, so the trimmed text is the only representation kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    /// Build a SKU from raw text, trimming it. Blank input yields an empty SKU,
    /// which never matches a catalog row with a real SKU.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_string())
    }

    /// Like [`Sku::new`] but rejects blank input.
    pub fn parse(raw: impl AsRef<str>) -> DomainResult<Self> {
        let sku = Self::new(raw);
        if sku.0.is_empty() {
            return Err(DomainError::validation("SKU cannot be empty"));
        }
        Ok(sku)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether raw text names this SKU once trimmed.
    pub fn matches(&self, raw: &str) -> bool {
        self.0 == raw.trim()
    }
}

impl ValueObject for Sku {}

impl core::fmt::Display for Sku {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Sku {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Sku {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

/// Catalog feeds are hand-edited JSON; numeric SKUs show up unquoted.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSku {
    Text(String),
    Number(serde_json::Number),
}

impl<'de> Deserialize<'de> for Sku {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawSku::deserialize(deserializer)? {
            RawSku::Text(text) => Sku::new(text),
            RawSku::Number(n) => Sku::new(n.to_string()),
        })
    }
}
