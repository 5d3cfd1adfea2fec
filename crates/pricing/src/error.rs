use packcart_core::Sku;
use thiserror::Error;

/// Why a price could not be produced for the current render.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The pricing table could not be fetched or parsed.
    #[error("pricing catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// The catalog has no tier for this SKU.
    #[error("no pricing found for SKU `{0}`")]
    SkuNotFound(Sku),
}

impl PriceError {
    pub fn catalog_unavailable(msg: impl Into<String>) -> Self {
        Self::CatalogUnavailable(msg.into())
    }
}
