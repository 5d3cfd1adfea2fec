use thiserror::Error;

use packcart_core::Sku;
use packcart_pricing::PriceError;
use packcart_quantity::QuantityError;

/// Failure talking to the pricing feed or the storefront.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
}

/// Why a page component gave up on an operation.
///
/// None of these are fatal to the page: controls are always left interactive
/// so the shopper can try again.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorefrontError {
    /// Another submission from the same form has not finished yet.
    #[error("a submission is already in flight")]
    InFlight,

    #[error("pricing catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("no pricing found for SKU `{0}`")]
    SkuNotFound(Sku),

    #[error(transparent)]
    BelowMinimum(#[from] QuantityError),

    /// A page element the operation depends on is absent.
    #[error("form element missing: {0}")]
    MissingFormElement(&'static str),

    /// The cart rejected the request or could not be reached.
    #[error("cart request failed: {0}")]
    Cart(ClientError),
}

impl From<PriceError> for StorefrontError {
    fn from(err: PriceError) -> Self {
        match err {
            PriceError::CatalogUnavailable(msg) => Self::CatalogUnavailable(msg),
            PriceError::SkuNotFound(sku) => Self::SkuNotFound(sku),
        }
    }
}
