//! Inline unit price shown next to the quantity control.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::RwLock;

use packcart_core::Sku;
use packcart_pricing::{PriceError, PricingCatalog, format_price, resolve_price};

use crate::client::CatalogSource;
use crate::page::PriceView;

pub const FETCH_FAILED_MESSAGE: &str = "Error fetching price data.";
pub const NOT_LOADED_MESSAGE: &str = "Price data not available.";
pub const SKU_NOT_FOUND_MESSAGE: &str = "Price not available.";

#[derive(Debug, Clone)]
enum CatalogState {
    Loading,
    Loaded(Arc<PricingCatalog>),
    Failed,
}

/// Keeps the displayed price in step with the quantity.
///
/// Fetches its own copy of the catalog once. Failures only change the text
/// shown; they never block the add-to-cart path.
pub struct PriceDisplay {
    sku: Sku,
    view: Arc<dyn PriceView>,
    source: Arc<dyn CatalogSource>,
    catalog: RwLock<CatalogState>,
}

impl PriceDisplay {
    pub fn new(sku: Sku, view: Arc<dyn PriceView>, source: Arc<dyn CatalogSource>) -> Self {
        Self {
            sku,
            view,
            source,
            catalog: RwLock::new(CatalogState::Loading),
        }
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    /// Fetch the catalog. On failure the view shows [`FETCH_FAILED_MESSAGE`].
    pub async fn load(&self) -> Result<(), PriceError> {
        match self.source.fetch_catalog().await {
            Ok(catalog) => {
                tracing::debug!(sku = %self.sku, tiers = catalog.len(), "price display catalog loaded");
                *self.catalog.write().await = CatalogState::Loaded(Arc::new(catalog));
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "error fetching pricing data");
                *self.catalog.write().await = CatalogState::Failed;
                self.view.show_error(FETCH_FAILED_MESSAGE);
                Err(PriceError::catalog_unavailable(err.to_string()))
            }
        }
    }

    /// Resolve and show the unit price for `quantity`.
    pub async fn update(&self, quantity: u32) -> Result<Decimal, PriceError> {
        let catalog = match &*self.catalog.read().await {
            CatalogState::Loaded(catalog) => Arc::clone(catalog),
            CatalogState::Loading | CatalogState::Failed => {
                tracing::error!(sku = %self.sku, "pricing data not available");
                self.view.show_error(NOT_LOADED_MESSAGE);
                return Err(PriceError::catalog_unavailable("catalog not loaded"));
            }
        };

        match resolve_price(&catalog, &self.sku, quantity) {
            Ok(price) => {
                self.view.show_price(&format_price(price));
                Ok(price)
            }
            Err(err) => {
                tracing::error!(sku = %self.sku, error = %err, "no pricing data for this SKU");
                self.view.show_error(SKU_NOT_FOUND_MESSAGE);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::memory::{MemoryPage, StaticCatalog};

    fn catalog() -> PricingCatalog {
        PricingCatalog::from_json(
            r#"{ "record": [
                { "sku": "A", "qtyBreak": 1, "priceBreak": 10 },
                { "sku": "A", "qtyBreak": 10, "priceBreak": 8 },
                { "sku": "A", "qtyBreak": 5, "priceBreak": 9 }
            ] }"#,
        )
        .unwrap()
    }

    fn display(page: &Arc<MemoryPage>, sku: &str, source: StaticCatalog) -> PriceDisplay {
        PriceDisplay::new(Sku::new(sku), page.clone(), Arc::new(source))
    }

    #[tokio::test]
    async fn shows_resolved_price() {
        let page = Arc::new(MemoryPage::new());
        let display = display(&page, "A", StaticCatalog::loaded(catalog()));
        assert_eq!(display.sku(), &Sku::new("A"));

        display.load().await.unwrap();
        display.update(10).await.unwrap();
        assert_eq!(page.snapshot().price_text.as_deref(), Some("$9.00"));

        display.update(1).await.unwrap();
        assert_eq!(page.snapshot().price_text.as_deref(), Some("$10.00"));
    }

    #[tokio::test]
    async fn update_before_load_reports_not_available() {
        let page = Arc::new(MemoryPage::new());
        let display = display(&page, "A", StaticCatalog::loaded(catalog()));

        let err = display.update(10).await.unwrap_err();
        assert!(matches!(err, PriceError::CatalogUnavailable(_)));
        assert_eq!(page.snapshot().price_text.as_deref(), Some(NOT_LOADED_MESSAGE));
    }

    #[tokio::test]
    async fn fetch_failure_is_shown_inline() {
        let page = Arc::new(MemoryPage::new());
        let display = display(
            &page,
            "A",
            StaticCatalog::failing(ClientError::Network("connection refused".into())),
        );

        assert!(display.load().await.is_err());
        assert_eq!(page.snapshot().price_text.as_deref(), Some(FETCH_FAILED_MESSAGE));

        assert!(display.update(6).await.is_err());
        assert_eq!(page.snapshot().price_text.as_deref(), Some(NOT_LOADED_MESSAGE));
    }

    #[tokio::test]
    async fn unknown_sku_is_shown_inline() {
        let page = Arc::new(MemoryPage::new());
        let display = display(&page, "B", StaticCatalog::loaded(catalog()));

        display.load().await.unwrap();
        let err = display.update(6).await.unwrap_err();
        assert_eq!(err, PriceError::SkuNotFound(Sku::new("B")));
        assert_eq!(page.snapshot().price_text.as_deref(), Some(SKU_NOT_FOUND_MESSAGE));
    }
}
