//! Adapter between the quantity input and the quantity/price components.
//!
//! A UI layer forwards its events here:
//!
//! | page event              | call                |
//! |-------------------------|---------------------|
//! | keystroke in the input  | [`QuantitySelector::on_input`]  |
//! | input committed (blur)  | [`QuantitySelector::on_change`] |
//! | plus / minus buttons    | [`QuantitySelector::on_plus`] / [`QuantitySelector::on_minus`] |
//! | add-to-cart click       | [`QuantitySelector::guard_submit`] |

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use packcart_core::Sku;
use packcart_quantity::{QuantityController, QuantityError, QuantityState};

use crate::client::CatalogSource;
use crate::config::StorefrontConfig;
use crate::debounce::Debouncer;
use crate::error::StorefrontError;
use crate::page::{PriceView, QuantityInput, SubmitButton, flash_error};
use crate::price_display::PriceDisplay;

/// Page elements the selector needs. Any of them may be missing from a page.
#[derive(Clone, Default)]
pub struct SelectorElements {
    pub quantity: Option<Arc<dyn QuantityInput>>,
    pub price: Option<Arc<dyn PriceView>>,
    pub submit: Option<Arc<dyn SubmitButton>>,
}

pub struct QuantitySelector {
    controller: Arc<Mutex<QuantityController>>,
    input: Arc<dyn QuantityInput>,
    price: Arc<PriceDisplay>,
    submit: Arc<dyn SubmitButton>,
    debouncer: Debouncer,
    error_flash: Duration,
}

impl QuantitySelector {
    /// Read the page attributes, settle the starting quantity and show its
    /// price.
    ///
    /// A missing quantity input, price element SKU or submit button leaves the
    /// page untouched.
    pub async fn initialize(
        config: &StorefrontConfig,
        elements: SelectorElements,
        catalog: Arc<dyn CatalogSource>,
    ) -> Result<Self, StorefrontError> {
        let (Some(input), Some(view), Some(submit)) = (elements.quantity, elements.price, elements.submit)
        else {
            tracing::warn!("quantity selector not initialized: page elements missing");
            return Err(StorefrontError::MissingFormElement("quantity selector elements"));
        };
        let Some(sku) = view.sku().map(Sku::new).filter(|sku| !sku.is_empty()) else {
            tracing::warn!("quantity selector not initialized: price element has no SKU");
            return Err(StorefrontError::MissingFormElement("price SKU"));
        };

        let controller = QuantityController::initialize(
            input.encoded_pack_size().as_deref(),
            input.moq_attribute().as_deref(),
            input.value().as_deref(),
        );
        let state = controller.state();
        input.set_min(state.minimum_order_quantity);
        if let Some(quantity) = state.current_quantity {
            input.set_value(quantity);
        }

        let price = Arc::new(PriceDisplay::new(sku, view, catalog));
        if price.load().await.is_ok() {
            if let Some(quantity) = state.current_quantity {
                let _ = price.update(quantity).await;
            }
        }

        Ok(Self {
            controller: Arc::new(Mutex::new(controller)),
            input,
            price,
            submit,
            debouncer: Debouncer::new(config.moq_debounce),
            error_flash: config.error_flash,
        })
    }

    /// Shared handle to the controller, e.g. for the product form.
    pub fn controller(&self) -> Arc<Mutex<QuantityController>> {
        Arc::clone(&self.controller)
    }

    pub async fn state(&self) -> QuantityState {
        self.controller.lock().await.state()
    }

    /// Raw keystroke. Records the pending edit and (re)schedules the MOQ
    /// refresh so only the last of a burst of changes is acted on.
    pub async fn on_input(&mut self, raw: &str) {
        self.controller.lock().await.edit(raw);

        let controller = Arc::clone(&self.controller);
        let input = Arc::clone(&self.input);
        let price = Arc::clone(&self.price);
        self.debouncer.schedule(async move {
            let (state, pending) = {
                let mut controller = controller.lock().await;
                let state = controller.refresh_moq(input.moq_attribute().as_deref());
                (state, controller.is_pending())
            };

            input.set_min(state.minimum_order_quantity);
            if pending {
                return;
            }
            if let Some(quantity) = state.current_quantity {
                input.set_value(quantity);
                let _ = price.update(quantity).await;
            }
        });
    }

    /// Committed value (change/blur): normalize and reprice.
    pub async fn on_change(&self, raw: &str) -> QuantityState {
        let state = self.controller.lock().await.commit(raw);
        self.apply(state).await
    }

    pub async fn on_plus(&self) -> QuantityState {
        let state = self.controller.lock().await.increment();
        self.apply(state).await
    }

    pub async fn on_minus(&self) -> QuantityState {
        let state = self.controller.lock().await.decrement();
        self.apply(state).await
    }

    /// MOQ check on the add-to-cart click, against the live `data-min`.
    ///
    /// On failure the button flashes and the caller must suppress the click.
    pub async fn guard_submit(&self) -> Result<u32, QuantityError> {
        let result = {
            let controller = self.controller.lock().await;
            controller.validate_against(
                self.input.moq_attribute().as_deref(),
                controller.pack_size(),
            )
        };

        if let Err(err) = &result {
            tracing::info!(error = %err, "add to cart blocked");
            flash_error(&self.submit, self.error_flash);
        }
        result
    }

    /// Tear down: cancel the pending MOQ refresh and forget the quantity.
    pub async fn dispose(&mut self) {
        self.debouncer.cancel();
        self.controller.lock().await.dispose();
    }

    async fn apply(&self, state: QuantityState) -> QuantityState {
        if let Some(quantity) = state.current_quantity {
            self.input.set_value(quantity);
            let _ = self.price.update(quantity).await;
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::memory::{MemoryPage, StaticCatalog};
    use packcart_pricing::PricingCatalog;
    use packcart_quantity::QuantityPhase;

    // base64("6")
    const PACK_OF_SIX: &str = "Ng==";

    fn catalog() -> PricingCatalog {
        PricingCatalog::from_json(
            r#"{ "record": [
                { "sku": "WIDGET", "prices": [
                    { "qtyBreak": 6, "priceBreak": 3.00 },
                    { "qtyBreak": 24, "priceBreak": 2.50 },
                    { "qtyBreak": 12, "priceBreak": 2.75 }
                ] }
            ] }"#,
        )
        .unwrap()
    }

    fn page(moq: &str) -> Arc<MemoryPage> {
        Arc::new(
            MemoryPage::new()
                .with_quantity_input(Some(PACK_OF_SIX), Some(moq), None)
                .with_price_sku(" WIDGET "),
        )
    }

    fn elements(page: &Arc<MemoryPage>) -> SelectorElements {
        SelectorElements {
            quantity: Some(page.clone()),
            price: Some(page.clone()),
            submit: Some(page.clone()),
        }
    }

    async fn selector(page: &Arc<MemoryPage>) -> QuantitySelector {
        QuantitySelector::initialize(
            &StorefrontConfig::default(),
            elements(page),
            Arc::new(StaticCatalog::loaded(catalog())),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn initialize_snaps_to_moq_and_shows_price() {
        let page = page("24");
        let selector = selector(&page).await;

        let snapshot = page.snapshot();
        assert_eq!(snapshot.quantity_value.as_deref(), Some("24"));
        assert_eq!(snapshot.min, Some(24));
        // Tiers are scanned in feed order: 24 qualifies for 6, 24 and 12.
        assert_eq!(snapshot.price_text.as_deref(), Some("$2.75"));
        assert_eq!(selector.state().await.current_quantity, Some(24));
    }

    #[tokio::test]
    async fn initialize_requires_page_elements() {
        let page = page("24");
        let missing_input = SelectorElements {
            quantity: None,
            ..elements(&page)
        };
        let err = QuantitySelector::initialize(
            &StorefrontConfig::default(),
            missing_input,
            Arc::new(StaticCatalog::loaded(catalog())),
        )
        .await
        .err()
        .unwrap();
        assert!(matches!(err, StorefrontError::MissingFormElement(_)));

        let no_sku = Arc::new(MemoryPage::new().with_quantity_input(Some(PACK_OF_SIX), None, None));
        let result = QuantitySelector::initialize(
            &StorefrontConfig::default(),
            elements(&no_sku),
            Arc::new(StaticCatalog::loaded(catalog())),
        )
        .await;
        assert!(matches!(result, Err(StorefrontError::MissingFormElement("price SKU"))));
    }

    #[tokio::test]
    async fn catalog_failure_does_not_block_the_selector() {
        let page = page("6");
        let selector = QuantitySelector::initialize(
            &StorefrontConfig::default(),
            elements(&page),
            Arc::new(StaticCatalog::failing(ClientError::Api(500, "boom".into()))),
        )
        .await
        .unwrap();

        assert_eq!(
            page.snapshot().price_text.as_deref(),
            Some(crate::price_display::FETCH_FAILED_MESSAGE)
        );
        assert_eq!(selector.on_plus().await.current_quantity, Some(12));
        assert_eq!(
            page.snapshot().price_text.as_deref(),
            Some(crate::price_display::NOT_LOADED_MESSAGE)
        );
    }

    #[tokio::test]
    async fn plus_and_minus_step_by_pack_and_reprice() {
        let page = page("6");
        let selector = selector(&page).await;
        assert_eq!(page.snapshot().price_text.as_deref(), Some("$3.00"));

        assert_eq!(selector.on_plus().await.current_quantity, Some(12));
        assert_eq!(page.snapshot().price_text.as_deref(), Some("$2.75"));
        assert_eq!(page.snapshot().quantity_value.as_deref(), Some("12"));

        selector.on_minus().await;
        assert_eq!(selector.on_minus().await.current_quantity, Some(6));
        assert_eq!(page.snapshot().price_text.as_deref(), Some("$3.00"));
    }

    #[tokio::test(start_paused = true)]
    async fn typed_value_below_moq_is_rejected_on_submit() {
        let page = page("24");
        let selector = selector(&page).await;

        let state = selector.on_change("20").await;
        assert_eq!(state.current_quantity, Some(6));
        assert_eq!(page.snapshot().quantity_value.as_deref(), Some("6"));

        let err = selector.guard_submit().await.unwrap_err();
        assert_eq!(err, QuantityError::BelowMinimum { quantity: 6, minimum: 24 });
        assert_eq!(page.snapshot().classes, vec!["shake", "error-border"]);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(page.snapshot().classes.is_empty());
    }

    #[tokio::test]
    async fn guard_submit_passes_at_moq() {
        let page = page("24");
        let selector = selector(&page).await;
        assert_eq!(selector.guard_submit().await, Ok(24));
        assert!(page.snapshot().classes.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn moq_refresh_is_debounced_to_last_change() {
        let page = page("6");
        let mut selector = selector(&page).await;

        // Rapid variant swaps: only the final MOQ is observed.
        for moq in ["12", "18", "30"] {
            page.set_moq_attribute(Some(moq));
            selector.on_input("").await;
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert_eq!(page.snapshot().min, Some(6));

        tokio::time::sleep(Duration::from_millis(250)).await;
        let snapshot = page.snapshot();
        assert_eq!(snapshot.min, Some(30));
        assert_eq!(snapshot.quantity_value.as_deref(), Some("30"));

        let state = selector.state().await;
        assert_eq!(state.minimum_order_quantity, 30);
        assert_eq!(state.current_quantity, Some(30));
    }

    #[tokio::test(start_paused = true)]
    async fn moq_refresh_leaves_large_pending_edit_alone() {
        let page = page("6");
        let mut selector = selector(&page).await;

        page.set_moq_attribute(Some("12"));
        selector.on_input("48").await;
        tokio::time::sleep(Duration::from_millis(300)).await;

        let controller = selector.controller();
        let controller = controller.lock().await;
        assert_eq!(
            controller.phase(),
            &QuantityPhase::PendingValidation { raw: "48".to_string() }
        );
        assert_eq!(controller.minimum_order_quantity(), 12);
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_cancels_pending_refresh() {
        let page = page("6");
        let mut selector = selector(&page).await;

        page.set_moq_attribute(Some("60"));
        selector.on_input("").await;
        selector.dispose().await;
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(page.snapshot().min, Some(6));
        assert_eq!(selector.state().await.current_quantity, None);
    }
}
