//! Add-to-cart submission.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;
use tokio::sync::Mutex;

use packcart_quantity::QuantityController;

use crate::cart::{CartAddRequest, CartLineItem, LineItemProperties, SectionsUpdateRequest};
use crate::client::{CartApi, CatalogSource};
use crate::config::StorefrontConfig;
use crate::error::StorefrontError;
use crate::page::{
    CartNotification, ErrorBanner, QuantityInput, SubmitButton, VariantInput, flash_error,
};

pub const ADD_FAILED_MESSAGE: &str = "There was an error adding the product to the cart.";

/// Page elements of the product form. Only the submit button is required.
#[derive(Clone)]
pub struct FormElements {
    pub submit: Arc<dyn SubmitButton>,
    pub quantity: Option<Arc<dyn QuantityInput>>,
    pub variant: Option<Arc<dyn VariantInput>>,
    pub error_banner: Option<Arc<dyn ErrorBanner>>,
    pub notification: Option<Arc<dyn CartNotification>>,
}

impl FormElements {
    pub fn new(submit: Arc<dyn SubmitButton>) -> Self {
        Self {
            submit,
            quantity: None,
            variant: None,
            error_banner: None,
            notification: None,
        }
    }
}

/// Puts the submit button in its loading state for the life of a submission.
///
/// Dropping the guard reverts the button and clears the in-flight flag,
/// including when the submission future is dropped mid-await.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
    button: &'a Arc<dyn SubmitButton>,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool, button: &'a Arc<dyn SubmitButton>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        button.set_loading(true);
        Some(Self { flag, button })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.button.set_loading(false);
        self.flag.store(false, Ordering::Release);
    }
}

pub struct ProductForm {
    config: StorefrontConfig,
    catalog: Arc<dyn CatalogSource>,
    cart: Arc<dyn CartApi>,
    elements: FormElements,
    quantity: Arc<Mutex<QuantityController>>,
    in_flight: AtomicBool,
}

impl ProductForm {
    /// `quantity` is the controller owned by the page's quantity selector.
    pub fn new(
        config: StorefrontConfig,
        catalog: Arc<dyn CatalogSource>,
        cart: Arc<dyn CartApi>,
        elements: FormElements,
        quantity: Arc<Mutex<QuantityController>>,
    ) -> Self {
        Self {
            config,
            catalog,
            cart,
            elements,
            quantity,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Submit the form. Returns the cart's response to the add request.
    ///
    /// At most one submission runs at a time; a second call while one is in
    /// flight returns [`StorefrontError::InFlight`] without touching the page.
    pub async fn submit(&self) -> Result<Value, StorefrontError> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight, &self.elements.submit) else {
            tracing::debug!("submission ignored: already in flight");
            return Err(StorefrontError::InFlight);
        };

        if let Some(banner) = &self.elements.error_banner {
            banner.hide();
        }

        self.add_to_cart().await
    }

    async fn add_to_cart(&self) -> Result<Value, StorefrontError> {
        let catalog = self.catalog.fetch_catalog().await.map_err(|err| {
            tracing::error!(error = %err, "error fetching pricing data");
            StorefrontError::CatalogUnavailable(err.to_string())
        })?;

        let Some(input) = &self.elements.quantity else {
            tracing::error!("quantity input not found");
            return Err(StorefrontError::MissingFormElement("quantity input"));
        };
        let validated = self
            .quantity
            .lock()
            .await
            .validate_against(input.moq_attribute().as_deref(), 1);
        let quantity = match validated {
            Ok(quantity) => quantity,
            Err(err) => {
                tracing::info!(error = %err, "add to cart blocked");
                flash_error(&self.elements.submit, self.config.error_flash);
                return Err(err.into());
            }
        };

        let Some(variant) = self
            .elements
            .variant
            .as_ref()
            .and_then(|input| input.selected_variant())
        else {
            tracing::error!("variant input not found");
            return Err(StorefrontError::MissingFormElement("variant input"));
        };

        let prices = catalog.price_breaks(&variant.sku);
        if prices.is_empty() {
            tracing::error!(sku = %variant.sku, "no pricing data for this SKU");
            return Err(StorefrontError::SkuNotFound(variant.sku));
        }

        if let Some(notification) = &self.elements.notification {
            notification.render_product(variant.display_title(), &variant.display_image_url());
        }

        let request = CartAddRequest::single(
            CartLineItem {
                id: variant.variant_id.clone(),
                quantity,
                properties: LineItemProperties {
                    sku: variant.sku.clone(),
                    prices,
                },
            },
            self.config.sections_url.clone(),
        );

        let response = match self.cart.add(&request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(sku = %variant.sku, quantity, error = %err, "error adding to cart");
                if !self.config.hide_errors {
                    if let Some(banner) = &self.elements.error_banner {
                        banner.show(ADD_FAILED_MESSAGE);
                    }
                }
                return Err(StorefrontError::Cart(err));
            }
        };
        tracing::info!(sku = %variant.sku, variant_id = %variant.variant_id, quantity, "added to cart");

        if let Some(notification) = &self.elements.notification {
            let sections = SectionsUpdateRequest {
                sections: notification.section_ids(),
                sections_url: self.config.sections_url.clone(),
            };
            if let Err(err) = self.cart.update_sections(&sections).await {
                tracing::warn!(error = %err, "error refreshing cart sections");
            }
            notification.open();
        }

        Ok(response)
    }
}
