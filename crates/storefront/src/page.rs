//! Product page elements, as seen by the components.
//!
//! A UI adapter implements these over whatever actually renders the page.
//! Methods take `&self`; implementations use interior mutability.

use std::sync::Arc;
use std::time::Duration;

use packcart_core::Sku;

/// Classes applied to the submit button when a submission is rejected.
pub const ERROR_FLASH_CLASSES: [&str; 2] = ["shake", "error-border"];

pub const DEFAULT_PRODUCT_TITLE: &str = "Product Name";
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/150";

/// The quantity input and its data attributes.
pub trait QuantityInput: Send + Sync {
    /// Raw input value; `None` when empty.
    fn value(&self) -> Option<String>;
    fn set_value(&self, quantity: u32);
    /// Base64 pack size (`data-encoded-min`).
    fn encoded_pack_size(&self) -> Option<String>;
    /// Plain MOQ (`data-min`). May change while the page is open.
    fn moq_attribute(&self) -> Option<String>;
    /// Reflect the MOQ on the input's `min`.
    fn set_min(&self, moq: u32);
}

/// Inline price text next to the quantity control.
pub trait PriceView: Send + Sync {
    /// SKU the price element is bound to (`data-product-sku`).
    fn sku(&self) -> Option<String>;
    fn show_price(&self, text: &str);
    fn show_error(&self, message: &str);
}

pub trait SubmitButton: Send + Sync {
    /// Toggle the busy state (disabled + spinner).
    fn set_loading(&self, loading: bool);
    fn add_classes(&self, classes: &[&str]);
    fn remove_classes(&self, classes: &[&str]);
}

/// Error message area of the product form.
pub trait ErrorBanner: Send + Sync {
    fn show(&self, message: &str);
    fn hide(&self);
}

/// The variant-id control of the product form.
pub trait VariantInput: Send + Sync {
    fn selected_variant(&self) -> Option<SelectedVariant>;
}

/// Cart notification / drawer.
pub trait CartNotification: Send + Sync {
    /// Ids of the sections to re-render after an add.
    fn section_ids(&self) -> Vec<String>;
    fn render_product(&self, title: &str, image_url: &str);
    fn open(&self);
}

/// Variant chosen in the product form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedVariant {
    pub sku: Sku,
    pub variant_id: String,
    pub title: String,
    pub image_url: String,
}

impl SelectedVariant {
    pub fn display_title(&self) -> &str {
        match self.title.trim() {
            "" => DEFAULT_PRODUCT_TITLE,
            title => title,
        }
    }

    /// Image URL with protocol-relative links made absolute.
    pub fn display_image_url(&self) -> String {
        match self.image_url.trim() {
            "" => PLACEHOLDER_IMAGE_URL.to_string(),
            url if url.starts_with("//") => format!("https:{url}"),
            url => url.to_string(),
        }
    }
}

/// Apply [`ERROR_FLASH_CLASSES`] to `button` and remove them after `duration`.
pub fn flash_error(button: &Arc<dyn SubmitButton>, duration: Duration) {
    button.add_classes(&ERROR_FLASH_CLASSES);
    let button = Arc::clone(button);
    tokio::spawn(async move {
        tokio::time::sleep(duration).await;
        button.remove_classes(&ERROR_FLASH_CLASSES);
    });
}
