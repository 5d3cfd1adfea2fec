//! In-memory page, catalog and cart for tests/dev.
//!
//! - No IO
//! - Everything recorded so it can be inspected afterwards
//! - Lock poisoning is ignored (the data stays usable for inspection)

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use packcart_pricing::PricingCatalog;

use crate::cart::{CartAddRequest, SectionsUpdateRequest};
use crate::client::{CartApi, CatalogSource};
use crate::error::ClientError;
use crate::page::{
    CartNotification, ErrorBanner, PriceView, QuantityInput, SelectedVariant, SubmitButton,
    VariantInput,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Everything a [`MemoryPage`] has been told or holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSnapshot {
    pub quantity_value: Option<String>,
    pub encoded_pack_size: Option<String>,
    pub moq_attribute: Option<String>,
    pub min: Option<u32>,
    pub price_sku: Option<String>,
    pub price_text: Option<String>,
    pub loading: bool,
    pub classes: Vec<String>,
    pub error_message: Option<String>,
    pub variant: Option<SelectedVariant>,
    pub section_ids: Vec<String>,
    pub rendered_product: Option<(String, String)>,
    pub notification_open: bool,
}

/// A product page held in memory. Implements every page trait.
#[derive(Debug, Default)]
pub struct MemoryPage {
    state: Mutex<PageSnapshot>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quantity_input(
        self,
        encoded_pack_size: Option<&str>,
        moq_attribute: Option<&str>,
        value: Option<&str>,
    ) -> Self {
        {
            let mut state = lock(&self.state);
            state.encoded_pack_size = encoded_pack_size.map(str::to_string);
            state.moq_attribute = moq_attribute.map(str::to_string);
            state.quantity_value = value.map(str::to_string);
        }
        self
    }

    pub fn with_price_sku(self, sku: &str) -> Self {
        lock(&self.state).price_sku = Some(sku.to_string());
        self
    }

    pub fn with_variant(self, variant: SelectedVariant) -> Self {
        lock(&self.state).variant = Some(variant);
        self
    }

    pub fn with_sections(self, ids: &[&str]) -> Self {
        lock(&self.state).section_ids = ids.iter().map(|id| id.to_string()).collect();
        self
    }

    /// Change `data-min`, as a variant switch would.
    pub fn set_moq_attribute(&self, moq: Option<&str>) {
        lock(&self.state).moq_attribute = moq.map(str::to_string);
    }

    pub fn snapshot(&self) -> PageSnapshot {
        lock(&self.state).clone()
    }
}

impl QuantityInput for MemoryPage {
    fn value(&self) -> Option<String> {
        lock(&self.state)
            .quantity_value
            .clone()
            .filter(|v| !v.is_empty())
    }

    fn set_value(&self, quantity: u32) {
        lock(&self.state).quantity_value = Some(quantity.to_string());
    }

    fn encoded_pack_size(&self) -> Option<String> {
        lock(&self.state).encoded_pack_size.clone()
    }

    fn moq_attribute(&self) -> Option<String> {
        lock(&self.state).moq_attribute.clone()
    }

    fn set_min(&self, moq: u32) {
        lock(&self.state).min = Some(moq);
    }
}

impl PriceView for MemoryPage {
    fn sku(&self) -> Option<String> {
        lock(&self.state).price_sku.clone()
    }

    fn show_price(&self, text: &str) {
        lock(&self.state).price_text = Some(text.to_string());
    }

    fn show_error(&self, message: &str) {
        lock(&self.state).price_text = Some(message.to_string());
    }
}

impl SubmitButton for MemoryPage {
    fn set_loading(&self, loading: bool) {
        lock(&self.state).loading = loading;
    }

    fn add_classes(&self, classes: &[&str]) {
        let mut state = lock(&self.state);
        for class in classes {
            if !state.classes.iter().any(|c| c == class) {
                state.classes.push(class.to_string());
            }
        }
    }

    fn remove_classes(&self, classes: &[&str]) {
        lock(&self.state)
            .classes
            .retain(|c| !classes.contains(&c.as_str()));
    }
}

impl ErrorBanner for MemoryPage {
    fn show(&self, message: &str) {
        lock(&self.state).error_message = Some(message.to_string());
    }

    fn hide(&self) {
        lock(&self.state).error_message = None;
    }
}

impl VariantInput for MemoryPage {
    fn selected_variant(&self) -> Option<SelectedVariant> {
        lock(&self.state).variant.clone()
    }
}

impl CartNotification for MemoryPage {
    fn section_ids(&self) -> Vec<String> {
        lock(&self.state).section_ids.clone()
    }

    fn render_product(&self, title: &str, image_url: &str) {
        lock(&self.state).rendered_product = Some((title.to_string(), image_url.to_string()));
    }

    fn open(&self) {
        lock(&self.state).notification_open = true;
    }
}

/// Catalog source returning a fixed result.
#[derive(Debug)]
pub struct StaticCatalog {
    result: Result<PricingCatalog, ClientError>,
    latency: Duration,
    fetches: AtomicUsize,
}

impl StaticCatalog {
    pub fn loaded(catalog: PricingCatalog) -> Self {
        Self::with_result(Ok(catalog))
    }

    pub fn failing(err: ClientError) -> Self {
        Self::with_result(Err(err))
    }

    fn with_result(result: Result<PricingCatalog, ClientError>) -> Self {
        Self {
            result,
            latency: Duration::ZERO,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Delay every fetch, as a slow network would.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn fetch_catalog(&self) -> Result<PricingCatalog, ClientError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.result.clone()
    }
}

/// Cart that records requests instead of sending them.
#[derive(Debug, Default)]
pub struct RecordingCart {
    added: Mutex<Vec<CartAddRequest>>,
    section_updates: Mutex<Vec<SectionsUpdateRequest>>,
    add_failure: Option<ClientError>,
    update_failure: Option<ClientError>,
}

impl RecordingCart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_add(mut self, err: ClientError) -> Self {
        self.add_failure = Some(err);
        self
    }

    pub fn failing_update(mut self, err: ClientError) -> Self {
        self.update_failure = Some(err);
        self
    }

    pub fn added(&self) -> Vec<CartAddRequest> {
        lock(&self.added).clone()
    }

    pub fn section_updates(&self) -> Vec<SectionsUpdateRequest> {
        lock(&self.section_updates).clone()
    }
}

#[async_trait]
impl CartApi for RecordingCart {
    async fn add(&self, request: &CartAddRequest) -> Result<Value, ClientError> {
        lock(&self.added).push(request.clone());
        match &self.add_failure {
            Some(err) => Err(err.clone()),
            None => Ok(json!({ "items": request.items })),
        }
    }

    async fn update_sections(&self, request: &SectionsUpdateRequest) -> Result<Value, ClientError> {
        lock(&self.section_updates).push(request.clone());
        match &self.update_failure {
            Some(err) => Err(err.clone()),
            None => Ok(json!({ "sections": {} })),
        }
    }
}
