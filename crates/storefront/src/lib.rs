//! `packcart-storefront`
//!
//! **Responsibility:** drive the pricing and quantity rules from a product page.
//!
//! This crate provides:
//! - Explicit configuration (`StorefrontConfig`) passed into every component
//! - HTTP clients for the pricing feed and the storefront cart endpoints
//! - Traits for the page elements the components read and update
//! - `PriceDisplay`, `QuantitySelector` and `ProductForm`, the components a UI
//!   adapter calls into
//!
//! Rendering is left to the adapter; the components only talk to the page
//! through the traits in [`page`].

pub mod cart;
pub mod client;
pub mod config;
pub mod debounce;
pub mod error;
pub mod memory;
pub mod page;
pub mod price_display;
pub mod product_form;
pub mod quantity_selector;

pub use cart::{CartAddRequest, CartLineItem, LineItemProperties, SectionsUpdateRequest};
pub use client::{CartApi, CatalogSource, HttpCartApi, HttpCatalogSource};
pub use config::StorefrontConfig;
pub use debounce::Debouncer;
pub use error::{ClientError, StorefrontError};
pub use page::{
    CartNotification, ErrorBanner, PriceView, QuantityInput, SelectedVariant, SubmitButton,
    VariantInput,
};
pub use price_display::PriceDisplay;
pub use product_form::{FormElements, ProductForm};
pub use quantity_selector::{QuantitySelector, SelectorElements};
