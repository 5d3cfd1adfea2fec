//! `packcart-core`: shared building blocks for the storefront pricing layer.
//!
//! This crate contains **pure** primitives (no IO): the domain error model, the
//! `Sku` value object and decoding of the raw attributes a product page exposes.

pub mod attributes;
pub mod error;
pub mod sku;
pub mod value_object;

pub use attributes::{decode_pack_size, pack_size_or_default, parse_leading_int, parse_moq};
pub use error::{DomainError, DomainResult};
pub use sku::Sku;
pub use value_object::ValueObject;
