//! Request bodies for the storefront cart endpoints.

use serde::Serialize;

use packcart_core::Sku;
use packcart_pricing::PriceBreak;

/// Line-item metadata carried into the order: the SKU and its full tier list.
///
/// Underscore-prefixed properties are hidden from the shopper at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItemProperties {
    #[serde(rename = "_sku")]
    pub sku: Sku,
    #[serde(rename = "_prices")]
    pub prices: Vec<PriceBreak>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLineItem {
    pub id: String,
    pub quantity: u32,
    pub properties: LineItemProperties,
}

/// Body of `POST /cart/add.js`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartAddRequest {
    pub items: Vec<CartLineItem>,
    pub section: Vec<String>,
    pub sections_url: String,
}

impl CartAddRequest {
    pub fn single(item: CartLineItem, sections_url: impl Into<String>) -> Self {
        Self {
            items: vec![item],
            section: Vec::new(),
            sections_url: sections_url.into(),
        }
    }
}

/// Body of `POST /cart/update.js` used to re-render cart sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionsUpdateRequest {
    pub sections: Vec<String>,
    pub sections_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn add_request_wire_shape() {
        let request = CartAddRequest::single(
            CartLineItem {
                id: "4242".to_string(),
                quantity: 24,
                properties: LineItemProperties {
                    sku: Sku::new("WIDGET-6"),
                    prices: vec![
                        PriceBreak { qty_break: 6, price_break: dec!(2.5) },
                        PriceBreak { qty_break: 24, price_break: dec!(2.25) },
                    ],
                },
            },
            "/products/widget",
        );

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "items": [{
                    "id": "4242",
                    "quantity": 24,
                    "properties": {
                        "_sku": "WIDGET-6",
                        "_prices": [
                            { "qtyBreak": 6, "priceBreak": 2.5 },
                            { "qtyBreak": 24, "priceBreak": 2.25 }
                        ]
                    }
                }],
                "section": [],
                "sections_url": "/products/widget"
            })
        );
    }
}
