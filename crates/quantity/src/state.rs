use serde::Serialize;

use packcart_core::ValueObject;

use crate::error::QuantityError;

/// Snapshot of the quantity rules and the current order quantity.
///
/// `current_quantity` is `None` while the quantity input is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuantityState {
    pub pack_size: u32,
    pub minimum_order_quantity: u32,
    pub current_quantity: Option<u32>,
}

impl QuantityState {
    /// Zero pack sizes and MOQs are raised to 1.
    pub fn new(pack_size: u32, minimum_order_quantity: u32, current_quantity: Option<u32>) -> Self {
        Self {
            pack_size: pack_size.max(1),
            minimum_order_quantity: minimum_order_quantity.max(1),
            current_quantity,
        }
    }

    /// Accept `requested` only if it is a whole number of packs; otherwise
    /// collapse to a single pack.
    ///
    /// The MOQ plays no part here: with a pack of 6 and an MOQ of 24, a
    /// requested 20 becomes 6, not 24.
    pub fn normalize(&self, requested: i64) -> u32 {
        let pack = i64::from(self.pack_size);
        if requested < pack || (requested - pack) % pack != 0 {
            return self.pack_size;
        }
        u32::try_from(requested).unwrap_or(self.pack_size)
    }

    /// Gate a submission on the MOQ. Pack congruence is not re-checked.
    pub fn validate_for_submission(&self) -> Result<u32, QuantityError> {
        let quantity = self.current_quantity.unwrap_or(0);
        if quantity < self.minimum_order_quantity {
            return Err(QuantityError::BelowMinimum {
                quantity,
                minimum: self.minimum_order_quantity,
            });
        }
        Ok(quantity)
    }
}

impl ValueObject for QuantityState {}
