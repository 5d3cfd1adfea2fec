use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QuantityError {
    /// Ordered quantity is below the minimum order quantity. An unset
    /// quantity is reported as 0.
    #[error("quantity {quantity} is below the minimum order quantity of {minimum}")]
    BelowMinimum { quantity: u32, minimum: u32 },
}
