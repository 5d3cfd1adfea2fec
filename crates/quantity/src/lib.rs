//! Order quantity rules for pack-size products.
//!
//! Quantities must be whole packs (`pack_size`, `2 * pack_size`, ...). Anything
//! else collapses to a single pack. The minimum order quantity (MOQ) is a
//! separate gate checked only when the order is submitted, except that an MOQ
//! refresh snaps an unset or too-small quantity straight to the MOQ.

pub mod controller;
pub mod error;
pub mod state;

pub use controller::{QuantityController, QuantityPhase};
pub use error::QuantityError;
pub use state::QuantityState;
