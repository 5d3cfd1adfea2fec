//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Everything the pricing layer passes around (SKUs, price tiers, quantity
/// snapshots) is defined entirely by its attribute values. Two instances with
/// the same values are interchangeable, and none of them is mutated in place:
/// a "changed" value is a new value.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct PackSize(u32);
///
/// impl ValueObject for PackSize {}
///
/// assert_eq!(PackSize(6), PackSize(6));
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
