//! Decoding of raw product-page attributes.
//!
//! Page attributes arrive as untyped strings. Integer parsing follows the
//! leading-prefix rules browsers apply to form values: leading whitespace and a
//! sign are accepted, parsing stops at the first non-digit, and input without
//! any leading digit is "not a number" (`None`).

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::error::{DomainError, DomainResult};

/// Pack size used when the encoded attribute is absent or unusable.
pub const DEFAULT_PACK_SIZE: u32 = 1;

/// Standard alphabet, padding optional on decode.
const FORGIVING_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Parse the leading base-10 integer of `raw`.
///
/// `"24 units"` gives `Some(24)`, `"  -6"` gives `Some(-6)`, `"abc"` and `""`
/// give `None`. Values past the `i64` range saturate.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            break;
        }
        seen_digit = true;
        let digit = i64::from(b - b'0');
        value = value
            .saturating_mul(10)
            .saturating_add(if negative { -digit } else { digit });
    }

    seen_digit.then_some(value)
}

/// Decode the obfuscated pack-size attribute (base64 of a decimal integer).
pub fn decode_pack_size(encoded: &str) -> DomainResult<u32> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = FORGIVING_BASE64
        .decode(compact.as_bytes())
        .map_err(|e| DomainError::invalid_attribute("data-encoded-min", e.to_string()))?;
    let text = String::from_utf8_lossy(&bytes);

    let value = parse_leading_int(&text).ok_or_else(|| {
        DomainError::invalid_attribute("data-encoded-min", format!("`{text}` is not a number"))
    })?;

    u32::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| DomainError::invalid_attribute("data-encoded-min", "pack size must be positive"))
}

/// Pack size from the optional encoded attribute, falling back to
/// [`DEFAULT_PACK_SIZE`] on any decoding problem.
pub fn pack_size_or_default(encoded: Option<&str>) -> u32 {
    let Some(encoded) = encoded else {
        return DEFAULT_PACK_SIZE;
    };

    match decode_pack_size(encoded) {
        Ok(pack_size) => pack_size,
        Err(err) => {
            tracing::warn!(error = %err, "falling back to default pack size");
            DEFAULT_PACK_SIZE
        }
    }
}

/// Minimum order quantity from the plain numeric attribute.
///
/// Missing, unparsable or non-positive values yield `fallback`.
pub fn parse_moq(raw: Option<&str>, fallback: u32) -> u32 {
    raw.and_then(parse_leading_int)
        .and_then(|v| u32::try_from(v).ok())
        .filter(|v| *v > 0)
        .unwrap_or(fallback)
}
