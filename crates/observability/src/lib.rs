//! Process-wide logging setup for packcart binaries.

/// Install the tracing subscriber.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init() {
    tracing::init(tracing::DEFAULT_FILTER);
}

/// Subscriber construction (filters, formatting).
pub mod tracing;
