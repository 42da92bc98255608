//! Conformance harness: wire and error-surface invariants.
//!
//! Coverage:
//! - Codec rejection of malformed, misdirected and out-of-range codes
//! - Error code registry and display format stability
//! - Golden vector replay through the public codec (feature `vectors`)

#[cfg(feature = "vectors")]
mod vector_replay;

mod error_registry;
mod wire_rejection;
