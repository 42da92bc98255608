//! Error types for senpai-core.
//!
//! One enum per failure family, flattened into [`SenpaiError`] at the
//! public surface. Two protocol outcomes are deliberately NOT errors:
//! a certificate mismatch at confirmation time is
//! [`Confirmation::Invalid`](crate::alice::Confirmation::Invalid), and a
//! failed faithfulness check is
//! [`Verdict::Unfaithful`](crate::bob::Verdict::Unfaithful).
//!
//! Redelivery of an already-accepted message is not an error either; it
//! returns [`Delivery::Ignored`](crate::wire::Delivery::Ignored).

use crate::constants::ENCODED_SECRET_LENGTH;
use crate::wire::MessageTag;

/// Unified error type for all senpai-core operations.
#[derive(Debug, thiserror::Error)]
pub enum SenpaiError {
    /// Operation invoked before its prerequisite message arrived.
    #[error("State error: {0}")]
    State(String),

    /// Inbound payload does not parse as the expected tagged message.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Blinding value has no inverse modulo N.
    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    /// RSA key generation failed or the requested parameters are unsafe.
    #[error("Key generation error: {0}")]
    KeyGeneration(String),
}

impl SenpaiError {
    /// Stable diagnostic code from [`ERROR_CODES`].
    pub fn code(&self) -> &'static str {
        match self {
            SenpaiError::State(_) => "INVALID_STATE",
            SenpaiError::Decode(_) => "INVALID_CODE",
            SenpaiError::Arithmetic(_) => "NO_INVERSE",
            SenpaiError::KeyGeneration(_) => "KEYGEN_FAILED",
        }
    }

    /// Short user-facing notice for the surrounding application.
    pub fn notice(&self) -> &'static str {
        match self {
            SenpaiError::State(_) => "Not expecting that yet",
            SenpaiError::Decode(_) => "Invalid code",
            SenpaiError::Arithmetic(_) => "Blinding value unusable, start a new session",
            SenpaiError::KeyGeneration(_) => "Could not generate keys",
        }
    }
}

/// Reasons an inbound code or value is rejected.
///
/// Every variant leaves the receiving session untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid base64: {0}")]
    Base64(String),

    #[error("frame truncated: {0} bytes")]
    Truncated(usize),

    #[error("unsupported wire version {0}")]
    Version(u8),

    #[error("unknown message tag 0x{0:02x}")]
    UnknownTag(u8),

    #[error("expected {expected} message, found {found}")]
    UnexpectedTag {
        expected: MessageTag,
        found: MessageTag,
    },

    #[error("invalid field width {0}")]
    Width(usize),

    #[error("{tag} body length mismatch: expected {expected}, got {actual}")]
    Length {
        tag: MessageTag,
        expected: usize,
        actual: usize,
    },

    #[error("invalid presence flag 0x{0:02x}")]
    Flag(u8),

    #[error("{0} out of range")]
    OutOfRange(&'static str),

    #[error("value does not fit in {} bytes", ENCODED_SECRET_LENGTH)]
    PlaintextTooLarge,
}

// ── Error Code Registry ─────────────────────────────────────────────

/// Canonical diagnostic codes, one per [`SenpaiError`] variant.
pub const ERROR_CODES: [&str; 4] = ["INVALID_STATE", "INVALID_CODE", "NO_INVERSE", "KEYGEN_FAILED"];

/// Returns `true` if the given string is a canonical error code.
pub fn is_valid_error_code(code: &str) -> bool {
    ERROR_CODES.contains(&code)
}
