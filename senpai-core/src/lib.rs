//! Senpai core: oblivious mutual-interest disclosure.
//!
//! Two parties, Alice and Bob, learn whether they like each other. Each
//! learns the other's answer only if both said yes. Alice holds a
//! per-session RSA key; Bob picks one of her two ciphertexts blinded
//! with a random factor, so she cannot see which one he took. On a
//! non-mutual outcome Bob receives Alice's certificate and can audit her
//! with a faithfulness check.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`constants`] | Widths, exponent, wire version and tags |
//! | [`config`] | Key parameters |
//! | [`errors`] | `SenpaiError`, `DecodeError`, error-code registry |
//! | [`encoding`] | base64 transport text and hex |
//! | [`secret`] | 65-byte randomized plaintext and `Certificate` |
//! | [`keys`] | RSA key pair generation and validation |
//! | [`wire`] | Tagged fixed-width message codec |
//! | [`alice`] | Alice's state machine |
//! | [`bob`] | Bob's state machine and faithfulness verdict |
//! | [`session`] | Role selection, code dispatch, view |
//! | [`vectors`] | Golden vector generator (feature `vectors`) |
//!
//! # Message Flow
//!
//! ```text
//! Alice                                   Bob
//!   init(like_bob)
//!   AliceWelcome {N, e, xe, ye}   ───▶
//!                                         lock_in(like_alice)
//!                                 ◀───    BobWelcomeBack {zere}
//!   AliceCalculation {zr}         ───▶
//!                                 ◀───    Result {Like | certificate}
//!   AliceConfirmation {x}         ───▶    (non-mutual only)
//!                                         Faithful | Unfaithful
//! ```

/// Protocol constants.
pub mod constants;

/// Key generation parameters.
pub mod config;

/// Error types and the error-code registry.
pub mod errors;

/// Encoding utilities: base64 and hex.
pub mod encoding;

/// Randomized secret packing and the session certificate.
pub mod secret;

/// RSA key pairs.
pub mod keys;

/// Message types and the binary wire codec.
pub mod wire;

/// Alice's protocol role.
pub mod alice;

/// Bob's protocol role.
pub mod bob;

/// Session driver over text codes.
pub mod session;

/// Deterministic golden vector generator (test use only).
/// Requires the `vectors` feature: `cargo test --features vectors`.
#[cfg(feature = "vectors")]
pub mod vectors;

pub use alice::{AliceProtocol, AliceStage, Confirmation};
pub use bob::{BobProtocol, BobStage, Verdict};
pub use config::ProtocolConfig;
pub use errors::{DecodeError, SenpaiError};
pub use keys::KeyPair;
pub use secret::Certificate;
pub use session::{Identity, Session, View};
pub use wire::{
    AliceCalculation, AliceConfirmation, AliceWelcome, BobWelcomeBack, Delivery, MatchResult,
    MessageTag, WireMessage,
};
