//! Deterministic golden vector generator.
//!
//! Pins every random input (key pair, certificate, both paddings, Bob's
//! blinding value) and runs the four preference combinations through
//! the real protocol types, rendering each message as its wire code.
//! `tests/vector_equivalence.rs` compares the output against the
//! committed `tests/vectors/exchange.vectors.json`.
//!
//! Gated behind the `vectors` feature; never used by real sessions.

use num_bigint::BigUint;
use serde::Serialize;

use crate::alice::{AliceInitialState, AliceProtocol, Confirmation};
use crate::bob::{BobInitialState, BobProtocol, Verdict};
use crate::constants::{DEFAULT_PUBLIC_EXPONENT, PADDING_LENGTH};
use crate::encoding::to_hex;
use crate::errors::SenpaiError;
use crate::keys::KeyPair;
use crate::secret::Certificate;
use crate::wire::{MatchResult, WireMessage};

/// Modulus of the fixed 1024-bit vector key.
pub const VECTOR_MODULUS_HEX: &str = "9fcb8a0ec114a7b2393742e9d56c87141c4487a00fcecf0c172f4871f8eec2d28b79bca8700b0fa838bb93f4abb9cf2911120c02fbfd82816c76e1abbbc84e99da4a71dfd72dac1958a977bb38e3315aa13b5736782ed664dad250dfc7ee2845504b74cdbae053ae32868cec9d96bd480b28fb8ef396c5fe746dd08dc1082feb";

/// Private exponent of the fixed vector key.
pub const VECTOR_PRIVATE_EXPONENT_HEX: &str = "2e589a722d0e10956082e6a56b814eac468699cf92c628c718f25dd0b0a28f5f01950d62cd1c682e22464563716b32ea764905b2d7e36f369a7ee0752ec1aa0a002672e571c1c1bd8a88b6d14f928ee2357cef407c056e699367e751368804535e6bac6abe9fce01b12ebba5e3800ce29683874e0c7736d34b289d29ae7efc1";

const X_PADDING: [u8; PADDING_LENGTH] = [0xa5; PADDING_LENGTH];
const Y_PADDING: [u8; PADDING_LENGTH] = [0x5a; PADDING_LENGTH];

fn vector_certificate() -> Certificate {
    Certificate::from_bytes(std::array::from_fn(|i| i as u8))
}

fn vector_blinding() -> [u8; 32] {
    std::array::from_fn(|i| 0x40 + i as u8)
}

/// The fixed vector key pair.
///
/// # Errors
/// Only if the embedded constants are corrupt.
pub fn vector_key_pair() -> Result<KeyPair, SenpaiError> {
    let parse = |hex: &str| {
        BigUint::parse_bytes(hex.as_bytes(), 16)
            .ok_or_else(|| SenpaiError::KeyGeneration("bad vector key constant".into()))
    };
    KeyPair::from_components(
        parse(VECTOR_MODULUS_HEX)?,
        BigUint::from(DEFAULT_PUBLIC_EXPONENT),
        parse(VECTOR_PRIVATE_EXPONENT_HEX)?,
    )
}

#[derive(Serialize)]
struct ExchangeVectors {
    description: String,
    modulus_hex: String,
    public_exponent: u32,
    certificate_hex: String,
    x_padding_hex: String,
    y_padding_hex: String,
    blinding_hex: String,
    cases: Vec<ExchangeCase>,
}

#[derive(Serialize)]
struct ExchangeCase {
    id: String,
    alice_likes_bob: bool,
    bob_likes_alice: bool,
    welcome: String,
    welcome_back: String,
    calculation: String,
    result: String,
    outcome: String,
    confirmation: Option<String>,
    verdict: Option<String>,
}

fn run_case(like_bob: bool, like_alice: bool) -> Result<ExchangeCase, SenpaiError> {
    let initial = AliceInitialState::from_parts(
        like_bob,
        vector_key_pair()?,
        vector_certificate(),
        &X_PADDING,
        &Y_PADDING,
    );
    let mut alice = AliceProtocol::from_initial(initial);
    let mut bob = BobProtocol::from_initial(BobInitialState::from_blinding(
        BigUint::from_bytes_be(&vector_blinding()),
    ));

    let welcome = alice.compute_welcome()?;
    bob.on_welcome(welcome.clone())?;
    bob.lock_in(like_alice)?;

    let welcome_back = bob.compute_welcome_back()?;
    alice.on_welcome_back(welcome_back.clone())?;

    let calculation = alice.compute_calculation()?;
    bob.on_calculation(calculation.clone())?;

    let result = bob.compute_result()?;
    alice.on_result(result.clone())?;

    let (confirmation, verdict) = match alice.compute_confirmation()? {
        Confirmation::Confirm(msg) => {
            let code = msg.to_code();
            bob.on_confirmation(msg)?;
            let verdict = match bob.check_faithfulness()? {
                Verdict::Faithful => "faithful",
                Verdict::Unfaithful => "unfaithful",
            };
            (Some(code), Some(verdict.to_string()))
        }
        Confirmation::Mutual | Confirmation::Invalid => (None, None),
    };

    let outcome = match result {
        MatchResult::Like => "like",
        MatchResult::Certificate(_) => "certificate",
    };

    Ok(ExchangeCase {
        id: format!(
            "alice_{}_bob_{}",
            if like_bob { "likes" } else { "passes" },
            if like_alice { "likes" } else { "passes" }
        ),
        alice_likes_bob: like_bob,
        bob_likes_alice: like_alice,
        welcome: welcome.to_code(),
        welcome_back: welcome_back.to_code(),
        calculation: calculation.to_code(),
        result: result.to_code(),
        outcome: outcome.to_string(),
        confirmation,
        verdict,
    })
}

/// Generate the exchange vectors as pretty-printed JSON.
///
/// # Errors
/// Any protocol error while running a case; none are expected with the
/// fixed inputs.
pub fn generate_exchange_json() -> Result<String, SenpaiError> {
    let cases = [(true, true), (true, false), (false, true), (false, false)]
        .into_iter()
        .map(|(like_bob, like_alice)| run_case(like_bob, like_alice))
        .collect::<Result<Vec<_>, _>>()?;

    let vectors = ExchangeVectors {
        description: "Senpai exchange with fixed key, certificate, padding and blinding".into(),
        modulus_hex: VECTOR_MODULUS_HEX.into(),
        public_exponent: DEFAULT_PUBLIC_EXPONENT,
        certificate_hex: vector_certificate().to_hex(),
        x_padding_hex: to_hex(&X_PADDING),
        y_padding_hex: to_hex(&Y_PADDING),
        blinding_hex: to_hex(&vector_blinding()),
        cases,
    };
    serde_json::to_string_pretty(&vectors)
        .map_err(|e| SenpaiError::State(format!("vector serialisation failed: {e}")))
}
