//! Conformance: committed golden vectors decode through the public codec.
//!
//! Complements `vector_equivalence.rs`: that gate regenerates the file,
//! this one reads it as a peer would and checks each case's outcome.

use std::path::PathBuf;

use serde::Deserialize;
use senpai_core::{
    AliceCalculation, AliceConfirmation, AliceWelcome, BobWelcomeBack, MatchResult, WireMessage,
};

#[derive(Deserialize)]
struct ExchangeVectors {
    modulus_hex: String,
    certificate_hex: String,
    cases: Vec<ExchangeCase>,
}

#[derive(Deserialize)]
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

fn load() -> ExchangeVectors {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("vectors")
        .join("exchange.vectors.json");
    let raw = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e));
    serde_json::from_str(&raw).expect("exchange vectors are invalid JSON")
}

#[test]
fn conformance_vector_codes_decode() {
    let vectors = load();
    assert_eq!(vectors.cases.len(), 4);
    for case in &vectors.cases {
        let welcome = AliceWelcome::from_code(&case.welcome)
            .unwrap_or_else(|e| panic!("{}: welcome: {e}", case.id));
        assert_eq!(
            senpai_core::encoding::to_hex(&welcome.modulus().to_bytes_be()),
            vectors.modulus_hex
        );
        BobWelcomeBack::from_code(&case.welcome_back)
            .unwrap_or_else(|e| panic!("{}: welcome back: {e}", case.id));
        AliceCalculation::from_code(&case.calculation)
            .unwrap_or_else(|e| panic!("{}: calculation: {e}", case.id));
        if let Some(confirmation) = &case.confirmation {
            AliceConfirmation::from_code(confirmation)
                .unwrap_or_else(|e| panic!("{}: confirmation: {e}", case.id));
        }
    }
}

#[test]
fn conformance_vector_outcomes() {
    let vectors = load();
    for case in &vectors.cases {
        let result = MatchResult::from_code(&case.result).unwrap();
        let mutual = case.alice_likes_bob && case.bob_likes_alice;
        assert_eq!(result.is_like(), mutual, "{}", case.id);
        assert_eq!(case.outcome, if mutual { "like" } else { "certificate" });
        match result.certificate() {
            Some(cert) => {
                assert_eq!(cert.to_hex(), vectors.certificate_hex, "{}", case.id);
                assert!(case.confirmation.is_some());
                assert_eq!(case.verdict.as_deref(), Some("faithful"));
            }
            None => {
                assert!(case.confirmation.is_none());
                assert!(case.verdict.is_none());
            }
        }
    }
}
