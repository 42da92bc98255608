//! Conformance: error code registry and display format.

use senpai_core::errors::{is_valid_error_code, DecodeError, SenpaiError, ERROR_CODES};
use senpai_core::MessageTag;

#[test]
fn conformance_error_registry_exact_list() {
    assert_eq!(
        ERROR_CODES,
        ["INVALID_STATE", "INVALID_CODE", "NO_INVERSE", "KEYGEN_FAILED"]
    );
}

#[test]
fn conformance_error_registry_unique() {
    let mut seen = std::collections::HashSet::new();
    for code in &ERROR_CODES {
        assert!(seen.insert(code), "duplicate error code: {code}");
    }
}

#[test]
fn conformance_every_variant_maps_into_registry() {
    let errors = [
        SenpaiError::State("x".into()),
        SenpaiError::Decode(DecodeError::Version(9)),
        SenpaiError::Arithmetic("x".into()),
        SenpaiError::KeyGeneration("x".into()),
    ];
    for err in &errors {
        assert!(is_valid_error_code(err.code()), "{err} maps outside registry");
    }
    assert!(!is_valid_error_code("NOT_A_CODE"));
}

#[test]
fn conformance_display_format_stable() {
    let cases: Vec<(SenpaiError, &str)> = vec![
        (
            SenpaiError::State("welcome not received".into()),
            "State error: welcome not received",
        ),
        (
            SenpaiError::Arithmetic("no inverse".into()),
            "Arithmetic error: no inverse",
        ),
        (
            SenpaiError::KeyGeneration("modulus too small".into()),
            "Key generation error: modulus too small",
        ),
        (
            DecodeError::UnexpectedTag {
                expected: MessageTag::Welcome,
                found: MessageTag::Result,
            }
            .into(),
            "Decode error: expected AliceWelcome message, found Result",
        ),
    ];
    for (err, expected) in cases {
        assert_eq!(err.to_string(), expected);
    }
}

#[test]
fn conformance_decode_errors_read_as_invalid_code() {
    let err: SenpaiError = DecodeError::Truncated(1).into();
    assert_eq!(err.notice(), "Invalid code");
    assert_ne!(SenpaiError::State("x".into()).notice(), "Invalid code");
}
