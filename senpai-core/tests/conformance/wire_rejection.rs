//! Conformance: the codec rejects every malformed or misdirected code.
//!
//! Decoders validate version, then tag, then lengths and widths, then
//! ranges. Each failure is a `DecodeError`.

use num_bigint::BigUint;
use senpai_core::encoding::to_base64;
use senpai_core::wire::peek_code_tag;
use senpai_core::{
    AliceCalculation, AliceConfirmation, AliceWelcome, BobWelcomeBack, Certificate, DecodeError,
    MatchResult, MessageTag, WireMessage,
};

const N_HEX: &str = "9fcb8a0ec114a7b2393742e9d56c87141c4487a00fcecf0c172f4871f8eec2d28b79bca8700b0fa838bb93f4abb9cf2911120c02fbfd82816c76e1abbbc84e99da4a71dfd72dac1958a977bb38e3315aa13b5736782ed664dad250dfc7ee2845504b74cdbae053ae32868cec9d96bd480b28fb8ef396c5fe746dd08dc1082feb";

fn modulus() -> BigUint {
    BigUint::parse_bytes(N_HEX.as_bytes(), 16).unwrap()
}

fn welcome() -> AliceWelcome {
    AliceWelcome::new(
        modulus(),
        BigUint::from(65_537u32),
        BigUint::from(2u8),
        BigUint::from(3u8),
    )
    .unwrap()
}

/// Welcome frame with the given width and four raw fields.
fn welcome_frame(width: u16, fields: &[Vec<u8>]) -> Vec<u8> {
    let mut frame = vec![1, MessageTag::Welcome.as_byte()];
    frame.extend_from_slice(&width.to_be_bytes());
    for field in fields {
        frame.extend_from_slice(field);
    }
    frame
}

fn fixed(value: &BigUint, width: usize) -> Vec<u8> {
    senpai_core::encoding::to_fixed_be(value, width).unwrap()
}

#[test]
fn conformance_valid_welcome_decodes() {
    let code = welcome().to_code();
    assert_eq!(peek_code_tag(&code).unwrap(), MessageTag::Welcome);
    assert_eq!(AliceWelcome::from_code(&code).unwrap(), welcome());
}

#[test]
fn conformance_surrounding_whitespace_tolerated() {
    let code = format!("  {}\n", welcome().to_code());
    assert_eq!(AliceWelcome::from_code(&code).unwrap(), welcome());
}

#[test]
fn conformance_non_base64_rejected() {
    assert!(matches!(
        AliceWelcome::from_code("not*base64"),
        Err(DecodeError::Base64(_))
    ));
}

#[test]
fn conformance_wrong_version_rejected() {
    let mut frame = welcome().to_bytes();
    frame[0] = 2;
    assert_eq!(
        AliceWelcome::from_bytes(&frame),
        Err(DecodeError::Version(2))
    );
}

#[test]
fn conformance_unknown_tag_rejected() {
    let mut frame = welcome().to_bytes();
    frame[1] = 0x09;
    assert_eq!(
        AliceWelcome::from_bytes(&frame),
        Err(DecodeError::UnknownTag(0x09))
    );
}

#[test]
fn conformance_truncated_header_rejected() {
    assert_eq!(AliceWelcome::from_bytes(&[1]), Err(DecodeError::Truncated(1)));
    assert_eq!(peek_code_tag(""), Err(DecodeError::Truncated(0)));
}

#[test]
fn conformance_misdirected_tag_rejected() {
    let code = welcome().to_code();
    assert_eq!(
        BobWelcomeBack::from_code(&code),
        Err(DecodeError::UnexpectedTag {
            expected: MessageTag::WelcomeBack,
            found: MessageTag::Welcome,
        })
    );
    assert!(matches!(
        MatchResult::from_code(&code),
        Err(DecodeError::UnexpectedTag { .. })
    ));
}

#[test]
fn conformance_extended_frame_rejected() {
    let mut frame = welcome().to_bytes();
    frame.push(0);
    assert!(matches!(
        AliceWelcome::from_bytes(&frame),
        Err(DecodeError::Length {
            tag: MessageTag::Welcome,
            ..
        })
    ));
}

#[test]
fn conformance_truncated_body_rejected() {
    let frame = welcome().to_bytes();
    assert!(matches!(
        AliceWelcome::from_bytes(&frame[..frame.len() - 1]),
        Err(DecodeError::Length { .. })
    ));
}

#[test]
fn conformance_zero_and_oversized_width_rejected() {
    assert_eq!(
        AliceWelcome::from_bytes(&welcome_frame(0, &[])),
        Err(DecodeError::Width(0))
    );
    assert_eq!(
        AliceCalculation::from_bytes(&[1, MessageTag::Calculation.as_byte(), 0x02, 0x01]),
        Err(DecodeError::Width(513))
    );
}

#[test]
fn conformance_zero_padded_modulus_rejected() {
    let n = modulus();
    let fields = [
        fixed(&n, 129),
        fixed(&BigUint::from(65_537u32), 129),
        fixed(&BigUint::from(2u8), 129),
        fixed(&BigUint::from(3u8), 129),
    ];
    assert_eq!(
        AliceWelcome::from_bytes(&welcome_frame(129, &fields)),
        Err(DecodeError::Width(129))
    );
}

#[test]
fn conformance_unreduced_ciphertext_rejected() {
    let n = modulus();
    let fields = [
        fixed(&n, 128),
        fixed(&BigUint::from(65_537u32), 128),
        fixed(&n, 128),
        fixed(&BigUint::from(3u8), 128),
    ];
    assert_eq!(
        AliceWelcome::from_bytes(&welcome_frame(128, &fields)),
        Err(DecodeError::OutOfRange("xe"))
    );
}

#[test]
fn conformance_small_modulus_rejected() {
    // 512-bit modulus cannot hold the 65-byte plaintext.
    let n = (BigUint::from(1u8) << 511u32) + 1u8;
    let fields = [
        fixed(&n, 64),
        fixed(&BigUint::from(65_537u32), 64),
        fixed(&BigUint::from(2u8), 64),
        fixed(&BigUint::from(3u8), 64),
    ];
    assert_eq!(
        AliceWelcome::from_bytes(&welcome_frame(64, &fields)),
        Err(DecodeError::OutOfRange("modulus"))
    );
}

#[test]
fn conformance_result_bad_flag_rejected() {
    let frame = [1, MessageTag::Result.as_byte(), 2];
    assert_eq!(MatchResult::from_bytes(&frame), Err(DecodeError::Flag(2)));
}

#[test]
fn conformance_result_length_checked() {
    let mut short = vec![1, MessageTag::Result.as_byte(), 1];
    short.extend_from_slice(&[0u8; 31]);
    assert!(matches!(
        MatchResult::from_bytes(&short),
        Err(DecodeError::Length { .. })
    ));

    let like_with_trailer = [1, MessageTag::Result.as_byte(), 0, 0];
    assert!(matches!(
        MatchResult::from_bytes(&like_with_trailer),
        Err(DecodeError::Length { .. })
    ));

    let empty = [1, MessageTag::Result.as_byte()];
    assert!(matches!(
        MatchResult::from_bytes(&empty),
        Err(DecodeError::Length { .. })
    ));
}

#[test]
fn conformance_result_frames() {
    assert_eq!(
        MatchResult::Like.to_code(),
        to_base64(&[1, MessageTag::Result.as_byte(), 0])
    );
    let cert = Certificate::from_bytes([0x07; 32]);
    let frame = MatchResult::Certificate(cert.clone()).to_bytes();
    assert_eq!(frame.len(), 2 + 1 + 32);
    assert_eq!(
        MatchResult::from_bytes(&frame).unwrap(),
        MatchResult::Certificate(cert)
    );
}

#[test]
fn conformance_confirmation_length_checked() {
    let mut frame = vec![1, MessageTag::Confirmation.as_byte()];
    frame.extend_from_slice(&[0u8; 64]);
    assert!(matches!(
        AliceConfirmation::from_bytes(&frame),
        Err(DecodeError::Length {
            tag: MessageTag::Confirmation,
            expected: 65,
            actual: 64,
        })
    ));
}

#[test]
fn conformance_residue_frames_are_fixed_width() {
    let back = BobWelcomeBack::new(BigUint::from(5u8), 128).unwrap();
    assert_eq!(back.to_bytes().len(), 2 + 2 + 128);
    let calc = AliceCalculation::new(BigUint::from(5u8), 128).unwrap();
    assert_eq!(calc.to_bytes().len(), 2 + 2 + 128);
    assert_eq!(welcome().to_bytes().len(), 2 + 2 + 4 * 128);
}
