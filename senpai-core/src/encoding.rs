//! Encoding utilities: base64 and hex.
//!
//! Wire frames travel as standard base64 text (RFC 4648, with padding)
//! so they fit any out-of-band channel that carries ASCII. Hex is used
//! for diagnostics and golden vectors.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use num_bigint::BigUint;

use crate::errors::DecodeError;

/// Encode bytes to standard base64 (RFC 4648, with padding).
pub fn to_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decode standard base64 to bytes.
///
/// Surrounding whitespace is trimmed (scanners often append a newline).
///
/// # Errors
/// Returns `DecodeError::Base64` on invalid base64 input.
pub fn from_base64(encoded: &str) -> Result<Vec<u8>, DecodeError> {
    STANDARD
        .decode(encoded.trim())
        .map_err(|e| DecodeError::Base64(e.to_string()))
}

/// Encode bytes to lowercase hex string.
pub fn to_hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{b:02x}")).collect()
}

/// Big-endian bytes of `value`, left-padded with zeros to `width`.
///
/// Returns `None` if the value needs more than `width` bytes.
pub fn to_fixed_be(value: &BigUint, width: usize) -> Option<Vec<u8>> {
    let raw = value.to_bytes_be();
    // BigUint::to_bytes_be renders zero as a single 0x00 byte.
    let raw = if raw.iter().all(|b| *b == 0) { &[][..] } else { &raw[..] };
    if raw.len() > width {
        return None;
    }
    let mut out = vec![0u8; width];
    out[width - raw.len()..].copy_from_slice(raw);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_round_trip() {
        let input = b"Hello, Senpai!";
        let encoded = to_base64(input);
        assert_eq!(from_base64(&encoded).unwrap(), input);
    }

    #[test]
    fn base64_known_value() {
        assert_eq!(to_base64(&[0x01, 0x02, 0x03]), "AQID");
        assert_eq!(to_base64(&[0xff]), "/w==");
    }

    #[test]
    fn base64_trims_whitespace() {
        assert_eq!(from_base64("AQID\n").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn base64_invalid_rejected() {
        assert!(matches!(from_base64("not base64!"), Err(DecodeError::Base64(_))));
    }

    #[test]
    fn hex_known_value() {
        assert_eq!(to_hex(&[0xff]), "ff");
        assert_eq!(to_hex(&[0x00, 0x0a, 0xff]), "000aff");
        assert_eq!(to_hex(&[]), "");
    }

    #[test]
    fn fixed_be_left_pads() {
        let value = BigUint::from(0x0102u32);
        assert_eq!(to_fixed_be(&value, 4).unwrap(), vec![0, 0, 1, 2]);
        assert_eq!(to_fixed_be(&value, 2).unwrap(), vec![1, 2]);
        assert!(to_fixed_be(&value, 1).is_none());
    }

    #[test]
    fn fixed_be_zero_is_all_zero() {
        assert_eq!(to_fixed_be(&BigUint::from(0u8), 3).unwrap(), vec![0, 0, 0]);
        assert_eq!(to_fixed_be(&BigUint::from(0u8), 0).unwrap(), Vec::<u8>::new());
    }
}
