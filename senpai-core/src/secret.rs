//! Secret encoding: Alice's flag and certificate packed into one
//! randomized plaintext integer.
//!
//! ## Layout
//! ```text
//! encoded = padding[32] || flag[1] || certificate[32]   (65 bytes, big-endian)
//! ```
//!
//! Fresh CSPRNG padding on every call makes the RSA encryption of two
//! encodings of the same (flag, certificate) pair unlinkable. Without it
//! Bob could compare `xe` and `ye` and learn Alice's answer directly.
//!
//! [`Certificate`] bytes are zeroized on drop, as are the scratch
//! buffers used while packing. The packed integers (`x`, `y`) are plain
//! `BigUint` values and are not wiped.

use std::fmt;

use num_bigint::BigUint;
use rand_core::{OsRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{CERTIFICATE_LENGTH, ENCODED_SECRET_LENGTH, FLAG_OFFSET, PADDING_LENGTH};
use crate::encoding::{to_fixed_be, to_hex};
use crate::errors::DecodeError;

/// Alice's per-session 256-bit secret.
///
/// Disclosed to Bob only after a non-mutual outcome, as proof that the
/// exchange ran. Zeroized on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Certificate([u8; CERTIFICATE_LENGTH]);

impl Certificate {
    /// Draw a uniformly random certificate from the OS CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; CERTIFICATE_LENGTH];
        OsRng.fill_bytes(&mut bytes);
        Certificate(bytes)
    }

    pub fn from_bytes(bytes: [u8; CERTIFICATE_LENGTH]) -> Self {
        Certificate(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; CERTIFICATE_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        to_hex(&self.0)
    }
}

impl fmt::Debug for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Certificate({}…)", &self.to_hex()[..8])
    }
}

/// Pack `flag` and `certificate` into a fresh 65-byte plaintext integer.
///
/// Probabilistic: two calls with identical inputs return different
/// values that decode identically.
pub fn encode(flag: bool, certificate: &Certificate) -> BigUint {
    let mut padding = [0u8; PADDING_LENGTH];
    OsRng.fill_bytes(&mut padding);
    let value = encode_with_padding(flag, certificate, &padding);
    padding.zeroize();
    value
}

/// Deterministic core of [`encode`]; golden vectors pin the padding.
pub(crate) fn encode_with_padding(
    flag: bool,
    certificate: &Certificate,
    padding: &[u8; PADDING_LENGTH],
) -> BigUint {
    let mut bytes = [0u8; ENCODED_SECRET_LENGTH];
    bytes[..FLAG_OFFSET].copy_from_slice(padding);
    bytes[FLAG_OFFSET] = u8::from(flag);
    bytes[FLAG_OFFSET + 1..].copy_from_slice(certificate.as_bytes());
    let value = BigUint::from_bytes_be(&bytes);
    bytes.zeroize();
    value
}

/// Unpack a plaintext integer into `(flag, certificate)`.
///
/// The value is left-padded to 65 bytes; byte 32 is the flag (any
/// non-zero byte reads as `true`), bytes 33..65 the certificate. The
/// padding is discarded.
///
/// # Errors
/// Returns `DecodeError::PlaintextTooLarge` if the value needs more
/// than 65 bytes.
pub fn decode(value: &BigUint) -> Result<(bool, Certificate), DecodeError> {
    let mut bytes =
        to_fixed_be(value, ENCODED_SECRET_LENGTH).ok_or(DecodeError::PlaintextTooLarge)?;
    let flag = bytes[FLAG_OFFSET] != 0;
    let mut certificate = [0u8; CERTIFICATE_LENGTH];
    certificate.copy_from_slice(&bytes[FLAG_OFFSET + 1..]);
    bytes.zeroize();
    Ok((flag, Certificate(certificate)))
}
