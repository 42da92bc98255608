//! RSA key material: Alice's per-session modulus and exponents.
//!
//! A fresh key pair is generated every time Alice locks in; keys are
//! never reused across sessions. Generation goes through the `rsa`
//! crate with the OS CSPRNG; arithmetic on the components uses
//! `num-bigint`.
//!
//! Only Alice ever holds a [`KeyPair`]. Bob sees N and e inside
//! [`AliceWelcome`](crate::wire::AliceWelcome).
//!
//! The private exponent is held as a `BigUint` and is not zeroized on
//! drop; `Debug` redacts it.

use std::fmt;

use num_bigint::BigUint;
use rand_core::OsRng;
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::RsaPrivateKey;
use tracing::debug;

use crate::config::ProtocolConfig;
use crate::constants::{MAX_MODULUS_BYTES, MIN_MODULUS_BITS};
use crate::errors::SenpaiError;

/// RSA modulus N, public exponent e, private exponent d.
#[derive(Clone)]
pub struct KeyPair {
    n: BigUint,
    e: BigUint,
    d: BigUint,
}

impl KeyPair {
    /// Build a key pair from known components.
    ///
    /// Checks shape only (sizes and ranges); it cannot verify that
    /// `e·d ≡ 1` without the factorisation of N.
    ///
    /// # Errors
    /// Returns `SenpaiError::KeyGeneration` if N is too small for the
    /// plaintext domain, too large for the wire, or e/d are out of range.
    pub fn from_components(n: BigUint, e: BigUint, d: BigUint) -> Result<Self, SenpaiError> {
        let bits = n.bits() as usize;
        if bits < MIN_MODULUS_BITS {
            return Err(SenpaiError::KeyGeneration(format!(
                "modulus of {bits} bits is below the {MIN_MODULUS_BITS}-bit minimum"
            )));
        }
        if bits > MAX_MODULUS_BYTES * 8 {
            return Err(SenpaiError::KeyGeneration(format!(
                "modulus of {bits} bits exceeds the wire maximum"
            )));
        }
        let one = BigUint::from(1u8);
        if e <= one || e >= n {
            return Err(SenpaiError::KeyGeneration("public exponent out of range".into()));
        }
        if d <= one || d >= n {
            return Err(SenpaiError::KeyGeneration("private exponent out of range".into()));
        }
        Ok(KeyPair { n, e, d })
    }

    /// Generate a fresh key pair for the given parameters.
    ///
    /// # Errors
    /// Returns `SenpaiError::KeyGeneration` if the config is rejected or
    /// the underlying generator fails.
    pub fn generate_with(config: &ProtocolConfig) -> Result<Self, SenpaiError> {
        config.validate()?;
        let exponent = rsa::BigUint::from(u64::from(config.public_exponent));
        let key = RsaPrivateKey::new_with_exp(&mut OsRng, config.modulus_bits, &exponent)
            .map_err(|e| SenpaiError::KeyGeneration(e.to_string()))?;

        let pair = KeyPair {
            n: BigUint::from_bytes_be(&key.n().to_bytes_be()),
            e: BigUint::from_bytes_be(&key.e().to_bytes_be()),
            d: BigUint::from_bytes_be(&key.d().to_bytes_be()),
        };
        debug!(bits = pair.n.bits(), "generated session key pair");
        Ok(pair)
    }

    /// Modulus N.
    pub fn modulus(&self) -> &BigUint {
        &self.n
    }

    /// Public exponent e.
    pub fn public_exponent(&self) -> &BigUint {
        &self.e
    }

    pub(crate) fn private_exponent(&self) -> &BigUint {
        &self.d
    }

    /// Byte width of N; every modulus-sized wire field uses this width.
    pub fn modulus_len(&self) -> usize {
        modulus_len(&self.n)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("bits", &self.n.bits())
            .field("e", &self.e)
            .finish_non_exhaustive()
    }
}

/// Generate an RSA key pair with public exponent 65537 and a modulus of
/// `bits` bits.
///
/// # Errors
/// See [`KeyPair::generate_with`].
pub fn generate(bits: usize) -> Result<KeyPair, SenpaiError> {
    KeyPair::generate_with(&ProtocolConfig::with_modulus_bits(bits))
}

/// Byte width of a modulus.
pub(crate) fn modulus_len(n: &BigUint) -> usize {
    (n.bits() as usize).div_ceil(8)
}

#[cfg(test)]
pub(crate) mod test_keys {
    //! Literal 1024-bit key used by unit tests (never for real sessions).

    use super::*;

    pub(crate) const N_HEX: &str = "9fcb8a0ec114a7b2393742e9d56c87141c4487a00fcecf0c172f4871f8eec2d28b79bca8700b0fa838bb93f4abb9cf2911120c02fbfd82816c76e1abbbc84e99da4a71dfd72dac1958a977bb38e3315aa13b5736782ed664dad250dfc7ee2845504b74cdbae053ae32868cec9d96bd480b28fb8ef396c5fe746dd08dc1082feb";
    pub(crate) const D_HEX: &str = "2e589a722d0e10956082e6a56b814eac468699cf92c628c718f25dd0b0a28f5f01950d62cd1c682e22464563716b32ea764905b2d7e36f369a7ee0752ec1aa0a002672e571c1c1bd8a88b6d14f928ee2357cef407c056e699367e751368804535e6bac6abe9fce01b12ebba5e3800ce29683874e0c7736d34b289d29ae7efc1";

    pub(crate) fn key_pair() -> KeyPair {
        KeyPair::from_components(
            BigUint::parse_bytes(N_HEX.as_bytes(), 16).unwrap(),
            BigUint::from(65_537u32),
            BigUint::parse_bytes(D_HEX.as_bytes(), 16).unwrap(),
        )
        .unwrap()
    }
}
