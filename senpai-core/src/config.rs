//! Key parameters for Alice's per-session RSA key.
//!
//! Both values are fixed for a deployment; the protocol does not
//! negotiate them. Bob accepts any Welcome whose modulus clears
//! [`MIN_MODULUS_BITS`], so Alice may raise the key size unilaterally.

use crate::constants::{
    DEFAULT_MODULUS_BITS, DEFAULT_PUBLIC_EXPONENT, MAX_MODULUS_BYTES, MIN_MODULUS_BITS,
};
use crate::errors::SenpaiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolConfig {
    /// RSA modulus size in bits.
    pub modulus_bits: usize,
    /// RSA public exponent.
    pub public_exponent: u32,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        ProtocolConfig {
            modulus_bits: DEFAULT_MODULUS_BITS,
            public_exponent: DEFAULT_PUBLIC_EXPONENT,
        }
    }
}

impl ProtocolConfig {
    /// Config with the default exponent and the given modulus size.
    pub fn with_modulus_bits(modulus_bits: usize) -> Self {
        ProtocolConfig {
            modulus_bits,
            ..Self::default()
        }
    }

    /// Reject parameters that cannot carry the 65-byte plaintext or the
    /// wire frame.
    ///
    /// # Errors
    /// Returns `SenpaiError::KeyGeneration` describing the violated bound.
    pub fn validate(&self) -> Result<(), SenpaiError> {
        if self.modulus_bits < MIN_MODULUS_BITS {
            return Err(SenpaiError::KeyGeneration(format!(
                "modulus of {} bits is below the {MIN_MODULUS_BITS}-bit minimum",
                self.modulus_bits
            )));
        }
        if self.modulus_bits > MAX_MODULUS_BYTES * 8 {
            return Err(SenpaiError::KeyGeneration(format!(
                "modulus of {} bits exceeds the {}-bit wire maximum",
                self.modulus_bits,
                MAX_MODULUS_BYTES * 8
            )));
        }
        if self.public_exponent < 3 || self.public_exponent % 2 == 0 {
            return Err(SenpaiError::KeyGeneration(format!(
                "public exponent {} must be odd and at least 3",
                self.public_exponent
            )));
        }
        Ok(())
    }
}
