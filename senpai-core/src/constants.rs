//! Protocol constants: wire widths, key parameters, message tags.
//!
//! Both roles MUST agree on every value here. Changing a width or a tag
//! is a wire break and requires bumping [`WIRE_VERSION`].

/// Certificate length in bytes (256-bit secret).
pub const CERTIFICATE_LENGTH: usize = 32;

/// Random padding prepended to every encoded secret (bytes).
pub const PADDING_LENGTH: usize = 32;

/// Encoded secret length: padding ‖ flag ‖ certificate.
pub const ENCODED_SECRET_LENGTH: usize = PADDING_LENGTH + 1 + CERTIFICATE_LENGTH;

/// Offset of the flag byte inside an encoded secret.
pub const FLAG_OFFSET: usize = PADDING_LENGTH;

/// Bit width of the encoded-secret domain (65 bytes).
pub const PLAINTEXT_BITS: usize = ENCODED_SECRET_LENGTH * 8;

/// Smallest modulus accepted by key generation and by Bob on Welcome.
///
/// A modulus of `b` bits is at least `2^(b-1)`, so `b - 1 >= 520` keeps
/// every 65-byte plaintext below N. Rounded up to a whole byte.
pub const MIN_MODULUS_BITS: usize = PLAINTEXT_BITS + 8;

/// Largest modulus width carried on the wire (4096-bit).
pub const MAX_MODULUS_BYTES: usize = 512;

/// Default RSA modulus size in bits.
pub const DEFAULT_MODULUS_BITS: usize = 1024;

/// Default RSA public exponent (F4).
pub const DEFAULT_PUBLIC_EXPONENT: u32 = 65_537;

/// Blinding value length in bytes (256-bit r).
pub const BLINDING_LENGTH: usize = 32;

/// Wire frame version (first byte of every frame).
pub const WIRE_VERSION: u8 = 1;

/// Frame header length: version ‖ tag.
pub const FRAME_HEADER_LENGTH: usize = 2;

/// Width prefix length for modulus-sized bodies (u16 big-endian).
pub const WIDTH_PREFIX_LENGTH: usize = 2;

/// Result body presence flag: no certificate (mutual like).
pub const RESULT_ABSENT: u8 = 0;

/// Result body presence flag: certificate follows.
pub const RESULT_PRESENT: u8 = 1;
