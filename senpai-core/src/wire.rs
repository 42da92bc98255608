//! Wire schema: the five protocol messages as tagged, fixed-width frames.
//!
//! ## Frame layout
//! ```text
//! frame = version[1] || tag[1] || body
//! code  = base64(frame)
//! ```
//!
//! | Tag | Message | Body |
//! |-----|---------|------|
//! | `0x01` | [`AliceWelcome`] | `width[2] ‖ N ‖ e ‖ xe ‖ ye` |
//! | `0x02` | [`BobWelcomeBack`] | `width[2] ‖ zere` |
//! | `0x03` | [`AliceCalculation`] | `width[2] ‖ zr` |
//! | `0x04` | [`MatchResult`] | `present[1] ‖ certificate[32]?` |
//! | `0x05` | [`AliceConfirmation`] | `x[65]` |
//!
//! Integers are big-endian, left-padded to `width` (the byte length of
//! N). Decoders check version and tag before touching the body, and
//! require exact body lengths. Codes arrive from a camera or a paste
//! buffer, so nothing here trusts the input.

use std::fmt;

use num_bigint::BigUint;

use crate::constants::{
    CERTIFICATE_LENGTH, ENCODED_SECRET_LENGTH, FRAME_HEADER_LENGTH, MAX_MODULUS_BYTES,
    MIN_MODULUS_BITS, RESULT_ABSENT, RESULT_PRESENT, WIDTH_PREFIX_LENGTH, WIRE_VERSION,
};
use crate::encoding::{from_base64, to_base64, to_fixed_be};
use crate::errors::DecodeError;
use crate::keys::modulus_len;
use crate::secret::Certificate;

/// Message type tag (second byte of every frame).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageTag {
    Welcome,
    WelcomeBack,
    Calculation,
    Result,
    Confirmation,
}

impl MessageTag {
    pub fn as_byte(self) -> u8 {
        match self {
            MessageTag::Welcome => 0x01,
            MessageTag::WelcomeBack => 0x02,
            MessageTag::Calculation => 0x03,
            MessageTag::Result => 0x04,
            MessageTag::Confirmation => 0x05,
        }
    }

    /// # Errors
    /// Returns `DecodeError::UnknownTag` for bytes outside the registry.
    pub fn from_byte(byte: u8) -> Result<Self, DecodeError> {
        match byte {
            0x01 => Ok(MessageTag::Welcome),
            0x02 => Ok(MessageTag::WelcomeBack),
            0x03 => Ok(MessageTag::Calculation),
            0x04 => Ok(MessageTag::Result),
            0x05 => Ok(MessageTag::Confirmation),
            other => Err(DecodeError::UnknownTag(other)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MessageTag::Welcome => "AliceWelcome",
            MessageTag::WelcomeBack => "BobWelcomeBack",
            MessageTag::Calculation => "AliceCalculation",
            MessageTag::Result => "Result",
            MessageTag::Confirmation => "AliceConfirmation",
        }
    }
}

impl fmt::Display for MessageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of handing an inbound message to a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The message filled its slot; the role advanced.
    Accepted,
    /// The slot was already filled; the message was dropped unchanged.
    Ignored,
}

// ── Messages ────────────────────────────────────────────────────────

/// Alice's opening message: her public key and both ciphertexts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliceWelcome {
    n: BigUint,
    e: BigUint,
    xe: BigUint,
    ye: BigUint,
}

impl AliceWelcome {
    /// # Errors
    /// Returns `DecodeError::OutOfRange` if N cannot hold the 65-byte
    /// plaintext domain or exceeds the wire maximum, if `e` is not in
    /// `(1, N)`, or if either ciphertext is not reduced mod N.
    pub fn new(n: BigUint, e: BigUint, xe: BigUint, ye: BigUint) -> Result<Self, DecodeError> {
        let bits = n.bits() as usize;
        if bits < MIN_MODULUS_BITS || modulus_len(&n) > MAX_MODULUS_BYTES {
            return Err(DecodeError::OutOfRange("modulus"));
        }
        if e <= BigUint::from(1u8) || e >= n {
            return Err(DecodeError::OutOfRange("public exponent"));
        }
        if xe >= n {
            return Err(DecodeError::OutOfRange("xe"));
        }
        if ye >= n {
            return Err(DecodeError::OutOfRange("ye"));
        }
        Ok(AliceWelcome { n, e, xe, ye })
    }

    pub fn modulus(&self) -> &BigUint {
        &self.n
    }

    pub fn public_exponent(&self) -> &BigUint {
        &self.e
    }

    /// Encryption of Alice's always-false plaintext x.
    pub fn xe(&self) -> &BigUint {
        &self.xe
    }

    /// Encryption of Alice's true-answer plaintext y.
    pub fn ye(&self) -> &BigUint {
        &self.ye
    }

    /// Byte width of N.
    pub fn width(&self) -> usize {
        modulus_len(&self.n)
    }
}

/// Bob's blinded choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BobWelcomeBack {
    zere: BigUint,
    width: usize,
}

impl BobWelcomeBack {
    /// # Errors
    /// Returns `DecodeError::Width` if `width` is unusable, or
    /// `DecodeError::OutOfRange` if `zere` does not fit in it.
    pub fn new(zere: BigUint, width: usize) -> Result<Self, DecodeError> {
        check_residue(&zere, width, "zere")?;
        Ok(BobWelcomeBack { zere, width })
    }

    pub fn zere(&self) -> &BigUint {
        &self.zere
    }

    pub fn width(&self) -> usize {
        self.width
    }
}

/// Alice's private-key exponentiation of Bob's blinded choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliceCalculation {
    zr: BigUint,
    width: usize,
}

impl AliceCalculation {
    /// # Errors
    /// Returns `DecodeError::Width` if `width` is unusable, or
    /// `DecodeError::OutOfRange` if `zr` does not fit in it.
    pub fn new(zr: BigUint, width: usize) -> Result<Self, DecodeError> {
        check_residue(&zr, width, "zr")?;
        Ok(AliceCalculation { zr, width })
    }

    pub fn zr(&self) -> &BigUint {
        &self.zr
    }

    pub fn width(&self) -> usize {
        self.width
    }
}

/// Bob's computed outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// Both parties like each other. No certificate is revealed.
    Like,
    /// Not mutual. Carries the certificate Bob recovered, for audit.
    Certificate(Certificate),
}

impl MatchResult {
    pub fn certificate(&self) -> Option<&Certificate> {
        match self {
            MatchResult::Like => None,
            MatchResult::Certificate(cert) => Some(cert),
        }
    }

    pub fn is_like(&self) -> bool {
        matches!(self, MatchResult::Like)
    }
}

/// Alice's reveal of her always-false plaintext x.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliceConfirmation {
    x: BigUint,
}

impl AliceConfirmation {
    /// # Errors
    /// Returns `DecodeError::PlaintextTooLarge` if `x` needs more than
    /// 65 bytes.
    pub fn new(x: BigUint) -> Result<Self, DecodeError> {
        if x.bits() as usize > ENCODED_SECRET_LENGTH * 8 {
            return Err(DecodeError::PlaintextTooLarge);
        }
        Ok(AliceConfirmation { x })
    }

    pub fn x(&self) -> &BigUint {
        &self.x
    }
}

fn check_residue(value: &BigUint, width: usize, field: &'static str) -> Result<(), DecodeError> {
    if width == 0 || width > MAX_MODULUS_BYTES {
        return Err(DecodeError::Width(width));
    }
    if modulus_len(value) > width {
        return Err(DecodeError::OutOfRange(field));
    }
    Ok(())
}

// ── Codec ───────────────────────────────────────────────────────────

/// A message with a fixed tag and a fixed-width binary body.
pub trait WireMessage: Sized {
    const TAG: MessageTag;

    /// Append the body (everything after the tag byte).
    fn encode_body(&self, out: &mut Vec<u8>);

    /// Parse a body whose header has already been validated.
    ///
    /// # Errors
    /// Returns `DecodeError` on any length, width, flag, or range violation.
    fn decode_body(body: &[u8]) -> Result<Self, DecodeError>;

    fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![WIRE_VERSION, Self::TAG.as_byte()];
        self.encode_body(&mut out);
        out
    }

    /// # Errors
    /// Returns `DecodeError::UnexpectedTag` if the frame carries a
    /// different message, or any error from [`peek_tag`] / `decode_body`.
    fn from_bytes(frame: &[u8]) -> Result<Self, DecodeError> {
        let found = peek_tag(frame)?;
        if found != Self::TAG {
            return Err(DecodeError::UnexpectedTag {
                expected: Self::TAG,
                found,
            });
        }
        Self::decode_body(&frame[FRAME_HEADER_LENGTH..])
    }

    /// Render as the base64 text carried by the channel.
    fn to_code(&self) -> String {
        to_base64(&self.to_bytes())
    }

    /// # Errors
    /// Returns `DecodeError::Base64` for non-base64 text, otherwise as
    /// [`WireMessage::from_bytes`].
    fn from_code(code: &str) -> Result<Self, DecodeError> {
        Self::from_bytes(&from_base64(code)?)
    }
}

/// Validate the frame header and return its tag.
///
/// # Errors
/// Returns `DecodeError::Truncated` for frames shorter than the header,
/// `DecodeError::Version` or `DecodeError::UnknownTag` for bad headers.
pub fn peek_tag(frame: &[u8]) -> Result<MessageTag, DecodeError> {
    if frame.len() < FRAME_HEADER_LENGTH {
        return Err(DecodeError::Truncated(frame.len()));
    }
    if frame[0] != WIRE_VERSION {
        return Err(DecodeError::Version(frame[0]));
    }
    MessageTag::from_byte(frame[1])
}

/// Decode the base64 text and return the frame's tag.
///
/// # Errors
/// As [`from_base64`] and [`peek_tag`].
pub fn peek_code_tag(code: &str) -> Result<MessageTag, DecodeError> {
    peek_tag(&from_base64(code)?)
}

fn push_fixed(out: &mut Vec<u8>, value: &BigUint, width: usize) {
    let bytes = to_fixed_be(value, width)
        .expect("message constructors bound every field to its declared width");
    out.extend_from_slice(&bytes);
}

fn encode_residues(out: &mut Vec<u8>, width: usize, fields: &[&BigUint]) {
    // width <= MAX_MODULUS_BYTES, which fits in u16.
    out.extend_from_slice(&(width as u16).to_be_bytes());
    for field in fields {
        push_fixed(out, field, width);
    }
}

fn decode_residues<const COUNT: usize>(
    tag: MessageTag,
    body: &[u8],
) -> Result<(usize, [BigUint; COUNT]), DecodeError> {
    if body.len() < WIDTH_PREFIX_LENGTH {
        return Err(DecodeError::Length {
            tag,
            expected: WIDTH_PREFIX_LENGTH,
            actual: body.len(),
        });
    }
    let width = usize::from(u16::from_be_bytes([body[0], body[1]]));
    if width == 0 || width > MAX_MODULUS_BYTES {
        return Err(DecodeError::Width(width));
    }
    let expected = WIDTH_PREFIX_LENGTH + COUNT * width;
    if body.len() != expected {
        return Err(DecodeError::Length {
            tag,
            expected,
            actual: body.len(),
        });
    }
    let fields = std::array::from_fn(|i| {
        let start = WIDTH_PREFIX_LENGTH + i * width;
        BigUint::from_bytes_be(&body[start..start + width])
    });
    Ok((width, fields))
}

impl WireMessage for AliceWelcome {
    const TAG: MessageTag = MessageTag::Welcome;

    fn encode_body(&self, out: &mut Vec<u8>) {
        encode_residues(out, self.width(), &[&self.n, &self.e, &self.xe, &self.ye]);
    }

    fn decode_body(body: &[u8]) -> Result<Self, DecodeError> {
        let (width, [n, e, xe, ye]) = decode_residues::<4>(Self::TAG, body)?;
        // N must fill its declared width: no zero-padded moduli.
        if modulus_len(&n) != width {
            return Err(DecodeError::Width(width));
        }
        AliceWelcome::new(n, e, xe, ye)
    }
}

impl WireMessage for BobWelcomeBack {
    const TAG: MessageTag = MessageTag::WelcomeBack;

    fn encode_body(&self, out: &mut Vec<u8>) {
        encode_residues(out, self.width, &[&self.zere]);
    }

    fn decode_body(body: &[u8]) -> Result<Self, DecodeError> {
        let (width, [zere]) = decode_residues::<1>(Self::TAG, body)?;
        BobWelcomeBack::new(zere, width)
    }
}

impl WireMessage for AliceCalculation {
    const TAG: MessageTag = MessageTag::Calculation;

    fn encode_body(&self, out: &mut Vec<u8>) {
        encode_residues(out, self.width, &[&self.zr]);
    }

    fn decode_body(body: &[u8]) -> Result<Self, DecodeError> {
        let (width, [zr]) = decode_residues::<1>(Self::TAG, body)?;
        AliceCalculation::new(zr, width)
    }
}

impl WireMessage for MatchResult {
    const TAG: MessageTag = MessageTag::Result;

    fn encode_body(&self, out: &mut Vec<u8>) {
        match self {
            MatchResult::Like => out.push(RESULT_ABSENT),
            MatchResult::Certificate(cert) => {
                out.push(RESULT_PRESENT);
                out.extend_from_slice(cert.as_bytes());
            }
        }
    }

    fn decode_body(body: &[u8]) -> Result<Self, DecodeError> {
        let Some((&flag, rest)) = body.split_first() else {
            return Err(DecodeError::Length {
                tag: Self::TAG,
                expected: 1,
                actual: 0,
            });
        };
        let expected_rest = match flag {
            RESULT_ABSENT => 0,
            RESULT_PRESENT => CERTIFICATE_LENGTH,
            other => return Err(DecodeError::Flag(other)),
        };
        if rest.len() != expected_rest {
            return Err(DecodeError::Length {
                tag: Self::TAG,
                expected: 1 + expected_rest,
                actual: body.len(),
            });
        }
        if flag == RESULT_ABSENT {
            return Ok(MatchResult::Like);
        }
        let mut cert = [0u8; CERTIFICATE_LENGTH];
        cert.copy_from_slice(rest);
        Ok(MatchResult::Certificate(Certificate::from_bytes(cert)))
    }
}

impl WireMessage for AliceConfirmation {
    const TAG: MessageTag = MessageTag::Confirmation;

    fn encode_body(&self, out: &mut Vec<u8>) {
        push_fixed(out, &self.x, ENCODED_SECRET_LENGTH);
    }

    fn decode_body(body: &[u8]) -> Result<Self, DecodeError> {
        if body.len() != ENCODED_SECRET_LENGTH {
            return Err(DecodeError::Length {
                tag: Self::TAG,
                expected: ENCODED_SECRET_LENGTH,
                actual: body.len(),
            });
        }
        AliceConfirmation::new(BigUint::from_bytes_be(body))
    }
}
