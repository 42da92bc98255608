//! Alice's side of the exchange.
//!
//! Alice commits to two plaintexts under a fresh RSA key: `x` always
//! encodes "no", `y` encodes her real answer. Both share one
//! certificate. Bob blindly picks one ciphertext, Alice decrypts the
//! blinded value without learning which one he picked, and only a
//! mutual "yes" decodes to a true flag on Bob's side.
//!
//! ```text
//! Uninitialized ──init──▶ WelcomeReady ──on_welcome_back──▶ CalculationReady
//!                                                              │
//!                                              on_result ◀─────┘
//!                                                 │
//!                                                 ▼
//!                                             Concluded ── compute_confirmation
//! ```
//!
//! Each phase carries only the records valid for it. Transitions build
//! the next phase and replace the whole value; records are never
//! edited in place.

use std::sync::Arc;

use num_bigint::BigUint;
use tracing::{debug, info, warn};

use crate::config::ProtocolConfig;
use crate::constants::PADDING_LENGTH;
use crate::errors::{DecodeError, SenpaiError};
use crate::keys::KeyPair;
use crate::secret::{self, Certificate};
use crate::wire::{
    AliceCalculation, AliceConfirmation, AliceWelcome, BobWelcomeBack, Delivery, MatchResult,
};

/// Alice's private material for one session. Immutable once built.
pub struct AliceInitialState {
    keys: KeyPair,
    certificate: Certificate,
    like_bob: bool,
    x: BigUint,
    y: BigUint,
}

impl AliceInitialState {
    /// Fresh key pair, certificate and padding for a new session.
    ///
    /// # Errors
    /// Returns `SenpaiError::KeyGeneration` if key generation fails.
    pub fn generate(like_bob: bool, config: &ProtocolConfig) -> Result<Self, SenpaiError> {
        Ok(Self::with_keys(like_bob, KeyPair::generate_with(config)?))
    }

    /// Fresh certificate and padding under caller-supplied keys.
    pub fn with_keys(like_bob: bool, keys: KeyPair) -> Self {
        let certificate = Certificate::generate();
        let x = secret::encode(false, &certificate);
        let y = secret::encode(like_bob, &certificate);
        AliceInitialState {
            keys,
            certificate,
            like_bob,
            x,
            y,
        }
    }

    /// Fully deterministic construction; golden vectors pin every input.
    #[cfg_attr(not(feature = "vectors"), allow(dead_code))]
    pub(crate) fn from_parts(
        like_bob: bool,
        keys: KeyPair,
        certificate: Certificate,
        x_padding: &[u8; PADDING_LENGTH],
        y_padding: &[u8; PADDING_LENGTH],
    ) -> Self {
        let x = secret::encode_with_padding(false, &certificate, x_padding);
        let y = secret::encode_with_padding(like_bob, &certificate, y_padding);
        AliceInitialState {
            keys,
            certificate,
            like_bob,
            x,
            y,
        }
    }

    fn welcome(&self) -> Result<AliceWelcome, SenpaiError> {
        let n = self.keys.modulus();
        let e = self.keys.public_exponent();
        Ok(AliceWelcome::new(
            n.clone(),
            e.clone(),
            self.x.modpow(e, n),
            self.y.modpow(e, n),
        )?)
    }
}

/// What Alice should do with Bob's result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    /// Bob reported a mutual like; there is nothing to confirm.
    Mutual,
    /// Bob's certificate is not Alice's: the exchange was tampered with
    /// or desynchronised. Nothing is revealed.
    Invalid,
    /// Reveal `x` so Bob can check it against the committed `xe`.
    Confirm(AliceConfirmation),
}

/// Coarse position in Alice's exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliceStage {
    /// No preference locked in yet.
    Uninitialized,
    /// Welcome is ready to show; awaiting Bob's WelcomeBack.
    WelcomeReady,
    /// Calculation is ready to show; awaiting Bob's Result.
    CalculationReady,
    /// Result received; confirmation can be computed.
    Concluded,
}

#[derive(Clone, Default)]
enum AlicePhase {
    #[default]
    Uninitialized,
    Initialized {
        initial: Arc<AliceInitialState>,
    },
    Calculating {
        initial: Arc<AliceInitialState>,
        welcome_back: Arc<BobWelcomeBack>,
    },
    Concluded {
        initial: Arc<AliceInitialState>,
        welcome_back: Arc<BobWelcomeBack>,
        result: Arc<MatchResult>,
    },
}

/// Alice's protocol state machine.
#[derive(Clone, Default)]
pub struct AliceProtocol {
    phase: AlicePhase,
}

impl AliceProtocol {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from prepared material (golden vectors, tests).
    #[cfg_attr(not(feature = "vectors"), allow(dead_code))]
    pub(crate) fn from_initial(initial: AliceInitialState) -> Self {
        AliceProtocol {
            phase: AlicePhase::Initialized {
                initial: Arc::new(initial),
            },
        }
    }

    /// Lock in Alice's answer with default key parameters.
    ///
    /// Discards any exchange in flight; nothing carries over.
    ///
    /// # Errors
    /// Returns `SenpaiError::KeyGeneration` if key generation fails. The
    /// previous state is kept in that case.
    pub fn init(&mut self, like_bob: bool) -> Result<(), SenpaiError> {
        self.init_with_config(like_bob, &ProtocolConfig::default())
    }

    /// As [`AliceProtocol::init`] with explicit key parameters.
    ///
    /// # Errors
    /// See [`AliceProtocol::init`].
    pub fn init_with_config(
        &mut self,
        like_bob: bool,
        config: &ProtocolConfig,
    ) -> Result<(), SenpaiError> {
        let initial = AliceInitialState::generate(like_bob, config)?;
        self.replace_initial(initial);
        Ok(())
    }

    /// As [`AliceProtocol::init`] with a caller-supplied key pair.
    pub fn init_with_keys(&mut self, like_bob: bool, keys: KeyPair) {
        self.replace_initial(AliceInitialState::with_keys(like_bob, keys));
    }

    fn replace_initial(&mut self, initial: AliceInitialState) {
        if !matches!(self.phase, AlicePhase::Uninitialized) {
            debug!(stage = ?self.stage(), "alice: restarting, discarding exchange");
        }
        self.phase = AlicePhase::Initialized {
            initial: Arc::new(initial),
        };
        info!(bits = self.modulus_bits(), "alice: preference locked");
    }

    /// Public Welcome: N, e, xᵉ mod N, yᵉ mod N. Same value on every call.
    ///
    /// # Errors
    /// Returns `SenpaiError::State` before [`AliceProtocol::init`].
    pub fn compute_welcome(&self) -> Result<AliceWelcome, SenpaiError> {
        self.initial()
            .ok_or_else(|| SenpaiError::State("alice has not locked in a preference".into()))?
            .welcome()
    }

    /// Accept Bob's WelcomeBack. A second delivery is dropped.
    ///
    /// # Errors
    /// Returns `SenpaiError::State` before init, or `SenpaiError::Decode`
    /// if the residue does not match Alice's modulus.
    pub fn on_welcome_back(&mut self, msg: BobWelcomeBack) -> Result<Delivery, SenpaiError> {
        let initial = match &self.phase {
            AlicePhase::Uninitialized => {
                return Err(SenpaiError::State(
                    "welcome back before alice locked in".into(),
                ))
            }
            AlicePhase::Initialized { initial } => Arc::clone(initial),
            AlicePhase::Calculating { .. } | AlicePhase::Concluded { .. } => {
                debug!("alice: duplicate welcome back ignored");
                return Ok(Delivery::Ignored);
            }
        };

        if msg.width() != initial.keys.modulus_len() {
            warn!(width = msg.width(), "alice: welcome back width mismatch");
            return Err(DecodeError::Width(msg.width()).into());
        }
        if msg.zere() >= initial.keys.modulus() {
            return Err(DecodeError::OutOfRange("zere").into());
        }

        self.phase = AlicePhase::Calculating {
            initial,
            welcome_back: Arc::new(msg),
        };
        debug!("alice: welcome back accepted");
        Ok(Delivery::Accepted)
    }

    /// zr = zereᵈ mod N.
    ///
    /// # Errors
    /// Returns `SenpaiError::State` if Bob's WelcomeBack has not arrived.
    pub fn compute_calculation(&self) -> Result<AliceCalculation, SenpaiError> {
        let (initial, welcome_back) = match &self.phase {
            AlicePhase::Calculating {
                initial,
                welcome_back,
            }
            | AlicePhase::Concluded {
                initial,
                welcome_back,
                ..
            } => (initial, welcome_back),
            _ => return Err(SenpaiError::State("bob's welcome back is not available".into())),
        };
        let keys = &initial.keys;
        let zr = welcome_back
            .zere()
            .modpow(keys.private_exponent(), keys.modulus());
        Ok(AliceCalculation::new(zr, keys.modulus_len())?)
    }

    /// Accept Bob's Result. A second delivery is dropped.
    ///
    /// # Errors
    /// Returns `SenpaiError::State` if no WelcomeBack has been accepted.
    pub fn on_result(&mut self, msg: MatchResult) -> Result<Delivery, SenpaiError> {
        let (initial, welcome_back) = match &self.phase {
            AlicePhase::Uninitialized | AlicePhase::Initialized { .. } => {
                return Err(SenpaiError::State(
                    "result before the calculation was produced".into(),
                ))
            }
            AlicePhase::Calculating {
                initial,
                welcome_back,
            } => (Arc::clone(initial), Arc::clone(welcome_back)),
            AlicePhase::Concluded { .. } => {
                debug!("alice: duplicate result ignored");
                return Ok(Delivery::Ignored);
            }
        };

        self.phase = AlicePhase::Concluded {
            initial,
            welcome_back,
            result: Arc::new(msg),
        };
        debug!("alice: result accepted");
        Ok(Delivery::Accepted)
    }

    /// Decide what to reveal after Bob's result.
    ///
    /// # Errors
    /// Returns `SenpaiError::State` if no Result has been accepted.
    pub fn compute_confirmation(&self) -> Result<Confirmation, SenpaiError> {
        let AlicePhase::Concluded {
            initial, result, ..
        } = &self.phase
        else {
            return Err(SenpaiError::State("bob's result is not available".into()));
        };

        let confirmation = match result.certificate() {
            None => Confirmation::Mutual,
            Some(cert) if *cert != initial.certificate => {
                warn!("alice: result certificate does not match");
                Confirmation::Invalid
            }
            Some(_) => Confirmation::Confirm(AliceConfirmation::new(initial.x.clone())?),
        };
        Ok(confirmation)
    }

    // ── Queries ─────────────────────────────────────────────────────

    pub fn stage(&self) -> AliceStage {
        match self.phase {
            AlicePhase::Uninitialized => AliceStage::Uninitialized,
            AlicePhase::Initialized { .. } => AliceStage::WelcomeReady,
            AlicePhase::Calculating { .. } => AliceStage::CalculationReady,
            AlicePhase::Concluded { .. } => AliceStage::Concluded,
        }
    }

    /// `true` once Alice has locked in a preference.
    pub fn is_locked(&self) -> bool {
        self.initial().is_some()
    }

    pub fn like_bob(&self) -> Option<bool> {
        self.initial().map(|i| i.like_bob)
    }

    /// Alice's certificate for this session.
    pub fn certificate(&self) -> Option<&Certificate> {
        self.initial().map(|i| &i.certificate)
    }

    pub fn welcome_back(&self) -> Option<&BobWelcomeBack> {
        match &self.phase {
            AlicePhase::Calculating { welcome_back, .. }
            | AlicePhase::Concluded { welcome_back, .. } => Some(welcome_back.as_ref()),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&MatchResult> {
        match &self.phase {
            AlicePhase::Concluded { result, .. } => Some(result.as_ref()),
            _ => None,
        }
    }

    fn initial(&self) -> Option<&AliceInitialState> {
        match &self.phase {
            AlicePhase::Uninitialized => None,
            AlicePhase::Initialized { initial }
            | AlicePhase::Calculating { initial, .. }
            | AlicePhase::Concluded { initial, .. } => Some(initial.as_ref()),
        }
    }

    fn modulus_bits(&self) -> u64 {
        self.initial().map_or(0, |i| i.keys.modulus().bits())
    }
}
