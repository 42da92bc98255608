//! Bob's side of the exchange.
//!
//! Bob picks one of Alice's two ciphertexts with his own answer and
//! blinds it with a random `r` before sending it back:
//!
//! ```text
//! zere = rᵉ · (ye if like_alice else xe)  mod N
//! zr   = zereᵈ = r · (y or x)              mod N   (Alice)
//! z    = zr · r⁻¹ = (y or x)               mod N   (Bob)
//! ```
//!
//! RSA is multiplicatively homomorphic, so Alice's decryption strips the
//! encryption but not the blinding: she learns neither `r` nor which
//! ciphertext Bob chose. `z` decodes to a true flag only if Bob chose
//! `y` and Alice's answer in `y` was "yes".
//!
//! On a non-mutual outcome Bob holds the certificate and can demand
//! Alice reveal `x`, then check it against the committed `xe`.
//!
//! `r` lives in a `num_bigint::BigUint`, which does not implement
//! `Zeroize`; its limbs are not wiped when the session drops. Only the
//! transient byte buffer it is drawn into is zeroized.

use std::sync::Arc;

use num_bigint::BigUint;
use rand_core::{OsRng, RngCore};
use tracing::{debug, info, warn};
use zeroize::Zeroize;

use crate::constants::BLINDING_LENGTH;
use crate::errors::{DecodeError, SenpaiError};
use crate::secret;
use crate::wire::{
    AliceCalculation, AliceConfirmation, AliceWelcome, BobWelcomeBack, Delivery, MatchResult,
};

/// Bob's private blinding value for one session.
pub struct BobInitialState {
    r: BigUint,
}

impl BobInitialState {
    /// Draw a fresh 256-bit blinding value from the OS CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; BLINDING_LENGTH];
        OsRng.fill_bytes(&mut bytes);
        let r = BigUint::from_bytes_be(&bytes);
        bytes.zeroize();
        BobInitialState { r }
    }

    /// Fixed blinding value; golden vectors pin it.
    #[cfg_attr(not(feature = "vectors"), allow(dead_code))]
    pub(crate) fn from_blinding(r: BigUint) -> Self {
        BobInitialState { r }
    }
}

/// Result of the faithfulness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Alice's revealed `x` encrypts to the `xe` she committed to.
    Faithful,
    /// It does not: Alice swapped her commitment.
    Unfaithful,
}

/// Coarse position in Bob's exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BobStage {
    /// No blinding value drawn yet.
    Uninitialized,
    /// Waiting for Alice's Welcome.
    AwaitingWelcome,
    /// Welcome received; Bob has not chosen yet.
    AwaitingLock,
    /// WelcomeBack ready to show; awaiting Alice's Calculation.
    AwaitingCalculation,
    /// Calculation received; the result can be computed.
    ResultReady,
    /// Alice's confirmation received; the verdict can be computed.
    Confirmed,
}

/// Bob's locked-in choice and everything it was made against.
struct Choice {
    initial: Arc<BobInitialState>,
    welcome: Arc<AliceWelcome>,
    like_alice: bool,
}

#[derive(Clone, Default)]
enum BobPhase {
    #[default]
    Uninitialized,
    Initialized {
        initial: Arc<BobInitialState>,
    },
    Welcomed {
        initial: Arc<BobInitialState>,
        welcome: Arc<AliceWelcome>,
    },
    Locked {
        choice: Arc<Choice>,
    },
    Calculated {
        choice: Arc<Choice>,
        calculation: Arc<AliceCalculation>,
    },
    Confirmed {
        choice: Arc<Choice>,
        calculation: Arc<AliceCalculation>,
        confirmation: Arc<AliceConfirmation>,
    },
}

/// Bob's protocol state machine.
#[derive(Clone, Default)]
pub struct BobProtocol {
    phase: BobPhase,
}

impl BobProtocol {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a prepared blinding value (golden vectors, tests).
    #[cfg_attr(not(feature = "vectors"), allow(dead_code))]
    pub(crate) fn from_initial(initial: BobInitialState) -> Self {
        BobProtocol {
            phase: BobPhase::Initialized {
                initial: Arc::new(initial),
            },
        }
    }

    /// Draw a fresh blinding value. Discards any exchange in flight.
    pub fn init(&mut self) {
        if !matches!(self.phase, BobPhase::Uninitialized) {
            debug!(stage = ?self.stage(), "bob: restarting, discarding exchange");
        }
        self.phase = BobPhase::Initialized {
            initial: Arc::new(BobInitialState::generate()),
        };
        info!("bob: session initialised");
    }

    /// Accept Alice's Welcome. A second delivery is dropped.
    ///
    /// # Errors
    /// Returns `SenpaiError::State` before [`BobProtocol::init`].
    pub fn on_welcome(&mut self, msg: AliceWelcome) -> Result<Delivery, SenpaiError> {
        let initial = match &self.phase {
            BobPhase::Uninitialized => {
                return Err(SenpaiError::State("welcome before bob initialised".into()))
            }
            BobPhase::Initialized { initial } => Arc::clone(initial),
            _ => {
                debug!("bob: duplicate welcome ignored");
                return Ok(Delivery::Ignored);
            }
        };

        debug!(bits = msg.modulus().bits(), "bob: welcome accepted");
        self.phase = BobPhase::Welcomed {
            initial,
            welcome: Arc::new(msg),
        };
        Ok(Delivery::Accepted)
    }

    /// Fix Bob's answer for this session. A second lock-in is dropped.
    ///
    /// # Errors
    /// Returns `SenpaiError::State` if Alice's Welcome has not arrived.
    pub fn lock_in(&mut self, like_alice: bool) -> Result<Delivery, SenpaiError> {
        let (initial, welcome) = match &self.phase {
            BobPhase::Uninitialized | BobPhase::Initialized { .. } => {
                return Err(SenpaiError::State(
                    "cannot lock in before alice's welcome".into(),
                ))
            }
            BobPhase::Welcomed { initial, welcome } => (Arc::clone(initial), Arc::clone(welcome)),
            _ => {
                debug!("bob: already locked in, ignoring");
                return Ok(Delivery::Ignored);
            }
        };

        self.phase = BobPhase::Locked {
            choice: Arc::new(Choice {
                initial,
                welcome,
                like_alice,
            }),
        };
        info!("bob: preference locked");
        Ok(Delivery::Accepted)
    }

    /// zere = rᵉ · (ye if like_alice else xe) mod N.
    ///
    /// # Errors
    /// Returns `SenpaiError::State` before [`BobProtocol::lock_in`].
    pub fn compute_welcome_back(&self) -> Result<BobWelcomeBack, SenpaiError> {
        let choice = self
            .choice()
            .ok_or_else(|| SenpaiError::State("bob has not locked in a preference".into()))?;
        let welcome = &choice.welcome;
        let n = welcome.modulus();
        let selected = if choice.like_alice {
            welcome.ye()
        } else {
            welcome.xe()
        };
        let zere = choice.initial.r.modpow(welcome.public_exponent(), n) * selected % n;
        Ok(BobWelcomeBack::new(zere, welcome.width())?)
    }

    /// Accept Alice's Calculation. A second delivery is dropped.
    ///
    /// # Errors
    /// Returns `SenpaiError::State` before lock-in, or
    /// `SenpaiError::Decode` if the residue does not match Alice's modulus.
    pub fn on_calculation(&mut self, msg: AliceCalculation) -> Result<Delivery, SenpaiError> {
        let choice = match &self.phase {
            BobPhase::Locked { choice } => Arc::clone(choice),
            BobPhase::Calculated { .. } | BobPhase::Confirmed { .. } => {
                debug!("bob: duplicate calculation ignored");
                return Ok(Delivery::Ignored);
            }
            _ => {
                return Err(SenpaiError::State(
                    "calculation before bob sent his welcome back".into(),
                ))
            }
        };

        if msg.width() != choice.welcome.width() {
            warn!(width = msg.width(), "bob: calculation width mismatch");
            return Err(DecodeError::Width(msg.width()).into());
        }
        if msg.zr() >= choice.welcome.modulus() {
            return Err(DecodeError::OutOfRange("zr").into());
        }

        self.phase = BobPhase::Calculated {
            choice,
            calculation: Arc::new(msg),
        };
        debug!("bob: calculation accepted");
        Ok(Delivery::Accepted)
    }

    /// z = zr · r⁻¹ mod N, decoded into the outcome.
    ///
    /// # Errors
    /// Returns `SenpaiError::State` before the Calculation arrived,
    /// `SenpaiError::Arithmetic` if r has no inverse mod N, or
    /// `SenpaiError::Decode` if z is not a 65-byte plaintext.
    pub fn compute_result(&self) -> Result<MatchResult, SenpaiError> {
        let (choice, calculation) = match &self.phase {
            BobPhase::Calculated {
                choice,
                calculation,
            }
            | BobPhase::Confirmed {
                choice,
                calculation,
                ..
            } => (choice, calculation),
            _ => {
                return Err(SenpaiError::State(
                    "alice's calculation is not available".into(),
                ))
            }
        };
        result_for(choice, calculation)
    }

    /// Accept Alice's Confirmation. Only meaningful on a non-mutual
    /// result; on `Like` (or a second delivery) it is dropped.
    ///
    /// # Errors
    /// Returns `SenpaiError::State` before the Calculation arrived, or
    /// any error from [`BobProtocol::compute_result`].
    pub fn on_confirmation(&mut self, msg: AliceConfirmation) -> Result<Delivery, SenpaiError> {
        let (choice, calculation) = match &self.phase {
            BobPhase::Calculated {
                choice,
                calculation,
            } => (Arc::clone(choice), Arc::clone(calculation)),
            BobPhase::Confirmed { .. } => {
                debug!("bob: duplicate confirmation ignored");
                return Ok(Delivery::Ignored);
            }
            _ => {
                return Err(SenpaiError::State(
                    "confirmation before alice's calculation".into(),
                ))
            }
        };

        if result_for(&choice, &calculation)?.is_like() {
            debug!("bob: mutual result has no confirmation phase, ignoring");
            return Ok(Delivery::Ignored);
        }

        self.phase = BobPhase::Confirmed {
            choice,
            calculation,
            confirmation: Arc::new(msg),
        };
        debug!("bob: confirmation accepted");
        Ok(Delivery::Accepted)
    }

    /// Compare xᵉ mod N with the committed xe.
    ///
    /// # Errors
    /// Returns `SenpaiError::State` before a Confirmation was accepted.
    pub fn check_faithfulness(&self) -> Result<Verdict, SenpaiError> {
        let BobPhase::Confirmed {
            choice,
            confirmation,
            ..
        } = &self.phase
        else {
            return Err(SenpaiError::State(
                "alice's confirmation is not available".into(),
            ));
        };

        let welcome = &choice.welcome;
        let recomputed = confirmation
            .x()
            .modpow(welcome.public_exponent(), welcome.modulus());
        let verdict = if &recomputed == welcome.xe() {
            Verdict::Faithful
        } else {
            warn!("bob: revealed x does not match the committed xe");
            Verdict::Unfaithful
        };
        info!(?verdict, "bob: faithfulness checked");
        Ok(verdict)
    }

    // ── Queries ─────────────────────────────────────────────────────

    pub fn stage(&self) -> BobStage {
        match self.phase {
            BobPhase::Uninitialized => BobStage::Uninitialized,
            BobPhase::Initialized { .. } => BobStage::AwaitingWelcome,
            BobPhase::Welcomed { .. } => BobStage::AwaitingLock,
            BobPhase::Locked { .. } => BobStage::AwaitingCalculation,
            BobPhase::Calculated { .. } => BobStage::ResultReady,
            BobPhase::Confirmed { .. } => BobStage::Confirmed,
        }
    }

    /// `true` once Bob has locked in a preference.
    pub fn is_locked(&self) -> bool {
        self.choice().is_some()
    }

    /// `true` while Welcome is in hand and Bob has not chosen.
    pub fn waiting_for_lock(&self) -> bool {
        matches!(self.phase, BobPhase::Welcomed { .. })
    }

    pub fn like_alice(&self) -> Option<bool> {
        self.choice().map(|c| c.like_alice)
    }

    pub fn welcome(&self) -> Option<&AliceWelcome> {
        match &self.phase {
            BobPhase::Welcomed { welcome, .. } => Some(welcome.as_ref()),
            _ => self.choice().map(|c| c.welcome.as_ref()),
        }
    }

    fn choice(&self) -> Option<&Choice> {
        match &self.phase {
            BobPhase::Locked { choice }
            | BobPhase::Calculated { choice, .. }
            | BobPhase::Confirmed { choice, .. } => Some(choice.as_ref()),
            _ => None,
        }
    }
}

fn result_for(choice: &Choice, calculation: &AliceCalculation) -> Result<MatchResult, SenpaiError> {
    let n = choice.welcome.modulus();
    let r_inv = choice
        .initial
        .r
        .modinv(n)
        .ok_or_else(|| SenpaiError::Arithmetic("blinding value has no inverse mod N".into()))?;
    let z = calculation.zr() * r_inv % n;
    let (flag, certificate) = secret::decode(&z)?;
    Ok(if flag {
        MatchResult::Like
    } else {
        MatchResult::Certificate(certificate)
    })
}
