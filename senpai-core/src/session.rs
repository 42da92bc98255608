//! Session driver: one party's side of the exchange, addressed by codes.
//!
//! A [`Session`] owns at most one role. It accepts the opaque text codes
//! the peer shows, routes each by its tag to the right handler, and
//! answers [`Session::view`] with what the party should do next. The
//! view is derived on demand from protocol state; nothing is cached.
//!
//! Independent `Session` values share nothing.

use tracing::{debug, info, warn};

use crate::alice::{AliceProtocol, AliceStage, Confirmation};
use crate::bob::{BobProtocol, BobStage, Verdict};
use crate::config::ProtocolConfig;
use crate::errors::{DecodeError, SenpaiError};
use crate::wire::{
    peek_code_tag, AliceCalculation, AliceConfirmation, AliceWelcome, BobWelcomeBack, Delivery,
    MatchResult, MessageTag, WireMessage,
};

/// Which protocol role a session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    Alice,
    Bob,
}

/// What the party should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// No role selected.
    ChooseIdentity,
    /// Answer "do you like them?".
    ChoosePreference,
    /// Scan the peer's next code.
    Scan { expecting: MessageTag },
    /// Show `code` to the peer, then scan `expecting` if any.
    Show {
        code: String,
        expecting: Option<MessageTag>,
    },
    /// Both like each other. Bob still shows Alice the result `code`;
    /// Alice, having received it, has nothing left to show.
    Mutual { code: Option<String> },
    /// Bob returned a certificate that is not Alice's: he cheated.
    Invalid,
    /// Bob's faithfulness check on Alice.
    Verdict(Verdict),
}

#[derive(Clone, Default)]
enum Role {
    #[default]
    None,
    Alice(AliceProtocol),
    Bob(BobProtocol),
}

/// One party's session.
#[derive(Clone, Default)]
pub struct Session {
    role: Role,
    config: ProtocolConfig,
}

impl Session {
    /// A session with no identity and the default key parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session whose Alice role generates keys with `config`.
    pub fn with_config(config: ProtocolConfig) -> Self {
        Session {
            role: Role::None,
            config,
        }
    }

    pub fn identity(&self) -> Option<Identity> {
        match self.role {
            Role::None => None,
            Role::Alice(_) => Some(Identity::Alice),
            Role::Bob(_) => Some(Identity::Bob),
        }
    }

    /// Become Alice with a fresh, unlocked protocol.
    pub fn set_alice(&mut self) {
        self.role = Role::Alice(AliceProtocol::new());
        info!("session: identity set to alice");
    }

    /// Become Bob with a fresh blinding value.
    pub fn set_bob(&mut self) {
        let mut bob = BobProtocol::new();
        bob.init();
        self.role = Role::Bob(bob);
        info!("session: identity set to bob");
    }

    /// Swap roles, discarding the current exchange. From no identity
    /// this selects Bob.
    pub fn switch_identity(&mut self) {
        match self.role {
            Role::Bob(_) => self.set_alice(),
            Role::Alice(_) | Role::None => self.set_bob(),
        }
    }

    /// Drop the role and all its state.
    pub fn reset(&mut self) {
        self.role = Role::None;
        info!("session: reset");
    }

    /// Fix this party's answer.
    ///
    /// Alice generates her key and secrets here; Bob locks his choice
    /// against the Welcome he holds. A second lock-in is ignored.
    ///
    /// # Errors
    /// Returns `SenpaiError::State` with no identity or (for Bob) before
    /// Alice's Welcome, or `SenpaiError::KeyGeneration` for Alice.
    pub fn lock_in(&mut self, like: bool) -> Result<Delivery, SenpaiError> {
        match &mut self.role {
            Role::None => Err(SenpaiError::State("no identity selected".into())),
            Role::Alice(alice) => {
                if alice.is_locked() {
                    debug!("session: alice already locked in, ignoring");
                    return Ok(Delivery::Ignored);
                }
                alice.init_with_config(like, &self.config)?;
                Ok(Delivery::Accepted)
            }
            Role::Bob(bob) => bob.lock_in(like),
        }
    }

    /// Hand a scanned code to the current role.
    ///
    /// Blank input is ignored. The code's tag selects the handler; a tag
    /// that never flows towards this role is rejected. On any error the
    /// session is left exactly as it was.
    ///
    /// # Errors
    /// Returns `SenpaiError::Decode` for malformed or misdirected codes
    /// and `SenpaiError::State` for codes that arrive too early.
    pub fn receive(&mut self, code: &str) -> Result<Delivery, SenpaiError> {
        let code = code.trim();
        if code.is_empty() {
            return Ok(Delivery::Ignored);
        }

        let tag = peek_code_tag(code).inspect_err(|e| warn!(error = %e, "session: invalid code"))?;
        debug!(%tag, "session: code received");

        let delivery = match &mut self.role {
            Role::None => return Err(SenpaiError::State("no identity selected".into())),
            Role::Alice(alice) => match tag {
                MessageTag::WelcomeBack => alice.on_welcome_back(BobWelcomeBack::from_code(code)?),
                MessageTag::Result => alice.on_result(MatchResult::from_code(code)?),
                found => {
                    let expected = alice_expecting(alice).unwrap_or(MessageTag::WelcomeBack);
                    return Err(misdirected(expected, found));
                }
            },
            Role::Bob(bob) => match tag {
                MessageTag::Welcome => bob.on_welcome(AliceWelcome::from_code(code)?),
                MessageTag::Calculation => bob.on_calculation(AliceCalculation::from_code(code)?),
                MessageTag::Confirmation => {
                    bob.on_confirmation(AliceConfirmation::from_code(code)?)
                }
                found => {
                    let expected = bob_expecting(bob).unwrap_or(MessageTag::Welcome);
                    return Err(misdirected(expected, found));
                }
            },
        }?;

        if delivery == Delivery::Ignored {
            debug!(%tag, "session: duplicate code ignored");
        }
        Ok(delivery)
    }

    /// What the party should see now.
    ///
    /// # Errors
    /// Propagates errors from computing the outgoing code or the result
    /// (notably `SenpaiError::Arithmetic` for an unusable blinding value).
    pub fn view(&self) -> Result<View, SenpaiError> {
        match &self.role {
            Role::None => Ok(View::ChooseIdentity),
            Role::Alice(alice) => alice_view(alice),
            Role::Bob(bob) => bob_view(bob),
        }
    }

    pub fn alice(&self) -> Option<&AliceProtocol> {
        match &self.role {
            Role::Alice(alice) => Some(alice),
            _ => None,
        }
    }

    pub fn bob(&self) -> Option<&BobProtocol> {
        match &self.role {
            Role::Bob(bob) => Some(bob),
            _ => None,
        }
    }
}

fn misdirected(expected: MessageTag, found: MessageTag) -> SenpaiError {
    warn!(%expected, %found, "session: code is for the other role");
    DecodeError::UnexpectedTag { expected, found }.into()
}

fn alice_expecting(alice: &AliceProtocol) -> Option<MessageTag> {
    match alice.stage() {
        AliceStage::WelcomeReady => Some(MessageTag::WelcomeBack),
        AliceStage::CalculationReady => Some(MessageTag::Result),
        AliceStage::Uninitialized | AliceStage::Concluded => None,
    }
}

fn bob_expecting(bob: &BobProtocol) -> Option<MessageTag> {
    match bob.stage() {
        BobStage::Uninitialized | BobStage::AwaitingWelcome => Some(MessageTag::Welcome),
        BobStage::AwaitingCalculation => Some(MessageTag::Calculation),
        BobStage::ResultReady => Some(MessageTag::Confirmation),
        BobStage::AwaitingLock | BobStage::Confirmed => None,
    }
}

fn alice_view(alice: &AliceProtocol) -> Result<View, SenpaiError> {
    let view = match alice.stage() {
        AliceStage::Uninitialized => View::ChoosePreference,
        AliceStage::WelcomeReady => View::Show {
            code: alice.compute_welcome()?.to_code(),
            expecting: Some(MessageTag::WelcomeBack),
        },
        AliceStage::CalculationReady => View::Show {
            code: alice.compute_calculation()?.to_code(),
            expecting: Some(MessageTag::Result),
        },
        AliceStage::Concluded => match alice.compute_confirmation()? {
            Confirmation::Mutual => View::Mutual { code: None },
            Confirmation::Invalid => View::Invalid,
            Confirmation::Confirm(msg) => View::Show {
                code: msg.to_code(),
                expecting: None,
            },
        },
    };
    Ok(view)
}

fn bob_view(bob: &BobProtocol) -> Result<View, SenpaiError> {
    let view = match bob.stage() {
        BobStage::Uninitialized | BobStage::AwaitingWelcome => View::Scan {
            expecting: MessageTag::Welcome,
        },
        BobStage::AwaitingLock => View::ChoosePreference,
        BobStage::AwaitingCalculation => View::Show {
            code: bob.compute_welcome_back()?.to_code(),
            expecting: Some(MessageTag::Calculation),
        },
        BobStage::ResultReady => match bob.compute_result()? {
            MatchResult::Like => View::Mutual {
                code: Some(MatchResult::Like.to_code()),
            },
            result => View::Show {
                code: result.to_code(),
                expecting: Some(MessageTag::Confirmation),
            },
        },
        BobStage::Confirmed => View::Verdict(bob.check_faithfulness()?),
    };
    Ok(view)
}
