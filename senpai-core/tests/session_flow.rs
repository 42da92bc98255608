//! Two sessions talking only through `view()` and `receive()`.
//!
//! Each side shows whatever code its view offers and scans whatever the
//! other side shows, until neither has anything left to show.

use senpai_core::{Identity, MessageTag, ProtocolConfig, Session, Verdict, View};

fn session(identity: Identity) -> Session {
    let mut session = Session::with_config(ProtocolConfig::with_modulus_bits(768));
    match identity {
        Identity::Alice => session.set_alice(),
        Identity::Bob => session.set_bob(),
    }
    session
}

/// The code a view asks its party to show, if any.
fn outgoing(view: &View) -> Option<String> {
    match view {
        View::Show { code, .. } => Some(code.clone()),
        View::Mutual { code } => code.clone(),
        _ => None,
    }
}

/// Drive both sessions to completion; returns their final views.
fn run(like_bob: bool, like_alice: bool) -> (View, View) {
    let mut alice = session(Identity::Alice);
    let mut bob = session(Identity::Bob);
    alice.lock_in(like_bob).unwrap();

    // Welcome.
    let welcome = outgoing(&alice.view().unwrap()).expect("alice shows her welcome");
    bob.receive(&welcome).unwrap();
    assert_eq!(bob.view().unwrap(), View::ChoosePreference);
    bob.lock_in(like_alice).unwrap();

    // Alternate until both views stop offering new codes.
    for _ in 0..4 {
        if let Some(code) = outgoing(&bob.view().unwrap()) {
            alice.receive(&code).unwrap();
        }
        if let Some(code) = outgoing(&alice.view().unwrap()) {
            bob.receive(&code).unwrap();
        }
    }
    (alice.view().unwrap(), bob.view().unwrap())
}

#[test]
fn mutual_like_reaches_both_parties() {
    let (alice, bob) = run(true, true);
    assert_eq!(alice, View::Mutual { code: None });
    match bob {
        View::Mutual { code: Some(code) } => {
            assert_eq!(senpai_core::wire::peek_code_tag(&code).unwrap(), MessageTag::Result);
        }
        other => panic!("unexpected bob view {other:?}"),
    }
}

#[test]
fn non_mutual_outcomes_end_in_faithful_verdict() {
    for (like_bob, like_alice) in [(true, false), (false, true), (false, false)] {
        let (alice, bob) = run(like_bob, like_alice);
        assert!(
            matches!(alice, View::Show { expecting: None, .. }),
            "alice view {alice:?} for like_bob={like_bob} like_alice={like_alice}"
        );
        assert_eq!(bob, View::Verdict(Verdict::Faithful));
    }
}
