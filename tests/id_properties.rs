//! Property-based tests for the identifier grammar
//!
//! Verifies the round-trip and rejection invariants across randomly
//! generated inputs, plus the collision trust assumption.

use audiolink::{AudiolinkId, IdState};
use proptest::prelude::*;
use std::collections::HashSet;

/// Reference check for the serialized grammar `^[0-9a-f]{32}-al$`
fn is_canonical(text: &str) -> bool {
    text.len() == 35
        && text.ends_with("-al")
        && text[..32]
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

proptest! {
    /// Every 128-bit value round-trips through serialize/parse
    #[test]
    fn round_trip(value in any::<u128>()) {
        let text = format!("{value:032x}-al");
        let id = AudiolinkId::parse(&text).unwrap();
        prop_assert_eq!(id.to_string(), text.clone());
        prop_assert_eq!(AudiolinkId::parse(&id.to_string()).unwrap(), id);
    }

    /// Arbitrary text is rejected unless it matches the grammar exactly
    #[test]
    fn non_canonical_text_rejected(text in "\\PC{0,40}") {
        prop_assume!(!is_canonical(&text));
        prop_assert!(AudiolinkId::parse(&text).is_err());
    }

    /// Near-misses around the canonical form are rejected
    #[test]
    fn mutated_canonical_rejected(value in any::<u128>(), suffix in "(-AL|_al|-a|-all|)") {
        let text = format!("{value:032x}{suffix}");
        prop_assert!(AudiolinkId::parse(&text).is_err());
    }
}

#[test]
fn absence_is_not_an_error() {
    // No stored value is the Missing state, distinct from Invalid
    assert_eq!(IdState::from_raw(None), IdState::Missing);
    assert!(IdState::from_raw(Some("")).is_invalid());
}

#[test]
fn ten_thousand_draws_contain_no_duplicate() {
    let mut seen = HashSet::with_capacity(10_000);
    for _ in 0..10_000 {
        assert!(
            seen.insert(AudiolinkId::generate().to_string()),
            "collision in 10,000 draws"
        );
    }
}
