//! Proptest strategies for generating test data.

use proptest::prelude::*;
use tmail_core::{CandidateMessage, MessageId};

/// Arbitrary identity.
pub fn arb_message_id() -> impl Strategy<Value = MessageId> {
    any::<[u8; 32]>().prop_map(MessageId::from_bytes)
}

/// Arbitrary root candidate with no identity field.
pub fn arb_root_candidate() -> impl Strategy<Value = CandidateMessage> {
    (
        ".{0,16}",
        ".{0,16}",
        any::<i64>(),
        proptest::collection::vec(any::<u8>(), 0..256),
    )
        .prop_map(|(from, to, time, content)| {
            CandidateMessage::new(from, to, time).content(content)
        })
}

/// A non-empty identity field value, valid-looking or not.
pub fn arb_declared_id() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_message_id().prop_map(|id| id.to_text()),
        ".{1,64}",
    ]
}

/// A parent reference that can never decode to an identity.
pub fn arb_malformed_reference() -> impl Strategy<Value = String> {
    prop_oneof![
        // wrong length
        "[A-Za-z0-9_-]{0,42}",
        "[A-Za-z0-9_-]{44,64}",
        // right length, character outside the URL-safe alphabet
        "[A-Za-z0-9_-]{20}[+/=. ][A-Za-z0-9_-]{22}",
        // hex form of a real id
        arb_message_id().prop_map(|id| id.to_hex()),
    ]
}
