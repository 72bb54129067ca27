//! The digest engine: content identity for canonical message bytes.

use crate::types::MessageId;

/// BLAKE3 key-derivation context for message identities.
///
/// Fixed forever: changing it changes every identity ever issued.
pub const ID_CONTEXT: &str = "tmail 2026-01 message identity v1";

/// Compute the identity of a canonical message body.
///
/// Pure and infallible. The empty byte string is a valid input.
pub fn compute_id(canonical: &[u8]) -> MessageId {
    MessageId(blake3::derive_key(ID_CONTEXT, canonical))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_compute_id_deterministic() {
        let data = b"test data";
        assert_eq!(compute_id(data), compute_id(data));
        assert_ne!(compute_id(data), compute_id(b"different data"));
    }

    #[test]
    fn test_empty_input_yields_id() {
        let id = compute_id(&[]);
        assert_ne!(id, MessageId::from_bytes([0u8; 32]));
        assert_eq!(id, compute_id(b""));
    }

    #[test]
    fn test_known_ids() {
        assert_eq!(
            compute_id(b"").to_hex(),
            "0c8c670cf97b36257a8fad3e1fb1211a6ce8192de1a7f46ad9d7cd8104755988"
        );
        assert_eq!(
            compute_id(b"hello").to_hex(),
            "cb33b408061d66ad418b2a1e76e6e1a067cd1cb3e632999718b105243d66c526"
        );
    }

    #[test]
    fn test_domain_separated_from_plain_blake3() {
        let data = b"hello";
        assert_ne!(compute_id(data).0, *blake3::hash(data).as_bytes());
    }

    proptest! {
        #[test]
        fn compute_id_is_deterministic(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
            prop_assert_eq!(compute_id(&bytes), compute_id(&bytes));
        }

        #[test]
        fn single_bit_flip_changes_id(
            bytes in proptest::collection::vec(any::<u8>(), 1..256),
            idx in any::<prop::sample::Index>(),
            bit in 0u8..8,
        ) {
            let mut flipped = bytes.clone();
            let i = idx.index(flipped.len());
            flipped[i] ^= 1 << bit;
            prop_assert_ne!(compute_id(&bytes), compute_id(&flipped));
        }
    }
}
