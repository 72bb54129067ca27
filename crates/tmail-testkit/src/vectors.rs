//! Golden vectors for the canonical body encoding.
//!
//! Every implementation must produce these bytes and these identities
//! exactly. An identity is permanent once issued, so a change to either the
//! encoding or the key derivation breaks a vector.

use serde::{Deserialize, Serialize};
use tmail_core::{canonical_body_bytes, compute_id, decode_body, MessageBody, MessageId};

/// A single golden vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldenVector {
    pub name: String,
    pub description: String,
    pub body: MessageBody,
    /// Expected canonical bytes, hex.
    pub canonical: String,
    /// Expected identity, text form.
    pub expected_id: String,
}

fn vector(
    name: &str,
    description: &str,
    body: MessageBody,
    canonical: &str,
    expected_id: &str,
) -> GoldenVector {
    GoldenVector {
        name: name.to_string(),
        description: description.to_string(),
        body,
        canonical: canonical.to_string(),
        expected_id: expected_id.to_string(),
    }
}

fn body(parent: Option<MessageId>, from: &str, to: &str, time: i64, content: &[u8]) -> MessageBody {
    MessageBody {
        parent,
        from: from.to_string(),
        to: to.to_string(),
        time,
        content: content.to_vec().into(),
    }
}

/// All golden vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        vector(
            "empty",
            "Root with every field empty or zero",
            body(None, "", "", 0, b""),
            "a500f60160026003000440",
            "Y2Rzp_G85Xq1bmegOmLrxO6iD5UIpRkP4znD0NxCvi0",
        ),
        vector(
            "hello_root",
            "Root message with content \"hello\"",
            body(None, "alice", "bob", 1736870400000, b"hello"),
            "a500f60165616c6963650263626f62031b00000194658b1000044568656c6c6f",
            "hcFPcBWWjidM1Zy5ODAv-GklUjmXkJ7G5xdsCtIiQOw",
        ),
        vector(
            "child",
            "Child of a fixed parent id",
            body(
                Some(MessageId::from_bytes([0xaa; 32])),
                "bob",
                "alice",
                1736870400001,
                b"hi alice",
            ),
            "a5005820aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\
             0163626f620265616c696365031b00000194658b10010448686920616c696365",
            "2bC4TDcBJFyb-82KOu34V4ksbGEpNhtHB-uthpNhnVs",
        ),
        vector(
            "non_ascii_negative_time",
            "UTF-8 sender, empty recipient, negative time, binary content",
            body(None, "caf\u{e9}", "", -1, &[0, 1, 2, 3]),
            "a500f60165636166c3a902600320044400010203",
            "EO2jQKMVcKxxx0kzJVCYV1pvdjM11a3pVbkBi1vomBc",
        ),
    ]
}

/// Check every vector: exact canonical bytes, decode round trip, and the
/// pinned, distinct id.
pub fn verify_all_vectors() -> Result<(), String> {
    let mut seen: Vec<MessageId> = Vec::new();

    for v in all_vectors() {
        let bytes = canonical_body_bytes(&v.body);
        let actual = hex::encode(&bytes);
        if actual != v.canonical {
            return Err(format!(
                "{}: canonical mismatch\n  expected {}\n  actual   {}",
                v.name, v.canonical, actual
            ));
        }

        let decoded = decode_body(&bytes).map_err(|e| format!("{}: {}", v.name, e))?;
        if decoded != v.body {
            return Err(format!("{}: decode round trip changed the body", v.name));
        }

        let id = compute_id(&bytes);
        if id.to_text() != v.expected_id {
            return Err(format!(
                "{}: identity mismatch\n  expected {}\n  actual   {}",
                v.name, v.expected_id, id
            ));
        }
        if id != v.body.compute_id() {
            return Err(format!("{}: id depends on call path", v.name));
        }
        if seen.contains(&id) {
            return Err(format!("{}: id collides with an earlier vector", v.name));
        }
        seen.push(id);
    }

    Ok(())
}
