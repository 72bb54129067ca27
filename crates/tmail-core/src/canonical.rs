//! Canonical CBOR encoding of message bodies.
//!
//! Bodies are encoded per RFC 8949 Core Deterministic Encoding:
//! - Map keys are small integers, emitted in ascending order
//! - Integers use the smallest valid encoding
//! - Definite lengths only
//! - No floats (time is an i64)
//!
//! The identity field never appears in the encoding. Two bodies produce the
//! same bytes exactly when every field is byte-identical; no Unicode or
//! whitespace normalization is performed on text fields.

use ciborium::value::Value;

use crate::error::CoreError;
use crate::message::MessageBody;
use crate::types::{MessageId, MESSAGE_ID_LEN};

/// Body field keys (integer keys for compact encoding).
///
/// Keys 0-23 encode as single bytes in CBOR.
mod keys {
    pub const PARENT: u64 = 0;
    pub const FROM: u64 = 1;
    pub const TO: u64 = 2;
    pub const TIME: u64 = 3;
    pub const CONTENT: u64 = 4;

    pub const COUNT: u64 = 5;
}

const NULL: u8 = 0xf6;

/// Encode a message body to canonical CBOR bytes.
pub fn canonical_body_bytes(body: &MessageBody) -> Vec<u8> {
    let mut buf = Vec::with_capacity(64 + body.from.len() + body.to.len() + body.content.len());

    encode_uint(&mut buf, 5, keys::COUNT);

    // 0: parent (null or bytes)
    encode_uint(&mut buf, 0, keys::PARENT);
    match &body.parent {
        Some(id) => encode_bytes(&mut buf, id.as_bytes()),
        None => buf.push(NULL),
    }

    // 1: from
    encode_uint(&mut buf, 0, keys::FROM);
    encode_text(&mut buf, &body.from);

    // 2: to
    encode_uint(&mut buf, 0, keys::TO);
    encode_text(&mut buf, &body.to);

    // 3: time
    encode_uint(&mut buf, 0, keys::TIME);
    encode_int(&mut buf, body.time);

    // 4: content
    encode_uint(&mut buf, 0, keys::CONTENT);
    encode_bytes(&mut buf, &body.content);

    buf
}

/// Encode a signed integer (major types 0 and 1).
fn encode_int(buf: &mut Vec<u8>, n: i64) {
    if n >= 0 {
        encode_uint(buf, 0, n.unsigned_abs());
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        encode_uint(buf, 1, (-1 - n).unsigned_abs());
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | n as u8);
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a byte string (major type 2).
fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Encode a text string (major type 3).
fn encode_text(buf: &mut Vec<u8>, s: &str) {
    encode_uint(buf, 3, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}

/// Decode a message body from canonical bytes.
///
/// The input must be exactly the canonical encoding: anything that parses
/// but re-encodes differently (unsorted keys, long-form integers, trailing
/// bytes) is rejected with [`CoreError::NonCanonical`].
pub fn decode_body(bytes: &[u8]) -> Result<MessageBody, CoreError> {
    let value: Value =
        ciborium::from_reader(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))?;

    let body = cbor_value_to_body(&value)?;

    if canonical_body_bytes(&body) != bytes {
        return Err(CoreError::NonCanonical);
    }

    Ok(body)
}

/// Convert a CBOR Value (map) back to a MessageBody.
fn cbor_value_to_body(value: &Value) -> Result<MessageBody, CoreError> {
    let map = match value {
        Value::Map(m) => m,
        _ => return Err(CoreError::MalformedBody("expected map".into())),
    };

    let get = |key: u64| -> Option<&Value> {
        map.iter()
            .find(|(k, _)| matches!(k, Value::Integer(i) if i128::from(*i) == i128::from(key)))
            .map(|(_, v)| v)
    };

    let parent = match get(keys::PARENT) {
        Some(Value::Bytes(b)) if b.len() == MESSAGE_ID_LEN => {
            let mut arr = [0u8; MESSAGE_ID_LEN];
            arr.copy_from_slice(b);
            Some(MessageId(arr))
        }
        Some(Value::Null) => None,
        _ => return Err(CoreError::MalformedBody("invalid parent".into())),
    };

    let from = match get(keys::FROM) {
        Some(Value::Text(s)) => s.clone(),
        _ => return Err(CoreError::MalformedBody("invalid from".into())),
    };

    let to = match get(keys::TO) {
        Some(Value::Text(s)) => s.clone(),
        _ => return Err(CoreError::MalformedBody("invalid to".into())),
    };

    let time = match get(keys::TIME) {
        Some(Value::Integer(i)) => i64::try_from(i128::from(*i))
            .map_err(|_| CoreError::MalformedBody("time out of range".into()))?,
        _ => return Err(CoreError::MalformedBody("invalid time".into())),
    };

    let content = match get(keys::CONTENT) {
        Some(Value::Bytes(b)) => b.clone(),
        _ => return Err(CoreError::MalformedBody("invalid content".into())),
    };

    Ok(MessageBody {
        parent,
        from,
        to,
        time,
        content: content.into(),
    })
}
