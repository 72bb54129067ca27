//! JSON shapes of the `/tmail/v1` endpoint.

use std::fmt;

use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use tmail_core::CandidateMessage;
use tmail_kernel::Accepted;

// =============================================================================
// REQUEST
// =============================================================================

/// A message as it arrives on the wire.
///
/// Keys are matched without regard to ASCII case, so `ID`, `Id` and `id` all
/// name the identity field. The parent is accepted as `ParentID`, `PID`,
/// `parent_id` or `parent`. A key that names the same field twice makes the
/// body invalid. Other unknown keys are ignored, and missing or null fields
/// take their zero value. `ID` is only decoded so the ingestion core can
/// refuse it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WireMessage {
    #[serde(rename = "ID", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "ParentID", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    #[serde(rename = "From")]
    pub from: String,

    #[serde(rename = "To")]
    pub to: String,

    #[serde(rename = "Time")]
    pub time: i64,

    #[serde(rename = "Content")]
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WireField {
    Id,
    ParentId,
    From,
    To,
    Time,
    Content,
}

impl WireField {
    fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "id" => Some(Self::Id),
            "parentid" | "parent_id" | "pid" | "parent" => Some(Self::ParentId),
            "from" => Some(Self::From),
            "to" => Some(Self::To),
            "time" => Some(Self::Time),
            "content" => Some(Self::Content),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for WireMessage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(WireMessageVisitor)
    }
}

struct WireMessageVisitor;

impl<'de> Visitor<'de> for WireMessageVisitor {
    type Value = WireMessage;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a tmail message object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<WireMessage, A::Error> {
        let mut wire = WireMessage::default();
        let mut seen: Vec<WireField> = Vec::with_capacity(6);

        while let Some(key) = map.next_key::<String>()? {
            let Some(field) = WireField::from_key(&key) else {
                map.next_value::<IgnoredAny>()?;
                continue;
            };
            if seen.contains(&field) {
                return Err(de::Error::custom(format_args!("duplicate field `{}`", key)));
            }
            seen.push(field);

            match field {
                WireField::Id => wire.id = map.next_value()?,
                WireField::ParentId => wire.parent_id = map.next_value()?,
                WireField::From => wire.from = map.next_value::<Option<String>>()?.unwrap_or_default(),
                WireField::To => wire.to = map.next_value::<Option<String>>()?.unwrap_or_default(),
                WireField::Time => wire.time = map.next_value::<Option<i64>>()?.unwrap_or_default(),
                WireField::Content => {
                    wire.content = map.next_value::<Option<String>>()?.unwrap_or_default()
                }
            }
        }

        Ok(wire)
    }
}

impl From<WireMessage> for CandidateMessage {
    fn from(wire: WireMessage) -> Self {
        CandidateMessage {
            id: wire.id,
            parent_id: wire.parent_id,
            from: wire.from,
            to: wire.to,
            time: wire.time,
            content: wire.content.into(),
        }
    }
}

// =============================================================================
// RESPONSES
// =============================================================================

/// Body of a successful ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestResponse {
    pub id: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub duplicate: bool,
}

impl From<Accepted> for IngestResponse {
    fn from(accepted: Accepted) -> Self {
        Self {
            id: accepted.id.to_text(),
            duplicate: accepted.is_duplicate(),
        }
    }
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tmail_core::MessageId;
    use tmail_store::PutResult;

    #[test]
    fn go_field_names() {
        let wire: WireMessage = serde_json::from_str(
            r#"{"From":"alice","To":"bob","Time":1736870400000,"Content":"hello"}"#,
        )
        .unwrap();

        assert_eq!(wire.from, "alice");
        assert_eq!(wire.to, "bob");
        assert_eq!(wire.time, 1_736_870_400_000);
        assert_eq!(wire.content, "hello");
        assert!(wire.id.is_none());
        assert!(wire.parent_id.is_none());
    }

    #[test]
    fn aliases() {
        let wire: WireMessage = serde_json::from_str(
            r#"{"id":"x","parent_id":"y","from":"a","to":"b","time":-1,"content":""}"#,
        )
        .unwrap();

        assert_eq!(wire.id.as_deref(), Some("x"));
        assert_eq!(wire.parent_id.as_deref(), Some("y"));
        assert_eq!(wire.time, -1);
    }

    #[test]
    fn keys_match_any_case() {
        let wire: WireMessage = serde_json::from_str(
            r#"{"Id":"forged","PID":"p","FROM":"a","tO":"b","TIME":3,"CONTENT":"c"}"#,
        )
        .unwrap();

        assert_eq!(wire.id.as_deref(), Some("forged"));
        assert_eq!(wire.parent_id.as_deref(), Some("p"));
        assert_eq!(wire.from, "a");
        assert_eq!(wire.to, "b");
        assert_eq!(wire.time, 3);
        assert_eq!(wire.content, "c");

        for key in ["iD", "ID", "id"] {
            let wire: WireMessage = serde_json::from_str(&format!(r#"{{"{key}":"x"}}"#)).unwrap();
            assert_eq!(wire.id.as_deref(), Some("x"), "{key}");
        }
        for key in ["Pid", "pid", "ParentId", "PARENTID", "Parent_ID"] {
            let wire: WireMessage = serde_json::from_str(&format!(r#"{{"{key}":"y"}}"#)).unwrap();
            assert_eq!(wire.parent_id.as_deref(), Some("y"), "{key}");
        }
    }

    #[test]
    fn same_field_twice_is_invalid() {
        for body in [
            r#"{"ID":"","id":"forged"}"#,
            r#"{"ID":"forged","ID":""}"#,
            r#"{"ParentID":"a","PID":"b"}"#,
        ] {
            assert!(serde_json::from_str::<WireMessage>(body).is_err(), "{body}");
        }
    }

    #[test]
    fn unknown_keys_ignored() {
        let wire: WireMessage =
            serde_json::from_str(r#"{"From":"a","Extra":{"nested":[1,2]}}"#).unwrap();
        assert_eq!(wire.from, "a");
    }

    #[test]
    fn non_object_is_invalid() {
        assert!(serde_json::from_str::<WireMessage>("[]").is_err());
        assert!(serde_json::from_str::<WireMessage>("\"hello\"").is_err());
    }

    #[test]
    fn missing_fields_are_zero() {
        let wire: WireMessage = serde_json::from_str("{}").unwrap();
        assert_eq!(wire, WireMessage::default());
    }

    #[test]
    fn nulls_are_absent() {
        let wire: WireMessage =
            serde_json::from_str(r#"{"ID":null,"ParentID":null,"From":null,"Time":null}"#)
                .unwrap();
        assert_eq!(wire, WireMessage::default());
    }

    #[test]
    fn content_is_utf8_bytes() {
        let wire = WireMessage {
            content: "caf\u{e9}".to_string(),
            ..WireMessage::default()
        };
        let candidate = CandidateMessage::from(wire);
        assert_eq!(candidate.content.as_ref(), "caf\u{e9}".as_bytes());
    }

    #[test]
    fn duplicate_flag_only_when_set() {
        let id = CandidateMessage::default().into_body(None).compute_id();

        let stored = IngestResponse::from(Accepted {
            id,
            disposition: PutResult::Stored,
        });
        assert_eq!(
            serde_json::to_value(&stored).unwrap(),
            serde_json::json!({ "id": id.to_text() })
        );

        let dup = IngestResponse::from(Accepted {
            id,
            disposition: PutResult::AlreadyStored,
        });
        assert_eq!(
            serde_json::to_value(&dup).unwrap(),
            serde_json::json!({ "id": id.to_text(), "duplicate": true })
        );
        assert_eq!(MessageId::parse(&dup.id).unwrap(), id);
    }
}
