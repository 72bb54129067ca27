//! Test fixtures and helpers.

use tmail_core::{CandidateMessage, Message, MessageId};

/// Fixed timestamp used by fixtures (2025-01-14T16:00:00Z in Unix ms).
pub const FIXTURE_TIME: i64 = 1736870400000;

/// A root candidate from alice to bob.
pub fn root(content: &str) -> CandidateMessage {
    CandidateMessage::new("alice", "bob", FIXTURE_TIME).content(content.as_bytes().to_vec())
}

/// A candidate replying to `parent`, from bob to alice.
pub fn reply(parent: &MessageId, content: &str) -> CandidateMessage {
    CandidateMessage::new("bob", "alice", FIXTURE_TIME + 1)
        .content(content.as_bytes().to_vec())
        .child_of(parent)
}

/// A linear thread of `len` identified messages, each the child of the one
/// before. The first is a root.
pub fn thread(len: usize) -> Vec<Message> {
    let mut messages: Vec<Message> = Vec::with_capacity(len);
    for i in 0..len {
        let content = format!("message {}", i);
        let message = match messages.last() {
            None => root(&content).into_body(None),
            Some(prev) => reply(prev.id(), &content).into_body(Some(*prev.id())),
        }
        .identify();
        messages.push(message);
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_links() {
        let messages = thread(3);
        assert_eq!(messages.len(), 3);
        assert!(messages[0].body().is_root());
        assert_eq!(messages[1].parent(), Some(messages[0].id()));
        assert_eq!(messages[2].parent(), Some(messages[1].id()));
    }

    #[test]
    fn test_reply_declares_parent_text() {
        let parent = root("hello").into_body(None).compute_id();
        let candidate = reply(&parent, "hi");
        assert_eq!(candidate.parent_id, Some(parent.to_text()));
        assert!(candidate.id.is_none());
    }
}
