//! Chat transcript model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder text shown while a reply is being generated.
pub const PENDING_REPLY: &str = "Thinking...";

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

/// A single transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub sender: Sender,
    pub text: String,
}

/// Append-only chat transcript.
///
/// The one designed exception to append-only: a pending AI entry (text
/// equal to [`PENDING_REPLY`]) may be resolved in place once the real
/// reply arrives. Resolution is addressed by entry id, not position.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return its stable id.
    pub fn append(&mut self, sender: Sender, text: impl Into<String>) -> Uuid {
        let id = Uuid::new_v4();
        self.messages.push(ChatMessage {
            id,
            sender,
            text: text.into(),
        });
        id
    }

    /// Append the pending AI placeholder.
    pub fn append_pending(&mut self) -> Uuid {
        self.append(Sender::Ai, PENDING_REPLY)
    }

    /// Resolve a pending entry in place.
    ///
    /// Returns `true` if the entry with `id` was still the pending
    /// placeholder and its text was replaced. Otherwise the reply is
    /// appended as a fresh AI entry and `false` is returned.
    pub fn resolve(&mut self, id: Uuid, text: impl Into<String>) -> bool {
        let text = text.into();
        let pending = self
            .messages
            .iter_mut()
            .find(|m| m.id == id && m.sender == Sender::Ai && m.text == PENDING_REPLY);

        match pending {
            Some(entry) => {
                entry.text = text;
                true
            }
            None => {
                self.append(Sender::Ai, text);
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_replaces_pending_in_place() {
        let mut transcript = Transcript::new();
        transcript.append(Sender::User, "Hello");
        let pending = transcript.append_pending();

        assert!(transcript.resolve(pending, "Hi there!"));

        // Transcript grew by exactly two entries, not three
        assert_eq!(transcript.len(), 2);
        let last = transcript.last().unwrap();
        assert_eq!(last.sender, Sender::Ai);
        assert_eq!(last.text, "Hi there!");
    }

    #[test]
    fn test_resolve_appends_when_pending_already_resolved() {
        let mut transcript = Transcript::new();
        let pending = transcript.append_pending();
        assert!(transcript.resolve(pending, "First reply"));

        // The id no longer points at a pending entry
        assert!(!transcript.resolve(pending, "Second reply"));
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.last().unwrap().text, "Second reply");
    }

    #[test]
    fn test_resolve_ignores_user_entries() {
        let mut transcript = Transcript::new();
        let user_id = transcript.append(Sender::User, PENDING_REPLY);

        // A user entry is never treated as the pending placeholder
        assert!(!transcript.resolve(user_id, "reply"));
        assert_eq!(transcript.messages()[0].text, PENDING_REPLY);
        assert_eq!(transcript.len(), 2);
    }
}
