//! Ordered, identity-indexed message store.
//!
//! The transcript keeps messages in a map keyed by id, with a separate
//! insertion-order list deriving the display view. Appending a delta to
//! the in-flight assistant message is an indexed update, not a scan of
//! the whole list, and never disturbs entry order or identity.

use crate::identifier::MessageId;
use crate::message::Message;
use std::collections::HashMap;

/// An ordered sequence of [`Message`]s with unique ids.
///
/// Insertion order is the display and reasoning order. No two entries
/// share an id.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: HashMap<MessageId, Message>,
    order: Vec<MessageId>,
}

impl Transcript {
    /// Create an empty transcript.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the transcript is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Append a message, returning its id.
    ///
    /// A message whose id is already present is rejected: the existing
    /// entry keeps its content and position.
    pub fn push(&mut self, message: Message) -> MessageId {
        let id = message.id.clone();
        if self.entries.contains_key(&id) {
            return id;
        }
        self.order.push(id.clone());
        self.entries.insert(id.clone(), message);
        id
    }

    /// Append a text fragment to the message with the given id, in place.
    ///
    /// The entry's id and position are unchanged. Returns `false` when no
    /// entry with that id exists.
    pub fn append_content(&mut self, id: &MessageId, fragment: &str) -> bool {
        match self.entries.get_mut(id) {
            Some(message) => {
                message.content.push_str(fragment);
                true
            }
            None => false,
        }
    }

    /// Look up a message by id.
    #[must_use]
    pub fn get(&self, id: &MessageId) -> Option<&Message> {
        self.entries.get(id)
    }

    /// The last message in insertion order.
    #[must_use]
    pub fn last(&self) -> Option<&Message> {
        self.order.last().and_then(|id| self.entries.get(id))
    }

    /// Iterate messages in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    /// An owned, ordered snapshot for the rendering layer.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Message> {
        self.iter().cloned().collect()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = Box<dyn Iterator<Item = &'a Message> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_push_preserves_order() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("first"));
        transcript.push(Message::assistant("second"));
        transcript.push(Message::user("third"));

        let contents: Vec<_> = transcript.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_append_content_in_place() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("question"));
        let id = transcript.push(Message::assistant_placeholder());
        transcript.push(Message::user("another question"));

        assert!(transcript.append_content(&id, "He"));
        assert!(transcript.append_content(&id, "llo"));

        let entry = transcript.get(&id).unwrap();
        assert_eq!(entry.content, "Hello");
        assert_eq!(entry.id, id);

        // Still in the middle of the deck.
        let snapshot = transcript.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[1].id, id);
    }

    #[test]
    fn test_append_to_unknown_id() {
        let mut transcript = Transcript::new();
        let unknown = MessageId::from_string("msg_missing");
        assert!(!transcript.append_content(&unknown, "text"));
        assert!(transcript.is_empty());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut transcript = Transcript::new();
        let message = Message::user("original");
        let id = transcript.push(message.clone());

        let mut duplicate = message;
        duplicate.content = "impostor".to_string();
        transcript.push(duplicate);

        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.get(&id).unwrap().content, "original");
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut transcript = Transcript::new();
        let id = transcript.push(Message::assistant_placeholder());
        let snapshot = transcript.snapshot();

        transcript.append_content(&id, "later");
        assert_eq!(snapshot[0].content, "");
        assert_eq!(transcript.get(&id).unwrap().content, "later");
    }

    #[test]
    fn test_last() {
        let mut transcript = Transcript::new();
        assert!(transcript.last().is_none());
        transcript.push(Message::user("a"));
        transcript.push(Message::assistant("b"));
        assert_eq!(transcript.last().unwrap().role, Role::Assistant);
    }
}
