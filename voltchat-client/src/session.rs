//! The transcript accumulator.
//!
//! [`ChatSession`] owns the conversation transcript and applies the
//! effects of user submissions and streamed deltas to it. One
//! request/response cycle runs at a time: submission is rejected while a
//! turn is in flight, so there is never more than one open assistant
//! message. The byte stream is consumed by a single sequential pull loop
//! whose only suspension point is waiting for the next chunk; dropping
//! the driving future cancels the turn and no transcript mutation can
//! happen afterwards.

use crate::client::ChatClient;
use futures::StreamExt;
use voltchat_core::{ConversationId, Message, MessageId, Transcript};

/// What the transcript shows when a turn produced no assistant content.
const FAILURE_NOTICE: &str =
    "Sorry, I couldn't get a response from the assistant. Make sure the server is running and try again.";

/// Where the current turn stands.
///
/// Re-enters `Idle`-like behavior only by completing `Sealed`: a new
/// submission is accepted from `Idle` or `Sealed`, never mid-turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// No turn has run yet.
    Idle,
    /// User message appended, request being issued.
    Submitted,
    /// Response opened, no delta yet.
    StreamingNoContent,
    /// Assistant message open and growing.
    StreamingWithContent,
    /// Turn finished; the transcript is settled.
    Sealed,
}

impl TurnState {
    /// Whether a request/response cycle is currently open.
    #[must_use]
    pub fn is_in_flight(self) -> bool {
        matches!(
            self,
            Self::Submitted | Self::StreamingNoContent | Self::StreamingWithContent
        )
    }
}

/// A conversation session: transcript, turn state, and transport.
///
/// The rendering layer reads [`ChatSession::transcript`] (or
/// [`ChatSession::snapshot`]) after every mutation and checks
/// [`ChatSession::awaiting_response`] to disable submission.
#[derive(Debug)]
pub struct ChatSession {
    client: ChatClient,
    conversation_id: ConversationId,
    transcript: Transcript,
    draft: String,
    state: TurnState,
    open_assistant: Option<MessageId>,
}

impl ChatSession {
    /// Create a session with a fresh conversation id.
    #[must_use]
    pub fn new(client: ChatClient) -> Self {
        Self {
            client,
            conversation_id: ConversationId::new(),
            transcript: Transcript::new(),
            draft: String::new(),
            state: TurnState::Idle,
            open_assistant: None,
        }
    }

    /// The conversation correlation id, fixed for the session lifetime.
    #[must_use]
    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    /// The transcript, in display order.
    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// An owned, ordered snapshot for the rendering layer.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Message> {
        self.transcript.snapshot()
    }

    /// Whether a turn is in flight (submission disabled).
    #[must_use]
    pub fn awaiting_response(&self) -> bool {
        self.state.is_in_flight()
    }

    /// Current turn state.
    #[must_use]
    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Replace the draft input buffer.
    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    /// The draft input buffer.
    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Run one full turn with the current draft text.
    ///
    /// Equivalent to [`ChatSession::send`] with the draft; the draft is
    /// cleared once the submission is accepted.
    pub async fn send_draft(&mut self) -> bool {
        let text = self.draft.clone();
        self.send(&text).await
    }

    /// Run one full turn: submit `text`, issue the request, and fold the
    /// reply stream into the transcript until it ends.
    ///
    /// Returns `false` without touching the transcript when the text
    /// trims to empty or a turn is already in flight. Transport and
    /// stream failures do not surface as errors here; they seal the turn
    /// and leave a visible assistant message, so every accepted
    /// submission gets a response entry.
    pub async fn send(&mut self, text: &str) -> bool {
        let Some(message) = self.submit(text) else {
            return false;
        };

        match self.client.stream_reply(&message, &self.conversation_id).await {
            Ok(mut reply) => {
                self.on_stream_open();
                loop {
                    match reply.next().await {
                        Some(Ok(fragment)) => self.on_delta(&fragment),
                        Some(Err(error)) => {
                            // Mid-stream interruption: keep what arrived.
                            self.on_stream_error(&error);
                            break;
                        }
                        None => {
                            self.on_stream_end();
                            break;
                        }
                    }
                }
            }
            Err(error) => self.on_stream_error(&error),
        }

        true
    }

    /// Append a user message and open a turn.
    ///
    /// No-op (returns `None`) when `text` trims to empty or a turn is in
    /// flight. Otherwise the (trimmed) user message is appended to the
    /// transcript, the draft buffer is cleared, and a clone of the new
    /// message is returned for the transport.
    pub fn submit(&mut self, text: &str) -> Option<Message> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        if self.state.is_in_flight() {
            tracing::debug!("Submission rejected: a turn is already in flight");
            return None;
        }

        let message = Message::user(trimmed);
        self.transcript.push(message.clone());
        self.draft.clear();
        self.state = TurnState::Submitted;
        Some(message)
    }

    /// Mark the response as opened (2xx received, no delta yet).
    pub fn on_stream_open(&mut self) {
        if self.state == TurnState::Submitted {
            self.state = TurnState::StreamingNoContent;
        }
    }

    /// Fold one text fragment into the open assistant message.
    ///
    /// The assistant message is created lazily on the first usable
    /// fragment of the turn; every later fragment is appended in place,
    /// by id. Safe to call in rapid succession: never a second assistant
    /// entry for the same turn, never lost text. Ignored outside an open
    /// turn.
    pub fn on_delta(&mut self, fragment: &str) {
        if !self.state.is_in_flight() || fragment.is_empty() {
            return;
        }

        let id = match &self.open_assistant {
            Some(id) => id.clone(),
            None => {
                let id = self.transcript.push(Message::assistant_placeholder());
                self.open_assistant = Some(id.clone());
                id
            }
        };
        self.transcript.append_content(&id, fragment);
        self.state = TurnState::StreamingWithContent;
    }

    /// Seal the turn after a normal end-of-stream.
    ///
    /// Idempotent: a second call for the same turn changes nothing. When
    /// the stream produced no content at all, a synthetic assistant
    /// message is inserted so the user turn still has a visible response.
    pub fn on_stream_end(&mut self) {
        if !self.state.is_in_flight() {
            return;
        }
        self.seal_turn();
    }

    /// Seal the turn after a failure.
    ///
    /// Content that already arrived is kept; with no content yet, a
    /// synthetic assistant message describes the failure. The in-flight
    /// flag is cleared on this path too, so submission is re-enabled.
    pub fn on_stream_error(&mut self, cause: &dyn std::fmt::Display) {
        if !self.state.is_in_flight() {
            return;
        }
        tracing::warn!("Chat turn failed: {}", cause);
        self.seal_turn();
    }

    fn seal_turn(&mut self) {
        if self.open_assistant.is_none() {
            self.transcript.push(Message::assistant(FAILURE_NOTICE));
        }
        self.open_assistant = None;
        self.state = TurnState::Sealed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use voltchat_core::Role;

    fn session() -> ChatSession {
        ChatSession::new(ChatClient::new("http://localhost:0", "tutor"))
    }

    fn open_turn(session: &mut ChatSession) {
        assert!(session.submit("question").is_some());
        session.on_stream_open();
    }

    #[test]
    fn test_submit_appends_user_message() {
        let mut session = session();
        let message = session.submit("  hello  ").unwrap();
        assert_eq!(message.content, "hello");
        assert_eq!(session.transcript().len(), 1);
        assert!(session.awaiting_response());
        assert_eq!(session.state(), TurnState::Submitted);
    }

    #[test]
    fn test_submit_whitespace_is_noop() {
        let mut session = session();
        assert!(session.submit("   \n\t ").is_none());
        assert!(session.transcript().is_empty());
        assert!(!session.awaiting_response());
    }

    #[test]
    fn test_submit_while_in_flight_is_noop() {
        let mut session = session();
        open_turn(&mut session);
        let before = session.transcript().len();
        assert!(session.submit("second question").is_none());
        assert_eq!(session.transcript().len(), before);
    }

    #[test]
    fn test_deltas_fold_into_one_assistant_message() {
        let mut session = session();
        open_turn(&mut session);
        session.on_delta("He");
        session.on_delta("llo");
        session.on_stream_end();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].role, Role::User);
        assert_eq!(snapshot[1].role, Role::Assistant);
        assert_eq!(snapshot[1].content, "Hello");
        assert!(!session.awaiting_response());
    }

    #[test]
    fn test_delta_keeps_id_and_position() {
        let mut session = session();
        open_turn(&mut session);
        session.on_delta("first");
        let id = session.snapshot()[1].id.clone();
        session.on_delta(" second");

        let snapshot = session.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[1].id, id);
        assert_eq!(snapshot[1].content, "first second");
    }

    #[test]
    fn test_rapid_deltas_never_duplicate_entry() {
        let mut session = session();
        open_turn(&mut session);
        for i in 0..200 {
            session.on_delta(&format!("{i} "));
        }
        assert_eq!(session.transcript().len(), 2);
    }

    #[test]
    fn test_empty_fragment_creates_nothing() {
        let mut session = session();
        open_turn(&mut session);
        session.on_delta("");
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.state(), TurnState::StreamingNoContent);
    }

    #[test]
    fn test_error_with_no_content_inserts_notice() {
        let mut session = session();
        assert!(session.submit("question").is_some());
        session.on_stream_error(&"connection refused");

        let snapshot = session.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[1].role, Role::Assistant);
        assert_eq!(snapshot[1].content, FAILURE_NOTICE);
        assert!(!session.awaiting_response());
    }

    #[test]
    fn test_error_after_content_keeps_partial_reply() {
        let mut session = session();
        open_turn(&mut session);
        session.on_delta("partial reply");
        session.on_stream_error(&"connection reset");

        let snapshot = session.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[1].content, "partial reply");
        assert!(!session.awaiting_response());
    }

    #[test]
    fn test_empty_normal_end_inserts_notice() {
        let mut session = session();
        open_turn(&mut session);
        session.on_stream_end();
        assert_eq!(session.snapshot()[1].content, FAILURE_NOTICE);
    }

    #[test]
    fn test_sealing_is_idempotent() {
        let mut session = session();
        open_turn(&mut session);
        session.on_delta("done");
        session.on_stream_end();

        let before = session.snapshot();
        session.on_stream_end();
        session.on_stream_error(&"late error");
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn test_no_mutation_after_seal() {
        let mut session = session();
        open_turn(&mut session);
        session.on_delta("sealed content");
        session.on_stream_end();

        session.on_delta("stray delta");
        assert_eq!(session.snapshot()[1].content, "sealed content");
        assert_eq!(session.transcript().len(), 2);
    }

    #[test]
    fn test_new_turn_after_seal() {
        let mut session = session();
        open_turn(&mut session);
        session.on_delta("first reply");
        session.on_stream_end();

        assert!(session.submit("followup").is_some());
        session.on_stream_open();
        session.on_delta("second reply");
        session.on_stream_end();

        let contents: Vec<_> = session
            .snapshot()
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(
            contents,
            vec!["question", "first reply", "followup", "second reply"]
        );
    }

    #[test]
    fn test_submit_clears_draft() {
        let mut session = session();
        session.set_draft("a question");
        let text = session.draft().to_string();
        assert!(session.submit(&text).is_some());
        assert_eq!(session.draft(), "");
    }

    #[test]
    fn test_rejected_submit_keeps_draft() {
        let mut session = session();
        open_turn(&mut session);
        session.set_draft("queued while busy");
        assert!(session.submit("queued while busy").is_none());
        assert_eq!(session.draft(), "queued while busy");
    }
}
