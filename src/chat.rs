//! Chat send/reconcile state machine.
//!
//! Sending is a two-phase commit against the transcript: `begin_send`
//! optimistically inserts the user message plus a pending placeholder and
//! yields the request payload; `finish_send` resolves that same placeholder
//! with the server outcome. The `busy` flag makes "at most one in-flight
//! chat request" structural rather than a race on the send control.

use crate::transcript::{MessageId, MessageStatus, MessageStore, Role};

/// Placeholder content shown while the server is responding. Never persisted
/// server-side and never reconstructed by history hydration.
pub const THINKING_PLACEHOLDER: &str = "Thinking...";

pub struct ChatController {
    busy: bool,
    pending: Option<MessageId>,
}

impl ChatController {
    pub fn new() -> Self {
        Self {
            busy: false,
            pending: None,
        }
    }

    /// True while a chat request is in flight; the send control stays
    /// disabled for the duration.
    pub fn busy(&self) -> bool {
        self.busy
    }

    /// Phase 1: optimistic insert. Returns the trimmed payload to send, or
    /// `None` when the input is blank or a request is already in flight —
    /// in both cases the store is untouched and no request may be issued.
    pub fn begin_send(&mut self, store: &mut MessageStore, input: &str) -> Option<String> {
        let text = input.trim();
        if text.is_empty() || self.busy {
            return None;
        }

        store.append(Role::User, text, MessageStatus::Complete);
        let placeholder = store.append(Role::Assistant, THINKING_PLACEHOLDER, MessageStatus::Pending);
        self.pending = Some(placeholder);
        self.busy = true;

        Some(text.to_string())
    }

    /// Phase 2: reconcile the outcome of the request started by the matching
    /// `begin_send`. The placeholder is removed and replaced with the server
    /// response, or with an error message embedding the server detail.
    pub fn finish_send(&mut self, store: &mut MessageStore, result: anyhow::Result<String>) {
        if let Some(placeholder) = self.pending.take() {
            store.remove(placeholder);
        }

        match result {
            Ok(response) => {
                store.append(Role::Assistant, response, MessageStatus::Complete);
            }
            Err(err) => {
                store.append(
                    Role::Assistant,
                    format!("Error: {err}"),
                    MessageStatus::Error,
                );
            }
        }

        self.busy = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn blank_input_is_a_noop() {
        let mut store = MessageStore::new();
        let mut chat = ChatController::new();

        assert!(chat.begin_send(&mut store, "").is_none());
        assert!(chat.begin_send(&mut store, "   ").is_none());
        assert!(store.list().is_empty());
        assert!(!chat.busy());
    }

    #[test]
    fn begin_send_inserts_user_then_placeholder() {
        let mut store = MessageStore::new();
        let mut chat = ChatController::new();

        let payload = chat.begin_send(&mut store, "  Hello  ").unwrap();
        assert_eq!(payload, "Hello");
        assert!(chat.busy());

        let messages = store.list();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "Hello");
        assert_eq!(messages[0].status, MessageStatus::Complete);
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].content, THINKING_PLACEHOLDER);
        assert_eq!(messages[1].status, MessageStatus::Pending);
    }

    #[test]
    fn second_send_while_busy_is_rejected() {
        let mut store = MessageStore::new();
        let mut chat = ChatController::new();

        chat.begin_send(&mut store, "first").unwrap();
        assert!(chat.begin_send(&mut store, "second").is_none());

        // No second placeholder was created.
        let pending = store
            .list()
            .iter()
            .filter(|m| m.status == MessageStatus::Pending)
            .count();
        assert_eq!(pending, 1);
        assert_eq!(store.list().len(), 2);
    }

    #[test]
    fn success_replaces_placeholder_with_response() {
        let mut store = MessageStore::new();
        let mut chat = ChatController::new();

        chat.begin_send(&mut store, "Hello").unwrap();
        chat.finish_send(&mut store, Ok("Hi there".to_string()));

        let messages = store.list();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "Hello");
        assert_eq!(messages[1].content, "Hi there");
        assert_eq!(messages[1].status, MessageStatus::Complete);
        assert!(!chat.busy());
        assert!(
            messages
                .iter()
                .all(|m| m.status != MessageStatus::Pending)
        );
    }

    #[test]
    fn failure_replaces_placeholder_with_error_detail() {
        let mut store = MessageStore::new();
        let mut chat = ChatController::new();

        chat.begin_send(&mut store, "Hello").unwrap();
        chat.finish_send(&mut store, Err(anyhow!("service unavailable")));

        let messages = store.list();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].content, "Error: service unavailable");
        assert_eq!(messages[1].status, MessageStatus::Error);
        assert!(!chat.busy());
    }

    #[test]
    fn control_is_reenabled_after_either_outcome() {
        let mut store = MessageStore::new();
        let mut chat = ChatController::new();

        chat.begin_send(&mut store, "one").unwrap();
        chat.finish_send(&mut store, Err(anyhow!("boom")));
        assert!(!chat.busy());

        // A new send is accepted again after the failure.
        assert!(chat.begin_send(&mut store, "two").is_some());
    }
}
