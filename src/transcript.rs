//! Ordered transcript of the conversation.
//!
//! Pure data structure; nothing here touches the network or the terminal.

/// Opaque message identifier, strictly increasing in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStatus {
    /// Optimistic placeholder awaiting the server response.
    Pending,
    Complete,
    Error,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub status: MessageStatus,
}

/// The transcript plus the "No conversation yet" empty-state marker.
///
/// The marker is shown when no messages exist; the first `append` removes it
/// and only `reset` installs it again.
pub struct MessageStore {
    messages: Vec<Message>,
    next_id: u64,
    empty_marker: bool,
}

impl MessageStore {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            next_id: 0,
            empty_marker: true,
        }
    }

    /// Append a message at the tail and return its id.
    pub fn append(
        &mut self,
        role: Role,
        content: impl Into<String>,
        status: MessageStatus,
    ) -> MessageId {
        self.empty_marker = false;
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push(Message {
            id,
            role,
            content: content.into(),
            status,
        });
        id
    }

    /// Mutate content/status in place, preserving position. No-op if `id`
    /// is not present. Equivalent to remove-then-append for resolving a
    /// placeholder, but keeps the original id.
    #[allow(dead_code)]
    pub fn replace(&mut self, id: MessageId, content: impl Into<String>, status: MessageStatus) {
        if let Some(message) = self.messages.iter_mut().find(|m| m.id == id) {
            message.content = content.into();
            message.status = status;
        }
    }

    /// Delete the message with `id`. Removing an absent id is not an error.
    pub fn remove(&mut self, id: MessageId) {
        self.messages.retain(|m| m.id != id);
    }

    /// Ordered view of the transcript, head = oldest.
    pub fn list(&self) -> &[Message] {
        &self.messages
    }

    /// Clear everything and install the empty-state marker.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.empty_marker = true;
    }

    pub fn shows_empty_marker(&self) -> bool {
        self.empty_marker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_returns_distinct_increasing_ids_in_order() {
        let mut store = MessageStore::new();
        let a = store.append(Role::User, "first", MessageStatus::Complete);
        let b = store.append(Role::Assistant, "second", MessageStatus::Complete);
        let c = store.append(Role::User, "third", MessageStatus::Complete);

        assert!(a < b && b < c);
        let contents: Vec<&str> = store.list().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[test]
    fn first_append_removes_empty_marker() {
        let mut store = MessageStore::new();
        assert!(store.shows_empty_marker());
        store.append(Role::User, "hi", MessageStatus::Complete);
        assert!(!store.shows_empty_marker());
    }

    #[test]
    fn remove_is_idempotent() {
        let mut store = MessageStore::new();
        let id = store.append(Role::User, "hi", MessageStatus::Complete);
        store.remove(id);
        assert!(store.list().is_empty());
        // Second removal of the same id leaves the store unchanged.
        store.remove(id);
        assert!(store.list().is_empty());
    }

    #[test]
    fn replace_mutates_in_place_and_keeps_position() {
        let mut store = MessageStore::new();
        store.append(Role::User, "question", MessageStatus::Complete);
        let pending = store.append(Role::Assistant, "Thinking...", MessageStatus::Pending);
        store.append(Role::User, "followup", MessageStatus::Complete);

        store.replace(pending, "answer", MessageStatus::Complete);

        let messages = store.list();
        assert_eq!(messages[1].id, pending);
        assert_eq!(messages[1].content, "answer");
        assert_eq!(messages[1].status, MessageStatus::Complete);
    }

    #[test]
    fn replace_missing_id_is_a_noop() {
        let mut store = MessageStore::new();
        let id = store.append(Role::User, "hi", MessageStatus::Complete);
        store.remove(id);
        store.replace(id, "ghost", MessageStatus::Error);
        assert!(store.list().is_empty());
    }

    #[test]
    fn reset_clears_and_reinstalls_marker() {
        let mut store = MessageStore::new();
        store.append(Role::User, "hi", MessageStatus::Complete);
        store.append(Role::Assistant, "hello", MessageStatus::Complete);

        store.reset();

        assert!(store.list().is_empty());
        assert!(store.shows_empty_marker());
    }

    #[test]
    fn ids_stay_unique_across_reset() {
        let mut store = MessageStore::new();
        let a = store.append(Role::User, "hi", MessageStatus::Complete);
        store.reset();
        let b = store.append(Role::User, "again", MessageStatus::Complete);
        assert_ne!(a, b);
    }
}
