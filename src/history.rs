//! Transcript hydration from persisted history.
//!
//! Fetch failures are logged only: an empty transcript is indistinguishable
//! from "no history exists yet", so there is nothing useful to surface.

use crate::api::HistoryEntry;
use crate::transcript::{MessageStatus, MessageStore, Role};

/// Rebuild the transcript from persisted exchanges. An empty history leaves
/// the store as-is (the empty-state marker stays visible); a non-empty one
/// replaces the current contents with 2N complete messages in pair order.
/// Placeholders are ephemeral and never reconstructed here.
pub fn apply_history(store: &mut MessageStore, entries: &[HistoryEntry]) {
    if entries.is_empty() {
        return;
    }

    store.reset();
    for entry in entries {
        store.append(Role::User, entry.user_message.as_str(), MessageStatus::Complete);
        store.append(
            Role::Assistant,
            entry.bot_response.as_str(),
            MessageStatus::Complete,
        );
    }
}

/// The server confirmed the delete; drop the local transcript too.
pub fn apply_cleared(store: &mut MessageStore) {
    store.reset();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(user: &str, bot: &str) -> HistoryEntry {
        HistoryEntry {
            user_message: user.to_string(),
            bot_response: bot.to_string(),
        }
    }

    #[test]
    fn empty_history_leaves_store_untouched() {
        let mut store = MessageStore::new();
        apply_history(&mut store, &[]);
        assert!(store.list().is_empty());
        assert!(store.shows_empty_marker());
    }

    #[test]
    fn pairs_hydrate_in_order_as_2n_complete_messages() {
        let mut store = MessageStore::new();
        apply_history(
            &mut store,
            &[entry("hi", "hello"), entry("how are you", "fine")],
        );

        let messages = store.list();
        assert_eq!(messages.len(), 4);
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["hi", "hello", "how are you", "fine"]);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[1].role, Role::Assistant);
        assert!(
            messages
                .iter()
                .all(|m| m.status == MessageStatus::Complete)
        );
    }

    #[test]
    fn hydration_replaces_existing_transcript() {
        let mut store = MessageStore::new();
        store.append(Role::User, "stale", MessageStatus::Complete);

        apply_history(&mut store, &[entry("fresh", "response")]);

        let contents: Vec<&str> = store.list().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["fresh", "response"]);
    }

    #[test]
    fn cleared_store_shows_only_the_empty_marker() {
        let mut store = MessageStore::new();
        apply_history(&mut store, &[entry("hi", "hello")]);

        apply_cleared(&mut store);

        assert!(store.list().is_empty());
        assert!(store.shows_empty_marker());
    }
}
