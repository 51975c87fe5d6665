//! Riduzione della cronologia dei messaggi di un utente a una riga per interlocutore.

use std::collections::HashSet;

use crate::models::{ConversationSummary, Message};

/// Builds the inbox of `caller_id` from every message the caller sent or received.
///
/// `messages` is expected newest first, the order the message store returns
/// it in. The first message seen for a counterpart becomes that counterpart's
/// row and is never replaced, so on equal timestamps the message that comes
/// earlier in the input wins. Rows are returned sorted by last message time,
/// newest first.
///
/// Runs in one pass over `messages` and keeps no state between calls.
pub fn derive_conversations(caller_id: &str, messages: &[Message]) -> Vec<ConversationSummary> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut rows = Vec::new();

    for message in messages {
        let counterpart = message.counterpart(caller_id);
        if !seen.insert(counterpart.id.as_str()) {
            continue;
        }
        rows.push(ConversationSummary {
            counterpart_id: counterpart.id.clone(),
            counterpart_name: counterpart.name.clone(),
            last_message_content: message.content.clone(),
            last_message_timestamp: message.created_at,
        });
    }

    // stable: ties keep scan order
    rows.sort_by(|a, b| b.last_message_timestamp.cmp(&a.last_message_timestamp));
    rows
}
