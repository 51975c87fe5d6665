use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One row of a user's inbox: the latest message exchanged with a single counterpart.
///
/// Never stored; see [`crate::conversations::derive_conversations`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    #[serde(rename = "userId")]
    pub counterpart_id: String,
    #[serde(rename = "name")]
    pub counterpart_name: String,
    #[serde(rename = "lastMessage")]
    pub last_message_content: String,
    #[serde(rename = "lastMessageDate", with = "time::serde::rfc3339")]
    pub last_message_timestamp: OffsetDateTime,
}
