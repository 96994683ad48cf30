use chrono::{DateTime, Utc};
use common::{RecordId, UserId};
use serde::{Deserialize, Serialize};

/// A direct message. Only `read` changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: RecordId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

impl Message {
    /// Creates an unread message stamped with the current time.
    pub fn new(sender_id: UserId, receiver_id: UserId, content: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            sender_id,
            receiver_id,
            content: content.into(),
            timestamp: Utc::now(),
            read: false,
        }
    }

    /// Returns true if the message was exchanged between `a` and `b`, either way.
    pub fn is_between(&self, a: &UserId, b: &UserId) -> bool {
        (&self.sender_id == a && &self.receiver_id == b)
            || (&self.sender_id == b && &self.receiver_id == a)
    }

    /// Returns the other participant from `user`'s point of view.
    pub fn partner_of(&self, user: &UserId) -> Option<&UserId> {
        if &self.sender_id == user {
            Some(&self.receiver_id)
        } else if &self.receiver_id == user {
            Some(&self.sender_id)
        } else {
            None
        }
    }
}

/// One entry in a user's conversation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub partner_id: UserId,
    pub last_message: Message,
    /// Messages from the partner the user has not read.
    pub unread_count: usize,
}
