use chrono::{DateTime, Utc};
use common::{RecordId, UserId};
use serde::{Deserialize, Serialize};

/// What kind of event produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Order,
    Message,
    System,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Order => "order",
            NotificationType::Message => "message",
            NotificationType::System => "system",
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored notification. Only `read` changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: RecordId,
    pub user_id: UserId,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub title: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    /// In-app location the notification points at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_to: Option<String>,
}

/// Content of a notification before it is addressed and stamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub kind: NotificationType,
    pub title: String,
    pub content: String,
    pub link_to: Option<String>,
}

impl NewNotification {
    /// Creates notification content without a link.
    pub fn new(kind: NotificationType, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            content: content.into(),
            link_to: None,
        }
    }

    pub fn order(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(NotificationType::Order, title, content)
    }

    pub fn message(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(NotificationType::Message, title, content)
    }

    pub fn system(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(NotificationType::System, title, content)
    }

    pub fn with_link(mut self, link_to: impl Into<String>) -> Self {
        self.link_to = Some(link_to.into());
        self
    }

    /// Addresses the notification to a user and stamps it as unread now.
    pub fn into_notification(self, user_id: UserId) -> Notification {
        Notification {
            id: RecordId::new(),
            user_id,
            kind: self.kind,
            title: self.title,
            content: self.content,
            timestamp: Utc::now(),
            read: false,
            link_to: self.link_to,
        }
    }
}
