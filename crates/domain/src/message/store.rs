use std::collections::HashMap;
use std::sync::Arc;

use common::{RecordId, UserId};
use storage::{Storage, StorageExt, keys};
use tokio::sync::RwLock;

use super::{ConversationSummary, Message};
use crate::auth::User;
use crate::error::DomainError;
use crate::mirror::load_mirror;
use crate::notification::{NewNotification, NotificationStore};

#[derive(Default)]
struct MessageState {
    loaded: bool,
    messages: Vec<Message>,
}

/// The global message list, mirrored under `messages`.
///
/// Sending a message also notifies the receiver through the
/// [`NotificationStore`]. Messages are never edited or deleted.
#[derive(Clone)]
pub struct MessageStore<S> {
    storage: S,
    notifications: NotificationStore<S>,
    state: Arc<RwLock<MessageState>>,
}

impl<S: Storage> MessageStore<S> {
    /// Creates a message store that notifies receivers through `notifications`.
    pub fn new(storage: S, notifications: NotificationStore<S>) -> Self {
        Self {
            storage,
            notifications,
            state: Arc::new(RwLock::new(MessageState::default())),
        }
    }

    /// Sends a message and notifies the receiver.
    ///
    /// The message append and the notification are separate writes; if the
    /// notification fails the message stays sent.
    #[tracing::instrument(skip(self, sender, content), fields(sender_id = %sender.id))]
    pub async fn send(
        &self,
        sender: &User,
        receiver_id: &UserId,
        content: impl Into<String>,
    ) -> Result<Message, DomainError> {
        let message = Message::new(sender.id.clone(), receiver_id.clone(), content);

        {
            let mut state = self.state.write().await;
            self.ensure_loaded(&mut state).await?;

            let mut updated = state.messages.clone();
            updated.push(message.clone());
            self.storage.save_json(keys::MESSAGES, &updated).await?;
            state.messages = updated;
        }

        metrics::counter!("messages_sent_total").increment(1);
        tracing::info!(message_id = %message.id, "message sent");

        self.notifications
            .add(
                receiver_id,
                NewNotification::message(
                    format!("New message from {}", sender.name),
                    preview(&message.content),
                )
                .with_link(format!("/messages/{}", sender.id)),
            )
            .await?;

        Ok(message)
    }

    /// Returns the messages between two users, oldest first.
    pub async fn conversation(&self, a: &UserId, b: &UserId) -> Result<Vec<Message>, DomainError> {
        let mut messages: Vec<Message> = self
            .snapshot()
            .await?
            .into_iter()
            .filter(|m| m.is_between(a, b))
            .collect();
        messages.sort_by(|x, y| x.timestamp.cmp(&y.timestamp));
        Ok(messages)
    }

    /// Returns the messages a user received, newest first.
    pub async fn inbox(&self, user_id: &UserId) -> Result<Vec<Message>, DomainError> {
        let mut messages: Vec<Message> = self
            .snapshot()
            .await?
            .into_iter()
            .filter(|m| &m.receiver_id == user_id)
            .collect();
        messages.reverse();
        messages.sort_by(|x, y| y.timestamp.cmp(&x.timestamp));
        Ok(messages)
    }

    /// Returns one summary per conversation partner, most recent conversation first.
    pub async fn conversations(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ConversationSummary>, DomainError> {
        let mut by_partner: HashMap<UserId, ConversationSummary> = HashMap::new();

        for message in self.snapshot().await? {
            let Some(partner) = message.partner_of(user_id).cloned() else {
                continue;
            };
            let unread = usize::from(!message.read && &message.receiver_id == user_id);

            by_partner
                .entry(partner.clone())
                .and_modify(|summary| {
                    summary.unread_count += unread;
                    if message.timestamp >= summary.last_message.timestamp {
                        summary.last_message = message.clone();
                    }
                })
                .or_insert_with(|| ConversationSummary {
                    partner_id: partner,
                    last_message: message.clone(),
                    unread_count: unread,
                });
        }

        let mut summaries: Vec<ConversationSummary> = by_partner.into_values().collect();
        summaries.sort_by(|a, b| {
            b.last_message
                .timestamp
                .cmp(&a.last_message.timestamp)
                .then_with(|| a.partner_id.cmp(&b.partner_id))
        });
        Ok(summaries)
    }

    /// Marks one message as read. Returns false if no message has this id.
    #[tracing::instrument(skip(self))]
    pub async fn mark_as_read(&self, id: RecordId) -> Result<bool, DomainError> {
        let exists = self.snapshot().await?.iter().any(|m| m.id == id);
        if exists {
            self.mark_where(|m| m.id == id).await?;
        }
        Ok(exists)
    }

    /// Marks every message `partner` sent to `reader` as read. Returns how many changed.
    #[tracing::instrument(skip(self))]
    pub async fn mark_conversation_read(
        &self,
        reader: &UserId,
        partner: &UserId,
    ) -> Result<usize, DomainError> {
        self.mark_where(|m| &m.receiver_id == reader && &m.sender_id == partner)
            .await
    }

    /// Counts unread messages addressed to a user.
    pub async fn unread_count(&self, user_id: &UserId) -> Result<usize, DomainError> {
        Ok(self
            .snapshot()
            .await?
            .iter()
            .filter(|m| !m.read && &m.receiver_id == user_id)
            .count())
    }

    async fn mark_where<F>(&self, predicate: F) -> Result<usize, DomainError>
    where
        F: Fn(&Message) -> bool,
    {
        let mut state = self.state.write().await;
        self.ensure_loaded(&mut state).await?;

        let changed = state
            .messages
            .iter()
            .filter(|m| !m.read && predicate(m))
            .count();
        if changed == 0 {
            return Ok(0);
        }

        let updated: Vec<Message> = state
            .messages
            .iter()
            .cloned()
            .map(|m| {
                if !m.read && predicate(&m) {
                    Message { read: true, ..m }
                } else {
                    m
                }
            })
            .collect();
        self.storage.save_json(keys::MESSAGES, &updated).await?;
        state.messages = updated;
        Ok(changed)
    }

    async fn snapshot(&self) -> Result<Vec<Message>, DomainError> {
        let mut state = self.state.write().await;
        self.ensure_loaded(&mut state).await?;
        Ok(state.messages.clone())
    }

    async fn ensure_loaded(&self, state: &mut MessageState) -> Result<(), DomainError> {
        if !state.loaded {
            state.messages = load_mirror(&self.storage, keys::MESSAGES)
                .await?
                .unwrap_or_default();
            state.loaded = true;
        }
        Ok(())
    }
}

fn preview(content: &str) -> String {
    const LIMIT: usize = 80;
    if content.chars().count() <= LIMIT {
        return content.to_string();
    }
    let cut: String = content.chars().take(LIMIT).collect();
    format!("{}...", cut.trim_end())
}
