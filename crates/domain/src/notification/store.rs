use std::collections::HashMap;
use std::sync::Arc;

use common::{RecordId, UserId};
use storage::{Storage, StorageExt, keys};
use tokio::sync::RwLock;

use super::{NewNotification, Notification};
use crate::error::DomainError;
use crate::mirror::load_mirror;

/// Notification lists keyed by user, mirrored under `notifications_<userId>`.
///
/// A user's list is read from storage the first time it is touched and
/// written back on every change. Lists are append-only; marking as read is the
/// only mutation.
#[derive(Clone)]
pub struct NotificationStore<S> {
    storage: S,
    lists: Arc<RwLock<HashMap<UserId, Vec<Notification>>>>,
}

impl<S: Storage> NotificationStore<S> {
    /// Creates a store over `storage`. Lists load on first access.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            lists: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Appends a notification to a user's list.
    #[tracing::instrument(skip(self, notification), fields(kind = %notification.kind))]
    pub async fn add(
        &self,
        user_id: &UserId,
        notification: NewNotification,
    ) -> Result<Notification, DomainError> {
        let mut lists = self.lists.write().await;
        let list = self.loaded(&mut lists, user_id).await?;

        let notification = notification.into_notification(user_id.clone());
        let mut updated = list.clone();
        updated.push(notification.clone());
        self.persist(user_id, &updated).await?;
        *list = updated;

        metrics::counter!("notifications_created_total", "type" => notification.kind.as_str())
            .increment(1);
        tracing::debug!(notification_id = %notification.id, "notification added");
        Ok(notification)
    }

    /// Returns a user's notifications in insertion order.
    pub async fn list(&self, user_id: &UserId) -> Result<Vec<Notification>, DomainError> {
        let mut lists = self.lists.write().await;
        Ok(self.loaded(&mut lists, user_id).await?.clone())
    }

    /// Returns a user's notifications newest first, for display.
    pub async fn recent(&self, user_id: &UserId) -> Result<Vec<Notification>, DomainError> {
        let mut list = self.list(user_id).await?;
        list.reverse();
        list.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(list)
    }

    /// Marks one notification as read.
    ///
    /// Returns false if the user has no notification with this id.
    #[tracing::instrument(skip(self))]
    pub async fn mark_as_read(&self, user_id: &UserId, id: RecordId) -> Result<bool, DomainError> {
        let mut lists = self.lists.write().await;
        let list = self.loaded(&mut lists, user_id).await?;

        let Some(index) = list.iter().position(|n| n.id == id) else {
            return Ok(false);
        };
        if list[index].read {
            return Ok(true);
        }

        let mut updated = list.clone();
        updated[index].read = true;
        self.persist(user_id, &updated).await?;
        *list = updated;
        Ok(true)
    }

    /// Marks every notification of a user as read. Returns how many changed.
    #[tracing::instrument(skip(self))]
    pub async fn mark_all_as_read(&self, user_id: &UserId) -> Result<usize, DomainError> {
        let mut lists = self.lists.write().await;
        let list = self.loaded(&mut lists, user_id).await?;

        let changed = list.iter().filter(|n| !n.read).count();
        if changed == 0 {
            return Ok(0);
        }

        let updated: Vec<Notification> = list
            .iter()
            .cloned()
            .map(|n| Notification { read: true, ..n })
            .collect();
        self.persist(user_id, &updated).await?;
        *list = updated;

        tracing::debug!(changed, "notifications marked read");
        Ok(changed)
    }

    /// Counts a user's unread notifications.
    pub async fn unread_count(&self, user_id: &UserId) -> Result<usize, DomainError> {
        let mut lists = self.lists.write().await;
        let list = self.loaded(&mut lists, user_id).await?;
        Ok(list.iter().filter(|n| !n.read).count())
    }

    /// Returns the user's list, reading it from storage on first access.
    async fn loaded<'a>(
        &self,
        lists: &'a mut HashMap<UserId, Vec<Notification>>,
        user_id: &UserId,
    ) -> Result<&'a mut Vec<Notification>, DomainError> {
        if !lists.contains_key(user_id) {
            let stored: Vec<Notification> =
                load_mirror(&self.storage, &keys::notifications(user_id.as_str()))
                    .await?
                    .unwrap_or_default();
            lists.insert(user_id.clone(), stored);
        }
        Ok(lists.entry(user_id.clone()).or_default())
    }

    async fn persist(&self, user_id: &UserId, list: &[Notification]) -> Result<(), DomainError> {
        self.storage
            .save_json(&keys::notifications(user_id.as_str()), list)
            .await?;
        Ok(())
    }
}
