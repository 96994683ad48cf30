//! Per-user notification lists.

mod record;
mod store;

pub use record::{NewNotification, Notification, NotificationType};
pub use store::NotificationStore;
