//! Well-known storage keys.

/// The signed-in user's session.
pub const SESSION_USER: &str = "user";

/// Accounts created through registration, with their passwords.
pub const REGISTERED_USERS: &str = "registeredUsers";

/// The global message list.
pub const MESSAGES: &str = "messages";

const NOTIFICATIONS_PREFIX: &str = "notifications_";

/// Key of a user's notification list.
pub fn notifications(user_id: &str) -> String {
    format!("{NOTIFICATIONS_PREFIX}{user_id}")
}

/// Returns the user id encoded in a notification key, if it is one.
pub fn notifications_owner(key: &str) -> Option<&str> {
    key.strip_prefix(NOTIFICATIONS_PREFIX)
        .filter(|id| !id.is_empty())
}
