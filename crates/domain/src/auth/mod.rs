//! Session, mock credential lists and registration.

mod directory;
mod store;
mod user;

pub use directory::{DEFAULT_ADMIN_ID, MockAccount, UserDirectory};
pub use store::{AuthStore, Registration};
pub use user::{RegisteredUser, Role, User};

use thiserror::Error;

/// Errors surfaced to the caller by login and registration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// No account matches the email/password pair.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The email belongs to a mock or previously registered account.
    #[error("Email already registered")]
    EmailAlreadyRegistered,

    /// Self-registration is not offered for this role.
    #[error("Cannot register with role {0}")]
    RoleNotAllowed(Role),
}
