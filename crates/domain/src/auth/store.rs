use std::sync::Arc;
use std::time::Duration;

use common::UserId;
use storage::{Storage, StorageExt, keys};
use tokio::sync::RwLock;

use super::{AuthError, RegisteredUser, Role, User, UserDirectory};
use crate::error::DomainError;
use crate::mirror::load_mirror;

/// Input for [`AuthStore::register`].
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl Registration {
    /// Creates a registration request. Name and email are trimmed when the account is created.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            role,
        }
    }
}

#[derive(Debug, Default)]
struct AuthState {
    session: Option<User>,
    registered: Vec<RegisteredUser>,
}

/// Holds the current session and the registered accounts.
///
/// Credentials are checked against the fixed [`UserDirectory`] lists plus
/// accounts created through [`register`](Self::register). The session is a
/// plain user object mirrored under the `user` key and trusted as-is; there
/// is no hashing, expiry or refresh.
#[derive(Clone)]
pub struct AuthStore<S> {
    storage: S,
    directory: Arc<UserDirectory>,
    state: Arc<RwLock<AuthState>>,
    latency: Duration,
}

impl<S: Storage> AuthStore<S> {
    /// Creates an auth store with no session and no simulated latency.
    pub fn new(storage: S, directory: UserDirectory) -> Self {
        Self {
            storage,
            directory: Arc::new(directory),
            state: Arc::new(RwLock::new(AuthState::default())),
            latency: Duration::ZERO,
        }
    }

    /// Sets the simulated delay applied to login and registration.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Returns the fixed credential lists.
    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    /// Reads the session and registered accounts from storage.
    ///
    /// Corrupt values are logged and treated as absent.
    #[tracing::instrument(skip(self))]
    pub async fn restore(&self) -> Result<(), DomainError> {
        let session: Option<User> = load_mirror(&self.storage, keys::SESSION_USER).await?;
        let registered: Vec<RegisteredUser> =
            load_mirror(&self.storage, keys::REGISTERED_USERS)
                .await?
                .unwrap_or_default();

        let mut state = self.state.write().await;
        tracing::debug!(
            has_session = session.is_some(),
            registered = registered.len(),
            "auth state restored"
        );
        state.session = session;
        state.registered = registered;
        Ok(())
    }

    /// Signs in with an email/password pair.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, DomainError> {
        self.simulate_latency().await;

        let mut state = self.state.write().await;

        let mock = self
            .directory
            .find_by_email(email)
            .filter(|account| account.password == password)
            .map(|account| account.user.clone());
        let user = mock.or_else(|| {
            state
                .registered
                .iter()
                .find(|r| r.user.has_email(email) && r.password == password)
                .map(|r| r.user.clone())
        });

        let Some(user) = user else {
            tracing::info!("login rejected");
            metrics::counter!("auth_logins_total", "outcome" => "rejected").increment(1);
            return Err(AuthError::InvalidCredentials.into());
        };

        self.storage.save_json(keys::SESSION_USER, &user).await?;
        state.session = Some(user.clone());

        tracing::info!(user_id = %user.id, role = %user.role, "user logged in");
        metrics::counter!("auth_logins_total", "outcome" => "accepted").increment(1);
        Ok(user)
    }

    /// Creates an account and signs in as it.
    #[tracing::instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: Registration) -> Result<User, DomainError> {
        self.simulate_latency().await;

        let mut state = self.state.write().await;

        let taken = self.directory.contains_email(&registration.email)
            || state
                .registered
                .iter()
                .any(|r| r.user.has_email(&registration.email));
        if taken {
            tracing::info!("registration rejected: email taken");
            return Err(AuthError::EmailAlreadyRegistered.into());
        }
        if registration.role == Role::Admin {
            return Err(AuthError::RoleNotAllowed(registration.role).into());
        }

        let user = User::new(
            UserId::generate(),
            registration.name.trim(),
            registration.email.trim(),
            registration.role,
        );

        let mut registered = state.registered.clone();
        registered.push(RegisteredUser {
            user: user.clone(),
            password: registration.password,
        });
        self.storage
            .save_json(keys::REGISTERED_USERS, &registered)
            .await?;
        state.registered = registered;

        self.storage.save_json(keys::SESSION_USER, &user).await?;
        state.session = Some(user.clone());

        tracing::info!(user_id = %user.id, role = %user.role, "user registered");
        metrics::counter!("auth_registrations_total").increment(1);
        Ok(user)
    }

    /// Ends the session.
    #[tracing::instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        self.storage.remove_item(keys::SESSION_USER).await?;
        if let Some(user) = state.session.take() {
            tracing::info!(user_id = %user.id, "user logged out");
        }
        Ok(())
    }

    /// Returns the signed-in user, if any.
    pub async fn current_user(&self) -> Option<User> {
        self.state.read().await.session.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.session.is_some()
    }

    /// Returns the self-registered accounts, oldest first.
    pub async fn registered_users(&self) -> Vec<User> {
        self.state
            .read()
            .await
            .registered
            .iter()
            .map(|r| r.user.clone())
            .collect()
    }

    /// Returns every known account: the mock lists followed by registered users.
    pub async fn all_users(&self) -> Vec<User> {
        let mut users: Vec<User> = self
            .directory
            .accounts()
            .map(|account| account.user.clone())
            .collect();
        users.extend(self.registered_users().await);
        users
    }

    /// Finds any known account by id.
    pub async fn find_user(&self, id: &UserId) -> Option<User> {
        if let Some(user) = self.directory.find_by_id(id.as_str()) {
            return Some(user.clone());
        }
        self.state
            .read()
            .await
            .registered
            .iter()
            .find(|r| &r.user.id == id)
            .map(|r| r.user.clone())
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::InMemoryStorage;

    fn store() -> AuthStore<InMemoryStorage> {
        AuthStore::new(InMemoryStorage::new(), UserDirectory::mock())
    }

    #[tokio::test]
    async fn login_with_mock_credentials() {
        let auth = store();
        let user = auth.login("buyer@example.com", "password").await.unwrap();

        assert_eq!(user.id.as_str(), "buyer1");
        assert!(auth.is_authenticated().await);
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let auth = store();
        let err = auth
            .login("buyer@example.com", "wrong")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DomainError::Auth(AuthError::InvalidCredentials)
        ));
        assert_eq!(err.to_string(), "Invalid email or password");
        assert!(!auth.is_authenticated().await);
    }

    #[tokio::test]
    async fn register_rejects_admin_role() {
        let auth = store();
        let err = auth
            .register(Registration::new("Eve", "eve@example.com", "pw", Role::Admin))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DomainError::Auth(AuthError::RoleNotAllowed(Role::Admin))
        ));
    }

    #[tokio::test]
    async fn taken_email_wins_over_role_check() {
        let auth = store();
        let err = auth
            .register(Registration::new("Dup", "buyer@example.com", "pw", Role::Admin))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DomainError::Auth(AuthError::EmailAlreadyRegistered)
        ));
    }

    #[tokio::test]
    async fn logout_clears_session() {
        let auth = store();
        auth.login("seller@example.com", "password").await.unwrap();
        auth.logout().await.unwrap();

        assert!(auth.current_user().await.is_none());
    }

    #[tokio::test]
    async fn find_user_covers_mock_and_registered() {
        let auth = store();
        let registered = auth
            .register(Registration::new("Ann", "ann@example.com", "pw", Role::Seller))
            .await
            .unwrap();

        assert!(auth.find_user(&UserId::new("seller2")).await.is_some());
        assert_eq!(auth.find_user(&registered.id).await, Some(registered));
        assert!(auth.find_user(&UserId::new("ghost")).await.is_none());
        assert_eq!(auth.all_users().await.len(), 6);
    }
}
