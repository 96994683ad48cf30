//! HTTP route handlers.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod dashboards;
pub mod export;
pub mod health;
pub mod messages;
pub mod metrics;
pub mod notifications;
pub mod products;
pub mod transactions;

use domain::{Role, User};

use crate::error::ApiError;
use crate::state::AppState;

/// Returns the signed-in user or 401.
pub(crate) async fn session_user(state: &AppState) -> Result<User, ApiError> {
    state
        .auth
        .current_user()
        .await
        .ok_or_else(ApiError::not_authenticated)
}

/// Returns the signed-in user if they hold `role`, else 401 or 403.
pub(crate) async fn require_role(state: &AppState, role: Role) -> Result<User, ApiError> {
    let user = session_user(state).await?;
    if user.role != role {
        return Err(ApiError::Forbidden(format!("Requires the {role} role")));
    }
    Ok(user)
}
