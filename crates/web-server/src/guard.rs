use crate::error::AppError;
use crate::session::token_from_headers;
use crate::AppState;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use core_types::{Capabilities, Permission, User};
use std::sync::Arc;

/// The authenticated caller, resolved from the session token.
///
/// Rejects with 401 when no token is presented or the token is unknown, and
/// with 404 when the token points at a user that no longer exists.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers).ok_or_else(AppError::invalid_token)?;
        let email = state
            .sessions
            .get(&token)
            .await?
            .ok_or_else(AppError::invalid_token)?;
        let user = state
            .data
            .get_user(&email)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;
        Ok(CurrentUser { user, token })
    }
}

impl CurrentUser {
    pub async fn capabilities(&self, state: &AppState) -> Result<Capabilities, AppError> {
        Ok(state.data.get_user_permissions(&self.user.email).await?)
    }

    /// Loads the caller's capabilities and rejects with 403 and `denied`
    /// unless `permission` is among them.
    pub async fn require(
        &self,
        state: &AppState,
        permission: Permission,
        denied: &str,
    ) -> Result<Capabilities, AppError> {
        let caps = self.capabilities(state).await?;
        if !caps.contains(permission) {
            tracing::warn!(email = %self.user.email, %permission, "Permission denied.");
            return Err(AppError::Forbidden(denied.to_string()));
        }
        Ok(caps)
    }
}
