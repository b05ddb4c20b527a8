//! Authentication extractors.
//!
//! The identity gateway in front of this service establishes who the caller
//! is; these extractors read the resulting `{id, role}` out of the session.
//! The core never sees credentials.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::CurrentUser;

/// Session key under which the authenticated identity is stored.
const CURRENT_USER_KEY: &str = "current_user";

/// Store the authenticated identity in the session.
///
/// Cycles the session id first so a pre-sign-in id fixed by an attacker
/// never becomes an authenticated session.
///
/// # Errors
///
/// Returns `AppError::Internal` if the session backend fails.
pub async fn set_current_user(session: &Session, user: &CurrentUser) -> Result<(), AppError> {
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(format!("failed to cycle session id: {e}")))?;
    session
        .insert(CURRENT_USER_KEY, user)
        .await
        .map_err(|e| AppError::Internal(format!("failed to write session: {e}")))
}

/// Remove the authenticated identity and drop the session.
pub async fn clear_current_user(session: &Session) {
    let _ = session.remove::<CurrentUser>(CURRENT_USER_KEY).await;
    let _ = session.flush().await;
}

/// Extractor that requires an authenticated user.
///
/// Rejects with 401 when there is no session identity.
///
/// # Example
///
/// ```rust,ignore
/// async fn my_orders(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("orders for user {}", user.id)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| AppError::Unauthorized("no session".to_owned()))?;

        let user: CurrentUser = session
            .get(CURRENT_USER_KEY)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| AppError::Unauthorized("not signed in".to_owned()))?;

        Ok(Self(user))
    }
}

/// Extractor that requires an authenticated administrator.
///
/// Rejects with 401 when not signed in and 403 for a non-admin identity.
pub struct RequireAdmin(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;

        if !user.role.is_admin() {
            return Err(AppError::Forbidden("administrator role required".to_owned()));
        }

        Ok(Self(user))
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this never rejects the request.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(CURRENT_USER_KEY)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}
