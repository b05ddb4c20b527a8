//! Auth route handlers.
//!
//! The server never sees credentials. The identity gateway in front of it
//! completes sign-in and then asserts the resulting identity to
//! `POST /api/auth/session`; that upserts the local user record (promoting
//! the configured owner to admin) and establishes the session.
//!
//! The assertion payload carries identity only, never privileges: there is
//! no `role` field on the wire, so the config-matched owner identity is the
//! only path to an admin session. The gateway authenticates itself with a
//! shared-secret header when `SHOP_GATEWAY_SECRET` is configured.

use axum::http::HeaderMap;
use axum::{Json, extract::State};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use bagan_baskets_core::Email;

use crate::config::Config;
use crate::db::UserStore;
use crate::error::{AppError, Result};
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, UpsertUser};
use crate::state::AppState;

/// Header under which the gateway presents its shared secret.
pub const GATEWAY_SECRET_HEADER: &str = "x-gateway-secret";

/// Identity assertion from the gateway: who signed in, nothing more.
///
/// Unknown fields are ignored, so a body smuggling a `role` key simply
/// loses it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAssertion {
    pub open_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<Email>,
    #[serde(default)]
    pub login_method: Option<String>,
}

impl SessionAssertion {
    /// Convert to a store upsert. The role is always `None` here; only the
    /// owner-identity match inside the store can mint an admin.
    fn into_upsert(self) -> UpsertUser {
        UpsertUser {
            open_id: self.open_id,
            name: self.name,
            email: self.email,
            login_method: self.login_method,
            role: None,
            last_signed_in: None,
        }
    }
}

/// Response body for logout.
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Check the gateway's shared secret, when one is configured.
fn verify_gateway(config: &Config, headers: &HeaderMap) -> Result<()> {
    let Some(secret) = &config.gateway_secret else {
        return Ok(());
    };

    let presented = headers
        .get(GATEWAY_SECRET_HEADER)
        .and_then(|value| value.to_str().ok());

    if presented == Some(secret.expose_secret()) {
        Ok(())
    } else {
        Err(AppError::Unauthorized(
            "gateway assertion rejected".to_owned(),
        ))
    }
}

/// `GET /api/auth/me` - the session identity, or JSON `null`.
pub async fn me(OptionalAuth(user): OptionalAuth) -> Json<Option<CurrentUser>> {
    Json(user)
}

/// `POST /api/auth/session` - gateway-facing sign-in assertion.
pub async fn session(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Json(assertion): Json<SessionAssertion>,
) -> Result<Json<CurrentUser>> {
    verify_gateway(state.config(), &headers)?;

    let owner = state.config().owner_open_id.as_deref();
    let user = UserStore::new(state.store())
        .upsert(assertion.into_upsert(), owner)
        .await?;

    let current = CurrentUser::from(&user);
    set_current_user(&session, &current).await?;

    tracing::info!(user_id = %user.id, role = %user.role, "user signed in");
    Ok(Json(current))
}

/// `POST /api/auth/logout` - drop the session.
pub async fn logout(session: Session) -> Json<LogoutResponse> {
    clear_current_user(&session).await;
    Json(LogoutResponse { success: true })
}
