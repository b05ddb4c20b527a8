//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bagan_baskets_core::{Email, UserId, UserRole};

/// A storefront user.
///
/// Identities come from the external identity gateway; this record is the
/// local shadow keyed on the gateway's `open_id`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// External-identity key from the gateway; unique.
    pub open_id: String,
    /// Display name.
    pub name: Option<String>,
    /// Email address, if the gateway supplied one.
    pub email: Option<Email>,
    /// How the user signed in (e.g., "google", "email").
    pub login_method: Option<String>,
    /// `user` or `admin`.
    pub role: UserRole,
    /// Last sign-in time.
    pub last_signed_in: DateTime<Utc>,
    /// When the user was first seen.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for upserting a user, keyed on `open_id`.
///
/// This is a store input, never a wire type: `role` must not be
/// deserializable from a request body, or any client could name its own
/// privileges. An absent role defaults to `user`, unless the open id
/// matches the configured owner identity, which promotes to `admin`.
#[derive(Debug, Clone)]
pub struct UpsertUser {
    pub open_id: String,
    pub name: Option<String>,
    pub email: Option<Email>,
    pub login_method: Option<String>,
    pub role: Option<UserRole>,
    pub last_signed_in: Option<DateTime<Utc>>,
}

/// The authenticated identity carried in the session.
///
/// This is the `{id, role}` pair the access gate consumes, plus enough
/// display data for `/api/auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: UserId,
    pub open_id: String,
    pub name: Option<String>,
    pub role: UserRole,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            open_id: user.open_id.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }
}
