//! User store: upsert keyed on the external identity, and lookup.

use chrono::{DateTime, Utc};

use bagan_baskets_core::{Email, UserId, UserRole};

use super::{Store, StoreError, degrade_read};
use crate::models::{UpsertUser, User};

const USER_COLUMNS: &str =
    "id, open_id, name, email, login_method, role, last_signed_in, created_at, updated_at";

/// Internal row type for `PostgreSQL` user queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    open_id: String,
    name: Option<String>,
    email: Option<String>,
    login_method: Option<String>,
    role: String,
    last_signed_in: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: UserRole = row.role.parse().map_err(|e| {
            StoreError::DataCorruption(format!("invalid user role in database: {e}"))
        })?;
        let email = row
            .email
            .as_deref()
            .map(Email::parse)
            .transpose()
            .map_err(|e| StoreError::DataCorruption(format!("invalid email in database: {e}")))?;

        Ok(Self {
            id: UserId::new(row.id),
            open_id: row.open_id,
            name: row.name,
            email,
            login_method: row.login_method,
            role,
            last_signed_in: row.last_signed_in,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Store for user identity records.
pub struct UserStore<'a> {
    store: &'a Store,
}

impl<'a> UserStore<'a> {
    /// Create a new user store.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Insert or update a user keyed on `open_id`.
    ///
    /// Only provided fields overwrite existing values. The role defaults to
    /// `user` on first insert; when `open_id` matches `owner_open_id` the
    /// user is promoted to `admin`, bootstrapping the first administrator.
    /// `last_signed_in` defaults to now.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` for an empty open id,
    /// `StoreError::Unavailable` when the backing store is down.
    pub async fn upsert(
        &self,
        user: UpsertUser,
        owner_open_id: Option<&str>,
    ) -> Result<User, StoreError> {
        if user.open_id.trim().is_empty() {
            return Err(StoreError::Validation(
                "open id is required for upsert".into(),
            ));
        }

        let Some(pool) = self.store.pool().await else {
            return Err(StoreError::Unavailable);
        };

        // Explicit role wins; otherwise the owner identity is promoted.
        let is_owner = owner_open_id.is_some_and(|owner| owner == user.open_id);
        let resolved_role = user
            .role
            .or_else(|| is_owner.then_some(UserRole::Admin));
        let insert_role = resolved_role.unwrap_or_default();

        let query = format!(
            "INSERT INTO users (open_id, name, email, login_method, role, last_signed_in)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, now()))
             ON CONFLICT (open_id) DO UPDATE SET
                 name = COALESCE(EXCLUDED.name, users.name),
                 email = COALESCE(EXCLUDED.email, users.email),
                 login_method = COALESCE(EXCLUDED.login_method, users.login_method),
                 role = COALESCE($7, users.role),
                 last_signed_in = COALESCE(EXCLUDED.last_signed_in, now()),
                 updated_at = now()
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(&user.open_id)
            .bind(&user.name)
            .bind(user.email.as_ref().map(Email::as_str))
            .bind(&user.login_method)
            .bind(insert_role.as_str())
            .bind(user.last_signed_in)
            .bind(resolved_role.map(UserRole::as_str))
            .fetch_one(pool)
            .await
            .map_err(StoreError::from_sqlx)?;

        row.try_into()
    }

    /// Get a user by their external identity key.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails against a live pool.
    /// Returns `StoreError::DataCorruption` if stored data is invalid.
    pub async fn get_by_open_id(&self, open_id: &str) -> Result<Option<User>, StoreError> {
        let Some(pool) = self.store.pool().await else {
            tracing::warn!(open_id, "cannot get user: store unavailable");
            return Ok(None);
        };

        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE open_id = $1");
        match sqlx::query_as::<_, UserRow>(&query)
            .bind(open_id)
            .fetch_optional(pool)
            .await
        {
            Ok(row) => row.map(TryInto::try_into).transpose(),
            Err(e) => degrade_read(e, None),
        }
    }
}
