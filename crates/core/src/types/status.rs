//! Order lifecycle and user role enums.
//!
//! Both enums are stored as lowercase text columns, so `Display`/`FromStr`
//! round-trip through the database representation.

use serde::{Deserialize, Serialize};

/// Error parsing a status or role from its text representation.
#[derive(thiserror::Error, Debug, Clone)]
#[error("invalid {kind}: {value}")]
pub struct StatusError {
    /// What was being parsed ("order status" or "user role").
    pub kind: &'static str,
    /// The offending input.
    pub value: String,
}

/// Order lifecycle status.
///
/// The legal transitions form a straight line with cancellation as an
/// escape hatch:
///
/// ```text
/// pending -> confirmed -> shipped -> delivered
///    \          |            |
///     `---------+------------+----> cancelled
/// ```
///
/// `delivered` and `cancelled` are terminal. A same-status update is a
/// no-op, not a transition, so redundant patches stay idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Whether this status admits no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether moving from `self` to `next` is a legal lifecycle change.
    ///
    /// A same-status update is always allowed (it is a no-op, not a
    /// transition).
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        if self as u8 == next as u8 {
            return true;
        }
        match (self, next) {
            (Self::Pending, Self::Confirmed)
            | (Self::Confirmed, Self::Shipped)
            | (Self::Shipped, Self::Delivered) => true,
            (s, Self::Cancelled) => !s.is_terminal(),
            _ => false,
        }
    }

    /// The lowercase text representation stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(StatusError {
                kind: "order status",
                value: s.to_owned(),
            }),
        }
    }
}

/// User role: a regular customer or an administrator.
///
/// The first administrator is bootstrapped by matching the configured owner
/// identity during user upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    /// Whether this role grants administrative access.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// The lowercase text representation stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(StatusError {
                kind: "user role",
                value: s.to_owned(),
            }),
        }
    }
}
