//! Money as integer minor currency units.
//!
//! All monetary amounts in the system are whole cents carried in an `i64`.
//! Floating point never touches money; display formatting is the only place
//! a decimal point appears.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A monetary amount in minor currency units (cents).
///
/// Wraps an `i64` cent count. Negative amounts are representable (the type
/// is also used for adjustments and validation error reporting); stores
/// reject negative prices at their own boundary.
///
/// ## Examples
///
/// ```
/// use bagan_baskets_core::Price;
///
/// let price = Price::from_cents(2999);
/// assert_eq!(price.as_cents(), 2999);
/// assert_eq!(price.to_string(), "$29.99");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Zero cents.
    pub const ZERO: Self = Self(0);

    /// Create a price from a cent count.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Get the underlying cent count.
    #[must_use]
    pub const fn as_cents(&self) -> i64 {
        self.0
    }

    /// Whether the amount is negative.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiply by a quantity, returning `None` on overflow.
    #[must_use]
    pub const fn checked_mul(&self, quantity: i64) -> Option<Self> {
        match self.0.checked_mul(quantity) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }

    /// Add another amount, returning `None` on overflow.
    #[must_use]
    pub const fn checked_add(&self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }
}

impl fmt::Display for Price {
    /// Format as dollars, e.g. `$29.99` or `-$0.05`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}${}.{:02}", abs / 100, abs % 100)
    }
}

impl From<i64> for Price {
    fn from(cents: i64) -> Self {
        Self(cents)
    }
}

impl From<Price> for i64 {
    fn from(price: Price) -> Self {
        price.0
    }
}

// SQLx support (with postgres feature); stored as BIGINT.
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i64 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i64 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let cents = <i64 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(cents))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i64 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
