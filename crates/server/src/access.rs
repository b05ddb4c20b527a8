//! Ownership gate for order visibility.
//!
//! A pure predicate with no I/O: an order is visible to its owning user and
//! to administrators, nobody else. The single-order lookup path applies it;
//! per-user listing is inherently scoped and needs no extra check.

use crate::models::{CurrentUser, Order};

/// Whether `user` may view `order`.
#[must_use]
pub fn can_view(order: &Order, user: &CurrentUser) -> bool {
    order.user_id == user.id || user.role.is_admin()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use chrono::Utc;

    use bagan_baskets_core::{Email, OrderId, OrderStatus, Price, UserId, UserRole};

    fn order_owned_by(user_id: i32) -> Order {
        Order {
            id: OrderId::new(1),
            user_id: UserId::new(user_id),
            status: OrderStatus::Pending,
            total_amount: Price::from_cents(5998),
            customer_email: Email::parse("test@example.com").unwrap(),
            customer_phone: None,
            shipping_street: "123 Test St".to_owned(),
            shipping_city: "Bagan".to_owned(),
            shipping_country: "Myanmar".to_owned(),
            shipping_zip: "12345".to_owned(),
            notes: None,
            created_at: Utc::now(),
        }
    }

    fn user(id: i32, role: UserRole) -> CurrentUser {
        CurrentUser {
            id: UserId::new(id),
            open_id: format!("oid-{id}"),
            name: None,
            role,
        }
    }

    #[test]
    fn test_owner_can_view() {
        assert!(can_view(&order_owned_by(1), &user(1, UserRole::User)));
    }

    #[test]
    fn test_other_user_cannot_view() {
        assert!(!can_view(&order_owned_by(1), &user(2, UserRole::User)));
    }

    #[test]
    fn test_admin_can_view_any_order() {
        assert!(can_view(&order_owned_by(1), &user(2, UserRole::Admin)));
    }

    #[test]
    fn test_admin_owner_can_view() {
        assert!(can_view(&order_owned_by(3), &user(3, UserRole::Admin)));
    }
}
