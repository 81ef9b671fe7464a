//! Roles and order status values.

use serde::{Deserialize, Serialize};

/// Status written on every order created at checkout.
///
/// Order status is free-form text; nothing in the storefront transitions it
/// afterwards (shipping and delivery updates happen outside this service).
pub const ORDER_STATUS_PROCESSING: &str = "Processing";

/// Account role stored in `users.role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Shopper account created through signup.
    #[default]
    Customer,
    /// Staff account (created out of band).
    Admin,
}

impl UserRole {
    /// Column value for this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
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
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrips_through_column_value() {
        for role in [UserRole::Customer, UserRole::Admin] {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
    }

    #[test]
    fn test_role_rejects_unknown() {
        assert!("superuser".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_default_role_is_customer() {
        assert_eq!(UserRole::default().to_string(), "customer");
    }
}
