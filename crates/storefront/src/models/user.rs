//! Account types.

use secrecy::SecretString;
use serde::Serialize;

use folkmint_core::{Email, UserId};

/// Default city recorded for addresses captured as a single street line.
pub const DEFAULT_CITY: &str = "Dhaka";
/// Default postal code for new addresses.
pub const DEFAULT_POSTAL_CODE: &str = "1000";
/// Default country for new addresses.
pub const DEFAULT_COUNTRY: &str = "Bangladesh";

/// A validated signup request.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    /// Stored verbatim; see `LoginRecord::password`.
    pub password: SecretString,
    /// Street line of the first address.
    pub street: String,
}

/// What login needs to know about an account.
#[derive(Debug, Clone)]
pub struct LoginRecord {
    pub user_id: UserId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Stored credential. Compared as an opaque string, not hashed.
    pub password: SecretString,
}

impl LoginRecord {
    /// Display name shown by clients: first and last name joined by a space.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        )
    }
}

/// Profile header of the account page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Profile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    /// Street of the user's current (first) address, if any.
    pub address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        let record = LoginRecord {
            user_id: UserId::new(1),
            email: "demo@folkmint.com".to_owned(),
            first_name: Some("Demo".to_owned()),
            last_name: Some("User".to_owned()),
            password: SecretString::from("password123"),
        };
        assert_eq!(record.display_name(), "Demo User");
    }

    #[test]
    fn test_display_name_missing_parts() {
        let record = LoginRecord {
            user_id: UserId::new(2),
            email: "x@y.z".to_owned(),
            first_name: Some("Rina".to_owned()),
            last_name: None,
            password: SecretString::from("pw"),
        };
        assert_eq!(record.display_name(), "Rina ");
    }
}
