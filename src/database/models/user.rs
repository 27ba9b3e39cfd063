use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{postgres::PgRow, FromRow, Row};
use uuid::Uuid;

use crate::types::Role;

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(skip_serializing)]
    pub reset_password_token: Option<String>,
    #[serde(skip_serializing)]
    pub reset_password_expire: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for User {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let role: String = row.try_get("role")?;
        let role = role
            .parse::<Role>()
            .map_err(|e| sqlx::Error::Decode(e.into()))?;

        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            role,
            password_hash: row.try_get("password_hash")?,
            reset_password_token: row.try_get("reset_password_token")?,
            reset_password_expire: row.try_get("reset_password_expire")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Insert payload; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password_hash: String,
}

/// Partial update; `None` leaves the column untouched
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

impl UserChanges {
    pub fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(role) = self.role {
            user.role = role;
        }
    }
}

/// Pending password reset: the SHA-256 of the mailed token and its deadline
#[derive(Debug, Clone)]
pub struct ResetToken {
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            role: Role::Publisher,
            password_hash: "$argon2id$secret".to_string(),
            reset_password_token: Some("abc".to_string()),
            reset_password_expire: Some(Utc::now()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn serialization_hides_credentials() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["role"], "publisher");
        assert!(value.get("password_hash").is_none());
        assert!(value.get("reset_password_token").is_none());
        assert!(value.get("reset_password_expire").is_none());
    }

    #[test]
    fn changes_only_touch_given_fields() {
        let mut user = sample();
        UserChanges {
            email: Some("new@example.com".to_string()),
            ..Default::default()
        }
        .apply(&mut user);

        assert_eq!(user.name, "Jane");
        assert_eq!(user.email, "new@example.com");
        assert_eq!(user.role, Role::Publisher);
    }
}
