/// User model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     first_name VARCHAR(100) NOT NULL DEFAULT '',
///     last_name VARCHAR(100) NOT NULL DEFAULT '',
///     role VARCHAR(32) NOT NULL DEFAULT 'STAFF',
///     department VARCHAR(100),
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_by UUID REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use clinic_shared::models::user::User;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let users = User::list(&pool).await?;
/// for user in users {
///     println!("{} <{}> {}", user.id, user.email, user.role);
/// }
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgExecutor;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Staff role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Doctor,
    Nurse,
    Frontdesk,
    Staff,
}

impl Role {
    /// Gets role as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Doctor => "DOCTOR",
            Role::Nurse => "NURSE",
            Role::Frontdesk => "FRONTDESK",
            Role::Staff => "STAFF",
        }
    }

    /// Parses a stored role, treating unknown values as `Staff`
    pub fn from_db(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            tracing::warn!(role = value, "Unknown role in users table, treating as STAFF");
            Role::Staff
        })
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role string is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "DOCTOR" => Ok(Role::Doctor),
            "NURSE" => Ok(Role::Nurse),
            "FRONTDESK" => Ok(Role::Frontdesk),
            "STAFF" => Ok(Role::Staff),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// Public view of a user account
///
/// Never carries the password hash; safe to serialize into responses.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,

    /// Role exactly as stored (see [`Role::from_db`])
    pub role: String,

    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// User row including the password hash, used only by login
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserCredentials {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl UserCredentials {
    /// Drops the hash, keeping the public fields
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            role: self.role,
            is_active: self.is_active,
            created_at: self.created_at,
        }
    }
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,

    /// Argon2id hash, never plaintext
    pub password_hash: String,

    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub department: Option<String>,

    /// Principal that registered this account
    pub created_by: Option<Uuid>,
}

impl User {
    /// Lists every user, newest first
    pub async fn list<'e, E>(executor: E) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, first_name, last_name, role, is_active, created_at
            FROM users
            ORDER BY created_at DESC, id
            "#,
        )
        .fetch_all(executor)
        .await
    }

    /// Creates a user and returns its public view
    ///
    /// # Errors
    ///
    /// A duplicate email surfaces as a unique-constraint database error.
    pub async fn create<'e, E>(executor: E, data: CreateUser) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, first_name, last_name, role, department, is_active, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE, $7)
            RETURNING id, email, first_name, last_name, role, is_active, created_at
            "#,
        )
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.first_name)
        .bind(data.last_name)
        .bind(data.role.as_str())
        .bind(data.department)
        .bind(data.created_by)
        .fetch_one(executor)
        .await
    }
}

impl UserCredentials {
    /// Finds login credentials by email (case-insensitive)
    pub async fn find_by_email<'e, E>(executor: E, email: &str) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, UserCredentials>(
            r#"
            SELECT id, email, password_hash, first_name, last_name, role, is_active, created_at
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(executor)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_is_case_insensitive() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" Doctor ".parse::<Role>().unwrap(), Role::Doctor);
        assert_eq!("FRONTDESK".parse::<Role>().unwrap(), Role::Frontdesk);
        assert!("janitor".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_from_db_falls_back_to_staff() {
        assert_eq!(Role::from_db("NURSE"), Role::Nurse);
        assert_eq!(Role::from_db("RECEPTION"), Role::Staff);
    }

    #[test]
    fn test_role_serde_uses_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        let role: Role = serde_json::from_str("\"DOCTOR\"").unwrap();
        assert_eq!(role, Role::Doctor);
    }

    #[test]
    fn test_user_serialization_has_no_password() {
        let creds = UserCredentials {
            id: Uuid::new_v4(),
            email: "a@clinic.test".to_string(),
            password_hash: "$argon2id$hash".to_string(),
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            role: "DOCTOR".to_string(),
            is_active: true,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(creds.into_user()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "a@clinic.test");
        assert_eq!(json["role"], "DOCTOR");
    }
}
