//! # Core Access Crate
//!
//! The central authority for identity in `pharmalens`. Every row in the
//! store is owned by a user id from here: authenticated callers resolve to a
//! deterministic UUIDv5 of their token subject, and unauthenticated callers
//! (e.g. ad-hoc scanner submissions) resolve to a shared guest user.

pub const GUEST_USER_IDENTIFIER: &str = "::guest::";

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use turso::{Database, Error as TursoError, Row, params};
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum CoreAccessError {
    #[error("Database error: {0}")]
    Database(#[from] TursoError),
    #[error("Failed to create or find user for identifier: {0}")]
    UserPersistenceFailed(String),
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),
}

/// Represents a user in the system.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    /// The unique, deterministic ID of the user (UUIDv5 from an external identifier).
    pub id: String,
    /// The user's role (e.g., 'user', 'root').
    pub role: String,
    /// The timestamp when the user was first created.
    pub created_at: DateTime<Utc>,
}

/// The deterministic id the guest identifier resolves to.
pub fn guest_user_id() -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, GUEST_USER_IDENTIFIER.as_bytes()).to_string()
}

impl TryFrom<&Row> for User {
    type Error = CoreAccessError;

    fn try_from(row: &Row) -> std::result::Result<Self, Self::Error> {
        let created_at_str: String = row.get(2)?;
        let created_at =
            chrono::NaiveDateTime::parse_from_str(&created_at_str, "%Y-%m-%d %H:%M:%S")
                .map(|ndt| DateTime::<Utc>::from_naive_utc_and_offset(ndt, Utc))
                .map_err(|e| {
                    CoreAccessError::DataIntegrity(format!(
                        "Failed to parse date '{created_at_str}': {e}"
                    ))
                })?;

        Ok(User {
            id: row.get(0)?,
            role: row.get(1)?,
            created_at,
        })
    }
}

/// Finds a user by their unique identifier (e.g., email or token sub),
/// creating them if they don't exist.
///
/// The primary key is a deterministic UUIDv5 of the identifier, so repeated
/// calls are idempotent. The guest identifier is never promoted to root; the
/// first real user is.
pub async fn get_or_create_user(
    db: &Database,
    user_identifier: &str,
) -> Result<User, CoreAccessError> {
    let conn = db.connect()?;
    let user_id = Uuid::new_v5(&Uuid::NAMESPACE_URL, user_identifier.as_bytes()).to_string();

    let mut rows = conn
        .query(
            "SELECT id, role, created_at FROM users WHERE id = ?",
            params![user_id.clone()],
        )
        .await?;

    if let Some(row) = rows.next().await? {
        return User::try_from(&row);
    }

    let role = if user_identifier == GUEST_USER_IDENTIFIER {
        "user"
    } else {
        let root_exists = conn
            .query("SELECT 1 FROM users WHERE role = 'root' LIMIT 1", ())
            .await?
            .next()
            .await?
            .is_some();

        if !root_exists { "root" } else { "user" }
    };

    conn.execute(
        "INSERT INTO users (id, role) VALUES (?, ?)",
        params![user_id.clone(), role],
    )
    .await?;

    // Re-select to pick up the DB-assigned created_at.
    let mut rows = conn
        .query(
            "SELECT id, role, created_at FROM users WHERE id = ?",
            params![user_id],
        )
        .await?;

    let row = rows
        .next()
        .await?
        .ok_or_else(|| CoreAccessError::UserPersistenceFailed(user_identifier.to_string()))?;

    User::try_from(&row)
}
