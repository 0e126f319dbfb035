use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use duckdb::{params, Connection, Row};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::application::{UserMutation, UserRepository};
use crate::domain::{normalize_email, DomainError, User};

const SELECT_USER: &str =
    "SELECT id, name, email, password_hash, wishlist, created_at, updated_at FROM users";

pub struct DuckdbUserRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DuckdbUserRepository {
    /// Create the adapter on a connection shared with the catalog store
    /// (DuckDB only allows one write connection per file).
    pub async fn with_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, DomainError> {
        {
            let guard = conn.lock().await;
            Self::initialize_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), DomainError> {
        // Email uniqueness is enforced in `save`; DuckDB rejects updates that
        // touch a row with a unique index in the same transaction.
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                wishlist TEXT NOT NULL DEFAULT '[]',
                created_at BIGINT NOT NULL,
                updated_at BIGINT NOT NULL
            );
            "#,
        )
        .map_err(|e| DomainError::storage(format!("Failed to initialize users schema: {}", e)))?;

        debug!("DuckDB users schema initialized");
        Ok(())
    }

    fn row_to_user(row: &Row<'_>) -> duckdb::Result<User> {
        let id: String = row.get(0)?;
        let wishlist_json: String = row.get(4)?;
        let wishlist = match serde_json::from_str(&wishlist_json) {
            Ok(wishlist) => wishlist,
            Err(e) => {
                warn!("Discarding unreadable wishlist of user {}: {}", id, e);
                Vec::new()
            }
        };
        Ok(User::reconstitute(
            id,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            wishlist,
            from_micros(row.get(5)?),
            from_micros(row.get(6)?),
        ))
    }

    fn query_one(
        conn: &Connection,
        clause: &str,
        value: &str,
    ) -> Result<Option<User>, DomainError> {
        let mut stmt = conn
            .prepare(&format!("{SELECT_USER} WHERE {clause} = ?1"))
            .map_err(|e| DomainError::storage(format!("Failed to prepare statement: {}", e)))?;

        match stmt.query_row(params![value], Self::row_to_user) {
            Ok(user) => Ok(Some(user)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DomainError::storage(format!("Failed to query user: {}", e))),
        }
    }

    fn write_user(conn: &Connection, user: &User) -> Result<(), DomainError> {
        if let Some(owner) = Self::query_one(conn, "email", user.email())? {
            if owner.id() != user.id() {
                return Err(DomainError::already_exists(format!(
                    "A user with email {} already exists",
                    user.email()
                )));
            }
        }

        let wishlist = serde_json::to_string(user.wishlist())
            .map_err(|e| DomainError::storage(format!("Failed to encode wishlist: {}", e)))?;

        let updated = conn
            .execute(
                "UPDATE users SET name = ?1, email = ?2, password_hash = ?3, wishlist = ?4, updated_at = ?5 WHERE id = ?6",
                params![
                    user.name(),
                    user.email(),
                    user.password_hash(),
                    wishlist,
                    user.updated_at().timestamp_micros(),
                    user.id(),
                ],
            )
            .map_err(|e| DomainError::storage(format!("Failed to update user: {}", e)))?;

        if updated == 0 {
            conn.execute(
                r#"
                INSERT INTO users (id, name, email, password_hash, wishlist, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    user.id(),
                    user.name(),
                    user.email(),
                    user.password_hash(),
                    wishlist,
                    user.created_at().timestamp_micros(),
                    user.updated_at().timestamp_micros(),
                ],
            )
            .map_err(|e| DomainError::storage(format!("Failed to save user: {}", e)))?;
        }

        Ok(())
    }
}

fn from_micros(micros: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_micros(micros).unwrap_or_default()
}

#[async_trait]
impl UserRepository for DuckdbUserRepository {
    async fn save(&self, user: &User) -> Result<(), DomainError> {
        let conn = self.conn.lock().await;
        Self::write_user(&conn, user)
    }

    async fn modify(&self, id: &str, change: UserMutation) -> Result<Option<User>, DomainError> {
        let conn = self.conn.lock().await;
        let mut user = match Self::query_one(&conn, "id", id)? {
            Some(user) => user,
            None => return Ok(None),
        };
        change(&mut user);
        Self::write_user(&conn, &user)?;
        Ok(Some(user))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, DomainError> {
        let conn = self.conn.lock().await;
        Self::query_one(&conn, "id", id)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let conn = self.conn.lock().await;
        Self::query_one(&conn, "email", &normalize_email(email))
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(&format!("{SELECT_USER} ORDER BY created_at, id"))
            .map_err(|e| DomainError::storage(format!("Failed to prepare statement: {}", e)))?;

        let rows = stmt
            .query_map([], Self::row_to_user)
            .map_err(|e| DomainError::storage(format!("Failed to query users: {}", e)))?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row.map_err(|e| DomainError::storage(format!("Failed to read row: {}", e)))?);
        }
        Ok(users)
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let conn = self.conn.lock().await;
        let changed = conn
            .execute("DELETE FROM users WHERE id = ?1", params![id])
            .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;
        Ok(changed > 0)
    }
}
