//! MySQL implementation of the SessionStore trait.
//!
//! The rotation protocol's atomicity requirement is met with conditional
//! updates: `UPDATE ... WHERE status = 'active'` either transitions exactly
//! one row or reports zero rows affected. No advisory locks, no
//! transactions spanning the race window, no reliance on a single process.
//!
//! Every statement runs under a bounded timeout. A timed-out write is
//! reported as `DomainError::Timeout` and must be treated by callers as
//! failed; assuming success on an uncertain write could leave two records
//! simultaneously active.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use sentra_core::domain::entities::session::Session;
use sentra_core::domain::entities::token::{RefreshTokenRecord, RefreshTokenStatus};
use sentra_core::errors::DomainError;
use sentra_core::repositories::session::SessionStore;

use super::super::connection::DatabasePool;

/// MySQL implementation of SessionStore
pub struct MySqlSessionStore {
    pool: MySqlPool,
    statement_timeout: Duration,
}

impl MySqlSessionStore {
    /// Create a new MySQL session store from a managed pool
    pub fn new(pool: &DatabasePool) -> Self {
        Self {
            pool: pool.inner().clone(),
            statement_timeout: pool.statement_timeout(),
        }
    }

    /// Create a store from a raw pool with an explicit statement timeout
    pub fn with_pool(pool: MySqlPool, statement_timeout: Duration) -> Self {
        Self {
            pool,
            statement_timeout,
        }
    }

    /// Run a statement future under the bounded timeout
    async fn bounded<T, F>(&self, operation: &str, fut: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.statement_timeout, fut).await {
            Ok(result) => result.map_err(|e| DomainError::Storage {
                message: format!("{operation}: {e}"),
            }),
            Err(_) => Err(DomainError::Timeout {
                operation: operation.to_string(),
            }),
        }
    }

    /// Convert a database row to a Session entity
    fn row_to_session(row: &sqlx::mysql::MySqlRow) -> Result<Session, DomainError> {
        let id: String = try_get(row, "id")?;
        let user_id: String = try_get(row, "user_id")?;
        let roles_json: String = try_get(row, "roles")?;

        Ok(Session {
            id: parse_uuid(&id)?,
            user_id: parse_uuid(&user_id)?,
            device_fingerprint: try_get(row, "device_fingerprint")?,
            scope: try_get(row, "scope")?,
            roles: serde_json::from_str(&roles_json).map_err(|e| DomainError::Internal {
                message: format!("invalid roles payload: {e}"),
            })?,
            created_at: try_get::<DateTime<Utc>>(row, "created_at")?,
            last_refreshed_at: try_get::<DateTime<Utc>>(row, "last_refreshed_at")?,
            expires_at: try_get::<DateTime<Utc>>(row, "expires_at")?,
            revoked_at: try_get(row, "revoked_at")?,
        })
    }

    /// Convert a database row to a RefreshTokenRecord entity
    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> Result<RefreshTokenRecord, DomainError> {
        let session_id: String = try_get(row, "session_id")?;
        let status: String = try_get(row, "status")?;

        Ok(RefreshTokenRecord {
            token_hash: try_get(row, "token_hash")?,
            session_id: parse_uuid(&session_id)?,
            rotated_from_hash: try_get(row, "rotated_from_hash")?,
            status: RefreshTokenStatus::parse(&status).ok_or_else(|| DomainError::Internal {
                message: format!("unknown refresh token status: {status}"),
            })?,
            issued_at: try_get::<DateTime<Utc>>(row, "issued_at")?,
            expires_at: try_get::<DateTime<Utc>>(row, "expires_at")?,
        })
    }
}

fn try_get<'r, T>(row: &'r sqlx::mysql::MySqlRow, column: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::MySql> + sqlx::Type<sqlx::MySql>,
{
    row.try_get(column).map_err(|e| DomainError::Internal {
        message: format!("failed to read column {column}: {e}"),
    })
}

fn parse_uuid(value: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(value).map_err(|e| DomainError::Internal {
        message: format!("invalid UUID in database: {e}"),
    })
}

#[async_trait]
impl SessionStore for MySqlSessionStore {
    async fn create_session(&self, session: Session) -> Result<Session, DomainError> {
        let query = r#"
            INSERT INTO sessions (
                id, user_id, device_fingerprint, scope, roles,
                created_at, last_refreshed_at, expires_at, revoked_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        let roles_json = serde_json::to_string(&session.roles).map_err(|e| {
            DomainError::Internal {
                message: format!("failed to encode roles: {e}"),
            }
        })?;

        self.bounded(
            "create_session",
            sqlx::query(query)
                .bind(session.id.to_string())
                .bind(session.user_id.to_string())
                .bind(&session.device_fingerprint)
                .bind(&session.scope)
                .bind(&roles_json)
                .bind(session.created_at)
                .bind(session.last_refreshed_at)
                .bind(session.expires_at)
                .bind(session.revoked_at)
                .execute(&self.pool),
        )
        .await?;

        Ok(session)
    }

    async fn find_session(&self, session_id: Uuid) -> Result<Option<Session>, DomainError> {
        let query = r#"
            SELECT id, user_id, device_fingerprint, scope, roles,
                   created_at, last_refreshed_at, expires_at, revoked_at
            FROM sessions
            WHERE id = ?
            LIMIT 1
        "#;

        let row = self
            .bounded(
                "find_session",
                sqlx::query(query)
                    .bind(session_id.to_string())
                    .fetch_optional(&self.pool),
            )
            .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_session(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_sessions_by_user(&self, user_id: Uuid) -> Result<Vec<Session>, DomainError> {
        let query = r#"
            SELECT id, user_id, device_fingerprint, scope, roles,
                   created_at, last_refreshed_at, expires_at, revoked_at
            FROM sessions
            WHERE user_id = ?
            ORDER BY created_at ASC
        "#;

        let rows = self
            .bounded(
                "find_sessions_by_user",
                sqlx::query(query)
                    .bind(user_id.to_string())
                    .fetch_all(&self.pool),
            )
            .await?;

        let mut sessions = Vec::with_capacity(rows.len());
        for row in rows {
            sessions.push(Self::row_to_session(&row)?);
        }

        Ok(sessions)
    }

    async fn extend_session(
        &self,
        session_id: Uuid,
        last_refreshed_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let query = r#"
            UPDATE sessions
            SET last_refreshed_at = ?, expires_at = ?
            WHERE id = ?
        "#;

        let result = self
            .bounded(
                "extend_session",
                sqlx::query(query)
                    .bind(last_refreshed_at)
                    .bind(expires_at)
                    .bind(session_id.to_string())
                    .execute(&self.pool),
            )
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke_session(
        &self,
        session_id: Uuid,
        revoked_at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        // Conditional on not-yet-revoked so the caller learns whether this
        // call changed state; keeps revocation idempotent.
        let query = r#"
            UPDATE sessions
            SET revoked_at = ?
            WHERE id = ? AND revoked_at IS NULL
        "#;

        let result = self
            .bounded(
                "revoke_session",
                sqlx::query(query)
                    .bind(revoked_at)
                    .bind(session_id.to_string())
                    .execute(&self.pool),
            )
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_refresh_record(
        &self,
        record: RefreshTokenRecord,
    ) -> Result<RefreshTokenRecord, DomainError> {
        let query = r#"
            INSERT INTO refresh_tokens (
                token_hash, session_id, rotated_from_hash, status,
                issued_at, expires_at
            ) VALUES (?, ?, ?, ?, ?, ?)
        "#;

        self.bounded(
            "insert_refresh_record",
            sqlx::query(query)
                .bind(&record.token_hash)
                .bind(record.session_id.to_string())
                .bind(&record.rotated_from_hash)
                .bind(record.status.as_str())
                .bind(record.issued_at)
                .bind(record.expires_at)
                .execute(&self.pool),
        )
        .await?;

        Ok(record)
    }

    async fn find_refresh_record(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenRecord>, DomainError> {
        let query = r#"
            SELECT token_hash, session_id, rotated_from_hash, status,
                   issued_at, expires_at
            FROM refresh_tokens
            WHERE token_hash = ?
            LIMIT 1
        "#;

        let row = self
            .bounded(
                "find_refresh_record",
                sqlx::query(query).bind(token_hash).fetch_optional(&self.pool),
            )
            .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    async fn consume_refresh_record(&self, token_hash: &str) -> Result<bool, DomainError> {
        // The compare-and-swap behind the whole rotation protocol: the row
        // transitions only if it is still active, and MySQL reports whether
        // this statement was the one that did it.
        let query = r#"
            UPDATE refresh_tokens
            SET status = 'rotated'
            WHERE token_hash = ? AND status = 'active'
        "#;

        let result = self
            .bounded(
                "consume_refresh_record",
                sqlx::query(query).bind(token_hash).execute(&self.pool),
            )
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_record_expired(&self, token_hash: &str) -> Result<bool, DomainError> {
        let query = r#"
            UPDATE refresh_tokens
            SET status = 'expired'
            WHERE token_hash = ? AND status = 'active'
        "#;

        let result = self
            .bounded(
                "mark_record_expired",
                sqlx::query(query).bind(token_hash).execute(&self.pool),
            )
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke_session_records(&self, session_id: Uuid) -> Result<usize, DomainError> {
        let query = r#"
            UPDATE refresh_tokens
            SET status = 'revoked'
            WHERE session_id = ? AND status IN ('active', 'rotated')
        "#;

        let result = self
            .bounded(
                "revoke_session_records",
                sqlx::query(query)
                    .bind(session_id.to_string())
                    .execute(&self.pool),
            )
            .await?;

        Ok(result.rows_affected() as usize)
    }

    async fn count_active_records(&self, session_id: Uuid) -> Result<usize, DomainError> {
        let query = r#"
            SELECT COUNT(*) AS active_count
            FROM refresh_tokens
            WHERE session_id = ? AND status = 'active'
        "#;

        let row = self
            .bounded(
                "count_active_records",
                sqlx::query(query)
                    .bind(session_id.to_string())
                    .fetch_one(&self.pool),
            )
            .await?;

        let count: i64 = try_get(&row, "active_count")?;
        Ok(count as usize)
    }
}
