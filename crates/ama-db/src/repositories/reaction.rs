//! PostgreSQL implementation of ReactionRepository
//!
//! The composite primary key on `(message_id, user_id)` decides concurrent
//! duplicates. Writers lock the parent message row first, so reaction writes
//! on one message run one at a time and each returned count reflects exactly
//! the writes committed before it.

use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};
use tracing::instrument;
use uuid::Uuid;

use ama_core::error::DomainError;
use ama_core::traits::{ReactionRepository, RepoResult};

use super::error::{map_constraint_violation, map_db_error};

/// PostgreSQL implementation of ReactionRepository
#[derive(Clone)]
pub struct PgReactionRepository {
    pool: PgPool,
}

impl PgReactionRepository {
    /// Create a new PgReactionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn count_reactions<'e, E>(executor: E, message_id: Uuid) -> RepoResult<i64>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM message_reactions WHERE message_id = $1
        "#,
    )
    .bind(message_id)
    .fetch_one(executor)
    .await
    .map_err(map_db_error)
}

/// Take the row lock on the message until the transaction ends.
///
/// Returns `false` when the message does not exist.
async fn lock_message(tx: &mut Transaction<'_, Postgres>, message_id: Uuid) -> RepoResult<bool> {
    let locked = sqlx::query_scalar::<_, i32>(
        r#"
        SELECT 1 FROM messages WHERE id = $1 FOR UPDATE
        "#,
    )
    .bind(message_id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(map_db_error)?;

    Ok(locked.is_some())
}

#[async_trait]
impl ReactionRepository for PgReactionRepository {
    #[instrument(skip(self))]
    async fn add(&self, message_id: Uuid, user_id: Uuid) -> RepoResult<i64> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        if !lock_message(&mut tx, message_id).await? {
            return Err(DomainError::MessageNotFound(message_id));
        }

        sqlx::query(
            r#"
            INSERT INTO message_reactions (message_id, user_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(message_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            map_constraint_violation(
                e,
                || DomainError::ReactionAlreadyExists,
                || DomainError::MessageNotFound(message_id),
            )
        })?;

        let count = count_reactions(&mut *tx, message_id).await?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self))]
    async fn remove(&self, message_id: Uuid, user_id: Uuid) -> RepoResult<i64> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        if !lock_message(&mut tx, message_id).await? {
            return Err(DomainError::ReactionNotFound(message_id));
        }

        let result = sqlx::query(
            r#"
            DELETE FROM message_reactions
            WHERE message_id = $1 AND user_id = $2
            "#,
        )
        .bind(message_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ReactionNotFound(message_id));
        }

        let count = count_reactions(&mut *tx, message_id).await?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self))]
    async fn count(&self, message_id: Uuid) -> RepoResult<i64> {
        count_reactions(&self.pool, message_id).await
    }

    #[instrument(skip(self))]
    async fn message_ids_for_user(&self, room_id: i64, user_id: Uuid) -> RepoResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT r.message_id
            FROM message_reactions r
            JOIN messages m ON m.id = r.message_id
            WHERE m.room_id = $1 AND r.user_id = $2
            ORDER BY r.created_at
            "#,
        )
        .bind(room_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }
}
