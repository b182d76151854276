//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use ama_core::entities::Message;
use ama_core::error::DomainError;
use ama_core::traits::{MessageRepository, RepoResult};

use crate::models::MessageModel;

use super::error::{map_constraint_violation, map_db_error};

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Create a new PgMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self, message), fields(message_id = %message.id, room_id = message.room_id))]
    async fn create(&self, message: &Message) -> RepoResult<Message> {
        let model = sqlx::query_as::<_, MessageModel>(
            r#"
            INSERT INTO messages (id, room_id, message, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING id, room_id, message, answered, answer,
                      0::BIGINT AS reaction_count, created_at, updated_at
            "#,
        )
        .bind(message.id)
        .bind(message.room_id)
        .bind(&message.message)
        .bind(message.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_constraint_violation(
                e,
                || DomainError::InternalError(format!("Duplicate message id {}", message.id)),
                || DomainError::RoomNotFound(message.room_id),
            )
        })?;

        Ok(model.into())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Message>> {
        let result = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT m.id, m.room_id, m.message, m.answered, m.answer,
                   (SELECT COUNT(*) FROM message_reactions r WHERE r.message_id = m.id) AS reaction_count,
                   m.created_at, m.updated_at
            FROM messages m
            WHERE m.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Message::from))
    }

    #[instrument(skip(self))]
    async fn find_by_room(&self, room_id: i64) -> RepoResult<Vec<Message>> {
        let results = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT m.id, m.room_id, m.message, m.answered, m.answer,
                   COUNT(r.user_id) AS reaction_count,
                   m.created_at, m.updated_at
            FROM messages m
            LEFT JOIN message_reactions r ON r.message_id = m.id
            WHERE m.room_id = $1
            GROUP BY m.id
            ORDER BY m.created_at DESC
            "#,
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Message::from).collect())
    }

    #[instrument(skip(self, answer))]
    async fn mark_answered(&self, id: Uuid, answer: &str) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET answered = TRUE, answer = $2, updated_at = NOW()
            WHERE id = $1 AND answered = FALSE
            "#,
        )
        .bind(id)
        .bind(answer)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }
}
