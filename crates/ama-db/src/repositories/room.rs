//! PostgreSQL implementation of RoomRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use ama_core::entities::{NewRoom, Room};
use ama_core::traits::{RepoResult, RoomRepository};

use crate::models::RoomModel;

use super::error::map_db_error;

/// PostgreSQL implementation of RoomRepository
#[derive(Clone)]
pub struct PgRoomRepository {
    pool: PgPool,
}

impl PgRoomRepository {
    /// Create a new PgRoomRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomRepository for PgRoomRepository {
    #[instrument(skip(self, room), fields(name = %room.name))]
    async fn create(&self, room: NewRoom) -> RepoResult<Room> {
        let model = sqlx::query_as::<_, RoomModel>(
            r#"
            INSERT INTO rooms (name, description, user_id, creator_name)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, user_id, creator_name, created_at, updated_at
            "#,
        )
        .bind(&room.name)
        .bind(&room.description)
        .bind(room.user_id)
        .bind(&room.creator_name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(model.into())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Room>> {
        let result = sqlx::query_as::<_, RoomModel>(
            r#"
            SELECT id, name, description, user_id, creator_name, created_at, updated_at
            FROM rooms
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Room::from))
    }

    #[instrument(skip(self))]
    async fn exists(&self, id: i64) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM rooms WHERE id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> RepoResult<Vec<Room>> {
        let results = sqlx::query_as::<_, RoomModel>(
            r#"
            SELECT id, name, description, user_id, creator_name, created_at, updated_at
            FROM rooms
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Room::from).collect())
    }
}
