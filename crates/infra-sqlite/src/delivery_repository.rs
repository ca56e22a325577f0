// SQLite DeliveryRepository Implementation

use async_trait::async_trait;
use sqlx::SqlitePool;

use presync_core::domain::{DeliveryRecord, DeliveryState, StatusEventId};
use presync_core::error::{AppError, Result};
use presync_core::port::DeliveryRepository;

use crate::map_sqlx_error;

pub struct SqliteDeliveryRepository {
    pool: SqlitePool,
}

impl SqliteDeliveryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct DeliveryRow {
    handle: String,
    status_event_id: String,
    owner_id: String,
    scheduled_at: i64,
    state: String,
    created_at: i64,
    finished_at: Option<i64>,
}

impl DeliveryRow {
    fn into_domain(self) -> Result<DeliveryRecord> {
        let state: DeliveryState = self
            .state
            .parse()
            .map_err(|e: presync_core::domain::DomainError| AppError::Database(e.to_string()))?;

        Ok(DeliveryRecord {
            handle: self.handle,
            status_event_id: self.status_event_id,
            owner_id: self.owner_id,
            scheduled_at: self.scheduled_at,
            state,
            created_at: self.created_at,
            finished_at: self.finished_at,
        })
    }
}

#[async_trait]
impl DeliveryRepository for SqliteDeliveryRepository {
    async fn insert(&self, record: &DeliveryRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO deliveries (
                handle, status_event_id, owner_id,
                scheduled_at, state, created_at, finished_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.handle)
        .bind(&record.status_event_id)
        .bind(&record.owner_id)
        .bind(record.scheduled_at)
        .bind(record.state.to_string())
        .bind(record.created_at)
        .bind(record.finished_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_by_status_event(
        &self,
        status_event_id: &StatusEventId,
    ) -> Result<Option<DeliveryRecord>> {
        let row = sqlx::query_as::<_, DeliveryRow>(
            "SELECT * FROM deliveries WHERE status_event_id = ? ORDER BY created_at DESC LIMIT 1",
        )
        .bind(status_event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(DeliveryRow::into_domain).transpose()
    }

    async fn update_state(
        &self,
        handle: &str,
        state: DeliveryState,
        finished_at: Option<i64>,
    ) -> Result<()> {
        let result = sqlx::query("UPDATE deliveries SET state = ?, finished_at = ? WHERE handle = ?")
            .bind(state.to_string())
            .bind(finished_at)
            .bind(handle)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Delivery record {} not found",
                handle
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};

    async fn repo() -> SqliteDeliveryRepository {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteDeliveryRepository::new(pool)
    }

    #[tokio::test]
    async fn test_insert_and_find_round_trip() {
        let repo = repo().await;
        let record = DeliveryRecord::new("task-1", "ev-1", "user-1", 5000, 1000);
        repo.insert(&record).await.unwrap();

        let found = repo
            .find_by_status_event(&"ev-1".to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.handle, "task-1");
        assert_eq!(found.state, DeliveryState::Queued);
        assert_eq!(found.scheduled_at, 5000);
    }

    #[tokio::test]
    async fn test_update_state() {
        let repo = repo().await;
        repo.insert(&DeliveryRecord::new("task-1", "ev-1", "user-1", 5000, 1000))
            .await
            .unwrap();

        repo.update_state("task-1", DeliveryState::Delivered, Some(6000))
            .await
            .unwrap();

        let found = repo
            .find_by_status_event(&"ev-1".to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.state, DeliveryState::Delivered);
        assert_eq!(found.finished_at, Some(6000));
    }

    #[tokio::test]
    async fn test_update_unknown_handle_is_not_found() {
        let repo = repo().await;
        let err = repo
            .update_state("task-x", DeliveryState::Cancelled, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
