// SQLite StatusEventRepository Implementation

use async_trait::async_trait;
use chrono::DateTime;
use sqlx::SqlitePool;

use presync_core::domain::{EmojiRef, EventWindow, StatusEvent, StatusEventId};
use presync_core::error::{AppError, Result};
use presync_core::port::StatusEventRepository;

use crate::map_sqlx_error;

pub struct SqliteStatusEventRepository {
    pool: SqlitePool,
}

impl SqliteStatusEventRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct StatusEventRow {
    id: String,
    owner_id: String,
    calendar_id: String,
    source_event_id: String,
    start_at: i64,
    end_at: i64,
    status_text: String,
    emoji_name: Option<String>,
    emoji_asset_path: Option<String>,
    delivery_handle: Option<String>,
    pending_schedule: i64,
    created_at: i64,
}

impl StatusEventRow {
    fn into_domain(self) -> Result<StatusEvent> {
        let start = DateTime::from_timestamp_millis(self.start_at)
            .ok_or_else(|| AppError::Database(format!("Bad start_at: {}", self.start_at)))?;
        let end = DateTime::from_timestamp_millis(self.end_at)
            .ok_or_else(|| AppError::Database(format!("Bad end_at: {}", self.end_at)))?;
        let window = EventWindow::new(start, end)?;

        let status_emoji = self.emoji_name.map(|name| EmojiRef {
            name,
            asset_path: self.emoji_asset_path,
        });

        Ok(StatusEvent {
            id: self.id,
            owner_id: self.owner_id,
            calendar_id: self.calendar_id,
            source_event_id: self.source_event_id,
            window,
            status_text: self.status_text,
            status_emoji,
            delivery_handle: self.delivery_handle,
            pending_schedule: self.pending_schedule != 0,
            created_at: self.created_at,
        })
    }
}

#[async_trait]
impl StatusEventRepository for SqliteStatusEventRepository {
    async fn insert(&self, event: &StatusEvent) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO status_events (
                id, owner_id, calendar_id, source_event_id,
                start_at, end_at, status_text,
                emoji_name, emoji_asset_path,
                delivery_handle, pending_schedule, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&event.id)
        .bind(&event.owner_id)
        .bind(&event.calendar_id)
        .bind(&event.source_event_id)
        .bind(event.window.start().timestamp_millis())
        .bind(event.window.end().timestamp_millis())
        .bind(&event.status_text)
        .bind(event.status_emoji.as_ref().map(|e| e.name.as_str()))
        .bind(
            event
                .status_emoji
                .as_ref()
                .and_then(|e| e.asset_path.as_deref()),
        )
        .bind(&event.delivery_handle)
        .bind(if event.pending_schedule { 1 } else { 0 })
        .bind(event.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &StatusEventId) -> Result<Option<StatusEvent>> {
        let row =
            sqlx::query_as::<_, StatusEventRow>("SELECT * FROM status_events WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        row.map(StatusEventRow::into_domain).transpose()
    }

    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<StatusEvent>> {
        let rows = sqlx::query_as::<_, StatusEventRow>(
            "SELECT * FROM status_events WHERE owner_id = ? ORDER BY start_at ASC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(StatusEventRow::into_domain).collect()
    }

    async fn update_content(
        &self,
        id: &StatusEventId,
        status_text: &str,
        status_emoji: Option<&EmojiRef>,
    ) -> Result<()> {
        let result = sqlx::query(
            "UPDATE status_events SET status_text = ?, emoji_name = ?, emoji_asset_path = ? WHERE id = ?",
        )
        .bind(status_text)
        .bind(status_emoji.map(|e| e.name.as_str()))
        .bind(status_emoji.and_then(|e| e.asset_path.as_deref()))
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Status event {} not found", id)));
        }
        Ok(())
    }

    async fn set_delivery_handle(&self, id: &StatusEventId, handle: &str) -> Result<()> {
        let result = sqlx::query(
            "UPDATE status_events SET delivery_handle = ?, pending_schedule = 0 WHERE id = ?",
        )
        .bind(handle)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Status event {} not found", id)));
        }
        Ok(())
    }

    async fn clear_delivery_handle(&self, id: &StatusEventId) -> Result<()> {
        sqlx::query("UPDATE status_events SET delivery_handle = NULL WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn delete(&self, id: &StatusEventId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM status_events WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};
    use chrono::{TimeZone, Utc};

    async fn repo() -> SqliteStatusEventRepository {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteStatusEventRepository::new(pool)
    }

    fn event(id: &str, owner: &str) -> StatusEvent {
        let window = EventWindow::new(
            Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 1, 17, 0, 0).unwrap(),
        )
        .unwrap();
        StatusEvent::new(
            id,
            1000,
            owner,
            "cal-1",
            "gcal-evt-1",
            window,
            "In a meeting",
            Some(EmojiRef::new("calendar")),
        )
    }

    #[tokio::test]
    async fn test_insert_and_find_round_trip() {
        let repo = repo().await;
        let event = event("ev-1", "user-1");
        repo.insert(&event).await.unwrap();

        let found = repo.find_by_id(&"ev-1".to_string()).await.unwrap().unwrap();
        assert_eq!(found.owner_id, "user-1");
        assert_eq!(found.window, event.window);
        assert_eq!(found.status_emoji, event.status_emoji);
        assert!(found.pending_schedule);
        assert_eq!(found.delivery_handle, None);
    }

    #[tokio::test]
    async fn test_set_delivery_handle_clears_pending() {
        let repo = repo().await;
        repo.insert(&event("ev-1", "user-1")).await.unwrap();

        repo.set_delivery_handle(&"ev-1".to_string(), "task-1")
            .await
            .unwrap();

        let found = repo.find_by_id(&"ev-1".to_string()).await.unwrap().unwrap();
        assert_eq!(found.delivery_handle.as_deref(), Some("task-1"));
        assert!(!found.pending_schedule);
    }

    #[tokio::test]
    async fn test_update_content_leaves_window() {
        let repo = repo().await;
        let original = event("ev-1", "user-1");
        repo.insert(&original).await.unwrap();

        repo.update_content(&"ev-1".to_string(), "Focus time", None)
            .await
            .unwrap();

        let found = repo.find_by_id(&"ev-1".to_string()).await.unwrap().unwrap();
        assert_eq!(found.status_text, "Focus time");
        assert_eq!(found.status_emoji, None);
        assert_eq!(found.window, original.window);
    }

    #[tokio::test]
    async fn test_find_by_owner_ordering() {
        let repo = repo().await;
        repo.insert(&event("ev-1", "user-1")).await.unwrap();
        repo.insert(&event("ev-2", "user-1")).await.unwrap();
        repo.insert(&event("ev-3", "user-2")).await.unwrap();

        let events = repo.find_by_owner("user-1").await.unwrap();
        assert_eq!(events.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_returns_existence() {
        let repo = repo().await;
        repo.insert(&event("ev-1", "user-1")).await.unwrap();

        assert!(repo.delete(&"ev-1".to_string()).await.unwrap());
        assert!(!repo.delete(&"ev-1".to_string()).await.unwrap());
        assert!(repo.find_by_id(&"ev-1".to_string()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = repo().await;
        let err = repo
            .update_content(&"ev-x".to_string(), "text", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
