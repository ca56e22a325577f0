// SQLite CredentialStore Implementation

use async_trait::async_trait;
use sqlx::SqlitePool;

use presync_core::error::Result;
use presync_core::port::{CredentialStore, PresenceCredential, TimeProvider};

use crate::map_sqlx_error;

use std::sync::Arc;

pub struct SqliteCredentialStore {
    pool: SqlitePool,
    time_provider: Arc<dyn TimeProvider>,
}

impl SqliteCredentialStore {
    pub fn new(pool: SqlitePool, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            pool,
            time_provider,
        }
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn find_presence_credential(
        &self,
        owner_id: &str,
    ) -> Result<Option<PresenceCredential>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT access_token FROM presence_credentials WHERE owner_id = ?")
                .bind(owner_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(row.map(|(access_token,)| PresenceCredential {
            owner_id: owner_id.to_string(),
            access_token,
        }))
    }

    async fn link_presence_credential(&self, credential: &PresenceCredential) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO presence_credentials (owner_id, access_token, linked_at)
            VALUES (?, ?, ?)
            ON CONFLICT(owner_id) DO UPDATE SET
                access_token = excluded.access_token,
                linked_at = excluded.linked_at
            "#,
        )
        .bind(&credential.owner_id)
        .bind(&credential.access_token)
        .bind(self.time_provider.now_millis())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};
    use presync_core::port::time_provider::SystemTimeProvider;

    async fn store() -> SqliteCredentialStore {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteCredentialStore::new(pool, Arc::new(SystemTimeProvider))
    }

    #[tokio::test]
    async fn test_unlinked_owner_has_no_credential() {
        let store = store().await;
        assert!(store
            .find_presence_credential("user-1")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_link_and_find() {
        let store = store().await;
        store
            .link_presence_credential(&PresenceCredential {
                owner_id: "user-1".to_string(),
                access_token: "xoxp-1".to_string(),
            })
            .await
            .unwrap();

        let found = store
            .find_presence_credential("user-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.access_token, "xoxp-1");
    }

    #[tokio::test]
    async fn test_relink_replaces_token() {
        let store = store().await;
        for token in ["xoxp-1", "xoxp-2"] {
            store
                .link_presence_credential(&PresenceCredential {
                    owner_id: "user-1".to_string(),
                    access_token: token.to_string(),
                })
                .await
                .unwrap();
        }

        let found = store
            .find_presence_credential("user-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.access_token, "xoxp-2");
    }
}
