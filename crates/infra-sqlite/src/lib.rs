// Presync Infrastructure - SQLite Adapter
// Implements: StatusEventRepository, DeliveryRepository, CredentialStore

mod connection;
mod credential_store_impl;
mod delivery_repository;
mod migration;
mod status_event_repository;

pub use connection::create_pool;
pub use credential_store_impl::SqliteCredentialStore;
pub use delivery_repository::SqliteDeliveryRepository;
pub use migration::run_migrations;
pub use status_event_repository::SqliteStatusEventRepository;

use presync_core::error::AppError;

// sqlx::Error cannot implement From for AppError here (orphan rules), so a
// shared helper does the mapping with SQLite code awareness.
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                let code_str = code.as_ref();
                // SQLite error codes: https://www.sqlite.org/rescode.html
                match code_str {
                    "2067" | "1555" => AppError::Database(format!(
                        "Unique constraint violation: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    "5" => AppError::Database(format!(
                        "Database locked (SQLITE_BUSY): {}",
                        db_err.message()
                    )),
                    "13" => AppError::Database(format!("Database full: {}", db_err.message())),
                    _ => AppError::Database(format!(
                        "Database error [{}]: {}",
                        code_str,
                        db_err.message()
                    )),
                }
            } else {
                AppError::Database(format!("Database error: {}", db_err.message()))
            }
        }
        sqlx::Error::RowNotFound => AppError::Database("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => AppError::Database(format!("Column not found: {}", col)),
        _ => AppError::Database(err.to_string()),
    }
}
