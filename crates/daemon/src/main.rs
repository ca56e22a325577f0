//! Presync - Main Entry Point
//!
//! Wires the status-event service, the delivery handler and the JSON-RPC
//! server together and runs until Ctrl+C.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use presync_api_rpc::{server::RpcServerConfig, RpcServer};
use presync_core::application::{DeliveryHandler, DeliveryScheduler, StatusEventService};
use presync_core::port::id_provider::UuidProvider;
use presync_core::port::time_provider::SystemTimeProvider;
use presync_core::port::StaticTokenVerifier;
use presync_infra_http::{HttpTaskQueue, SlackPresenceClient, TaskQueueConfig};
use presync_infra_sqlite::{
    create_pool, run_migrations, SqliteCredentialStore, SqliteDeliveryRepository,
    SqliteStatusEventRepository,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_DB_PATH: &str = "~/.presync/presync.db";
const DEFAULT_QUEUE: &str = "presync-deliveries";

fn required_env(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| anyhow::anyhow!("Missing required environment variable {key}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    let log_format = std::env::var("PRESYNC_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("presync=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("Presync v{} starting...", VERSION);

    // 2. Load configuration
    let db_path = std::env::var("PRESYNC_DB_PATH")
        .unwrap_or_else(|_| shellexpand::tilde(DEFAULT_DB_PATH).into_owned());

    let rpc_port: u16 = std::env::var("PRESYNC_RPC_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(9725);

    let task_queue_config = TaskQueueConfig {
        base_url: required_env("PRESYNC_TASK_QUEUE_URL")?,
        queue: std::env::var("PRESYNC_TASK_QUEUE_NAME").unwrap_or_else(|_| DEFAULT_QUEUE.into()),
        auth_token: required_env("PRESYNC_TASK_QUEUE_TOKEN")?,
        caller_identity: required_env("PRESYNC_CALLER_IDENTITY")?,
    };

    let callback_base_url = required_env("PRESYNC_CALLBACK_BASE_URL")?;
    let service_token = required_env("PRESYNC_SERVICE_TOKEN")?;
    let presence_api_url = std::env::var("PRESYNC_PRESENCE_API_URL").ok();

    info!(db_path = %db_path, "Initializing database...");

    // 3. Initialize database
    let pool = create_pool(&db_path)
        .await
        .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
    run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    // 4. Setup dependencies (DI wiring)
    let time_provider = Arc::new(SystemTimeProvider);
    let id_provider = Arc::new(UuidProvider);

    let status_event_repo = Arc::new(SqliteStatusEventRepository::new(pool.clone()));
    let delivery_repo = Arc::new(SqliteDeliveryRepository::new(pool.clone()));
    let credential_store = Arc::new(SqliteCredentialStore::new(
        pool.clone(),
        time_provider.clone(),
    ));

    let task_queue = Arc::new(HttpTaskQueue::new(task_queue_config));
    let presence_client = Arc::new(SlackPresenceClient::new(presence_api_url));

    let scheduler = Arc::new(DeliveryScheduler::new(
        task_queue,
        time_provider.clone(),
        callback_base_url,
    ));

    let service = Arc::new(StatusEventService::new(
        status_event_repo.clone(),
        delivery_repo.clone(),
        scheduler,
        id_provider,
        time_provider.clone(),
    ));

    let delivery_handler = Arc::new(DeliveryHandler::new(
        status_event_repo,
        delivery_repo,
        credential_store,
        presence_client,
        time_provider,
    ));

    let verifier = Arc::new(StaticTokenVerifier::new(service_token));

    // 5. Start JSON-RPC server
    info!("Starting JSON-RPC server...");
    let rpc_config = RpcServerConfig {
        port: rpc_port,
        ..Default::default()
    };
    let rpc_server = RpcServer::new(rpc_config, service, delivery_handler, verifier);
    let rpc_handle = rpc_server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    info!("System ready. Waiting for requests...");
    info!("Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 7. Graceful shutdown
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    rpc_handle.stopped().await;

    info!("Shutdown complete.");

    Ok(())
}
