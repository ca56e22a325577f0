//! Shared test harness: real sqlite repositories over `:memory:`, fake
//! external services (task queue, presence API), pinned clock.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use presync_core::application::status_event::CreateStatusEvent;
use presync_core::application::{DeliveryHandler, DeliveryScheduler, StatusEventService};
use presync_core::domain::EmojiRef;
use presync_core::error::{AppError, Result};
use presync_core::port::{
    CredentialStore, IdProvider, PresenceClient, PresenceCredential, PresenceStatus, TaskQueue,
    TimeProvider,
};
use presync_infra_sqlite::{
    create_pool, run_migrations, SqliteCredentialStore, SqliteDeliveryRepository,
    SqliteStatusEventRepository,
};

/// 2025-01-01T00:00:00Z in epoch ms
pub const NOW_MS: i64 = 1_735_689_600_000;
/// 2025-01-01T17:00:00Z in unix seconds (window end)
pub const MEETING_EXPIRES_UNIX: i64 = 1_735_750_800;

pub struct FrozenClock;

impl TimeProvider for FrozenClock {
    fn now_millis(&self) -> i64 {
        NOW_MS
    }
}

pub struct SequentialIds {
    counter: AtomicUsize,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self {
            counter: AtomicUsize::new(0),
        }
    }
}

impl IdProvider for SequentialIds {
    fn generate_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        format!("ev-{}", n)
    }
}

/// Fake external task-delivery service. Records every enqueue and cancel;
/// can be flipped into failure modes per test.
pub struct FakeTaskQueue {
    pub enqueued: Mutex<Vec<(String, serde_json::Value, DateTime<Utc>)>>,
    pub cancelled: Mutex<Vec<String>>,
    pub fail_enqueue: AtomicBool,
    pub fail_cancel: AtomicBool,
    counter: AtomicUsize,
}

impl FakeTaskQueue {
    pub fn new() -> Self {
        Self {
            enqueued: Mutex::new(Vec::new()),
            cancelled: Mutex::new(Vec::new()),
            fail_enqueue: AtomicBool::new(false),
            fail_cancel: AtomicBool::new(false),
            counter: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TaskQueue for FakeTaskQueue {
    async fn enqueue(
        &self,
        target_url: &str,
        payload: &serde_json::Value,
        fires_at: DateTime<Utc>,
    ) -> Result<String> {
        if self.fail_enqueue.load(Ordering::SeqCst) {
            return Err(AppError::Scheduling("queue unavailable".to_string()));
        }
        self.enqueued
            .lock()
            .unwrap()
            .push((target_url.to_string(), payload.clone(), fires_at));
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        Ok(format!("task-{}", n))
    }

    async fn cancel(&self, handle: &str) -> Result<()> {
        if self.fail_cancel.load(Ordering::SeqCst) {
            return Err(AppError::Cancellation("unknown handle".to_string()));
        }
        self.cancelled.lock().unwrap().push(handle.to_string());
        Ok(())
    }
}

/// Fake presence API. Records the exact payload pushed per credential.
pub struct RecordingPresence {
    pub pushes: Mutex<Vec<(String, PresenceStatus)>>,
    pub reject: AtomicBool,
}

impl RecordingPresence {
    pub fn new() -> Self {
        Self {
            pushes: Mutex::new(Vec::new()),
            reject: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl PresenceClient for RecordingPresence {
    async fn set_status(
        &self,
        credential: &PresenceCredential,
        status: &PresenceStatus,
    ) -> Result<()> {
        if self.reject.load(Ordering::SeqCst) {
            return Err(AppError::DeliveryRejected("invalid_auth".to_string()));
        }
        self.pushes
            .lock()
            .unwrap()
            .push((credential.access_token.clone(), status.clone()));
        Ok(())
    }
}

/// Fully wired application over in-memory sqlite
pub struct TestApp {
    pub service: Arc<StatusEventService>,
    pub delivery: DeliveryHandler,
    pub status_events: Arc<SqliteStatusEventRepository>,
    pub deliveries: Arc<SqliteDeliveryRepository>,
    pub credentials: Arc<SqliteCredentialStore>,
    pub task_queue: Arc<FakeTaskQueue>,
    pub presence: Arc<RecordingPresence>,
}

pub async fn test_app() -> TestApp {
    let pool = create_pool(":memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();

    let time_provider = Arc::new(FrozenClock);
    let status_events = Arc::new(SqliteStatusEventRepository::new(pool.clone()));
    let deliveries = Arc::new(SqliteDeliveryRepository::new(pool.clone()));
    let credentials = Arc::new(SqliteCredentialStore::new(
        pool.clone(),
        time_provider.clone(),
    ));

    let task_queue = Arc::new(FakeTaskQueue::new());
    let presence = Arc::new(RecordingPresence::new());

    let scheduler = Arc::new(DeliveryScheduler::new(
        task_queue.clone(),
        time_provider.clone(),
        "https://presync.example.com",
    ));

    let service = Arc::new(StatusEventService::new(
        status_events.clone(),
        deliveries.clone(),
        scheduler,
        Arc::new(SequentialIds::new()),
        time_provider.clone(),
    ));

    let delivery = DeliveryHandler::new(
        status_events.clone(),
        deliveries.clone(),
        credentials.clone(),
        presence.clone(),
        time_provider,
    );

    TestApp {
        service,
        delivery,
        status_events,
        deliveries,
        credentials,
        task_queue,
        presence,
    }
}

impl TestApp {
    /// Link a presence credential for `owner_id`
    pub async fn link_credential(&self, owner_id: &str, token: &str) {
        self.credentials
            .link_presence_credential(&PresenceCredential {
                owner_id: owner_id.to_string(),
                access_token: token.to_string(),
            })
            .await
            .unwrap();
    }
}

pub fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

/// A typical request: meeting 09:00-17:00 UTC on 2025-01-01
pub fn meeting_request(owner_id: &str) -> CreateStatusEvent {
    CreateStatusEvent {
        owner_id: owner_id.to_string(),
        calendar_id: "primary".to_string(),
        source_event_id: "gcal-evt-1".to_string(),
        start: utc(2025, 1, 1, 9, 0),
        end: utc(2025, 1, 1, 17, 0),
        status_text: "In a meeting".to_string(),
        status_emoji: Some(EmojiRef::new("calendar")),
    }
}
