//! RPC Method Handlers
//!
//! Implements the business logic for each JSON-RPC method.

use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;
use tracing::debug;

use presync_core::application::delivery::{DeliveryHandler, DeliveryOutcome};
use presync_core::application::status_event::{
    CreateStatusEvent, StatusEventService, UpdateStatusEvent,
};
use presync_core::domain::{parse_instant, EmojiRef};
use presync_core::error::AppError;
use presync_core::port::SchedulerIdentityVerifier;

use crate::error::{throttled, to_rpc_error};
use crate::rate_limiter::RateLimiter;
use crate::types::{
    CreateRequest, DeleteRequest, DeleteResponse, DeliverRequest, DeliverResponse, EmojiDto,
    ListRequest, ListResponse, StatusEventDto, UpdateRequest,
};

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    service: Arc<StatusEventService>,
    delivery: Arc<DeliveryHandler>,
    verifier: Arc<dyn SchedulerIdentityVerifier>,
    rate_limiter: RateLimiter,
}

impl RpcHandler {
    pub fn new(
        service: Arc<StatusEventService>,
        delivery: Arc<DeliveryHandler>,
        verifier: Arc<dyn SchedulerIdentityVerifier>,
    ) -> Self {
        // Default: 200 burst, 100 req/sec (configurable via env)
        let max_burst: u32 = std::env::var("PRESYNC_RATE_LIMIT_BURST")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(200);

        let rate_per_sec: u32 = std::env::var("PRESYNC_RATE_LIMIT_RATE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(100);

        Self {
            service,
            delivery,
            verifier,
            rate_limiter: RateLimiter::new(max_burst, rate_per_sec),
        }
    }

    fn admit(&self) -> Result<(), ErrorObjectOwned> {
        if self.rate_limiter.check() {
            Ok(())
        } else {
            Err(throttled())
        }
    }

    /// status.create.v1
    pub async fn create(&self, params: CreateRequest) -> Result<StatusEventDto, ErrorObjectOwned> {
        self.admit()?;

        let start = parse_instant(&params.start)
            .map_err(|e| to_rpc_error(AppError::Domain(e)))?;
        let end = parse_instant(&params.end).map_err(|e| to_rpc_error(AppError::Domain(e)))?;

        let event = self
            .service
            .create(CreateStatusEvent {
                owner_id: params.owner_id,
                calendar_id: params.calendar_id,
                source_event_id: params.event_id,
                start,
                end,
                status_text: params.status_text,
                status_emoji: params.status_emoji.map(emoji_from_dto),
            })
            .await
            .map_err(to_rpc_error)?;

        Ok(event.into())
    }

    /// status.update.v1
    pub async fn update(&self, params: UpdateRequest) -> Result<StatusEventDto, ErrorObjectOwned> {
        self.admit()?;

        let event = self
            .service
            .update(UpdateStatusEvent {
                status_event_id: params.status_event_id,
                status_text: params.status_text,
                status_emoji: params.status_emoji.map(emoji_from_dto),
            })
            .await
            .map_err(to_rpc_error)?;

        Ok(event.into())
    }

    /// status.delete.v1
    pub async fn delete(&self, params: DeleteRequest) -> Result<DeleteResponse, ErrorObjectOwned> {
        self.admit()?;

        self.service
            .delete(&params.status_event_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(DeleteResponse {
            status_event_id: params.status_event_id,
            deleted: true,
        })
    }

    /// status.list.v1
    pub async fn list(&self, params: ListRequest) -> Result<ListResponse, ErrorObjectOwned> {
        self.admit()?;

        let events = self
            .service
            .list(&params.owner_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(ListResponse {
            events: events.into_iter().map(StatusEventDto::from).collect(),
        })
    }

    /// delivery.fire.v1 (service identity only)
    pub async fn deliver(
        &self,
        params: DeliverRequest,
    ) -> Result<DeliverResponse, ErrorObjectOwned> {
        self.admit()?;

        // The callback must come from the external scheduler itself, not an
        // end user with a valid session.
        self.verifier
            .verify(&params.service_token)
            .map_err(to_rpc_error)?;

        debug!(status_event_id = %params.status_event_id, "Delivery callback received");

        let outcome = self
            .delivery
            .deliver(&params.status_event_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(DeliverResponse {
            status_event_id: params.status_event_id,
            outcome: match outcome {
                DeliveryOutcome::Applied => "APPLIED".to_string(),
                DeliveryOutcome::AlreadyGone => "ALREADY_GONE".to_string(),
            },
        })
    }
}

fn emoji_from_dto(dto: EmojiDto) -> EmojiRef {
    EmojiRef {
        name: dto.name,
        asset_path: dto.asset_path,
    }
}
