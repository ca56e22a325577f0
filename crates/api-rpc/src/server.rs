//! JSON-RPC Server
//!
//! Implements the JSON-RPC 2.0 server over TCP.

use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use std::sync::Arc;
use tracing::info;

use presync_core::application::delivery::DeliveryHandler;
use presync_core::application::status_event::StatusEventService;
use presync_core::port::SchedulerIdentityVerifier;

use crate::handler::RpcHandler;
use crate::types::{CreateRequest, DeleteRequest, DeliverRequest, ListRequest, UpdateRequest};

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9725;

/// RPC Server Configuration
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(
        config: RpcServerConfig,
        service: Arc<StatusEventService>,
        delivery: Arc<DeliveryHandler>,
        verifier: Arc<dyn SchedulerIdentityVerifier>,
    ) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(service, delivery, verifier)),
        }
    }

    /// Start the JSON-RPC server
    pub async fn start(self) -> Result<ServerHandle, String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;

        let mut module = RpcModule::new(());

        let handler = self.handler.clone();
        module
            .register_async_method("status.create.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: CreateRequest = params.parse()?;
                    handler.create(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("status.update.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: UpdateRequest = params.parse()?;
                    handler.update(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("status.delete.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: DeleteRequest = params.parse()?;
                    handler.delete(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("status.list.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: ListRequest = params.parse()?;
                    handler.list(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("delivery.fire.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: DeliverRequest = params.parse()?;
                    handler.deliver(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        info!("JSON-RPC server started successfully");

        let handle = server.start(module);
        Ok(handle)
    }
}
