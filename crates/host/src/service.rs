//! Host-side bridge service body.
//!
//! Runs on the network task. It never executes an operation inline - the
//! handler may need the main thread and could hold the service thread far
//! too long - so every `operationCall` is enqueued and acknowledged
//! immediately. The result, if the caller expects one, travels later through
//! the child-side service keyed by the correlation token.

use std::sync::Arc;

use webdock_protocol::{Ack, BridgeRequest};
use webdock_runtime::{RequestQueue, ServiceHandler};

/// Accepts `operationCall`s and feeds the request queue.
pub struct HostService {
    queue: Arc<RequestQueue>,
}

impl HostService {
    pub fn new(queue: Arc<RequestQueue>) -> Self {
        Self { queue }
    }
}

impl ServiceHandler for HostService {
    fn handle(&self, request: BridgeRequest) -> Ack {
        match request {
            BridgeRequest::OperationCall { name, params } => {
                tracing::debug!(%name, "operation call enqueued");
                self.queue.push(name, params);
                Ack::ok()
            }
            BridgeRequest::CallbackDeliver { token, .. } => {
                tracing::warn!(token, "callbackDeliver sent to host-side service");
                Ack::error("host service only accepts operationCall")
            }
        }
    }
}
