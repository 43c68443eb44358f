//! Child-side bridge service body.
//!
//! Receives `callbackDeliver`s from the host and resumes the parked call
//! site, if it is still there. A reply for an unknown token - already
//! consumed, abandoned on navigation, or never registered - is dropped with
//! a log line and still acknowledged: stale delivery is not the host's
//! problem.

use std::sync::Arc;

use webdock_protocol::{Ack, BridgeRequest};
use webdock_runtime::{CallbackRegistry, ServiceHandler};

/// Accepts `callbackDeliver`s and resumes pending call sites.
///
/// `resume` runs on the network task; call sites must hand off into the
/// embedded runtime promptly rather than doing work inline.
pub struct ChildService {
    registry: Arc<CallbackRegistry>,
}

impl ChildService {
    pub fn new(registry: Arc<CallbackRegistry>) -> Self {
        Self { registry }
    }
}

impl ServiceHandler for ChildService {
    fn handle(&self, request: BridgeRequest) -> Ack {
        match request {
            BridgeRequest::CallbackDeliver { token, result } => {
                tracing::debug!(token, "callback delivered");
                if let Some(site) = self.registry.pop(token) {
                    site.resume(&result);
                }
                Ack::ok()
            }
            BridgeRequest::OperationCall { name, .. } => {
                tracing::warn!(%name, "operationCall sent to child-side service");
                Ack::error("child service only accepts callbackDeliver")
            }
        }
    }
}
