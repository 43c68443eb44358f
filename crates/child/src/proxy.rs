//! Operation proxy - the child's calling half.
//!
//! One [`ApiProxy::invoke`] per native operation the embedded runtime wants
//! to run. A call that expects a result parks its [`CallSite`] in the
//! registry first, so the token is already resolvable by the time the host
//! could possibly answer; if the call never makes it onto the wire the token
//! is abandoned again rather than left to leak.

use std::sync::Arc;

use webdock_protocol::{Ack, ApiMethod, Arg, BridgeRequest, CorrelationToken, FIRE_AND_FORGET, encode_args};
use webdock_runtime::{BridgeClient, CallSite, CallbackRegistry, Error, Result};

/// The wire names the embedded runtime should expose as global functions,
/// in stable id order.
pub fn global_function_names() -> impl Iterator<Item = &'static str> {
    ApiMethod::ALL.into_iter().map(ApiMethod::name)
}

/// Issues `operationCall`s to the host service.
pub struct ApiProxy {
    client: Arc<BridgeClient>,
    registry: Arc<CallbackRegistry>,
}

impl ApiProxy {
    pub fn new(client: Arc<BridgeClient>, registry: Arc<CallbackRegistry>) -> Self {
        Self { client, registry }
    }

    /// The registry replies are resolved against; shared with the
    /// [`ChildService`](crate::ChildService).
    pub fn registry(&self) -> &Arc<CallbackRegistry> {
        &self.registry
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_connected()
    }

    /// Invokes one native operation.
    ///
    /// With a call site the invocation gets a fresh positive token and the
    /// site resumes when the host's `callbackDeliver` arrives; without one
    /// the token is the fire-and-forget sentinel and no reply will ever
    /// come. Returns the token actually used. On any failure to issue the
    /// call the parked site is abandoned - it will never resume.
    pub async fn invoke(
        &self,
        method: ApiMethod,
        args: &[Arg],
        site: Option<Box<dyn CallSite>>,
    ) -> Result<CorrelationToken> {
        let token = match site {
            Some(site) => self.registry.register(site),
            None => FIRE_AND_FORGET,
        };

        let request = BridgeRequest::OperationCall {
            name: method.name().to_string(),
            params: encode_args(token, args).to_string(),
        };

        match self.client.call(&request).await {
            Ok(Ack { ok: true, .. }) => Ok(token),
            Ok(Ack { error, .. }) => {
                self.abandon_if_pending(token);
                Err(Error::Rejected(error.unwrap_or_else(|| {
                    "operation call rejected".to_string()
                })))
            }
            Err(e) => {
                self.abandon_if_pending(token);
                Err(e)
            }
        }
    }

    fn abandon_if_pending(&self, token: CorrelationToken) {
        if token != FIRE_AND_FORGET {
            self.registry.abandon(token);
        }
    }
}
