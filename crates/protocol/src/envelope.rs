//! Request envelope and acknowledgement types.
//!
//! The bridge runs two independent one-method services, one per direction:
//! the host serves `operationCall`, the child serves `callbackDeliver`. Both
//! are unary request/response; the acknowledgement carries no payload. A
//! call's JSON result, when one is expected, travels later through the
//! opposite direction's service keyed by the correlation token - never as
//! the RPC response itself, so a service thread is never held hostage by a
//! slow handler.

use serde::{Deserialize, Serialize};

use crate::args::CorrelationToken;

/// A request frame, tagged by method name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum BridgeRequest {
    /// Host-side method: run the named operation with encoded parameters.
    ///
    /// `params` is the JSON object produced by the argument codec, carried
    /// as a string so the envelope never has to understand it.
    #[serde(rename = "operationCall")]
    OperationCall { name: String, params: String },

    /// Child-side method: deliver a finished operation's result to the
    /// pending caller identified by `token`.
    #[serde(rename = "callbackDeliver")]
    CallbackDeliver {
        token: CorrelationToken,
        result: String,
    },
}

impl BridgeRequest {
    /// Stable numeric identifier for the method, for logging and metrics.
    pub fn method_id(&self) -> u32 {
        match self {
            BridgeRequest::OperationCall { .. } => 1,
            BridgeRequest::CallbackDeliver { .. } => 2,
        }
    }

    /// Wire-level method name.
    pub fn method_name(&self) -> &'static str {
        match self {
            BridgeRequest::OperationCall { .. } => "operationCall",
            BridgeRequest::CallbackDeliver { .. } => "callbackDeliver",
        }
    }
}

/// Acknowledgement returned for every request frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Ack {
    pub fn ok() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(message.into()),
        }
    }
}
