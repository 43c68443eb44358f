//! Host side of the webdock bridge.
//!
//! Receives `operationCall`s from the embedded-browser child process,
//! executes them against the host application, and delivers results back
//! through the child's `callbackDeliver` service. The moving parts:
//!
//! - [`service::HostService`] - the bridge service body; enqueues and acks
//!   on the network task, never executes inline
//! - [`dispatcher::Dispatcher`] - drains the queue on the worker thread,
//!   decodes parameters, and runs the matched operation
//! - [`ops`] - one handler per [`ApiMethod`], hopping to the main thread
//!   for anything that mutates UI state
//! - [`frontend::Frontend`] - the narrow collaborator interface onto the
//!   host application's panels, media sources, and settings
//! - [`bridge::HostBridge`] - lifecycle wiring: ports, listener, child
//!   process, client, worker
//!
//! [`ApiMethod`]: webdock_protocol::ApiMethod

pub mod bridge;
pub mod dispatcher;
pub mod error;
pub mod frontend;
pub mod ops;
pub mod service;

pub use bridge::{BridgeConfig, HostBridge};
pub use dispatcher::{Dispatcher, OpContext, ReplySink};
pub use error::{Error, Result};
pub use frontend::{Frontend, Geometry, PanelInfo};
pub use service::HostService;
