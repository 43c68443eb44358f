//! Webdock runtime - transport, queueing, and correlation machinery.
//!
//! This crate provides the process-agnostic infrastructure the bridge is
//! built from:
//!
//! - **Transport**: length-prefixed JSON frames over loopback TCP, with a
//!   listener per service and a client per direction
//! - **Request queue**: the thread-safe FIFO and single worker thread that
//!   decouple the network service from operation execution
//! - **Callback registry**: correlation tokens mapped to pending call sites,
//!   consumed exactly once
//! - **Main-thread executor**: bounded-wait hand-off of closures onto the
//!   host's UI thread
//! - **Supervisor**: loopback port selection and child process lifecycle
//!
//! # Architecture
//!
//! ```text
//! child process                      host process
//! ┌──────────────┐  operationCall   ┌──────────────┐
//! │  ApiProxy    ├─────────────────►│ BridgeListener│──► RequestQueue
//! │  (client)    │       ack        │ (service)     │        │ drain
//! └──────────────┘                  └──────────────┘        ▼
//! ┌──────────────┐  callbackDeliver ┌──────────────┐   worker thread
//! │BridgeListener│◄─────────────────┤ BridgeClient  │◄── dispatch result
//! │ (service)    │       ack        │               │
//! └──────┬───────┘                  └──────────────┘
//!        ▼
//!  CallbackRegistry::pop → resume pending JS call site
//! ```
//!
//! The host- and child-specific halves (`webdock-host`, `webdock-child`)
//! assemble these pieces into their respective processes.

pub mod error;
pub mod main_thread;
pub mod queue;
pub mod registry;
pub mod supervisor;
pub mod transport;

pub use error::{Error, Result};
pub use main_thread::{MainHandle, MainLoop, main_executor};
pub use queue::{QueueEntry, RequestQueue, Worker};
pub use registry::{CallSite, CallbackRegistry};
pub use supervisor::{ChildProcess, choose_loopback_port};
pub use transport::{BridgeClient, BridgeListener, ConnectionState, ServiceHandler};
