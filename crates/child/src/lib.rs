//! Child side of the webdock bridge.
//!
//! Lives inside the embedded-browser process. The two halves:
//!
//! - [`proxy::ApiProxy`] - issues `operationCall`s to the host, assigning a
//!   correlation token per reply-expecting call and parking the call site in
//!   the registry
//! - [`service::ChildService`] - receives `callbackDeliver`s from the host
//!   and resumes the matching parked call site
//!
//! The embedded runtime integration (registering one global JS function per
//! [`ApiMethod`](webdock_protocol::ApiMethod) and capturing call contexts as
//! [`CallSite`](webdock_runtime::CallSite)s) sits above this crate; the
//! `webdock-child` binary wires both halves to the ports the host passed on
//! the command line.

pub mod proxy;
pub mod service;

pub use proxy::{ApiProxy, global_function_names};
pub use service::ChildService;
