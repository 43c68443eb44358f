//! Wire types for the webdock bridge protocol.
//!
//! This crate contains the serde-serializable types exchanged between the
//! host process and the embedded-browser child process. These types represent
//! the "protocol layer" - the shapes of data as they appear on the wire.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! - **Pure data**: No behavior beyond serialization/deserialization and
//!   positional argument packing
//! - **Shared**: Both processes depend on this crate, so the operation
//!   catalogue and the envelope can never drift apart
//! - **Stable**: Changes only when the wire protocol changes
//!
//! The transport, queueing, and dispatch machinery lives in `webdock-runtime`
//! and the process-specific crates on top of it.

pub mod api;
pub mod args;
pub mod envelope;

pub use api::ApiMethod;
pub use args::{Arg, CorrelationToken, FIRE_AND_FORGET, Params, encode_args};
pub use envelope::{Ack, BridgeRequest};
