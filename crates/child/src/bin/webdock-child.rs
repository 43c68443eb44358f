//! The embedded-browser child process entry point.
//!
//! Launched by the host with two arguments: the host service's port (where
//! our `operationCall`s go) and our own listen port (where the host delivers
//! callbacks). This binary wires the bridge halves together and keeps the
//! process alive; the embedded-browser integration registers its global
//! functions on top of the [`ApiProxy`] it gets from here.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use webdock_child::{ApiProxy, ChildService, global_function_names};
use webdock_runtime::{BridgeClient, BridgeListener, CallbackRegistry, ServiceHandler};

const HOST_READY_TIMEOUT: Duration = Duration::from_secs(3);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let host_port: u16 = args
        .next()
        .context("missing host port argument")?
        .parse()
        .context("host port is not a valid port number")?;
    let child_port: u16 = args
        .next()
        .context("missing child port argument")?
        .parse()
        .context("child port is not a valid port number")?;

    let registry = Arc::new(CallbackRegistry::new());

    // Bind our callback service before dialing out, so the host can deliver
    // from the moment our first call reaches it.
    let service = Arc::new(ChildService::new(Arc::clone(&registry)));
    let _listener = BridgeListener::bind(child_port, service as Arc<dyn ServiceHandler>)
        .await
        .context("failed to bind callback service")?;

    let client = BridgeClient::connect(host_port, HOST_READY_TIMEOUT)
        .await
        .context("failed to reach the host service")?;
    let proxy = ApiProxy::new(Arc::new(client), registry);

    tracing::info!(
        host_port,
        child_port,
        functions = global_function_names().count(),
        "bridge child ready"
    );

    tokio::signal::ctrl_c()
        .await
        .context("failed to wait for shutdown signal")?;

    // Nothing will ever resume these; drop them loudly rather than silently.
    proxy.registry().clear();
    Ok(())
}
