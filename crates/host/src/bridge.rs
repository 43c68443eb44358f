//! Bridge lifecycle: ports, listener, child process, client, worker.
//!
//! [`HostBridge::start`] assembles the whole host side in order: bind the
//! host service, pick a port for the child's service, launch the child with
//! both ports, connect the callback client within the readiness window, then
//! start the dispatch worker. A failure at any step tears down what came
//! before it; in particular a connect timeout kills the freshly launched
//! child rather than leaking it.
//!
//! There is no reconnect and no respawn. Once the callback channel latches
//! disconnected the bridge is done for this process's life; the host
//! application decides whether to shut down or carry on without panels.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use webdock_protocol::{BridgeRequest, CorrelationToken};
use webdock_runtime::{
    BridgeClient, BridgeListener, ChildProcess, ConnectionState, MainHandle, RequestQueue, Worker,
    choose_loopback_port,
};

use crate::dispatcher::{Dispatcher, OpContext, ReplySink};
use crate::error::Result;
use crate::frontend::Frontend;
use crate::service::HostService;

const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(3);
const DEFAULT_HANDOFF_TIMEOUT: Duration = Duration::from_secs(5);

/// Everything needed to bring the bridge up.
pub struct BridgeConfig {
    /// Path to the embedded-browser child executable.
    pub child_executable: PathBuf,
    pub frontend: Arc<dyn Frontend>,
    /// Handle onto the host application's UI thread.
    pub main: MainHandle,
    /// Root for downloads and file operations. Defaults to a `webdock`
    /// directory under the platform data dir.
    pub downloads_dir: Option<PathBuf>,
    /// How long to wait for the child's service to come up.
    pub ready_timeout: Duration,
    /// Bounded wait for each main-thread hand-off.
    pub handoff_timeout: Duration,
}

impl BridgeConfig {
    pub fn new(
        child_executable: impl Into<PathBuf>,
        frontend: Arc<dyn Frontend>,
        main: MainHandle,
    ) -> Self {
        Self {
            child_executable: child_executable.into(),
            frontend,
            main,
            downloads_dir: None,
            ready_timeout: DEFAULT_READY_TIMEOUT,
            handoff_timeout: DEFAULT_HANDOFF_TIMEOUT,
        }
    }
}

fn default_downloads_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("webdock")
}

/// Delivers operation results to the child's callback service.
///
/// Runs on the (synchronous) worker thread; each delivery blocks on the
/// async client via the runtime handle captured at start. Delivery failures
/// are logged, never retried - the client's latch already records the broken
/// channel.
struct CallbackSink {
    client: Arc<BridgeClient>,
    runtime: tokio::runtime::Handle,
}

impl ReplySink for CallbackSink {
    fn deliver(&self, token: CorrelationToken, result: &str) {
        let request = BridgeRequest::CallbackDeliver {
            token,
            result: result.to_string(),
        };
        match self.runtime.block_on(self.client.call(&request)) {
            Ok(ack) if !ack.ok => {
                tracing::warn!(token, "callback refused by child: {:?}", ack.error);
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(token, "callback delivery failed: {e}");
            }
        }
    }
}

/// The running host side of the bridge.
pub struct HostBridge {
    listener: BridgeListener,
    client_state: ConnectionState,
    child: Option<ChildProcess>,
    worker: Option<Worker>,
}

impl HostBridge {
    /// Brings the bridge up. Must be called on a tokio runtime; the worker
    /// thread it spawns keeps a handle to that runtime for callback delivery.
    pub async fn start(config: BridgeConfig) -> Result<Self> {
        let downloads_dir = config
            .downloads_dir
            .clone()
            .unwrap_or_else(default_downloads_dir);
        fs::create_dir_all(&downloads_dir)?;

        let queue = Arc::new(RequestQueue::new());
        let service = Arc::new(HostService::new(Arc::clone(&queue)));
        // Port 0: the listener reads back its OS-assigned port, so only the
        // child's port needs the pick-and-release dance.
        let listener = BridgeListener::bind(0, service).await?;
        let child_port = choose_loopback_port()?;

        tracing::info!(
            host_port = listener.port(),
            child_port,
            exe = %config.child_executable.display(),
            "starting bridge child"
        );
        let child =
            ChildProcess::launch(&config.child_executable, listener.port(), child_port).await?;

        let client = match BridgeClient::connect(child_port, config.ready_timeout).await {
            Ok(client) => Arc::new(client),
            Err(e) => {
                // Don't leak a child that never answered.
                let _ = child.kill().await;
                return Err(e.into());
            }
        };
        let client_state = client.state();

        let ctx = Arc::new(OpContext {
            frontend: Arc::clone(&config.frontend),
            main: config.main.clone(),
            downloads_dir,
            handoff_timeout: config.handoff_timeout,
        });
        let sink = Arc::new(CallbackSink {
            client,
            runtime: tokio::runtime::Handle::current(),
        });
        let dispatcher = Dispatcher::new(ctx, sink as Arc<dyn ReplySink>);
        let worker = Worker::spawn(queue, move |entry| dispatcher.execute(entry))?;

        Ok(Self {
            listener,
            client_state,
            child: Some(child),
            worker: Some(worker),
        })
    }

    /// The port the host service listens on.
    pub fn port(&self) -> u16 {
        self.listener.port()
    }

    /// Whether the callback channel to the child is still usable.
    pub fn is_connected(&self) -> bool {
        self.client_state.is_connected()
    }

    /// Stops the worker and terminates the child. Queued entries drained
    /// before the stop still execute; anything pushed after is dropped with
    /// the queue.
    pub async fn shutdown(mut self) {
        if let Some(worker) = self.worker.take() {
            worker.stop();
        }
        if let Some(child) = self.child.take() {
            if let Err(e) = child.kill().await {
                tracing::warn!("child termination failed: {e}");
            }
        }
    }
}
