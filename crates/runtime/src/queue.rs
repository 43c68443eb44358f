//! Request queue and worker loop.
//!
//! The bridge service's network task pushes `(operation name, raw JSON)`
//! pairs; a single dedicated worker thread drains them and executes each
//! entry in batch order, one at a time. The mutex is held only for the O(1)
//! append and for the swap that takes a whole batch, so a push never waits
//! on a running handler.
//!
//! Ordering: FIFO within a drained batch. Entries pushed by different
//! producers between two drains interleave at batch granularity; there is no
//! global total order across producers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use parking_lot::Mutex;

use crate::error::Result;

/// Idle poll interval for the worker loop. Coarse-grained on purpose; a
/// condition-variable wake-up would remove the delay without changing any
/// observable contract.
const IDLE_POLL: Duration = Duration::from_millis(1);

/// One queued call, immutable once pushed.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueEntry {
    /// Operation name as received on the wire.
    pub name: String,
    /// Encoded parameter object, still unparsed.
    pub raw_json: String,
}

/// Thread-safe FIFO between the network task and the worker thread.
#[derive(Default)]
pub struct RequestQueue {
    entries: Mutex<Vec<QueueEntry>>,
}

impl RequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one entry. O(1) under a short-held lock; never blocks on the
    /// consumer.
    pub fn push(&self, name: impl Into<String>, raw_json: impl Into<String>) {
        self.entries.lock().push(QueueEntry {
            name: name.into(),
            raw_json: raw_json.into(),
        });
    }

    /// Atomically swaps the internal list for an empty one and returns the
    /// batch. Nothing is lost between a push and a drain, and no entry is
    /// ever returned twice.
    pub fn drain(&self) -> Vec<QueueEntry> {
        std::mem::take(&mut *self.entries.lock())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

/// The single dispatch thread draining a [`RequestQueue`].
///
/// Runs for the lifetime of the owning bridge; [`Worker::stop`] (or drop)
/// finishes the current batch and joins the thread.
pub struct Worker {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Spawns the worker loop. `execute` runs on the worker thread, strictly
    /// in batch order, one entry at a time. Fails only if the OS refuses the
    /// thread.
    pub fn spawn<F>(queue: Arc<RequestQueue>, mut execute: F) -> Result<Self>
    where
        F: FnMut(QueueEntry) + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let thread_flag = Arc::clone(&running);

        let handle = std::thread::Builder::new()
            .name("webdock-dispatch".to_string())
            .spawn(move || {
                while thread_flag.load(Ordering::SeqCst) {
                    let batch = queue.drain();
                    if batch.is_empty() {
                        std::thread::sleep(IDLE_POLL);
                        continue;
                    }
                    for entry in batch {
                        execute(entry);
                    }
                }
            })?;

        Ok(Self {
            running,
            handle: Some(handle),
        })
    }

    /// Stops the loop and joins the thread.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
