//! Bounded-wait hand-off onto the host's main (UI) thread.
//!
//! Host mutations may only run on the designated main thread. A handler on
//! the worker thread submits a unit of work through a [`MainHandle`]; the
//! main thread drives the paired [`MainLoop`] and executes it. The hand-off
//! is an explicit message-passing call with a deadline: the submitter blocks
//! until the closure's return value comes back or the wait expires with
//! [`Error::HandoffTimeout`], so a stuck UI operation fails the one call
//! instead of hanging the dispatch queue invisibly. The unit of work returns
//! its result by value; nothing is written through captured references.

use std::sync::mpsc;
use std::time::Duration;

use crate::error::{Error, Result};

type Job = Box<dyn FnOnce() + Send>;

/// Creates a connected handle/loop pair. The loop goes to the UI thread; the
/// handle (cloneable) goes to whoever needs to run work there.
pub fn main_executor() -> (MainHandle, MainLoop) {
    let (tx, rx) = mpsc::channel();
    (MainHandle { tx }, MainLoop { rx })
}

/// Submitting side of the hand-off.
#[derive(Clone)]
pub struct MainHandle {
    tx: mpsc::Sender<Job>,
}

impl MainHandle {
    /// Runs `work` on the main thread and waits for its value, at most
    /// `timeout`.
    ///
    /// On timeout the work may still run later; its result is discarded.
    pub fn run<R, F>(&self, timeout: Duration, work: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce() -> R + Send + 'static,
    {
        let (result_tx, result_rx) = mpsc::sync_channel(1);
        let job: Job = Box::new(move || {
            // The receiver is gone if the submitter already timed out.
            let _ = result_tx.send(work());
        });

        self.tx.send(job).map_err(|_| Error::MainLoopClosed)?;

        result_rx.recv_timeout(timeout).map_err(|e| match e {
            mpsc::RecvTimeoutError::Timeout => Error::HandoffTimeout(timeout),
            mpsc::RecvTimeoutError::Disconnected => Error::MainLoopClosed,
        })
    }
}

/// Executing side of the hand-off, driven by the main thread.
pub struct MainLoop {
    rx: mpsc::Receiver<Job>,
}

impl MainLoop {
    /// Runs jobs until every [`MainHandle`] is dropped.
    ///
    /// A GUI host embeds [`MainLoop::run_pending`] in its own event loop
    /// instead.
    pub fn run(self) {
        for job in self.rx.iter() {
            job();
        }
    }

    /// Executes all currently queued jobs and returns; for integration into
    /// an existing event loop tick.
    pub fn run_pending(&self) {
        while let Ok(job) = self.rx.try_recv() {
            job();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_runs_on_the_loop_thread_and_returns_its_value() {
        let (handle, main_loop) = main_executor();
        let loop_thread = std::thread::spawn(move || main_loop.run());

        let value = handle.run(Duration::from_secs(1), || 6 * 7).unwrap();
        assert_eq!(value, 42);

        drop(handle);
        loop_thread.join().unwrap();
    }

    #[test]
    fn slow_work_times_out_instead_of_hanging() {
        let (handle, main_loop) = main_executor();
        let loop_thread = std::thread::spawn(move || main_loop.run());

        let result = handle.run(Duration::from_millis(50), || {
            std::thread::sleep(Duration::from_millis(500));
        });
        assert!(matches!(result, Err(Error::HandoffTimeout(_))));

        drop(handle);
        loop_thread.join().unwrap();
    }

    #[test]
    fn closed_loop_is_reported() {
        let (handle, main_loop) = main_executor();
        drop(main_loop);

        let result = handle.run(Duration::from_millis(50), || ());
        assert!(matches!(result, Err(Error::MainLoopClosed)));
    }

    #[test]
    fn run_pending_drains_queued_jobs() {
        let (handle, main_loop) = main_executor();

        let submitter = std::thread::spawn(move || {
            handle.run(Duration::from_secs(1), || "done".to_string())
        });

        // Poll the loop the way a GUI tick would.
        let deadline = std::time::Instant::now() + Duration::from_millis(300);
        while std::time::Instant::now() < deadline {
            main_loop.run_pending();
            std::thread::sleep(Duration::from_millis(5));
        }

        assert_eq!(submitter.join().unwrap().unwrap(), "done");
    }
}
