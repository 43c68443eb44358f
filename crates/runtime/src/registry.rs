//! Callback registry - correlation tokens to pending call sites.
//!
//! Lives in the child process. When the embedded runtime issues a call that
//! expects a result, the invocation context is parked here under a fresh
//! positive token; the reply delivered later through the child-side bridge
//! service pops it exactly once and resumes the caller. A reply for a token
//! that was never registered, was already consumed, or whose context was torn
//! down (page navigated away) is logged and dropped - never a crash.
//!
//! Register happens on the call-issuing thread, pop on the network task
//! delivering the reply, so the map sits behind a lock that covers the
//! lookup-and-erase as one step.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::Mutex;

use webdock_protocol::{CorrelationToken, FIRE_AND_FORGET};

/// The execution context needed to resume one pending caller.
///
/// The embedded-runtime collaborator supplies one per reply-expecting call;
/// `resume` consumes it, enforcing at the type level that a caller is resumed
/// at most once.
pub trait CallSite: Send {
    fn resume(self: Box<Self>, result: &str);
}

impl<F> CallSite for F
where
    F: FnOnce(&str) + Send,
{
    fn resume(self: Box<Self>, result: &str) {
        (*self)(result)
    }
}

/// Pending call sites keyed by correlation token.
#[derive(Default)]
pub struct CallbackRegistry {
    next_token: AtomicU32,
    pending: Mutex<HashMap<CorrelationToken, Box<dyn CallSite>>>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self {
            next_token: AtomicU32::new(1),
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Parks a call site under a fresh positive token and returns the token.
    ///
    /// Tokens are monotonic; on wrap-around, zero (the fire-and-forget
    /// sentinel) and still-outstanding tokens are skipped so every live token
    /// stays unique.
    pub fn register(&self, site: Box<dyn CallSite>) -> CorrelationToken {
        loop {
            let token = self.next_token.fetch_add(1, Ordering::SeqCst);
            if token == FIRE_AND_FORGET {
                continue;
            }
            let mut pending = self.pending.lock();
            if pending.contains_key(&token) {
                continue;
            }
            pending.insert(token, site);
            return token;
        }
    }

    /// Removes and returns the call site for `token` as one atomic step.
    ///
    /// Exactly-once: a second pop for the same token finds nothing and logs.
    pub fn pop(&self, token: CorrelationToken) -> Option<Box<dyn CallSite>> {
        let site = self.pending.lock().remove(&token);
        if site.is_none() {
            tracing::warn!(token, "no pending callback for token; reply dropped");
        }
        site
    }

    /// Drops a pending call site without resuming it (e.g. the issuing call
    /// never made it onto the wire, or its context is gone).
    pub fn abandon(&self, token: CorrelationToken) {
        if self.pending.lock().remove(&token).is_some() {
            tracing::warn!(token, "pending callback abandoned; will never resume");
        }
    }

    /// Abandons everything, e.g. on page teardown.
    pub fn clear(&self) {
        let dropped = {
            let mut pending = self.pending.lock();
            let count = pending.len();
            pending.clear();
            count
        };
        if dropped > 0 {
            tracing::warn!(dropped, "abandoned all pending callbacks");
        }
    }

    pub fn outstanding(&self) -> usize {
        self.pending.lock().len()
    }
}
