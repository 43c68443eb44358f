//! Queue dispatcher - the worker-thread side of the host bridge.
//!
//! One [`Dispatcher::execute`] call per queue entry, invoked by the runtime's
//! single worker thread, strictly in batch order. The reply rule: after the
//! handler returns (or no handler matched), a correlation token greater than
//! zero sends the result - possibly the empty string - back through the
//! reply sink. An unrecognized operation name therefore answers with an
//! empty string rather than an error; the caller cannot tell it apart from a
//! legitimate empty success, which keeps the wire behavior of the original
//! protocol.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use webdock_protocol::{ApiMethod, CorrelationToken, Params};
use webdock_runtime::{MainHandle, QueueEntry};

use crate::frontend::Frontend;
use crate::ops;

/// Delivery path for operation results heading back to the child.
///
/// The production implementation wraps the child-side bridge client; tests
/// substitute a recorder.
pub trait ReplySink: Send + Sync + 'static {
    fn deliver(&self, token: CorrelationToken, result: &str);
}

/// Everything a handler needs, passed explicitly instead of living in a
/// process-wide singleton.
pub struct OpContext {
    pub frontend: Arc<dyn Frontend>,
    pub main: MainHandle,
    pub downloads_dir: PathBuf,
    /// Bounded wait for each main-thread hand-off.
    pub handoff_timeout: Duration,
}

/// Executes drained queue entries and routes replies.
pub struct Dispatcher {
    ctx: Arc<OpContext>,
    sink: Arc<dyn ReplySink>,
}

impl Dispatcher {
    pub fn new(ctx: Arc<OpContext>, sink: Arc<dyn ReplySink>) -> Self {
        Self { ctx, sink }
    }

    /// Processes one entry end to end. Malformed input is logged and dropped;
    /// it never affects other queued calls.
    pub fn execute(&self, entry: QueueEntry) {
        let params = match Params::parse(&entry.raw_json) {
            Ok(params) => params,
            Err(e) => {
                tracing::error!(name = %entry.name, "invalid params ({e}): {}", entry.raw_json);
                return;
            }
        };

        let Some(token) = params.token() else {
            tracing::error!(name = %entry.name, "'param1' key not found: {}", entry.raw_json);
            return;
        };
        // A token outside the wire type's range cannot belong to any pending
        // callback; truncating it could resume an unrelated one.
        let Ok(token) = CorrelationToken::try_from(token) else {
            tracing::error!(name = %entry.name, token, "'param1' out of token range");
            return;
        };

        tracing::debug!(name = %entry.name, token, "dispatch start");

        let result = match ApiMethod::from_name(&entry.name) {
            Some(method) => match ops::run(&self.ctx, method, &params) {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!(name = %entry.name, "operation failed: {e}");
                    serde_json::json!({ "error": e.to_string() }).to_string()
                }
            },
            None => {
                // No handler matched; the reply below still goes out, empty.
                tracing::warn!(name = %entry.name, "unknown operation");
                String::new()
            }
        };

        tracing::debug!(name = %entry.name, token, "dispatch finish: {result}");

        if token > 0 {
            self.sink.deliver(token, &result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::{Geometry, PanelInfo};
    use parking_lot::Mutex;
    use serde_json::Value;
    use webdock_runtime::main_executor;

    /// Frontend stub: fixed geometry, records destructive calls.
    #[derive(Default)]
    struct StubFrontend {
        destroyed_panels: Mutex<Vec<String>>,
    }

    impl Frontend for StubFrontend {
        fn panels(&self) -> Vec<PanelInfo> {
            Vec::new()
        }
        fn create_browser_panel(&self, _: &str, _: &str, _: &str) -> Result<(), String> {
            Ok(())
        }
        fn set_panel_url(&self, _: &str, _: &str) -> Result<(), String> {
            Ok(())
        }
        fn execute_javascript(&self, uuid: &str, _: &str) -> Result<(), String> {
            Err(format!("Panel '{uuid}' not found."))
        }
        fn set_panel_area(&self, _: &str, _: i32, _: i32, _: i32) -> Result<(), String> {
            Ok(())
        }
        fn resize_panel(&self, _: &str, _: i32, _: i32) -> Result<(), String> {
            Ok(())
        }
        fn set_panel_title(&self, _: &str, _: &str) -> Result<(), String> {
            Ok(())
        }
        fn set_panel_visible(&self, _: &str, _: bool) -> Result<(), String> {
            Ok(())
        }
        fn destroy_panel(&self, uuid: &str) -> Result<(), String> {
            self.destroyed_panels.lock().push(uuid.to_string());
            Ok(())
        }
        fn main_window_geometry(&self) -> Geometry {
            Geometry {
                x: 0,
                y: 0,
                width: 1920,
                height: 1080,
            }
        }
        fn set_user_input_enabled(&self, _: bool) {}
        fn create_source(
            &self,
            _: &str,
            _: &str,
            settings: Value,
            _: Value,
        ) -> Result<Value, String> {
            Ok(serde_json::json!({ "settings": settings }))
        }
        fn destroy_source(&self, _: &str) -> Result<(), String> {
            Ok(())
        }
        fn stream_settings(&self) -> Value {
            serde_json::json!({})
        }
        fn set_stream_settings(&self, _: Value) -> Result<(), String> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        delivered: Mutex<Vec<(CorrelationToken, String)>>,
    }

    impl ReplySink for RecordingSink {
        fn deliver(&self, token: CorrelationToken, result: &str) {
            self.delivered.lock().push((token, result.to_string()));
        }
    }

    struct Fixture {
        dispatcher: Dispatcher,
        sink: Arc<RecordingSink>,
        frontend: Arc<StubFrontend>,
        _loop_thread: std::thread::JoinHandle<()>,
    }

    fn fixture() -> Fixture {
        let (main, main_loop) = main_executor();
        let loop_thread = std::thread::spawn(move || main_loop.run());

        let frontend = Arc::new(StubFrontend::default());
        let sink = Arc::new(RecordingSink::default());
        let ctx = Arc::new(OpContext {
            frontend: Arc::clone(&frontend) as Arc<dyn Frontend>,
            main,
            downloads_dir: std::env::temp_dir(),
            handoff_timeout: Duration::from_secs(1),
        });
        let dispatcher = Dispatcher::new(ctx, Arc::clone(&sink) as Arc<dyn ReplySink>);

        Fixture {
            dispatcher,
            sink,
            frontend,
            _loop_thread: loop_thread,
        }
    }

    fn entry(name: &str, raw_json: &str) -> QueueEntry {
        QueueEntry {
            name: name.to_string(),
            raw_json: raw_json.to_string(),
        }
    }

    #[test]
    fn geometry_call_replies_on_its_token() {
        let f = fixture();
        f.dispatcher
            .execute(entry("JS_GET_MAIN_WINDOW_GEOMETRY", r#"{"param1": 7}"#));

        let delivered = f.sink.delivered.lock();
        assert_eq!(delivered.len(), 1);
        let (token, result) = &delivered[0];
        assert_eq!(*token, 7);

        let value: Value = serde_json::from_str(result).unwrap();
        assert_eq!(value["width"], 1920);
        assert_eq!(value["height"], 1080);
    }

    #[test]
    fn unknown_operation_still_replies_with_empty_result() {
        let f = fixture();
        f.dispatcher.execute(entry("UNKNOWN_OP", r#"{"param1": 3}"#));

        let delivered = f.sink.delivered.lock();
        assert_eq!(delivered.as_slice(), &[(3, String::new())]);
        assert!(f.frontend.destroyed_panels.lock().is_empty());
    }

    #[test]
    fn fire_and_forget_never_replies() {
        let f = fixture();
        f.dispatcher
            .execute(entry("JS_GET_MAIN_WINDOW_GEOMETRY", r#"{"param1": 0}"#));
        f.dispatcher
            .execute(entry("JS_PANEL_DESTROY", r#"{"param1": 0, "param2": "u1"}"#));

        assert!(f.sink.delivered.lock().is_empty());
        // The handler itself did run.
        assert_eq!(f.frontend.destroyed_panels.lock().as_slice(), &["u1"]);
    }

    #[test]
    fn malformed_json_is_dropped_without_reply() {
        let f = fixture();
        f.dispatcher.execute(entry("JS_QUERY_PANELS", "not json"));
        assert!(f.sink.delivered.lock().is_empty());
    }

    #[test]
    fn out_of_range_token_is_dropped_without_executing() {
        let f = fixture();
        // 4294967303 = u32::MAX + 8; a truncating cast would reply on token 7.
        f.dispatcher.execute(entry(
            "JS_PANEL_DESTROY",
            r#"{"param1": 4294967303, "param2": "u1"}"#,
        ));
        f.dispatcher
            .execute(entry("JS_PANEL_DESTROY", r#"{"param1": -1, "param2": "u2"}"#));

        assert!(f.sink.delivered.lock().is_empty());
        assert!(f.frontend.destroyed_panels.lock().is_empty());
    }

    #[test]
    fn missing_token_field_is_dropped_without_reply() {
        let f = fixture();
        f.dispatcher
            .execute(entry("JS_QUERY_PANELS", r#"{"param2": "x"}"#));
        assert!(f.sink.delivered.lock().is_empty());
    }

    #[test]
    fn handler_errors_surface_as_error_objects() {
        let f = fixture();
        f.dispatcher.execute(entry(
            "JS_PANEL_EXECUTEJAVASCRIPT",
            r#"{"param1": 4, "param2": "alert(1)", "param3": "missing-uuid"}"#,
        ));

        let delivered = f.sink.delivered.lock();
        let (token, result) = &delivered[0];
        assert_eq!(*token, 4);
        let value: Value = serde_json::from_str(result).unwrap();
        assert!(
            value["error"]
                .as_str()
                .unwrap()
                .contains("'missing-uuid' not found")
        );
    }

    #[test]
    fn one_bad_entry_does_not_poison_the_batch() {
        let f = fixture();
        f.dispatcher.execute(entry("JS_QUERY_PANELS", "{{{{"));
        f.dispatcher
            .execute(entry("JS_GET_MAIN_WINDOW_GEOMETRY", r#"{"param1": 9}"#));

        let delivered = f.sink.delivered.lock();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].0, 9);
    }
}
