//! The host-application collaborator interface.
//!
//! The bridge core does not know what a panel, a media source, or a stream
//! settings store actually is - it only needs this narrow surface. The host
//! application implements [`Frontend`]; every method is invoked on the main
//! thread via the executor hand-off when it mutates UI state. Collaborator
//! failures are plain strings; the dispatcher turns them into `{"error": ...}`
//! replies.

use serde::Serialize;
use serde_json::Value;

/// Geometry of the main window or a panel, relative to the main window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// One dockable panel as reported to the embedded runtime.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelInfo {
    pub name: String,
    pub uuid: String,
    pub url: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub floating: bool,
}

/// Narrow interface onto the host application's native capabilities.
///
/// `Result<_, String>` on mutators: the collaborator reports failures as
/// human-readable messages (panel not found, duplicate source name, ...).
pub trait Frontend: Send + Sync + 'static {
    // Panels
    fn panels(&self) -> Vec<PanelInfo>;
    fn create_browser_panel(&self, uuid: &str, title: &str, url: &str)
    -> std::result::Result<(), String>;
    fn set_panel_url(&self, uuid: &str, url: &str) -> std::result::Result<(), String>;
    fn execute_javascript(&self, uuid: &str, code: &str) -> std::result::Result<(), String>;
    /// `area_mask` uses the host toolkit's dock-area mask encoding.
    fn set_panel_area(
        &self,
        uuid: &str,
        area_mask: i32,
        width: i32,
        height: i32,
    ) -> std::result::Result<(), String>;
    fn resize_panel(&self, uuid: &str, width: i32, height: i32)
    -> std::result::Result<(), String>;
    fn set_panel_title(&self, uuid: &str, title: &str) -> std::result::Result<(), String>;
    fn set_panel_visible(&self, uuid: &str, visible: bool) -> std::result::Result<(), String>;
    fn destroy_panel(&self, uuid: &str) -> std::result::Result<(), String>;

    // Main window
    fn main_window_geometry(&self) -> Geometry;
    fn set_user_input_enabled(&self, enabled: bool);

    // Media sources
    fn create_source(
        &self,
        kind: &str,
        name: &str,
        settings: Value,
        hotkeys: Value,
    ) -> std::result::Result<Value, String>;
    fn destroy_source(&self, name: &str) -> std::result::Result<(), String>;

    // Stream settings
    fn stream_settings(&self) -> Value;
    fn set_stream_settings(&self, settings: Value) -> std::result::Result<(), String>;
}
