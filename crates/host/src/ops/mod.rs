//! Operation handlers, one per [`ApiMethod`].
//!
//! Every handler receives the decoded positional parameters and returns the
//! reply body as a JSON string. UI-touching handlers hop to the main thread
//! through the executor hand-off and stay within its bounded wait; file and
//! network handlers run directly on the worker thread so a slow disk or
//! download never stalls the UI.
//!
//! Positional layout per operation (position 1 is always the correlation
//! token):
//!
//! | operation                    | 2        | 3        | 4        | 5       |
//! |------------------------------|----------|----------|----------|---------|
//! | `JS_QUERY_PANELS`            |          |          |          |         |
//! | `JS_PANEL_NEW_BROWSER_PANEL` | title    | url      | uuid     |         |
//! | `JS_PANEL_SETURL`            | uuid     | url      |          |         |
//! | `JS_PANEL_EXECUTEJAVASCRIPT` | code     | uuid     |          |         |
//! | `JS_PANEL_SETAREA`           | uuid     | mask     | width    | height  |
//! | `JS_PANEL_RESIZE`            | uuid     | width    | height   |         |
//! | `JS_PANEL_SETTITLE`          | uuid     | title    |          |         |
//! | `JS_PANEL_TOGGLE_VISIBILITY` | uuid     | visible  |          |         |
//! | `JS_PANEL_DESTROY`           | uuid     |          |          |         |
//! | `JS_GET_MAIN_WINDOW_GEOMETRY`|          |          |          |         |
//! | `JS_TOGGLE_USER_INPUT`       | enabled  |          |          |         |
//! | `JS_DOWNLOAD_ZIP`            | url      |          |          |         |
//! | `JS_READ_FILE`               | path     |          |          |         |
//! | `JS_DELETE_FILES`            | entries  |          |          |         |
//! | `JS_DROP_FOLDER`             | path     |          |          |         |
//! | `JS_QUERY_DOWNLOADS_FOLDER`  |          |          |          |         |
//! | `JS_SOURCE_CREATE`           | kind     | name     | settings | hotkeys |
//! | `JS_SOURCE_DESTROY`          | name     |          |          |         |
//! | `JS_GET_STREAM_SETTINGS`     |          |          |          |         |
//! | `JS_SET_STREAM_SETTINGS`     | settings |          |          |         |

mod files;
mod media;
mod panels;

use webdock_protocol::{ApiMethod, Params};

use crate::dispatcher::OpContext;
use crate::error::{Error, Result};

/// Runs the handler matched to `method`. Exhaustive by construction; an
/// unmatched wire name never reaches this function.
pub(crate) fn run(ctx: &OpContext, method: ApiMethod, params: &Params) -> Result<String> {
    match method {
        ApiMethod::QueryPanels => panels::query(ctx),
        ApiMethod::PanelNewBrowserPanel => panels::new_browser_panel(ctx, params),
        ApiMethod::PanelSetUrl => panels::set_url(ctx, params),
        ApiMethod::PanelExecuteJavascript => panels::execute_javascript(ctx, params),
        ApiMethod::PanelSetArea => panels::set_area(ctx, params),
        ApiMethod::PanelResize => panels::resize(ctx, params),
        ApiMethod::PanelSetTitle => panels::set_title(ctx, params),
        ApiMethod::PanelToggleVisibility => panels::toggle_visibility(ctx, params),
        ApiMethod::PanelDestroy => panels::destroy(ctx, params),
        ApiMethod::GetMainWindowGeometry => panels::main_window_geometry(ctx),
        ApiMethod::ToggleUserInput => panels::toggle_user_input(ctx, params),
        ApiMethod::DownloadZip => files::download_zip(ctx, params),
        ApiMethod::ReadFile => files::read_file(params),
        ApiMethod::DeleteFiles => files::delete_files(ctx, params),
        ApiMethod::DropFolder => files::drop_folder(ctx, params),
        ApiMethod::QueryDownloadsFolder => files::query_downloads_folder(ctx),
        ApiMethod::SourceCreate => media::source_create(ctx, params),
        ApiMethod::SourceDestroy => media::source_destroy(ctx, params),
        ApiMethod::GetStreamSettings => media::stream_settings(ctx),
        ApiMethod::SetStreamSettings => media::set_stream_settings(ctx, params),
    }
}

/// The stock reply for mutators with nothing else to report.
fn success() -> String {
    r#"{"status":"success"}"#.to_string()
}

/// A string parameter the operation cannot do without.
fn required_str(params: &Params, position: usize, what: &'static str) -> Result<String> {
    let value = params.str(position);
    if value.is_empty() {
        return Err(Error::InvalidParams(what));
    }
    Ok(value.to_string())
}

/// Parses a JSON-string parameter, treating the empty sentinel as `{}`.
fn json_arg(params: &Params, position: usize, what: &'static str) -> Result<serde_json::Value> {
    let raw = params.str(position);
    if raw.is_empty() {
        return Ok(serde_json::json!({}));
    }
    serde_json::from_str(raw).map_err(|_| Error::InvalidParams(what))
}
