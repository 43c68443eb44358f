//! Panel and main-window operations.
//!
//! All of these mutate or read live UI state, so each one hops to the main
//! thread and blocks (bounded) for the value. The closures capture their own
//! `Arc` of the frontend and return results by value.

use std::sync::Arc;

use webdock_protocol::Params;

use super::{required_str, success};
use crate::dispatcher::OpContext;
use crate::error::{Error, Result};

pub(super) fn query(ctx: &OpContext) -> Result<String> {
    let frontend = Arc::clone(&ctx.frontend);
    let panels = ctx.main.run(ctx.handoff_timeout, move || frontend.panels())?;
    Ok(serde_json::to_string(&panels)?)
}

pub(super) fn new_browser_panel(ctx: &OpContext, params: &Params) -> Result<String> {
    let title = params.str(2).to_string();
    let url = required_str(params, 3, "url")?;
    let uuid = required_str(params, 4, "uuid")?;

    let frontend = Arc::clone(&ctx.frontend);
    ctx.main
        .run(ctx.handoff_timeout, move || {
            frontend.create_browser_panel(&uuid, &title, &url)
        })?
        .map_err(Error::Frontend)?;
    Ok(success())
}

pub(super) fn set_url(ctx: &OpContext, params: &Params) -> Result<String> {
    let uuid = required_str(params, 2, "uuid")?;
    let url = required_str(params, 3, "url")?;

    let frontend = Arc::clone(&ctx.frontend);
    ctx.main
        .run(ctx.handoff_timeout, move || {
            frontend.set_panel_url(&uuid, &url)
        })?
        .map_err(Error::Frontend)?;
    Ok(success())
}

pub(super) fn execute_javascript(ctx: &OpContext, params: &Params) -> Result<String> {
    let code = required_str(params, 2, "code")?;
    let uuid = required_str(params, 3, "uuid")?;

    let frontend = Arc::clone(&ctx.frontend);
    ctx.main
        .run(ctx.handoff_timeout, move || {
            frontend.execute_javascript(&uuid, &code)
        })?
        .map_err(Error::Frontend)?;
    Ok(success())
}

pub(super) fn set_area(ctx: &OpContext, params: &Params) -> Result<String> {
    let uuid = required_str(params, 2, "uuid")?;
    let mask = params.int(3) as i32;
    let width = params.int(4) as i32;
    let height = params.int(5) as i32;

    let frontend = Arc::clone(&ctx.frontend);
    ctx.main
        .run(ctx.handoff_timeout, move || {
            frontend.set_panel_area(&uuid, mask, width, height)
        })?
        .map_err(Error::Frontend)?;
    Ok(success())
}

pub(super) fn resize(ctx: &OpContext, params: &Params) -> Result<String> {
    let uuid = required_str(params, 2, "uuid")?;
    let width = params.int(3) as i32;
    let height = params.int(4) as i32;

    let frontend = Arc::clone(&ctx.frontend);
    ctx.main
        .run(ctx.handoff_timeout, move || {
            frontend.resize_panel(&uuid, width, height)
        })?
        .map_err(Error::Frontend)?;
    Ok(success())
}

pub(super) fn set_title(ctx: &OpContext, params: &Params) -> Result<String> {
    let uuid = required_str(params, 2, "uuid")?;
    let title = params.str(3).to_string();

    let frontend = Arc::clone(&ctx.frontend);
    ctx.main
        .run(ctx.handoff_timeout, move || {
            frontend.set_panel_title(&uuid, &title)
        })?
        .map_err(Error::Frontend)?;
    Ok(success())
}

pub(super) fn toggle_visibility(ctx: &OpContext, params: &Params) -> Result<String> {
    let uuid = required_str(params, 2, "uuid")?;
    let visible = params.bool(3);

    let frontend = Arc::clone(&ctx.frontend);
    ctx.main
        .run(ctx.handoff_timeout, move || {
            frontend.set_panel_visible(&uuid, visible)
        })?
        .map_err(Error::Frontend)?;
    Ok(success())
}

pub(super) fn destroy(ctx: &OpContext, params: &Params) -> Result<String> {
    let uuid = required_str(params, 2, "uuid")?;

    let frontend = Arc::clone(&ctx.frontend);
    ctx.main
        .run(ctx.handoff_timeout, move || frontend.destroy_panel(&uuid))?
        .map_err(Error::Frontend)?;
    Ok(success())
}

pub(super) fn main_window_geometry(ctx: &OpContext) -> Result<String> {
    let frontend = Arc::clone(&ctx.frontend);
    let geometry = ctx
        .main
        .run(ctx.handoff_timeout, move || frontend.main_window_geometry())?;
    Ok(serde_json::to_string(&geometry)?)
}

/// Replies with the empty string: the caller treats this as a bare
/// completion signal.
pub(super) fn toggle_user_input(ctx: &OpContext, params: &Params) -> Result<String> {
    let enabled = params.bool(2);

    let frontend = Arc::clone(&ctx.frontend);
    ctx.main.run(ctx.handoff_timeout, move || {
        frontend.set_user_input_enabled(enabled)
    })?;
    Ok(String::new())
}
