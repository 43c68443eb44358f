//! Media source and stream settings operations.
//!
//! Source and settings state lives in the host application, so these hop to
//! the main thread like the panel operations do. Structured arguments
//! (`settings`, `hotkeys`) arrive as JSON strings and are decoded before the
//! hop.

use std::sync::Arc;

use webdock_protocol::Params;

use super::{json_arg, required_str, success};
use crate::dispatcher::OpContext;
use crate::error::{Error, Result};

pub(super) fn source_create(ctx: &OpContext, params: &Params) -> Result<String> {
    let kind = required_str(params, 2, "kind")?;
    let name = required_str(params, 3, "name")?;
    let settings = json_arg(params, 4, "settings")?;
    let hotkeys = json_arg(params, 5, "hotkeys")?;

    let frontend = Arc::clone(&ctx.frontend);
    let created = ctx
        .main
        .run(ctx.handoff_timeout, move || {
            frontend.create_source(&kind, &name, settings, hotkeys)
        })?
        .map_err(Error::Frontend)?;
    Ok(created.to_string())
}

pub(super) fn source_destroy(ctx: &OpContext, params: &Params) -> Result<String> {
    let name = required_str(params, 2, "name")?;

    let frontend = Arc::clone(&ctx.frontend);
    ctx.main
        .run(ctx.handoff_timeout, move || frontend.destroy_source(&name))?
        .map_err(Error::Frontend)?;
    Ok(success())
}

pub(super) fn stream_settings(ctx: &OpContext) -> Result<String> {
    let frontend = Arc::clone(&ctx.frontend);
    let settings = ctx
        .main
        .run(ctx.handoff_timeout, move || frontend.stream_settings())?;
    Ok(settings.to_string())
}

pub(super) fn set_stream_settings(ctx: &OpContext, params: &Params) -> Result<String> {
    let settings = json_arg(params, 2, "settings")?;

    let frontend = Arc::clone(&ctx.frontend);
    ctx.main
        .run(ctx.handoff_timeout, move || {
            frontend.set_stream_settings(settings)
        })?
        .map_err(Error::Frontend)?;
    Ok(success())
}
