// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use super::TabContext;
use crate::error::{best_effort, TabsResult};
use qt_mux_core::{PaneRef, PaneTarget};
use std::io::{BufRead, Write};
use tracing::instrument;

/// Print `prompt` on its own line and read one line of input.
///
/// Only the trailing newline is removed; EOF yields an empty name.
pub fn prompt_window_name<R, W>(prompt: &str, input: &mut R, output: &mut W) -> TabsResult<String>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    if line.ends_with('\n') {
        line.pop();
    }
    Ok(line)
}

/// Shell-style word splitting without quoting: `"foo bar"` is two words
pub fn split_window_name(name: &str) -> Vec<String> {
    name.split_whitespace().map(str::to_string).collect()
}

/// Where the new window goes: the next free index in the pane's session, or
/// the client's own session when no pane is given
pub fn window_target(pane: Option<&PaneRef>) -> PaneTarget {
    match pane {
        Some(pane) => PaneTarget::at(format!("{}:", pane.coordinates.session_name)),
        None => PaneTarget::Current,
    }
}

/// Prompt for a name, create the window and type the init command into it.
///
/// Window creation may fail (an empty name is a tmux usage error); the init
/// keys are sent regardless, to the client's now current pane.
#[instrument(skip_all, fields(component = "qt-tabs", operation = "new_window"))]
pub fn new_window<R, W>(
    ctx: &TabContext<'_>,
    pane: Option<&PaneRef>,
    input: &mut R,
    output: &mut W,
) -> TabsResult<()>
where
    R: BufRead,
    W: Write,
{
    let name = prompt_window_name(&ctx.config.window_prompt, input, output)?;
    let words = split_window_name(&name);

    best_effort(
        "new-window",
        ctx.mux.new_named_window(&window_target(pane), &words),
    );
    ctx.mux
        .send_keys(&PaneTarget::Current, &ctx.config.init_command, true)?;
    Ok(())
}
