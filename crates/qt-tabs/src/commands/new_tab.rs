// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use super::TabContext;
use crate::dependencies::warn_missing_dependencies;
use crate::error::{TabsError, TabsResult};
use crate::group::get_or_create_group;
use crate::rotation::rotate;
use qt_mux_core::{PaneRef, PaneTarget};
use tracing::{debug, instrument};

/// Hide the acting pane in its tab group and surface a fresh one.
///
/// The acting pane ends up in a new window at the end of the group; only the
/// windows that existed before are rotated.
#[instrument(skip_all, fields(component = "qt-tabs", operation = "new_tab", pane = %pane.id))]
pub fn new_tab(ctx: &TabContext<'_>, pane: &PaneRef) -> TabsResult<()> {
    warn_missing_dependencies(&ctx.config.required_executables);

    let group = get_or_create_group(ctx.mux, &pane.id)?;
    let existing = ctx.mux.list_windows(group.name())?.len();

    let window = ctx.mux.new_window(group.name())?;
    let new_pane = window.pane_id.ok_or_else(|| {
        TabsError::RemoteProtocol(format!(
            "tmux did not return a pane for new window {}",
            group.slot(window.index as usize)
        ))
    })?;
    debug!(group = group.name(), window = window.index, new_pane = %new_pane, "Created hidden window");

    ctx.mux.swap_pane(&PaneTarget::at(&pane.id), &new_pane)?;
    ctx.mux.display_popup(&ctx.config.popup_command())?;

    rotate(ctx.mux, group.name(), existing)
}
