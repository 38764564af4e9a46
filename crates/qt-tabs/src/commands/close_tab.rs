// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use super::TabContext;
use crate::dependencies::warn_missing_dependencies;
use crate::error::{TabsError, TabsResult};
use crate::group::{resolve_group_name, slot_address};
use qt_mux_core::{PaneRef, PaneTarget, TmuxControl};
use tracing::{debug, instrument};

pub const ACTIVE_PANE_FORMAT: &str = "#{pane_id}";

/// Id of the pane currently shown at the acting pane's position (first line)
pub fn active_pane_id(mux: &dyn TmuxControl, pane_id: &str) -> TabsResult<String> {
    let output = mux.display_message(pane_id, ACTIVE_PANE_FORMAT)?;
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .ok_or_else(|| TabsError::RemoteProtocol(format!("no pane id reported for {}", pane_id)))
}

/// Close the visible tab.
///
/// Without a group the pane is simply killed. Otherwise the pane is swapped
/// into slot 1, surfacing the oldest stored tab, and then killed there. The
/// remaining slots are not renumbered and the group session is left running.
#[instrument(skip_all, fields(component = "qt-tabs", operation = "close_tab", pane = %pane.id))]
pub fn close_tab(ctx: &TabContext<'_>, pane: &PaneRef) -> TabsResult<()> {
    warn_missing_dependencies(&ctx.config.required_executables);

    let name = resolve_group_name(ctx.mux, &pane.id)?;
    let active = active_pane_id(ctx.mux, &pane.id)?;

    match ctx.mux.find_session(&name)? {
        None => {
            debug!(group = %name, "No tab group, killing pane");
            ctx.mux.kill_pane(&active)?;
        }
        Some(session) => {
            let first = slot_address(&session.name, 1);
            ctx.mux.swap_pane(&PaneTarget::at(&active), &first)?;
            ctx.mux.kill_pane(&first)?;
        }
    }
    Ok(())
}
