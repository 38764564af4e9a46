// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use super::TabContext;
use crate::dependencies::warn_missing_dependencies;
use crate::error::TabsResult;
use crate::group::get_or_create_group;
use qt_mux_core::PaneRef;
use tracing::instrument;

/// Picker line for each stored pane
pub const CHOOSE_TREE_FORMAT: &str = "#{pane_title} #{pane_current_command} #{pane_current_path}";

/// choose-tree filter matching only panes of `group`
pub fn session_filter(group: &str) -> String {
    format!("#{{==:#{{session_name}},{}}}", group)
}

/// Command run on accept; `%%` is replaced by the chosen pane
pub fn accept_command(pane_id: &str) -> String {
    format!("swap-pane -s '{}' -t '%%'", pane_id)
}

/// Open the tree picker over the acting pane's stored tabs. Order is untouched.
#[instrument(skip_all, fields(component = "qt-tabs", operation = "choose_tab", pane = %pane.id))]
pub fn choose_tab(ctx: &TabContext<'_>, pane: &PaneRef) -> TabsResult<()> {
    warn_missing_dependencies(&ctx.config.required_executables);

    let group = get_or_create_group(ctx.mux, &pane.id)?;
    ctx.mux.choose_tree(
        &pane.id,
        CHOOSE_TREE_FORMAT,
        &session_filter(group.name()),
        &accept_command(&pane.id),
    )?;
    Ok(())
}
