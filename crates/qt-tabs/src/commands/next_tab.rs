// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use super::TabContext;
use crate::error::{best_effort, TabsResult};
use crate::group::{resolve_group_name, slot_address};
use crate::rotation::rotate;
use qt_mux_core::{PaneRef, PaneTarget};
use tracing::{debug, instrument};

/// Swap the acting pane with the oldest stored tab, then rotate.
///
/// A missing group is created with the short `new -d -s` form and looked up
/// again; it may still be absent afterwards. The slot-1 swap is attempted in
/// every case and its failure is only logged.
#[instrument(skip_all, fields(component = "qt-tabs", operation = "next_tab", pane = %pane.id))]
pub fn next_tab(ctx: &TabContext<'_>, pane: &PaneRef) -> TabsResult<()> {
    let name = resolve_group_name(ctx.mux, &pane.id)?;

    let mut session = ctx.mux.find_session(&name)?;
    if session.is_none() {
        ctx.mux.new_session_unchecked(&name)?;
        session = ctx.mux.find_session(&name)?;
    }

    best_effort(
        "swap-pane",
        ctx.mux.swap_pane(&PaneTarget::at(&pane.id), &slot_address(&name, 1)),
    );

    let Some(session) = session else {
        debug!(group = %name, "Tab group still absent, nothing to rotate");
        return Ok(());
    };
    let window_count = ctx.mux.list_windows(&session.name)?.len();
    rotate(ctx.mux, &session.name, window_count)
}
