// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use crate::error::{TabsError, TabsResult};
use qt_mux_core::{PaneRef, TmuxControl};
use tracing::debug;

/// Look up the pane a command acts on.
///
/// `pane_id` is whatever the caller resolved at its boundary (flag or
/// `TMUX_PANE`); `None` or an empty id means there is no pane to act on.
pub fn resolve_pane(mux: &dyn TmuxControl, pane_id: Option<&str>) -> TabsResult<PaneRef> {
    let pane_id = pane_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(TabsError::NoActivePane)?;

    let pane = mux
        .find_pane(pane_id)?
        .ok_or_else(|| TabsError::PaneNotFound(pane_id.to_string()))?;
    debug!(pane = %pane.id, coordinates = %pane.coordinates, "Resolved acting pane");
    Ok(pane)
}
