// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Rotation of stored tabs
//!
//! tmux only offers pairwise `swap-pane`, so a left rotation by one slot is
//! done as a cascade of adjacent swaps: `(1,2), (2,3), ..., (n-1,n)`. The pane
//! that started in slot 1 ends in slot `n`, every other pane moves down one.
//! An interrupted cascade leaves a partial rotation with no pane lost.

use crate::error::TabsResult;
use crate::group::slot_address;
use qt_mux_core::{PaneTarget, TmuxControl};
use tracing::debug;

/// Slot pairs swapped, in order, to rotate `window_count` windows
pub fn rotation_swaps(window_count: usize) -> Vec<(usize, usize)> {
    (1..window_count).map(|index| (index, index + 1)).collect()
}

/// Rotate the first `window_count` slots of `group` left by one
pub fn rotate(mux: &dyn TmuxControl, group: &str, window_count: usize) -> TabsResult<()> {
    let swaps = rotation_swaps(window_count);
    debug!(group, window_count, swaps = swaps.len(), "Rotating tab group");
    for (source, target) in swaps {
        mux.swap_pane(
            &PaneTarget::at(slot_address(group, source)),
            &slot_address(group, target),
        )?;
    }
    Ok(())
}
