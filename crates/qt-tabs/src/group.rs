// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Tab-group naming and lookup
//!
//! The pane -> group relation is not stored anywhere: the group name is a pure
//! function of the pane's current coordinates and is recomputed on every call,
//! because coordinates change when panes are swapped or moved.

use crate::error::{TabsError, TabsResult};
use qt_mux_core::{PaneCoordinates, SessionRef, TmuxControl};
use tracing::{debug, info};

pub const GROUP_PREFIX: &str = "tabs";

/// `tabs_<session>_<window>_<pane>` for the given coordinates.
///
/// tmux refuses `.` and `:` in session names, so they become `_`.
pub fn group_name(coordinates: &PaneCoordinates) -> String {
    let session: String = coordinates
        .session_name
        .chars()
        .map(|c| if c == '.' || c == ':' { '_' } else { c })
        .collect();
    format!(
        "{}_{}_{}_{}",
        GROUP_PREFIX, session, coordinates.window_index, coordinates.pane_index
    )
}

/// `group:index`
pub fn slot_address(group: &str, index: usize) -> String {
    format!("{}:{}", group, index)
}

/// Read the pane's coordinates from the server and derive its group name
pub fn resolve_group_name(mux: &dyn TmuxControl, pane_id: &str) -> TabsResult<String> {
    let output = mux.display_message(pane_id, PaneCoordinates::FORMAT)?;
    let line = output.lines().next().unwrap_or_default();
    let coordinates = PaneCoordinates::parse(line).ok_or_else(|| {
        TabsError::RemoteProtocol(format!(
            "expected pane coordinates for {}, got {:?}",
            pane_id, output
        ))
    })?;
    Ok(group_name(&coordinates))
}

/// The hidden session holding a pane's tabs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabGroup {
    pub session: SessionRef,
    /// Whether this call created the session
    pub created: bool,
}

impl TabGroup {
    /// Name as recorded by the server
    pub fn name(&self) -> &str {
        &self.session.name
    }

    pub fn slot(&self, index: usize) -> String {
        slot_address(self.name(), index)
    }
}

/// Return the pane's group session, creating it detached if it does not exist
pub fn get_or_create_group(mux: &dyn TmuxControl, pane_id: &str) -> TabsResult<TabGroup> {
    let name = resolve_group_name(mux, pane_id)?;

    if let Some(session) = mux.find_session(&name)? {
        debug!(group = %session.name, "Found existing tab group");
        return Ok(TabGroup {
            session,
            created: false,
        });
    }

    let session = mux.new_session(&name)?;
    info!(group = %session.name, id = %session.id, "Created tab group");
    Ok(TabGroup {
        session,
        created: true,
    })
}
