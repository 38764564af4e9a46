// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Low-level control contract for a tmux server
//!
//! This crate defines the [`TmuxControl`] trait that the tab-group layer drives,
//! together with the small value types exchanged across it. It knows nothing about
//! tab groups or rotation; concrete backends live in `qt-mux`.

use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(feature = "test-utils")]
pub mod testing;

/// Opaque pane identifier as printed by `#{pane_id}` (e.g. `%3`)
pub type PaneId = String;

/// Errors raised by multiplexer backends
#[derive(Debug, thiserror::Error)]
pub enum MuxError {
    #[error("multiplexer not available: {0}")]
    NotAvailable(&'static str),

    #[error("can't find pane: {0}")]
    PaneNotFound(String),

    #[error("can't find session: {0}")]
    SessionNotFound(String),

    #[error("command failed: {0}")]
    CommandFailed(String),

    #[error("unexpected output from `{command}`: {output:?}")]
    UnexpectedOutput { command: String, output: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Location of a pane inside the server's session/window/pane hierarchy.
///
/// Coordinates change when a pane is moved or swapped, so callers that derive
/// names from them must re-read them for every operation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaneCoordinates {
    pub session_name: String,
    pub window_index: u32,
    pub pane_index: u32,
}

impl PaneCoordinates {
    /// tmux format that prints coordinates in the layout accepted by [`PaneCoordinates::parse`]
    pub const FORMAT: &'static str = "#{session_name}\t#{window_index}\t#{pane_index}";

    /// Parse a single line produced by [`PaneCoordinates::FORMAT`]
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.trim_end_matches(['\r', '\n']).rsplitn(3, '\t');
        let pane_index = fields.next()?.trim().parse().ok()?;
        let window_index = fields.next()?.trim().parse().ok()?;
        let session_name = fields.next()?;
        if session_name.is_empty() {
            return None;
        }
        Some(Self {
            session_name: session_name.to_string(),
            window_index,
            pane_index,
        })
    }
}

impl fmt::Display for PaneCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}.{}", self.session_name, self.window_index, self.pane_index)
    }
}

/// A single terminal pane
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaneRef {
    pub id: PaneId,
    /// Coordinates as observed when the pane was looked up
    pub coordinates: PaneCoordinates,
}

/// A session known to the server
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRef {
    /// `#{session_id}` (e.g. `$4`)
    pub id: String,
    pub name: String,
}

/// One window slot inside a session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRef {
    /// Server-assigned window index
    pub index: u32,
    /// Active pane of the window; `None` when the server did not report one
    pub pane_id: Option<PaneId>,
}

/// Pane addressed by a command.
///
/// `Current` leaves the target implicit so the server resolves it against the
/// invoking client, which is what `send-keys` after `new-window` relies on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaneTarget {
    Current,
    /// A pane id (`%3`) or a `session:window[.pane]` address
    At(String),
}

impl PaneTarget {
    pub fn at(target: impl Into<String>) -> Self {
        Self::At(target.into())
    }

    /// The explicit target string, if any
    pub fn as_arg(&self) -> Option<&str> {
        match self {
            PaneTarget::Current => None,
            PaneTarget::At(target) => Some(target),
        }
    }
}

impl fmt::Display for PaneTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaneTarget::Current => write!(f, "<current>"),
            PaneTarget::At(target) => write!(f, "{}", target),
        }
    }
}

/// Commands the tab layer issues against a running tmux server.
///
/// Every call is synchronous and maps to one server command; nothing is retried.
#[cfg_attr(feature = "test-utils", mockall::automock)]
pub trait TmuxControl {
    /// Whether the backend can reach a server binary at all
    fn is_available(&self) -> bool;

    /// Expand `format` against the pane or session addressed by `target`
    fn display_message(&self, target: &str, format: &str) -> Result<String, MuxError>;

    /// Look up a pane by its exact id
    fn find_pane(&self, pane_id: &str) -> Result<Option<PaneRef>, MuxError>;

    /// Look up a session by its exact name
    fn find_session(&self, name: &str) -> Result<Option<SessionRef>, MuxError>;

    /// Create a detached session and read it back
    fn new_session(&self, name: &str) -> Result<SessionRef, MuxError>;

    /// Short-form `new -d -s` creation; the session is not read back and may not be
    /// visible to a subsequent lookup
    fn new_session_unchecked(&self, name: &str) -> Result<(), MuxError>;

    /// Create a detached window at the end of `session`
    fn new_window(&self, session: &str) -> Result<WindowRef, MuxError>;

    /// Windows of `session`, ordered by index
    fn list_windows(&self, session: &str) -> Result<Vec<WindowRef>, MuxError>;

    fn swap_pane(&self, source: &PaneTarget, target: &str) -> Result<(), MuxError>;

    fn kill_pane(&self, target: &str) -> Result<(), MuxError>;

    /// Open the interactive tree picker in `pane_id`; `command` runs on accept
    /// with `%%` replaced by the chosen target
    fn choose_tree(
        &self,
        pane_id: &str,
        format: &str,
        filter: &str,
        command: &str,
    ) -> Result<(), MuxError>;

    /// Run `command` in a popup that closes when it exits
    fn display_popup(&self, command: &str) -> Result<(), MuxError>;

    /// Type `keys` into `target`, optionally followed by Enter
    fn send_keys(&self, target: &PaneTarget, keys: &str, enter: bool) -> Result<(), MuxError>;

    /// `new-window [-t <target>] -n <words...>`; with `PaneTarget::Current` the
    /// window opens in the invoking client's session
    fn new_named_window(&self, target: &PaneTarget, words: &[String]) -> Result<(), MuxError>;
}
