// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use qt_mux_core::MuxError;
use std::fmt::Display;
use tracing::warn;

/// Errors that abort a tab command
#[derive(Debug, thiserror::Error)]
pub enum TabsError {
    #[error("no active pane: pass --pane-id or run inside tmux (TMUX_PANE is not set)")]
    NoActivePane,

    #[error("pane not found: {0}")]
    PaneNotFound(String),

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("unexpected response from tmux: {0}")]
    RemoteProtocol(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Mux(MuxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<MuxError> for TabsError {
    fn from(err: MuxError) -> Self {
        match err {
            MuxError::PaneNotFound(pane) => TabsError::PaneNotFound(pane),
            MuxError::SessionNotFound(session) => TabsError::SessionNotFound(session),
            MuxError::UnexpectedOutput { command, output } => {
                TabsError::RemoteProtocol(format!("`{}` printed {:?}", command, output))
            }
            other => TabsError::Mux(other),
        }
    }
}

pub type TabsResult<T> = Result<T, TabsError>;

/// Run a call whose failure must not stop the command.
///
/// The error is logged at `warn` with the operation name and dropped.
pub fn best_effort<T, E: Display>(operation: &str, result: Result<T, E>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(operation, error = %err, "Ignoring failed tmux call");
            None
        }
    }
}
