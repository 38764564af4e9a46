// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The five user-facing tab commands
//!
//! Each handler receives an already resolved acting pane (optional for New
//! Window, which otherwise works in the client's current session) and issues a
//! short, strictly ordered sequence of tmux calls. Nothing is retried.

mod choose_tab;
mod close_tab;
mod new_tab;
mod new_window;
mod next_tab;

pub use choose_tab::{accept_command, choose_tab, session_filter, CHOOSE_TREE_FORMAT};
pub use close_tab::{active_pane_id, close_tab, ACTIVE_PANE_FORMAT};
pub use new_tab::new_tab;
pub use new_window::{new_window, prompt_window_name, split_window_name, window_target};
pub use next_tab::next_tab;

use crate::config::TabsConfig;
use qt_mux_core::TmuxControl;

/// What every handler needs: the server connection and the loaded configuration
#[derive(Clone, Copy)]
pub struct TabContext<'a> {
    pub mux: &'a dyn TmuxControl,
    pub config: &'a TabsConfig,
}

impl<'a> TabContext<'a> {
    pub fn new(mux: &'a dyn TmuxControl, config: &'a TabsConfig) -> Self {
        Self { mux, config }
    }
}
