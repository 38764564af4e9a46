// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Hidden tab groups for tmux panes
//!
//! Every visible pane owns a detached "tab group" session named after the
//! pane's coordinates (`tabs_<session>_<window>_<pane>`). The handlers in
//! [`commands`] swap panes in and out of that session to present them as tabs,
//! and [`rotation`] keeps the stored windows ordered oldest-first.
//!
//! All tmux access goes through [`qt_mux_core::TmuxControl`]; nothing in this
//! crate reads the process environment.

pub mod commands;
pub mod config;
pub mod dependencies;
pub mod error;
pub mod group;
pub mod pane;
pub mod rotation;

pub use commands::TabContext;
pub use config::TabsConfig;
pub use error::{best_effort, TabsError, TabsResult};
pub use group::{get_or_create_group, group_name, resolve_group_name, slot_address, TabGroup};
pub use pane::resolve_pane;
pub use rotation::{rotate, rotation_swaps};
