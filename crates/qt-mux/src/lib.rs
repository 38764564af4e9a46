// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Terminal multiplexer backends
//!
//! This crate provides the concrete implementation of the `TmuxControl`
//! contract that talks to a real tmux server through its command-line interface.

#[cfg(feature = "tmux")]
pub mod tmux;

#[cfg(feature = "tmux")]
pub use tmux::TmuxClient;

pub use qt_mux_core::{
    MuxError, PaneCoordinates, PaneId, PaneRef, PaneTarget, SessionRef, TmuxControl, WindowRef,
};
