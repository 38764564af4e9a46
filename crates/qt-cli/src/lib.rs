// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::Result;
use clap::{Args, Subcommand};
use qt_logging::CliLoggingArgs;
use qt_tabs::commands::{choose_tab, close_tab, new_tab, new_window, next_tab};
use qt_tabs::{resolve_pane, TabContext};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::debug;

pub use clap::Parser;

/// Environment variable tmux sets to the pane a shell runs in
pub const PANE_ENV: &str = "TMUX_PANE";

#[derive(Debug, clap::Parser)]
#[command(
    name = "tmux-quick-tabs",
    about = "Browser-style tabs for tmux panes",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file layered over the user config
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(flatten)]
    pub logging: CliLoggingArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Args)]
pub struct PaneArgs {
    /// Pane to act on (defaults to the pane the command runs in)
    #[arg(long, env = PANE_ENV)]
    pub pane_id: Option<String>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Stash the current pane and open a fresh one in its place
    NewTab(PaneArgs),
    /// Cycle to the oldest stashed tab
    NextTab(PaneArgs),
    /// Pick a stashed tab from a tree view
    ChooseTab(PaneArgs),
    /// Close the visible tab, surfacing the oldest stashed one
    CloseTab(PaneArgs),
    /// Prompt for a name and open a new window in the pane's session
    NewWindow(PaneArgs),
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::NewTab(_) => "new-tab",
            Commands::NextTab(_) => "next-tab",
            Commands::ChooseTab(_) => "choose-tab",
            Commands::CloseTab(_) => "close-tab",
            Commands::NewWindow(_) => "new-window",
        }
    }
}

/// Run `command`. The pane id has already been resolved from flag or
/// environment by clap; from here on only explicit values are used.
pub fn execute<R, W>(
    command: &Commands,
    ctx: &TabContext<'_>,
    input: &mut R,
    output: &mut W,
) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    debug!(command = command.name(), "Executing command");
    match command {
        Commands::NewTab(args) => {
            let pane = resolve_pane(ctx.mux, args.pane_id.as_deref())?;
            new_tab(ctx, &pane)?;
        }
        Commands::NextTab(args) => {
            let pane = resolve_pane(ctx.mux, args.pane_id.as_deref())?;
            next_tab(ctx, &pane)?;
        }
        Commands::ChooseTab(args) => {
            let pane = resolve_pane(ctx.mux, args.pane_id.as_deref())?;
            choose_tab(ctx, &pane)?;
        }
        Commands::CloseTab(args) => {
            let pane = resolve_pane(ctx.mux, args.pane_id.as_deref())?;
            close_tab(ctx, &pane)?;
        }
        Commands::NewWindow(args) => {
            // Optional here: without a pane the client's current session is used
            let pane = match args.pane_id.as_deref() {
                Some(id) if !id.trim().is_empty() => Some(resolve_pane(ctx.mux, Some(id))?),
                _ => None,
            };
            new_window(ctx, pane.as_ref(), input, output)?;
        }
    }
    Ok(())
}
