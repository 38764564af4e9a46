// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{Context, Result};
use qt_cli::{execute, Cli, Parser};
use qt_mux::TmuxClient;
use qt_tabs::{TabContext, TabsConfig};
use std::io;

fn main() -> Result<()> {
    let cli = Cli::parse();

    cli.logging.clone().init("tmux-quick-tabs")?;

    let config = TabsConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let mux = TmuxClient::with_binary(config.tmux_binary.clone(), config.socket_name.clone());
    let ctx = TabContext::new(&mux, &config);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    execute(&cli.command, &ctx, &mut stdin.lock(), &mut stdout)
        .with_context(|| format!("{} failed", cli.command.name()))
}
