// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! tmux backend
//!
//! Implements [`TmuxControl`] by running the `tmux` executable once per call.
//! Structured output is requested with tab-separated `-F` formats and parsed
//! here; tmux's "can't find ..." diagnostics are classified into the matching
//! [`MuxError`] variants so callers can tell a stale target from a broken server.

use qt_mux_core::*;
use std::process::{Command, Stdio};
use tracing::{debug, instrument};

const SESSION_FORMAT: &str = "#{session_id}\t#{session_name}";
const WINDOW_FORMAT: &str = "#{window_index}\t#{pane_id}";
const PANE_FORMAT: &str = "#{pane_id}\t#{session_name}\t#{window_index}\t#{pane_index}";

/// tmux client driving a server through the command-line interface
#[derive(Clone, Debug)]
pub struct TmuxClient {
    binary: String,
    /// Passed as `-L <name>` to select a non-default server socket
    socket_name: Option<String>,
}

impl Default for TmuxClient {
    fn default() -> Self {
        Self {
            binary: "tmux".to_string(),
            socket_name: None,
        }
    }
}

impl TmuxClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binary(binary: impl Into<String>, socket_name: Option<String>) -> Self {
        Self {
            binary: binary.into(),
            socket_name,
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    pub fn socket_name(&self) -> Option<&str> {
        self.socket_name.as_deref()
    }

    /// Full argument list including the socket selector
    fn command_args<'a>(&'a self, args: &[&'a str]) -> Vec<&'a str> {
        let mut full = Vec::with_capacity(args.len() + 2);
        if let Some(socket) = &self.socket_name {
            full.push("-L");
            full.push(socket.as_str());
        }
        full.extend_from_slice(args);
        full
    }

    /// Run a tmux command and return its output
    fn run_tmux_command(&self, args: &[&str]) -> Result<String, MuxError> {
        let full = self.command_args(args);
        debug!(binary = %self.binary, args = ?full, "Running tmux command");

        let output = Command::new(&self.binary)
            .args(&full)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    MuxError::NotAvailable("tmux")
                } else {
                    MuxError::Io(e)
                }
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!(stderr = %stderr.trim(), "tmux command failed");
            Err(classify_failure(args, &stderr))
        }
    }

    /// Like `run_tmux_command`, but a missing server yields `None` instead of an error
    fn query(&self, args: &[&str]) -> Result<Option<String>, MuxError> {
        match self.run_tmux_command(args) {
            Ok(output) => Ok(Some(output)),
            Err(MuxError::CommandFailed(message)) if is_no_server(&message) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl TmuxControl for TmuxClient {
    fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("-V")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn display_message(&self, target: &str, format: &str) -> Result<String, MuxError> {
        self.run_tmux_command(&["display-message", "-p", "-t", target, format])
    }

    fn find_pane(&self, pane_id: &str) -> Result<Option<PaneRef>, MuxError> {
        let Some(output) = self.query(&["list-panes", "-a", "-F", PANE_FORMAT])? else {
            return Ok(None);
        };
        Ok(parse_panes(&output).into_iter().find(|pane| pane.id == pane_id))
    }

    fn find_session(&self, name: &str) -> Result<Option<SessionRef>, MuxError> {
        let Some(output) = self.query(&["list-sessions", "-F", SESSION_FORMAT])? else {
            return Ok(None);
        };
        Ok(parse_sessions(&output).into_iter().find(|session| session.name == name))
    }

    #[instrument(skip(self), fields(component = "qt_mux", operation = "new_session"))]
    fn new_session(&self, name: &str) -> Result<SessionRef, MuxError> {
        let args = ["new-session", "-d", "-s", name, "-P", "-F", SESSION_FORMAT];
        let output = self.run_tmux_command(&args)?;
        parse_sessions(&output)
            .into_iter()
            .next()
            .ok_or_else(|| MuxError::UnexpectedOutput {
                command: args.join(" "),
                output,
            })
    }

    fn new_session_unchecked(&self, name: &str) -> Result<(), MuxError> {
        self.run_tmux_command(&["new", "-d", "-s", name])?;
        Ok(())
    }

    fn new_window(&self, session: &str) -> Result<WindowRef, MuxError> {
        // Trailing colon: next free index in the session rather than a window named `session`
        let target = format!("{}:", session);
        let args = ["new-window", "-d", "-P", "-F", WINDOW_FORMAT, "-t", target.as_str()];
        let output = self.run_tmux_command(&args)?;
        output
            .lines()
            .next()
            .and_then(parse_window_line)
            .ok_or_else(|| MuxError::UnexpectedOutput {
                command: args.join(" "),
                output: output.clone(),
            })
    }

    fn list_windows(&self, session: &str) -> Result<Vec<WindowRef>, MuxError> {
        // `=` disables tmux's prefix matching on session names
        let target = format!("={}", session);
        let output = self.run_tmux_command(&["list-windows", "-t", &target, "-F", WINDOW_FORMAT])?;
        let mut windows: Vec<WindowRef> = output.lines().filter_map(parse_window_line).collect();
        windows.sort_by_key(|w| w.index);
        Ok(windows)
    }

    fn swap_pane(&self, source: &PaneTarget, target: &str) -> Result<(), MuxError> {
        let mut args = vec!["swap-pane"];
        if let Some(source) = source.as_arg() {
            args.extend(["-s", source]);
        }
        args.extend(["-t", target]);
        self.run_tmux_command(&args)?;
        Ok(())
    }

    fn kill_pane(&self, target: &str) -> Result<(), MuxError> {
        self.run_tmux_command(&["kill-pane", "-t", target])?;
        Ok(())
    }

    fn choose_tree(
        &self,
        pane_id: &str,
        format: &str,
        filter: &str,
        command: &str,
    ) -> Result<(), MuxError> {
        self.run_tmux_command(&["choose-tree", "-t", pane_id, "-F", format, "-f", filter, command])?;
        Ok(())
    }

    fn display_popup(&self, command: &str) -> Result<(), MuxError> {
        self.run_tmux_command(&["display-popup", "-E", command])?;
        Ok(())
    }

    fn send_keys(&self, target: &PaneTarget, keys: &str, enter: bool) -> Result<(), MuxError> {
        let mut args = vec!["send-keys"];
        if let Some(target) = target.as_arg() {
            args.extend(["-t", target]);
        }
        args.push(keys);
        if enter {
            args.push("Enter");
        }
        self.run_tmux_command(&args)?;
        Ok(())
    }

    fn new_named_window(&self, target: &PaneTarget, words: &[String]) -> Result<(), MuxError> {
        let mut args = vec!["new-window"];
        if let Some(target) = target.as_arg() {
            args.extend(["-t", target]);
        }
        args.push("-n");
        args.extend(words.iter().map(String::as_str));
        self.run_tmux_command(&args)?;
        Ok(())
    }
}

/// Value following the last `-t` flag, if any
fn target_of(args: &[&str]) -> Option<String> {
    args.iter()
        .rposition(|arg| *arg == "-t")
        .and_then(|i| args.get(i + 1))
        .map(|t| t.trim_start_matches('=').to_string())
}

fn not_found_subject(stderr: &str, kind: &str) -> Option<String> {
    let line = stderr.lines().find(|l| l.contains("can't find "))?;
    let rest = &line[line.find(&format!("can't find {}", kind))? + "can't find ".len() + kind.len()..];
    Some(rest.trim_start_matches(':').trim().to_string())
}

/// Map a failed invocation onto the closest [`MuxError`] variant
pub fn classify_failure(args: &[&str], stderr: &str) -> MuxError {
    let subject = |found: String| {
        if found.is_empty() {
            target_of(args).unwrap_or_default()
        } else {
            found
        }
    };
    if let Some(found) = not_found_subject(stderr, "session") {
        return MuxError::SessionNotFound(subject(found));
    }
    if let Some(found) =
        not_found_subject(stderr, "pane").or_else(|| not_found_subject(stderr, "window"))
    {
        return MuxError::PaneNotFound(subject(found));
    }
    MuxError::CommandFailed(format!("tmux {} failed: {}", args.join(" "), stderr.trim()))
}

fn is_no_server(message: &str) -> bool {
    message.contains("no server running") || message.contains("error connecting to")
}

/// Parse `#{session_id}\t#{session_name}` lines
pub fn parse_sessions(output: &str) -> Vec<SessionRef> {
    output
        .lines()
        .filter_map(|line| {
            let (id, name) = line.split_once('\t')?;
            (!name.is_empty()).then(|| SessionRef {
                id: id.to_string(),
                name: name.to_string(),
            })
        })
        .collect()
}

/// Parse `#{pane_id}\t#{session_name}\t#{window_index}\t#{pane_index}` lines
pub fn parse_panes(output: &str) -> Vec<PaneRef> {
    output
        .lines()
        .filter_map(|line| {
            let (id, rest) = line.split_once('\t')?;
            Some(PaneRef {
                id: id.to_string(),
                coordinates: PaneCoordinates::parse(rest)?,
            })
        })
        .collect()
}

/// Parse one `#{window_index}\t#{pane_id}` line
pub fn parse_window_line(line: &str) -> Option<WindowRef> {
    let (index, pane) = line.split_once('\t').unwrap_or((line, ""));
    let index = index.trim().parse().ok()?;
    let pane = pane.trim();
    Some(WindowRef {
        index,
        pane_id: (!pane.is_empty()).then(|| pane.to_string()),
    })
}
