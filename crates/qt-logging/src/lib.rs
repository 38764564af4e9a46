// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Centralized logging utilities for tmux quick tabs
//!
//! Commands are usually launched from tmux key bindings (`run-shell`,
//! `display-popup`), where anything printed on stdout is shown to the user.
//! Console logging therefore goes to stderr; `--log-file`/`--log-dir` move it
//! to a file instead.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-export Level for convenience
pub use tracing::Level;

const APP_DIR: &str = "tmux-quick-tabs";

/// Output format for log messages
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable plaintext format
    #[default]
    Plaintext,
    /// Structured JSON format
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Plaintext => write!(f, "plaintext"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// CLI log level enum for clap integration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CliLogLevel {
    /// Only error conditions
    Error,
    /// Errors and warnings
    #[default]
    Warn,
    /// Errors, warnings, and informational messages
    Info,
    /// All above plus debug information
    Debug,
    /// All above plus detailed tracing
    Trace,
}

impl From<CliLogLevel> for Level {
    fn from(level: CliLogLevel) -> Self {
        match level {
            CliLogLevel::Error => Level::ERROR,
            CliLogLevel::Warn => Level::WARN,
            CliLogLevel::Info => Level::INFO,
            CliLogLevel::Debug => Level::DEBUG,
            CliLogLevel::Trace => Level::TRACE,
        }
    }
}

impl std::fmt::Display for CliLogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliLogLevel::Error => write!(f, "error"),
            CliLogLevel::Warn => write!(f, "warn"),
            CliLogLevel::Info => write!(f, "info"),
            CliLogLevel::Debug => write!(f, "debug"),
            CliLogLevel::Trace => write!(f, "trace"),
        }
    }
}

/// Logging arguments shared by every binary; use with `#[command(flatten)]`
#[derive(Clone, Debug, Default, clap::Args, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CliLoggingArgs {
    /// Log verbosity level
    #[arg(long, value_enum, global = true, help = "Log verbosity level (default: warn)")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<CliLogLevel>,

    /// Log output format
    #[arg(long, value_enum, global = true, help = "Log output format (default: plaintext)")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_format: Option<LogFormat>,

    /// Directory for log files
    #[arg(long, global = true, help = "Directory for log files (default: platform specific)")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,

    /// Log filename
    #[arg(long, global = true, help = "Log filename")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
}

impl CliLoggingArgs {
    /// Initialize logging from the parsed arguments.
    ///
    /// Logs go to stderr unless `--log-file` or `--log-dir` is given, in which
    /// case they are appended to the resolved file.
    pub fn init(self, component: &str) -> anyhow::Result<()> {
        let level = self.log_level.unwrap_or_default().into();
        let format = self.log_format.unwrap_or_default();

        if self.logs_to_file() {
            let log_path = self.resolve_log_path(component);
            init_to_file(component, level, format, &log_path)
        } else {
            init_with_writer(component, level, format, io::stderr)
        }
    }

    fn logs_to_file(&self) -> bool {
        self.log_file.is_some() || self.log_dir.is_some()
    }

    /// Resolve the log file path:
    /// 1. an absolute `log_file` is used as is
    /// 2. a relative `log_file` is placed under `log_dir` when given
    /// 3. `log_dir` alone gets `<component>.log`
    /// 4. otherwise the platform standard location
    fn resolve_log_path(&self, component: &str) -> PathBuf {
        match (&self.log_file, &self.log_dir) {
            (Some(file), _) if Path::new(file).is_absolute() => PathBuf::from(file),
            (Some(file), Some(dir)) => Path::new(dir).join(file),
            (Some(file), None) => {
                let file_path = Path::new(file);
                if file_path.parent().is_some_and(|p| !p.as_os_str().is_empty()) {
                    file_path.to_path_buf()
                } else {
                    standard_log_dir().join(file)
                }
            }
            (None, Some(dir)) => Path::new(dir).join(format!("{}.log", component)),
            (None, None) => standard_log_dir().join(format!("{}.log", component)),
        }
    }
}

/// Platform directory holding log files
///
/// - macOS: ~/Library/Logs/tmux-quick-tabs
/// - elsewhere: `<data dir>/tmux-quick-tabs` (e.g. ~/.local/share/tmux-quick-tabs)
fn standard_log_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
        path.push("Library");
        path.push("Logs");
        path.push(APP_DIR);
        path
    }

    #[cfg(not(target_os = "macos"))]
    {
        let mut path = dirs::data_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from("/tmp")));
        path.push(APP_DIR);
        path
    }
}

/// Initialize logging appended to `log_path`, creating parent directories
fn init_to_file(
    component: &str,
    default_level: Level,
    format: LogFormat,
    log_path: &Path,
) -> anyhow::Result<()> {
    use std::fs;

    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let log_file = fs::OpenOptions::new().create(true).append(true).open(log_path)?;

    init_with_writer(component, default_level, format, log_file)
}

/// Initialize logging with a custom writer. `RUST_LOG` overrides `default_level`.
fn init_with_writer<W>(
    component: &str,
    default_level: Level,
    format: LogFormat,
    writer: W,
) -> anyhow::Result<()>
where
    W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(component, default_level)));

    match format {
        LogFormat::Json => {
            let layer = tracing_subscriber::fmt::layer().with_writer(writer).json();
            #[cfg(debug_assertions)]
            let layer = layer.with_file(true).with_line_number(true);

            tracing_subscriber::registry().with(filter).with(layer).try_init()?;
        }
        LogFormat::Plaintext => {
            let layer = tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false);
            #[cfg(debug_assertions)]
            let layer = layer.with_file(true).with_line_number(true);

            tracing_subscriber::registry().with(filter).with(layer).try_init()?;
        }
    }

    Ok(())
}

/// Filter directive: the global default plus the component's own target
fn default_directive(component: &str, level: Level) -> String {
    format!("{},{}={}", level, component.replace('-', "_"), level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_log_level_conversion() {
        assert_eq!(Level::from(CliLogLevel::Error), Level::ERROR);
        assert_eq!(Level::from(CliLogLevel::Warn), Level::WARN);
        assert_eq!(Level::from(CliLogLevel::Info), Level::INFO);
        assert_eq!(Level::from(CliLogLevel::Debug), Level::DEBUG);
        assert_eq!(Level::from(CliLogLevel::Trace), Level::TRACE);
    }

    #[test]
    fn test_cli_log_level_default_is_warn() {
        assert_eq!(CliLogLevel::default(), CliLogLevel::Warn);
        assert_eq!(CliLogLevel::default().to_string(), "warn");
    }

    #[test]
    fn test_default_directive_uses_crate_target() {
        assert_eq!(
            default_directive("tmux-quick-tabs", Level::INFO),
            "INFO,tmux_quick_tabs=INFO"
        );
    }

    #[test]
    fn test_console_is_default_sink() {
        let args = CliLoggingArgs::default();
        assert!(!args.logs_to_file());

        let args = CliLoggingArgs {
            log_dir: Some("/var/log/qt".into()),
            ..Default::default()
        };
        assert!(args.logs_to_file());
    }

    #[test]
    fn test_resolve_log_path() {
        let args = CliLoggingArgs {
            log_file: Some("/abs/tabs.log".into()),
            log_dir: Some("/ignored".into()),
            ..Default::default()
        };
        assert_eq!(args.resolve_log_path("qt"), PathBuf::from("/abs/tabs.log"));

        let args = CliLoggingArgs {
            log_file: Some("tabs.log".into()),
            log_dir: Some("/logs".into()),
            ..Default::default()
        };
        assert_eq!(args.resolve_log_path("qt"), PathBuf::from("/logs/tabs.log"));

        let args = CliLoggingArgs {
            log_dir: Some("/logs".into()),
            ..Default::default()
        };
        assert_eq!(args.resolve_log_path("qt"), PathBuf::from("/logs/qt.log"));

        let args = CliLoggingArgs {
            log_file: Some("tabs.log".into()),
            ..Default::default()
        };
        assert_eq!(args.resolve_log_path("qt"), standard_log_dir().join("tabs.log"));

        let args = CliLoggingArgs::default();
        assert!(args.resolve_log_path("qt").ends_with("tmux-quick-tabs/qt.log"));
    }

    #[test]
    fn test_args_serialize_kebab_case() {
        let args = CliLoggingArgs {
            log_level: Some(CliLogLevel::Debug),
            log_format: Some(LogFormat::Json),
            ..Default::default()
        };
        let json = serde_json::to_value(&args).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "log-level": "debug", "log-format": "json" })
        );
    }

    // The only test in this crate that installs the global subscriber
    #[test]
    fn test_init_to_file_writes_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("qt-test.log");

        init_to_file("qt-test", Level::WARN, LogFormat::Plaintext, &path).unwrap();
        tracing::warn!(group = "tabs_main_1_0", "Logged to file");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Logged to file"));
        assert!(contents.contains("tabs_main_1_0"));
    }
}
