// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Layered configuration
//!
//! Precedence, lowest first: built-in defaults, the user file
//! `<config_dir>/tmux-quick-tabs/config.toml`, an explicit `--config` file,
//! then `QUICK_TABS_*` environment variables.

use crate::error::TabsResult;
use config::{Case, Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const APP_DIR: &str = "tmux-quick-tabs";
pub const ENV_PREFIX: &str = "QUICK_TABS";

/// Keystrokes typed into a freshly surfaced pane
pub const DEFAULT_INIT_COMMAND: &str = "cd $(zoxide query -l | fzf); clear; ls -a";
pub const DEFAULT_WINDOW_PROMPT: &str = "Enter window name:";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TabsConfig {
    pub tmux_binary: String,
    /// Private server socket, passed as `tmux -L <name>`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socket_name: Option<String>,
    pub init_command: String,
    /// Executables the init command needs; missing ones only produce a warning
    pub required_executables: Vec<String>,
    pub window_prompt: String,
}

impl Default for TabsConfig {
    fn default() -> Self {
        Self {
            tmux_binary: "tmux".to_string(),
            socket_name: None,
            init_command: DEFAULT_INIT_COMMAND.to_string(),
            required_executables: vec!["zoxide".to_string(), "fzf".to_string()],
            window_prompt: DEFAULT_WINDOW_PROMPT.to_string(),
        }
    }
}

impl TabsConfig {
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    /// Load every layer, with `explicit` as the `--config` file
    pub fn load(explicit: Option<&Path>) -> TabsResult<Self> {
        Self::load_layers(Self::user_config_path().as_deref(), explicit)
    }

    /// Load with an explicit user file location. A missing user file is
    /// skipped; a missing explicit file is an error.
    pub fn load_layers(user_file: Option<&Path>, explicit: Option<&Path>) -> TabsResult<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = user_file {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }
        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        // QUICK_TABS_SOCKET_NAME -> "socket-name". Lists are only split when
        // parsing is on; parsed scalars still deserialize into strings.
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .convert_case(Case::Kebab)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("required-executables"),
        );

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Command run inside the New Tab popup.
    ///
    /// The popup's shell expands the init command (running the interactive
    /// picker in the popup) and types the result into the surfaced pane.
    pub fn popup_command(&self) -> String {
        let socket = self
            .socket_name
            .as_deref()
            .map(|name| format!("-L {} ", name))
            .unwrap_or_default();
        format!(
            "{} {}send-keys \"{}\" Enter",
            self.tmux_binary, socket, self.init_command
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    const ENV_KEYS: [&str; 3] = [
        "QUICK_TABS_SOCKET_NAME",
        "QUICK_TABS_TMUX_BINARY",
        "QUICK_TABS_REQUIRED_EXECUTABLES",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_default_popup_command() {
        let config = TabsConfig::default();
        assert_eq!(
            config.popup_command(),
            "tmux send-keys \"cd $(zoxide query -l | fzf); clear; ls -a\" Enter"
        );
    }

    #[test]
    fn test_popup_command_uses_socket() {
        let config = TabsConfig {
            socket_name: Some("work".into()),
            init_command: "ls".into(),
            ..Default::default()
        };
        assert_eq!(config.popup_command(), "tmux -L work send-keys \"ls\" Enter");
    }

    #[test]
    #[serial]
    fn test_defaults_without_files() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let config =
            TabsConfig::load_layers(Some(&dir.path().join("absent.toml")), None).unwrap();
        assert_eq!(config, TabsConfig::default());
    }

    #[test]
    #[serial]
    fn test_explicit_file_overrides_user_file() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let user = dir.path().join("user.toml");
        let explicit = dir.path().join("explicit.toml");
        fs::write(&user, "socket-name = \"user\"\nwindow-prompt = \"Name?\"\n").unwrap();
        fs::write(&explicit, "socket-name = \"explicit\"\n").unwrap();

        let config = TabsConfig::load_layers(Some(&user), Some(&explicit)).unwrap();

        assert_eq!(config.socket_name.as_deref(), Some("explicit"));
        assert_eq!(config.window_prompt, "Name?");
        assert_eq!(config.tmux_binary, "tmux");
    }

    #[test]
    #[serial]
    fn test_missing_explicit_file_is_an_error() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let result = TabsConfig::load_layers(None, Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(crate::TabsError::Config(_))));
    }

    #[test]
    #[serial]
    fn test_environment_has_highest_precedence() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("explicit.toml");
        fs::write(&explicit, "socket-name = \"file\"\n").unwrap();
        std::env::set_var("QUICK_TABS_SOCKET_NAME", "env");
        std::env::set_var("QUICK_TABS_REQUIRED_EXECUTABLES", "fzf,zoxide,rg");

        let config = TabsConfig::load_layers(None, Some(&explicit));
        clear_env();
        let config = config.unwrap();

        assert_eq!(config.socket_name.as_deref(), Some("env"));
        assert_eq!(config.required_executables, vec!["fzf", "zoxide", "rg"]);
    }

    #[test]
    #[serial]
    fn test_environment_list_and_numeric_values() {
        clear_env();
        std::env::set_var("QUICK_TABS_REQUIRED_EXECUTABLES", "a,b");
        std::env::set_var("QUICK_TABS_SOCKET_NAME", "42");
        std::env::set_var("QUICK_TABS_TMUX_BINARY", "/usr/local/bin/tmux");

        let config = TabsConfig::load_layers(None, None);
        clear_env();
        let config = config.unwrap();

        assert_eq!(config.required_executables, vec!["a", "b"]);
        assert_eq!(config.socket_name.as_deref(), Some("42"));
        assert_eq!(config.tmux_binary, "/usr/local/bin/tmux");
        assert_eq!(config.init_command, DEFAULT_INIT_COMMAND);
    }

    #[test]
    #[serial]
    fn test_serialized_config_loads_back() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = TabsConfig {
            tmux_binary: "/opt/tmux/bin/tmux".into(),
            socket_name: Some("tabs".into()),
            required_executables: vec!["fzf".into()],
            ..Default::default()
        };
        fs::write(&path, toml::to_string(&config).unwrap()).unwrap();

        assert_eq!(TabsConfig::load_layers(None, Some(&path)).unwrap(), config);
    }
}
