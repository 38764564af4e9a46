// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Command handlers end to end against the in-memory tmux

use qt_mux_core::testing::{FakeTmux, TmuxCall};
use qt_mux_core::{PaneRef, PaneTarget};
use qt_tabs::commands::{
    accept_command, choose_tab, close_tab, new_tab, new_window, next_tab, session_filter,
    CHOOSE_TREE_FORMAT,
};
use qt_tabs::{resolve_pane, TabContext, TabsConfig, TabsError};
use std::io::Cursor;

const GROUP: &str = "tabs_work_1_0";

fn config() -> TabsConfig {
    TabsConfig {
        required_executables: Vec::new(),
        ..Default::default()
    }
}

/// `%3` visible at work:1, with the given panes stored in its group
fn server_with_group(stored: &[&str]) -> FakeTmux {
    let tmux = FakeTmux::new();
    tmux.add_pane("work", 1, "%3");
    for (slot, pane) in stored.iter().enumerate() {
        tmux.add_pane(GROUP, slot as u32 + 1, pane);
    }
    tmux.set_current("%3");
    tmux
}

fn acting(tmux: &FakeTmux) -> PaneRef {
    let pane = resolve_pane(tmux, Some("%3")).unwrap();
    tmux.clear_calls();
    pane
}

fn swap(source: &str, target: &str) -> TmuxCall {
    TmuxCall::SwapPane {
        source: PaneTarget::at(source),
        target: target.to_string(),
    }
}

#[test]
fn test_new_tab_call_sequence() {
    let tmux = server_with_group(&["%11", "%12"]);
    let config = config();
    let pane = acting(&tmux);

    new_tab(&TabContext::new(&tmux, &config), &pane).unwrap();

    assert_eq!(
        tmux.mutations(),
        vec![
            TmuxCall::NewWindow(GROUP.into()),
            swap("%3", "%100"),
            TmuxCall::DisplayPopup(config.popup_command()),
            swap("tabs_work_1_0:1", "tabs_work_1_0:2"),
        ]
    );
    // Fresh pane is visible, the acting pane is stored last
    assert_eq!(tmux.panes_in("work", 1), vec!["%100"]);
    assert_eq!(tmux.slots(GROUP), vec!["%12", "%11", "%3"]);
}

#[test]
fn test_new_tab_creates_missing_group() {
    let tmux = server_with_group(&[]);
    let config = config();
    let pane = acting(&tmux);

    new_tab(&TabContext::new(&tmux, &config), &pane).unwrap();

    assert_eq!(
        tmux.mutations(),
        vec![
            TmuxCall::NewSession(GROUP.into()),
            TmuxCall::NewWindow(GROUP.into()),
            swap("%3", "%101"),
            TmuxCall::DisplayPopup(config.popup_command()),
        ]
    );
    assert_eq!(tmux.slots(GROUP), vec!["%100", "%3"]);
}

#[test]
fn test_new_tab_without_new_pane_is_protocol_error() {
    let tmux = server_with_group(&["%11"]);
    tmux.windows_report_no_pane();
    let config = config();
    let pane = acting(&tmux);

    let err = new_tab(&TabContext::new(&tmux, &config), &pane).unwrap_err();

    assert!(matches!(err, TabsError::RemoteProtocol(_)), "{err:?}");
    assert_eq!(tmux.mutations(), vec![TmuxCall::NewWindow(GROUP.into())]);
}

#[test]
fn test_next_tab_surfaces_oldest_and_rotates() {
    let tmux = server_with_group(&["%11", "%12"]);
    let config = config();
    let pane = acting(&tmux);

    next_tab(&TabContext::new(&tmux, &config), &pane).unwrap();

    assert_eq!(
        tmux.mutations(),
        vec![
            swap("%3", "tabs_work_1_0:1"),
            swap("tabs_work_1_0:1", "tabs_work_1_0:2"),
        ]
    );
    assert_eq!(tmux.panes_in("work", 1), vec!["%11"]);
    assert_eq!(tmux.slots(GROUP), vec!["%12", "%3"]);
}

#[test]
fn test_next_tab_creates_group_with_short_form_call() {
    let tmux = server_with_group(&[]);
    let config = config();
    let pane = acting(&tmux);

    next_tab(&TabContext::new(&tmux, &config), &pane).unwrap();

    assert_eq!(
        tmux.mutations(),
        vec![
            TmuxCall::NewSessionUnchecked(GROUP.into()),
            swap("%3", "tabs_work_1_0:1"),
        ]
    );
    assert_eq!(tmux.slots(GROUP), vec!["%3"]);
}

#[test]
fn test_next_tab_tolerates_group_that_never_appears() {
    let tmux = server_with_group(&[]);
    tmux.unchecked_creation_is_lost();
    let config = config();
    let pane = acting(&tmux);

    next_tab(&TabContext::new(&tmux, &config), &pane).unwrap();

    assert_eq!(
        tmux.mutations(),
        vec![
            TmuxCall::NewSessionUnchecked(GROUP.into()),
            swap("%3", "tabs_work_1_0:1"),
        ]
    );
    assert!(!tmux.has_session(GROUP));
    assert_eq!(tmux.panes_in("work", 1), vec!["%3"]);
}

#[test]
fn test_choose_tab_opens_filtered_picker() {
    let tmux = server_with_group(&["%11"]);
    let config = config();
    let pane = acting(&tmux);

    choose_tab(&TabContext::new(&tmux, &config), &pane).unwrap();

    assert_eq!(
        tmux.mutations(),
        vec![TmuxCall::ChooseTree {
            pane: "%3".into(),
            format: CHOOSE_TREE_FORMAT.into(),
            filter: session_filter(GROUP),
            command: accept_command("%3"),
        }]
    );
    assert_eq!(tmux.slots(GROUP), vec!["%11"]);
}

#[test]
fn test_close_tab_without_group_kills_pane() {
    let tmux = FakeTmux::new();
    tmux.add_pane("alpha", 1, "%0").add_pane("alpha", 2, "%3");
    let config = config();
    let pane = acting(&tmux);

    close_tab(&TabContext::new(&tmux, &config), &pane).unwrap();

    assert_eq!(tmux.mutations(), vec![TmuxCall::KillPane("%3".into())]);
    assert!(!tmux
        .calls()
        .iter()
        .any(|call| matches!(call, TmuxCall::SwapPane { .. })));
}

#[test]
fn test_close_tab_swaps_then_kills_first_slot() {
    let tmux = server_with_group(&["%11", "%12", "%13"]);
    let config = config();
    let pane = acting(&tmux);

    close_tab(&TabContext::new(&tmux, &config), &pane).unwrap();

    assert_eq!(
        tmux.mutations(),
        vec![
            swap("%3", "tabs_work_1_0:1"),
            TmuxCall::KillPane("tabs_work_1_0:1".into()),
        ]
    );
    assert_eq!(tmux.panes_in("work", 1), vec!["%11"]);
    // No renumbering of the remaining slots
    assert!(tmux.panes_in(GROUP, 1).is_empty());
    assert_eq!(tmux.panes_in(GROUP, 2), vec!["%12"]);
    assert!(tmux.has_session(GROUP));
}

#[test]
fn test_new_window_splits_words() {
    let tmux = server_with_group(&[]);
    let config = config();
    let mut input = Cursor::new("foo bar\n");
    let mut output = Vec::new();

    new_window(&TabContext::new(&tmux, &config), None, &mut input, &mut output).unwrap();

    assert_eq!(
        tmux.mutations(),
        vec![
            TmuxCall::NewNamedWindow {
                target: PaneTarget::Current,
                words: vec!["foo".into(), "bar".into()],
            },
            TmuxCall::SendKeys {
                target: PaneTarget::Current,
                keys: config.init_command.clone(),
                enter: true,
            },
        ]
    );
    assert_eq!(String::from_utf8(output).unwrap(), "Enter window name:\n");
}

#[test]
fn test_new_window_sends_init_keys_after_failed_creation() {
    let tmux = server_with_group(&[]);
    let config = config();
    let mut input = Cursor::new("\n");
    let mut output = Vec::new();

    new_window(&TabContext::new(&tmux, &config), None, &mut input, &mut output).unwrap();

    let calls = tmux.calls();
    assert_eq!(
        calls[0],
        TmuxCall::NewNamedWindow {
            target: PaneTarget::Current,
            words: Vec::new(),
        }
    );
    let sends = calls
        .iter()
        .filter(|call| matches!(call, TmuxCall::SendKeys { .. }))
        .count();
    assert_eq!(sends, 1);
}

#[test]
fn test_new_window_opens_in_given_pane_session() {
    let tmux = server_with_group(&[]);
    let config = config();
    let pane = acting(&tmux);
    let mut input = Cursor::new("logs\n");
    let mut output = Vec::new();

    new_window(&TabContext::new(&tmux, &config), Some(&pane), &mut input, &mut output).unwrap();

    assert_eq!(
        tmux.mutations(),
        vec![
            TmuxCall::NewNamedWindow {
                target: PaneTarget::at("work:"),
                words: vec!["logs".into()],
            },
            TmuxCall::SendKeys {
                target: PaneTarget::Current,
                keys: config.init_command.clone(),
                enter: true,
            },
        ]
    );
}

#[test]
fn test_new_window_ignores_required_executables() {
    let tmux = server_with_group(&[]);
    let config = TabsConfig {
        required_executables: vec!["qt-missing-tool".into()],
        ..Default::default()
    };
    let mut input = Cursor::new("logs\n");
    let mut output = Vec::new();

    new_window(&TabContext::new(&tmux, &config), None, &mut input, &mut output).unwrap();

    // Only the prompt reaches stdout and the call sequence is unchanged
    assert_eq!(String::from_utf8(output).unwrap(), "Enter window name:\n");
    assert_eq!(tmux.mutations().len(), 2);
}
