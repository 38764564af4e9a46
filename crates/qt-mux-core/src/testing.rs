// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! In-memory tmux stand-in for tests
//!
//! [`FakeTmux`] keeps a tiny model of sessions, windows and panes, applies the
//! mutating commands to it the way tmux would, and records every call so tests
//! can assert on the exact command sequence a handler issued.

use crate::{MuxError, PaneCoordinates, PaneRef, PaneTarget, SessionRef, TmuxControl, WindowRef};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// A recorded call against [`FakeTmux`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TmuxCall {
    DisplayMessage { target: String, format: String },
    FindPane(String),
    FindSession(String),
    NewSession(String),
    NewSessionUnchecked(String),
    NewWindow(String),
    ListWindows(String),
    SwapPane { source: PaneTarget, target: String },
    KillPane(String),
    ChooseTree { pane: String, format: String, filter: String, command: String },
    DisplayPopup(String),
    SendKeys { target: PaneTarget, keys: String, enter: bool },
    NewNamedWindow { target: PaneTarget, words: Vec<String> },
}

impl TmuxCall {
    /// Read-only lookups; everything else changes server state or the UI
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            TmuxCall::DisplayMessage { .. }
                | TmuxCall::FindPane(_)
                | TmuxCall::FindSession(_)
                | TmuxCall::ListWindows(_)
        )
    }
}

#[derive(Debug, Default)]
struct FakeSession {
    id: String,
    name: String,
    /// window index -> panes in pane-index order
    windows: BTreeMap<u32, Vec<String>>,
}

#[derive(Debug, Default)]
struct FakeState {
    sessions: Vec<FakeSession>,
    current: Option<String>,
    next_pane: u32,
    next_session: u32,
    unchecked_creation_registers: bool,
    windows_without_panes: bool,
}

impl FakeState {
    fn session(&self, name: &str) -> Option<&FakeSession> {
        self.sessions.iter().find(|s| s.name == name)
    }

    fn session_mut(&mut self, name: &str) -> Option<&mut FakeSession> {
        self.sessions.iter_mut().find(|s| s.name == name)
    }

    fn allocate_pane(&mut self) -> String {
        let id = format!("%{}", self.next_pane);
        self.next_pane += 1;
        id
    }

    fn create_session(&mut self, name: &str) -> Result<SessionRef, MuxError> {
        if self.session(name).is_some() {
            return Err(MuxError::CommandFailed(format!("duplicate session: {}", name)));
        }
        let pane = self.allocate_pane();
        let id = format!("${}", self.next_session);
        self.next_session += 1;
        let mut windows = BTreeMap::new();
        windows.insert(1, vec![pane]);
        self.sessions.push(FakeSession {
            id: id.clone(),
            name: name.to_string(),
            windows,
        });
        Ok(SessionRef {
            id,
            name: name.to_string(),
        })
    }

    /// Resolve a pane id or `session:window[.pane]` address to (session, window, pane position)
    fn locate(&self, target: &str) -> Result<(usize, u32, usize), MuxError> {
        if target.starts_with('%') {
            for (s, session) in self.sessions.iter().enumerate() {
                for (w, panes) in &session.windows {
                    if let Some(p) = panes.iter().position(|id| id == target) {
                        return Ok((s, *w, p));
                    }
                }
            }
            return Err(MuxError::PaneNotFound(target.to_string()));
        }

        let (session_name, rest) = target
            .rsplit_once(':')
            .ok_or_else(|| MuxError::SessionNotFound(target.to_string()))?;
        let (window, pane) = match rest.split_once('.') {
            Some((w, p)) => (w, p.parse::<usize>().ok()),
            None => (rest, None),
        };
        let s = self
            .sessions
            .iter()
            .position(|s| s.name == session_name)
            .ok_or_else(|| MuxError::SessionNotFound(session_name.to_string()))?;
        let w: u32 = window
            .parse()
            .map_err(|_| MuxError::PaneNotFound(target.to_string()))?;
        let panes = self.sessions[s]
            .windows
            .get(&w)
            .ok_or_else(|| MuxError::PaneNotFound(target.to_string()))?;
        let p = pane.unwrap_or(0);
        if p >= panes.len() {
            return Err(MuxError::PaneNotFound(target.to_string()));
        }
        Ok((s, w, p))
    }

    fn pane_at(&self, (s, w, p): (usize, u32, usize)) -> &str {
        &self.sessions[s].windows[&w][p]
    }

    fn coordinates(&self, (s, w, p): (usize, u32, usize)) -> PaneCoordinates {
        PaneCoordinates {
            session_name: self.sessions[s].name.clone(),
            window_index: w,
            pane_index: p as u32,
        }
    }
}

/// Recording in-memory tmux server
#[derive(Debug, Default)]
pub struct FakeTmux {
    state: RefCell<FakeState>,
    calls: RefCell<Vec<TmuxCall>>,
}

impl FakeTmux {
    pub fn new() -> Self {
        let fake = Self::default();
        {
            let mut state = fake.state.borrow_mut();
            state.unchecked_creation_registers = true;
            state.next_pane = 100;
        }
        fake
    }

    /// Place `pane_id` at `session:window` (appended as the next pane index)
    pub fn add_pane(&self, session: &str, window: u32, pane_id: &str) -> &Self {
        let mut state = self.state.borrow_mut();
        if state.session(session).is_none() {
            let id = format!("${}", state.next_session);
            state.next_session += 1;
            state.sessions.push(FakeSession {
                id,
                name: session.to_string(),
                windows: BTreeMap::new(),
            });
        }
        if let Some(s) = state.session_mut(session) {
            s.windows.entry(window).or_default().push(pane_id.to_string());
        }
        self
    }

    /// Pane that `PaneTarget::Current` resolves to
    pub fn set_current(&self, pane_id: &str) -> &Self {
        self.state.borrow_mut().current = Some(pane_id.to_string());
        self
    }

    /// Make `new -d -s` record the call without creating anything
    pub fn unchecked_creation_is_lost(&self) -> &Self {
        self.state.borrow_mut().unchecked_creation_registers = false;
        self
    }

    /// Make `new-window` report no pane
    pub fn windows_report_no_pane(&self) -> &Self {
        self.state.borrow_mut().windows_without_panes = true;
        self
    }

    /// Every call in issue order
    pub fn calls(&self) -> Vec<TmuxCall> {
        self.calls.borrow().clone()
    }

    /// Calls that change server state or the UI, in issue order
    pub fn mutations(&self) -> Vec<TmuxCall> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| !c.is_query())
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn has_session(&self, name: &str) -> bool {
        self.state.borrow().session(name).is_some()
    }

    /// Pane ids of `session` ordered by window index (first pane of each window)
    pub fn slots(&self, session: &str) -> Vec<String> {
        self.state
            .borrow()
            .session(session)
            .map(|s| s.windows.values().filter_map(|panes| panes.first().cloned()).collect())
            .unwrap_or_default()
    }

    /// Pane ids of `session:window`
    pub fn panes_in(&self, session: &str, window: u32) -> Vec<String> {
        self.state
            .borrow()
            .session(session)
            .and_then(|s| s.windows.get(&window).cloned())
            .unwrap_or_default()
    }

    fn record(&self, call: TmuxCall) {
        self.calls.borrow_mut().push(call);
    }

    fn resolve(&self, target: &PaneTarget) -> Result<String, MuxError> {
        match target {
            PaneTarget::At(t) => Ok(t.clone()),
            PaneTarget::Current => self
                .state
                .borrow()
                .current
                .clone()
                .ok_or_else(|| MuxError::CommandFailed("no current client".into())),
        }
    }
}

impl TmuxControl for FakeTmux {
    fn is_available(&self) -> bool {
        true
    }

    fn display_message(&self, target: &str, format: &str) -> Result<String, MuxError> {
        self.record(TmuxCall::DisplayMessage {
            target: target.to_string(),
            format: format.to_string(),
        });
        let state = self.state.borrow();
        let location = state.locate(target)?;
        let coords = state.coordinates(location);
        Ok(format
            .replace("#{session_name}", &coords.session_name)
            .replace("#{window_index}", &coords.window_index.to_string())
            .replace("#{pane_index}", &coords.pane_index.to_string())
            .replace("#{pane_id}", state.pane_at(location)))
    }

    fn find_pane(&self, pane_id: &str) -> Result<Option<PaneRef>, MuxError> {
        self.record(TmuxCall::FindPane(pane_id.to_string()));
        let state = self.state.borrow();
        if !pane_id.starts_with('%') {
            return Ok(None);
        }
        Ok(state.locate(pane_id).ok().map(|location| PaneRef {
            id: pane_id.to_string(),
            coordinates: state.coordinates(location),
        }))
    }

    fn find_session(&self, name: &str) -> Result<Option<SessionRef>, MuxError> {
        self.record(TmuxCall::FindSession(name.to_string()));
        Ok(self.state.borrow().session(name).map(|s| SessionRef {
            id: s.id.clone(),
            name: s.name.clone(),
        }))
    }

    fn new_session(&self, name: &str) -> Result<SessionRef, MuxError> {
        self.record(TmuxCall::NewSession(name.to_string()));
        self.state.borrow_mut().create_session(name)
    }

    fn new_session_unchecked(&self, name: &str) -> Result<(), MuxError> {
        self.record(TmuxCall::NewSessionUnchecked(name.to_string()));
        let mut state = self.state.borrow_mut();
        if state.unchecked_creation_registers {
            state.create_session(name)?;
        }
        Ok(())
    }

    fn new_window(&self, session: &str) -> Result<WindowRef, MuxError> {
        self.record(TmuxCall::NewWindow(session.to_string()));
        let mut state = self.state.borrow_mut();
        let pane = state.allocate_pane();
        let no_pane = state.windows_without_panes;
        let s = state
            .session_mut(session)
            .ok_or_else(|| MuxError::SessionNotFound(session.to_string()))?;
        let index = s.windows.keys().next_back().map_or(1, |last| last + 1);
        s.windows.insert(index, vec![pane.clone()]);
        Ok(WindowRef {
            index,
            pane_id: (!no_pane).then_some(pane),
        })
    }

    fn list_windows(&self, session: &str) -> Result<Vec<WindowRef>, MuxError> {
        self.record(TmuxCall::ListWindows(session.to_string()));
        let state = self.state.borrow();
        let s = state
            .session(session)
            .ok_or_else(|| MuxError::SessionNotFound(session.to_string()))?;
        Ok(s.windows
            .iter()
            .map(|(index, panes)| WindowRef {
                index: *index,
                pane_id: panes.first().cloned(),
            })
            .collect())
    }

    fn swap_pane(&self, source: &PaneTarget, target: &str) -> Result<(), MuxError> {
        self.record(TmuxCall::SwapPane {
            source: source.clone(),
            target: target.to_string(),
        });
        let source = self.resolve(source)?;
        let mut state = self.state.borrow_mut();
        let (ss, sw, sp) = state.locate(&source)?;
        let (ts, tw, tp) = state.locate(target)?;
        let a = state.pane_at((ss, sw, sp)).to_string();
        let b = state.pane_at((ts, tw, tp)).to_string();
        if let Some(panes) = state.sessions[ss].windows.get_mut(&sw) {
            panes[sp] = b;
        }
        if let Some(panes) = state.sessions[ts].windows.get_mut(&tw) {
            panes[tp] = a;
        }
        Ok(())
    }

    fn kill_pane(&self, target: &str) -> Result<(), MuxError> {
        self.record(TmuxCall::KillPane(target.to_string()));
        let mut state = self.state.borrow_mut();
        let (s, w, p) = state.locate(target)?;
        let session = &mut state.sessions[s];
        let window_empty = session.windows.get_mut(&w).map_or(false, |panes| {
            panes.remove(p);
            panes.is_empty()
        });
        if window_empty {
            session.windows.remove(&w);
        }
        // tmux destroys a session together with its last window
        if session.windows.is_empty() {
            state.sessions.remove(s);
        }
        Ok(())
    }

    fn choose_tree(
        &self,
        pane_id: &str,
        format: &str,
        filter: &str,
        command: &str,
    ) -> Result<(), MuxError> {
        self.record(TmuxCall::ChooseTree {
            pane: pane_id.to_string(),
            format: format.to_string(),
            filter: filter.to_string(),
            command: command.to_string(),
        });
        self.state.borrow().locate(pane_id).map(|_| ())
    }

    fn display_popup(&self, command: &str) -> Result<(), MuxError> {
        self.record(TmuxCall::DisplayPopup(command.to_string()));
        Ok(())
    }

    fn send_keys(&self, target: &PaneTarget, keys: &str, enter: bool) -> Result<(), MuxError> {
        self.record(TmuxCall::SendKeys {
            target: target.clone(),
            keys: keys.to_string(),
            enter,
        });
        let pane = self.resolve(target)?;
        self.state.borrow().locate(&pane).map(|_| ())
    }

    fn new_named_window(&self, target: &PaneTarget, words: &[String]) -> Result<(), MuxError> {
        self.record(TmuxCall::NewNamedWindow {
            target: target.clone(),
            words: words.to_vec(),
        });
        if words.is_empty() {
            return Err(MuxError::CommandFailed(
                "new-window: option requires an argument -- n".into(),
            ));
        }
        if let Some(target) = target.as_arg() {
            let session = target.rsplit_once(':').map_or(target, |(session, _)| session);
            if self.state.borrow().session(session).is_none() {
                return Err(MuxError::SessionNotFound(session.to_string()));
            }
        }
        Ok(())
    }
}
