//! In-memory [`Multiplexer`] for tests.
//!
//! `FakeMultiplexer` keeps sessions, windows and panes in a mutex-guarded
//! model that follows tmux semantics closely enough for the orchestration
//! layer: stable `%N` pane ids, indices renumbered on close, a configurable
//! window base index, and zoom cleared by splits and re-tiling. Every call
//! is recorded as a [`Call`] so tests can assert on what was sent.

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use chrono::Utc;

use super::{Multiplexer, PaneScope};
use crate::{
    types::{PaneId, PaneInfo, SessionName, SessionSummary, WindowInfo, WindowRef},
    Error, Result,
};

/// Title tmux gives a fresh pane before anyone sets one.
pub const DEFAULT_PANE_TITLE: &str = "localhost";

/// One recorded multiplexer call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    HasSession(String),
    NewSession { session: String, workdir: PathBuf },
    ListSessions,
    KillSession(String),
    SessionPath(String),
    ListWindows(String),
    ListPanes(String),
    SplitWindow { window: String, workdir: PathBuf },
    ApplyTiledLayout(String),
    SetPaneTitle { pane: String, title: String },
    SendText { pane: String, text: String },
    SendInterrupt(String),
    CapturePane { pane: String, lines: u32 },
    SelectWindow(String),
    SelectPane(String),
    ToggleZoom(String),
    Attach(String),
}

#[derive(Debug, Clone)]
struct FakePane {
    id: u32,
    title: String,
    command: String,
}

#[derive(Debug, Clone)]
struct FakeWindow {
    index: u32,
    id: u32,
    zoomed: bool,
    active: usize,
    panes: Vec<FakePane>,
}

#[derive(Debug, Clone)]
struct FakeSession {
    name: String,
    path: PathBuf,
    windows: Vec<FakeWindow>,
}

#[derive(Debug, Default)]
struct State {
    base_index: u32,
    next_pane: u32,
    next_window: u32,
    pane_limit: Option<usize>,
    sessions: Vec<FakeSession>,
    captures: HashMap<String, String>,
    failing_captures: HashSet<String>,
    calls: Vec<Call>,
}

impl State {
    fn session(&self, name: &str) -> Result<&FakeSession> {
        self.sessions
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| missing("session", name))
    }

    fn session_mut(&mut self, name: &str) -> Result<&mut FakeSession> {
        self.sessions
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| missing("session", name))
    }

    fn window_mut(&mut self, window: &WindowRef) -> Result<&mut FakeWindow> {
        let target = window.target();
        self.session_mut(window.session.as_str())?
            .windows
            .iter_mut()
            .find(|w| w.index == window.index)
            .ok_or_else(|| missing("window", &target))
    }

    /// (session index, window index, pane index) of a pane id.
    fn locate(&self, pane: &PaneId) -> Result<(usize, usize, usize)> {
        let wanted = pane_number(pane);
        self.sessions
            .iter()
            .enumerate()
            .find_map(|(s, session)| {
                session.windows.iter().enumerate().find_map(|(w, window)| {
                    window
                        .panes
                        .iter()
                        .position(|p| Some(p.id) == wanted)
                        .map(|p| (s, w, p))
                })
            })
            .ok_or_else(|| missing("pane", pane.as_str()))
    }

    fn fresh_pane(&mut self) -> FakePane {
        let id = self.next_pane;
        self.next_pane += 1;
        FakePane {
            id,
            title: DEFAULT_PANE_TITLE.to_string(),
            command: "zsh".to_string(),
        }
    }

    fn fresh_window(&mut self, index: u32) -> FakeWindow {
        let id = self.next_window;
        self.next_window += 1;
        let pane = self.fresh_pane();
        FakeWindow {
            index,
            id,
            zoomed: false,
            active: 0,
            panes: vec![pane],
        }
    }
}

fn missing(kind: &str, target: &str) -> Error {
    Error::command_error("tmux", "lookup", format!("can't find {kind}: {target}"))
}

fn pane_number(pane: &PaneId) -> Option<u32> {
    pane.as_str().strip_prefix('%').and_then(|d| d.parse().ok())
}

fn pane_id(number: u32) -> Result<PaneId> {
    PaneId::parse(format!("%{number}"))
}

fn pane_info(window: &FakeWindow, index: usize, pane: &FakePane) -> Result<PaneInfo> {
    Ok(PaneInfo {
        id: pane_id(pane.id)?,
        index: u32::try_from(index).map_err(|e| Error::parse_error(e.to_string()))?,
        window_index: window.index,
        width: 80,
        height: 24,
        current_command: pane.command.clone(),
        title: pane.title.clone(),
    })
}

/// In-memory tmux server.
#[derive(Debug, Default)]
pub struct FakeMultiplexer {
    state: Mutex<State>,
}

impl FakeMultiplexer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number windows from `base` (tmux `base-index`).
    #[must_use]
    pub fn with_base_index(base: u32) -> Self {
        let fake = Self::default();
        fake.state().base_index = base;
        fake
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: Call) {
        self.state().calls.push(call);
    }

    /// Refuse splits once a window holds `limit` panes, like tmux does when
    /// the window is too small.
    pub fn limit_panes(&self, limit: usize) {
        self.state().pane_limit = Some(limit);
    }

    /// Create a session with `panes` panes in its first window, without
    /// recording any calls. Returns the pane ids in index order.
    pub fn seed_session(&self, session: &str, workdir: &Path, panes: usize) -> Vec<PaneId> {
        let mut state = self.state();
        let base = state.base_index;
        let mut window = state.fresh_window(base);
        for _ in 1..panes {
            let pane = state.fresh_pane();
            window.panes.push(pane);
        }
        let ids = window
            .panes
            .iter()
            .filter_map(|p| pane_id(p.id).ok())
            .collect();
        state.sessions.push(FakeSession {
            name: session.to_string(),
            path: workdir.to_path_buf(),
            windows: vec![window],
        });
        ids
    }

    /// Append another single-pane window to a seeded session.
    pub fn seed_window(&self, session: &str) -> Option<PaneId> {
        let mut state = self.state();
        let next_index = state
            .session(session)
            .ok()?
            .windows
            .iter()
            .map(|w| w.index + 1)
            .max()?;
        let window = state.fresh_window(next_index);
        let id = pane_id(window.panes.first()?.id).ok();
        state.session_mut(session).ok()?.windows.push(window);
        id
    }

    /// Overwrite a pane title without recording a call.
    pub fn seed_title(&self, pane: &PaneId, title: &str) {
        let mut state = self.state();
        if let Ok((s, w, p)) = state.locate(pane) {
            state.sessions[s].windows[w].panes[p].title = title.to_string();
        }
    }

    /// Scrollback returned by `capture_pane` for this pane.
    pub fn set_capture(&self, pane: &PaneId, text: &str) {
        self.state()
            .captures
            .insert(pane.as_str().to_string(), text.to_string());
    }

    /// Make `capture_pane` fail for this pane.
    pub fn fail_capture(&self, pane: &PaneId) {
        self.state()
            .failing_captures
            .insert(pane.as_str().to_string());
    }

    /// Remove a pane (its process exited), renumbering the rest.
    pub fn close_pane(&self, pane: &PaneId) {
        let mut state = self.state();
        if let Ok((s, w, p)) = state.locate(pane) {
            let window = &mut state.sessions[s].windows[w];
            window.panes.remove(p);
            window.active = 0;
            if window.panes.is_empty() {
                state.sessions[s].windows.remove(w);
                if state.sessions[s].windows.is_empty() {
                    state.sessions.remove(s);
                }
            }
        }
    }

    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    #[must_use]
    pub fn split_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::SplitWindow { .. }))
            .count()
    }

    /// Text sent to a pane, in order.
    #[must_use]
    pub fn sent_text(&self, pane: &PaneId) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SendText { pane: p, text } if p == pane.as_str() => Some(text),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn interrupt_count(&self, pane: &PaneId) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::SendInterrupt(p) if p == pane.as_str()))
            .count()
    }

    #[must_use]
    pub fn has(&self, session: &str) -> bool {
        self.state().session(session).is_ok()
    }

    /// Pane titles of a session in tmux order.
    #[must_use]
    pub fn titles(&self, session: &str) -> Vec<String> {
        self.state().session(session).map_or_else(
            |_| Vec::new(),
            |s| {
                s.windows
                    .iter()
                    .flat_map(|w| w.panes.iter().map(|p| p.title.clone()))
                    .collect()
            },
        )
    }

    /// Pane count of a session's first window.
    #[must_use]
    pub fn pane_count(&self, session: &str) -> usize {
        self.state()
            .session(session)
            .ok()
            .and_then(|s| s.windows.iter().min_by_key(|w| w.index))
            .map_or(0, |w| w.panes.len())
    }

    #[must_use]
    pub fn is_zoomed(&self, session: &str, window: u32) -> bool {
        self.state().session(session).is_ok_and(|s| {
            s.windows
                .iter()
                .any(|w| w.index == window && w.zoomed)
        })
    }

    /// Active pane id of a window.
    #[must_use]
    pub fn active_pane(&self, session: &str, window: u32) -> Option<PaneId> {
        let state = self.state();
        let window = state
            .session(session)
            .ok()?
            .windows
            .iter()
            .find(|w| w.index == window)?;
        pane_id(window.panes.get(window.active)?.id).ok()
    }
}

#[async_trait]
impl Multiplexer for FakeMultiplexer {
    async fn has_session(&self, session: &SessionName) -> Result<bool> {
        self.record(Call::HasSession(session.to_string()));
        Ok(self.has(session.as_str()))
    }

    async fn new_session(&self, session: &SessionName, workdir: &Path) -> Result<()> {
        self.record(Call::NewSession {
            session: session.to_string(),
            workdir: workdir.to_path_buf(),
        });
        let mut state = self.state();
        if state.session(session.as_str()).is_ok() {
            return Err(Error::command_error(
                "tmux",
                "new-session",
                format!("duplicate session: {session}"),
            ));
        }
        let base = state.base_index;
        let window = state.fresh_window(base);
        state.sessions.push(FakeSession {
            name: session.to_string(),
            path: workdir.to_path_buf(),
            windows: vec![window],
        });
        Ok(())
    }

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        self.record(Call::ListSessions);
        let state = self.state();
        state
            .sessions
            .iter()
            .map(|s| {
                Ok(SessionSummary {
                    name: s.name.clone(),
                    windows: u32::try_from(s.windows.len())
                        .map_err(|e| Error::parse_error(e.to_string()))?,
                    attached: false,
                    created: Some(Utc::now()),
                    path: s.path.display().to_string(),
                })
            })
            .collect()
    }

    async fn kill_session(&self, session: &SessionName) -> Result<()> {
        self.record(Call::KillSession(session.to_string()));
        let mut state = self.state();
        state.session(session.as_str())?;
        state.sessions.retain(|s| s.name != session.as_str());
        Ok(())
    }

    async fn session_path(&self, session: &SessionName) -> Result<PathBuf> {
        self.record(Call::SessionPath(session.to_string()));
        Ok(self.state().session(session.as_str())?.path.clone())
    }

    async fn list_windows(&self, session: &SessionName) -> Result<Vec<WindowInfo>> {
        self.record(Call::ListWindows(session.to_string()));
        let state = self.state();
        state
            .session(session.as_str())?
            .windows
            .iter()
            .map(|w| {
                Ok(WindowInfo {
                    index: w.index,
                    id: format!("@{}", w.id),
                    zoomed: w.zoomed,
                    panes: u32::try_from(w.panes.len())
                        .map_err(|e| Error::parse_error(e.to_string()))?,
                    name: "zsh".to_string(),
                })
            })
            .collect()
    }

    async fn list_panes(&self, scope: PaneScope<'_>) -> Result<Vec<PaneInfo>> {
        let (session, only) = match scope {
            PaneScope::Window(window) => {
                self.record(Call::ListPanes(window.target()));
                (&window.session, Some(window.index))
            }
            PaneScope::Session(session) => {
                self.record(Call::ListPanes(session.to_string()));
                (session, None)
            }
        };
        let state = self.state();
        let found = state.session(session.as_str())?;
        if let Some(index) = only {
            if !found.windows.iter().any(|w| w.index == index) {
                return Err(missing("window", &format!("{session}:{index}")));
            }
        }
        let mut windows: Vec<&FakeWindow> = found
            .windows
            .iter()
            .filter(|w| only.map_or(true, |i| w.index == i))
            .collect();
        windows.sort_by_key(|w| w.index);
        windows
            .into_iter()
            .flat_map(|w| w.panes.iter().enumerate().map(move |(i, p)| (w, i, p)))
            .map(|(w, i, p)| pane_info(w, i, p))
            .collect()
    }

    async fn split_window(&self, window: &WindowRef, workdir: &Path) -> Result<PaneId> {
        self.record(Call::SplitWindow {
            window: window.target(),
            workdir: workdir.to_path_buf(),
        });
        let mut state = self.state();
        let limit = state.pane_limit;
        let current = state.window_mut(window)?.panes.len();
        if limit.is_some_and(|max| current >= max) {
            return Err(Error::command_error(
                "tmux",
                "split-window",
                "no space for new pane",
            ));
        }
        let pane = state.fresh_pane();
        let id = pane_id(pane.id)?;
        let target = state.window_mut(window)?;
        target.panes.push(pane);
        target.active = target.panes.len() - 1;
        target.zoomed = false;
        Ok(id)
    }

    async fn apply_tiled_layout(&self, window: &WindowRef) -> Result<()> {
        self.record(Call::ApplyTiledLayout(window.target()));
        self.state().window_mut(window)?.zoomed = false;
        Ok(())
    }

    async fn set_pane_title(&self, pane: &PaneId, title: &str) -> Result<()> {
        self.record(Call::SetPaneTitle {
            pane: pane.to_string(),
            title: title.to_string(),
        });
        let mut state = self.state();
        let (s, w, p) = state.locate(pane)?;
        state.sessions[s].windows[w].panes[p].title = title.to_string();
        Ok(())
    }

    async fn send_text(&self, pane: &PaneId, text: &str) -> Result<()> {
        self.record(Call::SendText {
            pane: pane.to_string(),
            text: text.to_string(),
        });
        self.state().locate(pane).map(|_| ())
    }

    async fn send_interrupt(&self, pane: &PaneId) -> Result<()> {
        self.record(Call::SendInterrupt(pane.to_string()));
        self.state().locate(pane).map(|_| ())
    }

    async fn capture_pane(&self, pane: &PaneId, lines: u32) -> Result<String> {
        self.record(Call::CapturePane {
            pane: pane.to_string(),
            lines,
        });
        let state = self.state();
        state.locate(pane)?;
        if state.failing_captures.contains(pane.as_str()) {
            return Err(Error::command_error(
                "tmux",
                "capture-pane",
                format!("can't capture pane: {pane}"),
            ));
        }
        let text = state.captures.get(pane.as_str()).cloned().unwrap_or_default();
        let limit = usize::try_from(lines).unwrap_or(usize::MAX);
        let all: Vec<&str> = text.lines().collect();
        let tail = &all[all.len().saturating_sub(limit)..];
        Ok(tail.iter().map(|l| format!("{l}\n")).collect())
    }

    async fn select_window(&self, window: &WindowRef) -> Result<()> {
        self.record(Call::SelectWindow(window.target()));
        self.state().window_mut(window).map(|_| ())
    }

    async fn select_pane(&self, pane: &PaneId) -> Result<()> {
        self.record(Call::SelectPane(pane.to_string()));
        let mut state = self.state();
        let (s, w, p) = state.locate(pane)?;
        state.sessions[s].windows[w].active = p;
        Ok(())
    }

    async fn toggle_zoom(&self, window: &WindowRef) -> Result<()> {
        self.record(Call::ToggleZoom(window.target()));
        let mut state = self.state();
        let target = state.window_mut(window)?;
        target.zoomed = !target.zoomed;
        Ok(())
    }

    async fn attach(&self, session: &SessionName) -> Result<()> {
        self.record(Call::Attach(session.to_string()));
        self.state().session(session.as_str()).map(|_| ())
    }
}
