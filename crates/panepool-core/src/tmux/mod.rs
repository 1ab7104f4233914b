//! The narrow tmux command surface consumed by the orchestration layer.
//!
//! [`Multiplexer`] is the only way core code touches tmux. Every method maps
//! to one (or, for `send_text`, two) tmux invocations that block until tmux
//! answers; callers await each call before issuing the next.

mod cli;
pub mod parse;
pub mod testing;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

pub use cli::{install_guidance, TmuxCli};

use crate::{
    types::{PaneId, PaneInfo, SessionName, SessionSummary, WindowInfo, WindowRef},
    Result,
};

/// Which panes `list_panes` should return.
#[derive(Debug, Clone, Copy)]
pub enum PaneScope<'a> {
    /// Panes of a single window
    Window(&'a WindowRef),
    /// Panes of every window in the session, in tmux order
    Session(&'a SessionName),
}

/// Session, window and pane operations against a running tmux server.
#[async_trait]
pub trait Multiplexer: Send + Sync {
    /// `has-session`: true iff the session is registered.
    async fn has_session(&self, session: &SessionName) -> Result<bool>;

    /// `new-session -d`: one window rooted at `workdir`.
    async fn new_session(&self, session: &SessionName, workdir: &Path) -> Result<()>;

    /// `list-sessions`. No server running means no sessions.
    async fn list_sessions(&self) -> Result<Vec<SessionSummary>>;

    /// `kill-session`: terminates every pane and process in the session.
    async fn kill_session(&self, session: &SessionName) -> Result<()>;

    /// Working directory the session was created with.
    async fn session_path(&self, session: &SessionName) -> Result<PathBuf>;

    async fn list_windows(&self, session: &SessionName) -> Result<Vec<WindowInfo>>;

    async fn list_panes(&self, scope: PaneScope<'_>) -> Result<Vec<PaneInfo>>;

    /// Split a new pane into `window`, returning its stable id.
    async fn split_window(&self, window: &WindowRef, workdir: &Path) -> Result<PaneId>;

    /// Re-tile so every pane in the window gets an even share.
    async fn apply_tiled_layout(&self, window: &WindowRef) -> Result<()>;

    async fn set_pane_title(&self, pane: &PaneId, title: &str) -> Result<()>;

    /// Type `text` literally into the pane, then press Enter.
    async fn send_text(&self, pane: &PaneId, text: &str) -> Result<()>;

    /// Deliver Ctrl-C to the pane's foreground process.
    async fn send_interrupt(&self, pane: &PaneId) -> Result<()>;

    /// Last `lines` lines of scrollback, joined at wrap points.
    async fn capture_pane(&self, pane: &PaneId, lines: u32) -> Result<String>;

    async fn select_window(&self, window: &WindowRef) -> Result<()>;

    async fn select_pane(&self, pane: &PaneId) -> Result<()>;

    /// Toggle zoom of the window's active pane.
    async fn toggle_zoom(&self, window: &WindowRef) -> Result<()>;

    /// Attach the current terminal (or switch the current client) to the session.
    async fn attach(&self, session: &SessionName) -> Result<()>;
}
