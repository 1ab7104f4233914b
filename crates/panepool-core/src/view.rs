//! Re-tiling and zoom.

use std::{fmt, str::FromStr};

use tracing::info;

use crate::{
    allocator::PaneAllocator,
    registry::SessionRegistry,
    tag::AgentType,
    tmux::{Multiplexer, PaneScope},
    types::{PaneId, SessionName, WindowRef},
    Error, Result,
};

/// Pane to zoom: an index in the first window, or the first pane carrying
/// an agent marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomTarget {
    Index(u32),
    Agent(AgentType),
}

impl FromStr for ZoomTarget {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(index) = s.parse() {
            return Ok(Self::Index(index));
        }
        AgentType::parse(s)
            .map(Self::Agent)
            .map_err(|_| Error::usage(format!("zoom target must be a pane index or cc, cod, gmi; got '{s}'")))
    }
}

impl fmt::Display for ZoomTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Agent(agent_type) => write!(f, "{agent_type}"),
        }
    }
}

pub struct ViewManager<'a> {
    mux: &'a dyn Multiplexer,
}

impl<'a> ViewManager<'a> {
    pub const fn new(mux: &'a dyn Multiplexer) -> Self {
        Self { mux }
    }

    /// Un-zoom and tile every window. Returns the number of windows.
    pub async fn retile_all(&self, session: &SessionName) -> Result<usize> {
        SessionRegistry::new(self.mux).require(session).await?;
        let windows = self.mux.list_windows(session).await?;
        for window in &windows {
            let target = WindowRef::new(session.clone(), window.index);
            if window.zoomed {
                self.mux.toggle_zoom(&target).await?;
            }
            self.mux.apply_tiled_layout(&target).await?;
        }
        info!(session = %session, windows = windows.len(), "re-tiled");
        Ok(windows.len())
    }

    async fn locate(&self, session: &SessionName, target: ZoomTarget) -> Result<(WindowRef, PaneId)> {
        let found = match target {
            ZoomTarget::Index(index) => {
                let window = PaneAllocator::new(self.mux).first_window(session).await?;
                self.mux
                    .list_panes(PaneScope::Window(&window))
                    .await?
                    .into_iter()
                    .find(|p| p.index == index)
            }
            ZoomTarget::Agent(agent_type) => self
                .mux
                .list_panes(PaneScope::Session(session))
                .await?
                .into_iter()
                .find(|p| agent_type.matches_title(&p.title)),
        };
        found
            .map(|p| (WindowRef::new(session.clone(), p.window_index), p.id))
            .ok_or_else(|| Error::pane_not_found(session.as_str(), target.to_string()))
    }

    /// Zoom the target pane, un-zooming its window first if another pane
    /// is zoomed. Returns the zoomed pane.
    pub async fn zoom(&self, session: &SessionName, target: ZoomTarget) -> Result<PaneId> {
        SessionRegistry::new(self.mux).require(session).await?;
        let (window, pane) = self.locate(session, target).await?;

        let zoomed = self
            .mux
            .list_windows(session)
            .await?
            .iter()
            .any(|w| w.index == window.index && w.zoomed);
        if zoomed {
            self.mux.toggle_zoom(&window).await?;
        }

        self.mux.select_window(&window).await?;
        self.mux.select_pane(&pane).await?;
        self.mux.toggle_zoom(&window).await?;
        info!(session = %session, pane = %pane, "zoomed");
        Ok(pane)
    }
}
