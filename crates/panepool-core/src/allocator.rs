//! First-window resolution and monotonic pane reconciliation.
//!
//! The first window is whichever has the lowest index; tmux `base-index`
//! makes that 0 or 1 (or anything else), so it is always looked up.

use std::path::Path;

use tracing::{debug, info};

use crate::{
    tmux::{Multiplexer, PaneScope},
    types::{SessionName, WindowRef},
    Error, Result,
};

pub struct PaneAllocator<'a> {
    mux: &'a dyn Multiplexer,
}

impl<'a> PaneAllocator<'a> {
    pub const fn new(mux: &'a dyn Multiplexer) -> Self {
        Self { mux }
    }

    /// The session's window with the minimum index.
    ///
    /// # Errors
    ///
    /// `Allocation` when the session has no windows.
    pub async fn first_window(&self, session: &SessionName) -> Result<WindowRef> {
        self.mux
            .list_windows(session)
            .await?
            .into_iter()
            .map(|w| w.index)
            .min()
            .map(|index| WindowRef::new(session.clone(), index))
            .ok_or_else(|| Error::allocation(format!("session '{session}' has no windows")))
    }

    pub async fn pane_count(&self, window: &WindowRef) -> Result<usize> {
        Ok(self.mux.list_panes(PaneScope::Window(window)).await?.len())
    }

    /// Grow `window` to at least `desired` panes and return the count.
    ///
    /// Performs exactly `desired - existing` splits, one at a time, re-tiling
    /// after each. Never removes panes.
    pub async fn reconcile(
        &self,
        window: &WindowRef,
        workdir: &Path,
        desired: usize,
    ) -> Result<usize> {
        let existing = self.pane_count(window).await?;
        if existing >= desired {
            debug!(window = %window, existing, desired, "pane count already satisfied");
            return Ok(existing);
        }

        let missing = desired - existing;
        for _ in 0..missing {
            self.mux.split_window(window, workdir).await?;
            self.mux.apply_tiled_layout(window).await?;
        }
        info!(window = %window, added = missing, "split panes");

        self.pane_count(window).await
    }
}
