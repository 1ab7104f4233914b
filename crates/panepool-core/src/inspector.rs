//! Structured session status.

use std::path::PathBuf;

use serde::Serialize;

use crate::{
    registry::SessionRegistry,
    tag::AgentCounts,
    tmux::{Multiplexer, PaneScope},
    types::{PaneId, PaneInfo, SessionName},
    Result,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaneStatus {
    pub id: PaneId,
    pub window_index: u32,
    pub index: u32,
    pub title: String,
    pub current_command: String,
    pub width: u32,
    pub height: u32,
}

impl From<PaneInfo> for PaneStatus {
    fn from(pane: PaneInfo) -> Self {
        Self {
            id: pane.id,
            window_index: pane.window_index,
            index: pane.index,
            title: pane.title,
            current_command: pane.current_command,
            width: pane.width,
            height: pane.height,
        }
    }
}

/// Working directory, every pane in multiplexer order, and agent counts
/// by title marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub session: String,
    pub working_directory: PathBuf,
    pub panes: Vec<PaneStatus>,
    pub agents: AgentCounts,
}

pub struct SessionInspector<'a> {
    mux: &'a dyn Multiplexer,
}

impl<'a> SessionInspector<'a> {
    pub const fn new(mux: &'a dyn Multiplexer) -> Self {
        Self { mux }
    }

    /// # Errors
    ///
    /// `SessionNotFound` when the session is absent.
    pub async fn status(&self, session: &SessionName) -> Result<StatusReport> {
        SessionRegistry::new(self.mux).require(session).await?;
        let working_directory = self.mux.session_path(session).await?;
        let panes = self.mux.list_panes(PaneScope::Session(session)).await?;
        let agents = AgentCounts::from_titles(panes.iter().map(|p| p.title.as_str()));

        Ok(StatusReport {
            session: session.to_string(),
            working_directory,
            panes: panes.into_iter().map(PaneStatus::from).collect(),
            agents,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::tmux::testing::FakeMultiplexer;

    fn name(s: &str) -> SessionName {
        SessionName::parse(s).unwrap_or_else(|e| panic!("{e}"))
    }

    #[tokio::test]
    async fn test_status_counts_markers() -> Result<()> {
        let fake = FakeMultiplexer::new();
        let ids = fake.seed_session("proj", Path::new("/data/projects/proj"), 4);
        fake.seed_title(&ids[1], "proj__cc_1");
        fake.seed_title(&ids[2], "proj__cc_added_1");
        fake.seed_title(&ids[3], "proj__gmi_1");
        fake.seed_window("proj");

        let report = SessionInspector::new(&fake).status(&name("proj")).await?;

        assert_eq!(report.working_directory, PathBuf::from("/data/projects/proj"));
        assert_eq!(report.panes.len(), 5);
        assert_eq!(report.panes[4].window_index, 1);
        assert_eq!(report.agents, AgentCounts::new(2, 0, 1));
        Ok(())
    }

    #[tokio::test]
    async fn test_status_missing_session() {
        let fake = FakeMultiplexer::new();
        let result = SessionInspector::new(&fake).status(&name("ghost")).await;
        assert!(result.is_err_and(|e| e.is_not_found()));
    }

    #[tokio::test]
    async fn test_status_serializes() -> Result<()> {
        let fake = FakeMultiplexer::new();
        fake.seed_session("proj", Path::new("/w"), 1);
        let report = SessionInspector::new(&fake).status(&name("proj")).await?;
        let value = serde_json::to_value(&report)?;
        assert_eq!(value["agents"]["cc"], 0);
        assert_eq!(value["panes"][0]["id"], "%0");
        Ok(())
    }
}
