//! Tag-filtered command delivery, broadcast and interrupt.

use std::{fmt, str::FromStr};

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    registry::SessionRegistry,
    tag::AgentType,
    tmux::{Multiplexer, PaneScope},
    types::{PaneId, PaneInfo, SessionName},
    Error, Result,
};

/// Which panes of a session receive a routed command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteFilter {
    /// Drop the first pane in multiplexer order (the user pane)
    pub skip_first: bool,
    /// Keep only panes whose title carries this agent marker
    pub agent_type: Option<AgentType>,
}

impl RouteFilter {
    #[must_use]
    pub const fn new(skip_first: bool, agent_type: Option<AgentType>) -> Self {
        Self {
            skip_first,
            agent_type,
        }
    }
}

/// `broadcast` audience: every agent pane, or one agent type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastTarget {
    All,
    Agent(AgentType),
}

impl BroadcastTarget {
    /// `all` skips the user pane with no tag filter; a type filters by tag.
    #[must_use]
    pub const fn filter(self) -> RouteFilter {
        match self {
            Self::All => RouteFilter::new(true, None),
            Self::Agent(agent_type) => RouteFilter::new(false, Some(agent_type)),
        }
    }
}

impl FromStr for BroadcastTarget {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            AgentType::parse(s)
                .map(Self::Agent)
                .map_err(|_| Error::usage(format!("unknown target '{s}' (expected cc, cod, gmi or all)")))
        }
    }
}

impl fmt::Display for BroadcastTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Agent(agent_type) => write!(f, "{agent_type}"),
        }
    }
}

/// A pane that received a routed command or interrupt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutedPane {
    pub id: PaneId,
    pub window_index: u32,
    pub index: u32,
    pub title: String,
}

impl From<&PaneInfo> for RoutedPane {
    fn from(pane: &PaneInfo) -> Self {
        Self {
            id: pane.id.clone(),
            window_index: pane.window_index,
            index: pane.index,
            title: pane.title.clone(),
        }
    }
}

/// Panes matched by a route. An empty match is a valid outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteOutcome {
    pub session: String,
    pub matched: Vec<RoutedPane>,
}

impl RouteOutcome {
    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.matched.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }
}

/// Apply skip-first, then the tag filter, preserving input order.
#[must_use]
pub fn select_targets<'p>(panes: &'p [PaneInfo], filter: RouteFilter) -> Vec<&'p PaneInfo> {
    let skip = usize::from(filter.skip_first);
    panes
        .iter()
        .skip(skip)
        .filter(|p| {
            filter
                .agent_type
                .map_or(true, |agent_type| agent_type.matches_title(&p.title))
        })
        .collect()
}

pub struct CommandRouter<'a> {
    mux: &'a dyn Multiplexer,
}

impl<'a> CommandRouter<'a> {
    pub const fn new(mux: &'a dyn Multiplexer) -> Self {
        Self { mux }
    }

    async fn session_panes(&self, session: &SessionName) -> Result<Vec<PaneInfo>> {
        SessionRegistry::new(self.mux).require(session).await?;
        self.mux.list_panes(PaneScope::Session(session)).await
    }

    /// Type `text` plus Enter into every pane `filter` selects, in
    /// multiplexer order.
    ///
    /// # Errors
    ///
    /// `EmptyCommand` for blank text (checked first), `SessionNotFound`
    /// when the session is absent, or the first delivery failure.
    pub async fn send(
        &self,
        session: &SessionName,
        filter: RouteFilter,
        text: &str,
    ) -> Result<RouteOutcome> {
        if text.trim().is_empty() {
            return Err(Error::empty_command());
        }

        let panes = self.session_panes(session).await?;
        let targets = select_targets(&panes, filter);
        for pane in &targets {
            self.mux.send_text(&pane.id, text).await?;
        }

        let matched: Vec<RoutedPane> = targets.into_iter().map(RoutedPane::from).collect();
        if matched.is_empty() {
            debug!(session = %session, ?filter, "no matching panes");
        } else {
            info!(session = %session, panes = matched.len(), "sent command");
        }
        Ok(RouteOutcome {
            session: session.to_string(),
            matched,
        })
    }

    pub async fn broadcast(
        &self,
        session: &SessionName,
        target: BroadcastTarget,
        prompt: &str,
    ) -> Result<RouteOutcome> {
        self.send(session, target.filter(), prompt).await
    }

    /// Send Ctrl-C to every pane carrying any agent marker.
    pub async fn interrupt(&self, session: &SessionName) -> Result<RouteOutcome> {
        let panes = self.session_panes(session).await?;
        let mut matched = Vec::new();
        for pane in panes.iter().filter(|p| AgentType::any_matches(&p.title)) {
            self.mux.send_interrupt(&pane.id).await?;
            matched.push(RoutedPane::from(pane));
        }
        info!(session = %session, panes = matched.len(), "interrupted agents");
        Ok(RouteOutcome {
            session: session.to_string(),
            matched,
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

    /// `{user, X__cc_1, X__cc_2, X__cod_1}`
    fn tagged_session(fake: &FakeMultiplexer) -> Vec<PaneId> {
        let ids = fake.seed_session("X", Path::new("/w"), 4);
        fake.seed_title(&ids[0], "user");
        fake.seed_title(&ids[1], "X__cc_1");
        fake.seed_title(&ids[2], "X__cc_2");
        fake.seed_title(&ids[3], "X__cod_1");
        ids
    }

    #[tokio::test]
    async fn test_send_cc_filter_matches_two() -> Result<()> {
        let fake = FakeMultiplexer::new();
        let ids = tagged_session(&fake);

        let outcome = CommandRouter::new(&fake)
            .send(&name("X"), RouteFilter::new(false, Some(AgentType::Cc)), "ls")
            .await?;

        assert_eq!(outcome.matched_count(), 2);
        assert_eq!(fake.sent_text(&ids[1]), vec!["ls".to_string()]);
        assert!(fake.sent_text(&ids[3]).is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_send_skip_first_matches_three() -> Result<()> {
        let fake = FakeMultiplexer::new();
        let ids = tagged_session(&fake);

        let outcome = CommandRouter::new(&fake)
            .send(&name("X"), RouteFilter::new(true, None), "ls")
            .await?;

        assert_eq!(outcome.matched_count(), 3);
        assert!(fake.sent_text(&ids[0]).is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_send_zero_match_is_not_error() -> Result<()> {
        let fake = FakeMultiplexer::new();
        tagged_session(&fake);

        let outcome = CommandRouter::new(&fake)
            .send(&name("X"), RouteFilter::new(false, Some(AgentType::Gmi)), "ls")
            .await?;

        assert!(outcome.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_send_missing_session() {
        let fake = FakeMultiplexer::new();
        let result = CommandRouter::new(&fake)
            .send(&name("ghost"), RouteFilter::default(), "ls")
            .await;
        assert!(result.is_err_and(|e| e.is_not_found()));
    }

    #[tokio::test]
    async fn test_send_empty_command_checked_first() {
        let fake = FakeMultiplexer::new();
        let result = CommandRouter::new(&fake)
            .send(&name("ghost"), RouteFilter::default(), "   ")
            .await;
        assert_eq!(result.err(), Some(Error::empty_command()));
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_send_follows_ids_after_renumbering() -> Result<()> {
        let fake = FakeMultiplexer::new();
        let ids = tagged_session(&fake);
        fake.close_pane(&ids[1]);

        let outcome = CommandRouter::new(&fake)
            .send(&name("X"), RouteFilter::new(false, Some(AgentType::Cc)), "go")
            .await?;

        assert_eq!(outcome.matched_count(), 1);
        assert_eq!(outcome.matched[0].id, ids[2]);
        assert_eq!(outcome.matched[0].index, 1);
        assert_eq!(fake.sent_text(&ids[2]), vec!["go".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_broadcast_all_skips_user_pane() -> Result<()> {
        let fake = FakeMultiplexer::new();
        let ids = tagged_session(&fake);

        let outcome = CommandRouter::new(&fake)
            .broadcast(&name("X"), BroadcastTarget::All, "review")
            .await?;

        assert_eq!(outcome.matched_count(), 3);
        assert!(fake.sent_text(&ids[0]).is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_broadcast_type_does_not_skip() -> Result<()> {
        let fake = FakeMultiplexer::new();
        let ids = fake.seed_session("X", Path::new("/w"), 2);
        fake.seed_title(&ids[0], "X__cod_1");

        let outcome = CommandRouter::new(&fake)
            .broadcast(&name("X"), BroadcastTarget::Agent(AgentType::Cod), "hi")
            .await?;

        assert_eq!(outcome.matched_count(), 1);
        assert_eq!(outcome.matched[0].id, ids[0]);
        Ok(())
    }

    #[tokio::test]
    async fn test_interrupt_only_tagged() -> Result<()> {
        let fake = FakeMultiplexer::new();
        let ids = tagged_session(&fake);

        let outcome = CommandRouter::new(&fake).interrupt(&name("X")).await?;

        assert_eq!(outcome.matched_count(), 3);
        assert_eq!(fake.interrupt_count(&ids[0]), 0);
        assert_eq!(fake.interrupt_count(&ids[3]), 1);
        Ok(())
    }

    #[test]
    fn test_broadcast_target_parse() -> Result<()> {
        assert_eq!("all".parse::<BroadcastTarget>()?, BroadcastTarget::All);
        assert_eq!(
            "gmi".parse::<BroadcastTarget>()?,
            BroadcastTarget::Agent(AgentType::Gmi)
        );
        assert!("everyone".parse::<BroadcastTarget>().is_err());
        Ok(())
    }
}
