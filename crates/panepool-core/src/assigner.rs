//! Deterministic agent-to-pane assignment and launch.
//!
//! Slots are filled in the fixed `cc, cod, gmi` order with ordinals that
//! restart at 1 per type. Panes are addressed by id once chosen, so a
//! renumbering between listing and launching cannot misdirect a tag.

use std::{collections::HashMap, path::Path};

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    allocator::PaneAllocator,
    config::AgentCommands,
    tag::{AgentCounts, AgentTag, AgentType, TagKind},
    tmux::{Multiplexer, PaneScope},
    types::{PaneId, WindowRef},
    Error, Result,
};

/// One tagged and launched pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub pane: PaneId,
    pub tag: AgentTag,
}

/// Quote `s` for a POSIX shell.
fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Command typed into a pane to start an agent in `workdir`.
#[must_use]
pub fn launch_command(workdir: &Path, agent_command: &str) -> String {
    format!(
        "cd {} && {agent_command}",
        shell_quote(&workdir.to_string_lossy())
    )
}

/// `(type, ordinal)` pairs in fill order.
fn slots(counts: &AgentCounts) -> impl Iterator<Item = (AgentType, u32)> + '_ {
    counts
        .iter()
        .flat_map(|(agent_type, n)| (1..=n).map(move |ordinal| (agent_type, ordinal)))
}

pub struct AgentAssigner<'a> {
    mux: &'a dyn Multiplexer,
    commands: &'a AgentCommands,
}

impl<'a> AgentAssigner<'a> {
    pub const fn new(mux: &'a dyn Multiplexer, commands: &'a AgentCommands) -> Self {
        Self { mux, commands }
    }

    async fn launch(&self, pane: PaneId, tag: AgentTag, workdir: &Path) -> Result<Assignment> {
        let title = tag.to_string();
        self.mux.set_pane_title(&pane, &title).await?;
        let command = launch_command(workdir, self.commands.command(tag.agent_type));
        self.mux.send_text(&pane, &command).await?;
        debug!(pane = %pane, tag = %title, "launched agent");
        Ok(Assignment { pane, tag })
    }

    /// Reconcile `window` to `reserved_slots + total` panes, leave the first
    /// `reserved_slots` panes untagged, and tag and launch the rest in
    /// ascending index order.
    ///
    /// # Errors
    ///
    /// `NothingToDo` when every count is zero; otherwise any multiplexer
    /// failure, which stops the assignment where it occurred.
    pub async fn assign(
        &self,
        window: &WindowRef,
        workdir: &Path,
        counts: &AgentCounts,
        reserved_slots: usize,
    ) -> Result<Vec<Assignment>> {
        let total = counts.total();
        if total == 0 {
            return Err(Error::nothing_to_do());
        }

        PaneAllocator::new(self.mux)
            .reconcile(window, workdir, reserved_slots + total)
            .await?;

        let mut panes = self.mux.list_panes(PaneScope::Window(window)).await?;
        panes.sort_by_key(|p| p.index);
        let available = panes.len().saturating_sub(reserved_slots);
        if available < total {
            return Err(Error::allocation(format!(
                "window {window} has {available} free panes, need {total}"
            )));
        }

        let session = window.session.as_str();
        let mut assignments = Vec::with_capacity(total);
        for (pane, (agent_type, ordinal)) in panes
            .into_iter()
            .skip(reserved_slots)
            .zip(slots(counts))
        {
            let tag = AgentTag::spawned(session, agent_type, ordinal);
            assignments.push(self.launch(pane.id, tag, workdir).await?);
        }

        info!(window = %window, agents = assignments.len(), "assigned agents");
        Ok(assignments)
    }

    /// Split one new pane per requested agent and launch into it, leaving
    /// every existing pane untouched. Ordinals continue after the highest
    /// `_added_` ordinal already present for each type.
    pub async fn append(
        &self,
        window: &WindowRef,
        workdir: &Path,
        counts: &AgentCounts,
    ) -> Result<Vec<Assignment>> {
        let total = counts.total();
        if total == 0 {
            return Err(Error::nothing_to_do());
        }

        let session = window.session.as_str();
        let existing = self
            .mux
            .list_panes(PaneScope::Session(&window.session))
            .await?;
        let highest: HashMap<AgentType, u32> = existing
            .iter()
            .filter_map(|p| AgentTag::parse(&p.title))
            .filter(|t| t.kind == TagKind::Added && t.session == session)
            .fold(HashMap::new(), |mut acc, t| {
                let entry = acc.entry(t.agent_type).or_insert(0);
                *entry = (*entry).max(t.ordinal);
                acc
            });

        let mut assignments = Vec::with_capacity(total);
        for (agent_type, k) in slots(counts) {
            let ordinal = highest.get(&agent_type).copied().unwrap_or(0) + k;
            let pane = self.mux.split_window(window, workdir).await?;
            self.mux.apply_tiled_layout(window).await?;
            let tag = AgentTag::added(session, agent_type, ordinal);
            assignments.push(self.launch(pane, tag, workdir).await?);
        }

        info!(window = %window, agents = assignments.len(), "appended agents");
        Ok(assignments)
    }
}
