//! Agent types, tags and requested counts.
//!
//! A tag is stored by tmux only as free text in the pane title. [`AgentTag`]
//! is the structured form; `Display` and [`AgentTag::parse`] are the single
//! serializer/parser pair at that boundary.
//!
//! Title grammar:
//!
//! ```text
//! {session}__{type}_{ordinal}          spawned agent
//! {session}__{type}_added_{ordinal}    agent appended to an existing session
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{Error, Result};

/// Kind of agent running in a pane.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AgentType {
    /// Claude Code
    Cc,
    /// Codex
    Cod,
    /// Gemini
    Gmi,
}

impl AgentType {
    /// Fixed assignment order. All `cc` slots are filled before any `cod`
    /// slot, and all `cod` slots before any `gmi` slot.
    pub const ALL: [Self; 3] = [Self::Cc, Self::Cod, Self::Gmi];

    /// Substring identifying this type inside a pane title (`__cc`).
    #[must_use]
    pub fn marker(self) -> String {
        format!("__{self}")
    }

    /// Substring match against a pane title.
    #[must_use]
    pub fn matches_title(self, title: &str) -> bool {
        title.contains(&self.marker())
    }

    /// True when the title carries any agent marker.
    #[must_use]
    pub fn any_matches(title: &str) -> bool {
        Self::ALL.iter().any(|t| t.matches_title(title))
    }

    /// # Errors
    ///
    /// Returns a usage error for anything other than `cc`, `cod`, `gmi`.
    pub fn parse(s: &str) -> Result<Self> {
        s.trim()
            .to_lowercase()
            .parse()
            .map_err(|_| Error::usage(format!("unknown agent type '{s}' (expected cc, cod or gmi)")))
    }
}

/// Whether the tag came from an initial spawn or a later append.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    Spawned,
    Added,
}

/// Structured form of a pane title tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AgentTag {
    pub session: String,
    pub agent_type: AgentType,
    pub ordinal: u32,
    pub kind: TagKind,
}

impl AgentTag {
    #[must_use]
    pub fn spawned(session: impl Into<String>, agent_type: AgentType, ordinal: u32) -> Self {
        Self {
            session: session.into(),
            agent_type,
            ordinal,
            kind: TagKind::Spawned,
        }
    }

    #[must_use]
    pub fn added(session: impl Into<String>, agent_type: AgentType, ordinal: u32) -> Self {
        Self {
            session: session.into(),
            agent_type,
            ordinal,
            kind: TagKind::Added,
        }
    }

    /// Parse a pane title back into a tag. Returns `None` for untagged titles.
    #[must_use]
    pub fn parse(title: &str) -> Option<Self> {
        let (session, rest) = title.trim().rsplit_once("__")?;
        if session.is_empty() {
            return None;
        }
        let (agent_type, rest) = rest.split_once('_')?;
        let agent_type = agent_type.parse::<AgentType>().ok()?;
        let (kind, digits) = rest
            .strip_prefix("added_")
            .map_or((TagKind::Spawned, rest), |d| (TagKind::Added, d));
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let ordinal = digits.parse().ok()?;
        Some(Self {
            session: session.to_string(),
            agent_type,
            ordinal,
            kind,
        })
    }
}

impl fmt::Display for AgentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TagKind::Spawned => write!(f, "{}__{}_{}", self.session, self.agent_type, self.ordinal),
            TagKind::Added => write!(
                f,
                "{}__{}_added_{}",
                self.session, self.agent_type, self.ordinal
            ),
        }
    }
}

/// Requested (or counted) agents per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AgentCounts {
    pub cc: u32,
    pub cod: u32,
    pub gmi: u32,
}

impl AgentCounts {
    #[must_use]
    pub const fn new(cc: u32, cod: u32, gmi: u32) -> Self {
        Self { cc, cod, gmi }
    }

    #[must_use]
    pub const fn get(&self, agent_type: AgentType) -> u32 {
        match agent_type {
            AgentType::Cc => self.cc,
            AgentType::Cod => self.cod,
            AgentType::Gmi => self.gmi,
        }
    }

    fn slot(&mut self, agent_type: AgentType) -> &mut u32 {
        match agent_type {
            AgentType::Cc => &mut self.cc,
            AgentType::Cod => &mut self.cod,
            AgentType::Gmi => &mut self.gmi,
        }
    }

    /// Counts in the fixed `cc, cod, gmi` order.
    pub fn iter(&self) -> impl Iterator<Item = (AgentType, u32)> + '_ {
        AgentType::ALL.into_iter().map(|t| (t, self.get(t)))
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.iter().map(|(_, n)| n as usize).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Count titles per agent marker. A title matching two markers is
    /// counted twice; the naming convention never produces one.
    #[must_use]
    pub fn from_titles<'a>(titles: impl IntoIterator<Item = &'a str>) -> Self {
        titles.into_iter().fold(Self::default(), |mut counts, title| {
            for agent_type in AgentType::ALL {
                if agent_type.matches_title(title) {
                    *counts.slot(agent_type) += 1;
                }
            }
            counts
        })
    }
}
