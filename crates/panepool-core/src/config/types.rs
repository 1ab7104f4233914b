//! Configuration type definitions and built-in defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::load::expand_home;
use crate::{tag::AgentType, SessionName};

/// Root configuration, fully resolved.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Config {
    /// Parent of every session working directory
    pub projects_base: PathBuf,
    /// tmux binary name or path
    pub tmux_binary: String,
    /// Pane count used by `create` and `reconnect` when none is given
    pub default_panes: u32,
    /// Default output directory for `save-outputs`
    pub log_dir: PathBuf,
    /// Scrollback lines captured per pane by `save-outputs`
    pub capture_lines: u32,
    /// Scrollback lines captured by `copy-output`
    pub copy_lines: u32,
    pub agents: AgentCommands,
}

/// Launch command per agent type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AgentCommands {
    pub cc: String,
    pub cod: String,
    pub gmi: String,
}

impl AgentCommands {
    #[must_use]
    pub fn command(&self, agent_type: AgentType) -> &str {
        match agent_type {
            AgentType::Cc => &self.cc,
            AgentType::Cod => &self.cod,
            AgentType::Gmi => &self.gmi,
        }
    }
}

impl Default for AgentCommands {
    fn default() -> Self {
        Self {
            cc: "claude".to_string(),
            cod: "codex".to_string(),
            gmi: "gemini".to_string(),
        }
    }
}

/// One partial layer read from a config file. Absent keys leave the lower
/// layer untouched.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub projects_base: Option<String>,
    pub tmux_binary: Option<String>,
    pub default_panes: Option<u32>,
    pub log_dir: Option<String>,
    pub capture_lines: Option<u32>,
    pub copy_lines: Option<u32>,
    pub agents: Option<AgentCommandsLayer>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AgentCommandsLayer {
    pub cc: Option<String>,
    pub cod: Option<String>,
    pub gmi: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let projects_base = if cfg!(target_os = "macos") {
            "~/Developer"
        } else {
            "/data/projects"
        };
        Self {
            projects_base: expand_home(projects_base),
            tmux_binary: "tmux".to_string(),
            default_panes: 10,
            log_dir: expand_home("~/tmux-logs"),
            capture_lines: 10_000,
            copy_lines: 500,
            agents: AgentCommands::default(),
        }
    }
}

impl Config {
    /// Working directory for a session: `{projects_base}/{session}`.
    #[must_use]
    pub fn session_dir(&self, session: &SessionName) -> PathBuf {
        self.projects_base.join(session.as_str())
    }

    /// Same config with a different projects base.
    #[must_use]
    pub fn with_projects_base(self, base: impl AsRef<Path>) -> Self {
        Self {
            projects_base: base.as_ref().to_path_buf(),
            ..self
        }
    }
}
