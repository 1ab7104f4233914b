//! Configuration loading from files and environment.
//!
//! Every step consumes the previous `Config` and returns a new one.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::types::{AgentCommands, AgentCommandsLayer, Config, ConfigLayer};
use crate::{Error, Result};

/// Environment variables read by [`load_config`].
pub const ENV_PROJECTS_BASE: &str = "PANEPOOL_PROJECTS_BASE";
pub const ENV_TMUX: &str = "PANEPOOL_TMUX";
pub const ENV_LOG_DIR: &str = "PANEPOOL_LOG_DIR";

/// Load configuration from defaults, the global file and the process
/// environment, then validate it.
///
/// # Errors
///
/// Returns error if:
/// - The global config file exists but cannot be read or is malformed TOML
/// - An environment override is empty
/// - The merged values fail validation
pub fn load_config() -> Result<Config> {
    let config = Config::default();

    let config = match global_config_path() {
        Some(path) if path.exists() => {
            debug!(path = %path.display(), "loading global config");
            config.merge(load_toml_file(&path)?)
        }
        _ => config,
    };

    let config = config.apply_env(|key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

/// Get path to global config file
pub fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "panepool")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load a TOML file into a partial config layer.
///
/// # Errors
///
/// Returns error if the path is a directory, cannot be read, or holds
/// malformed TOML (including unknown keys).
pub fn load_toml_file(path: &Path) -> Result<ConfigLayer> {
    if path.is_dir() {
        return Err(Error::io_error(format!(
            "Config path is a directory, not a file: {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::io_error(format!("Failed to read config file {}: {e}", path.display()))
    })?;

    toml::from_str(&content).map_err(|e| {
        Error::parse_error(format!(
            "Failed to parse config file {}: {e}",
            path.display()
        ))
    })
}

/// Expand a leading `~/` against the user's home directory.
///
/// Paths without the prefix, and every path when no home directory can be
/// determined, are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), directories::BaseDirs::new()) {
        (Some(rest), Some(dirs)) => dirs.home_dir().join(rest),
        _ if path == "~" => directories::BaseDirs::new()
            .map_or_else(|| PathBuf::from(path), |dirs| dirs.home_dir().to_path_buf()),
        _ => PathBuf::from(path),
    }
}

fn non_empty(key: &str, value: String) -> Result<String> {
    if value.trim().is_empty() {
        Err(Error::invalid_config(format!(
            "{key} cannot be empty - unset the variable or provide a value"
        )))
    } else {
        Ok(value)
    }
}

impl Config {
    /// Merge a file layer into this config (layer takes precedence).
    #[must_use]
    pub fn merge(self, layer: ConfigLayer) -> Self {
        Self {
            projects_base: layer
                .projects_base
                .map_or(self.projects_base, |p| expand_home(&p)),
            tmux_binary: layer.tmux_binary.unwrap_or(self.tmux_binary),
            default_panes: layer.default_panes.unwrap_or(self.default_panes),
            log_dir: layer.log_dir.map_or(self.log_dir, |p| expand_home(&p)),
            capture_lines: layer.capture_lines.unwrap_or(self.capture_lines),
            copy_lines: layer.copy_lines.unwrap_or(self.copy_lines),
            agents: match layer.agents {
                Some(agents) => self.agents.merge(agents),
                None => self.agents,
            },
        }
    }

    /// Apply `PANEPOOL_*` overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but empty.
    pub fn apply_env(self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let projects_base = match lookup(ENV_PROJECTS_BASE) {
            Some(value) => expand_home(&non_empty(ENV_PROJECTS_BASE, value)?),
            None => self.projects_base,
        };
        let tmux_binary = match lookup(ENV_TMUX) {
            Some(value) => non_empty(ENV_TMUX, value)?,
            None => self.tmux_binary,
        };
        let log_dir = match lookup(ENV_LOG_DIR) {
            Some(value) => expand_home(&non_empty(ENV_LOG_DIR, value)?),
            None => self.log_dir,
        };
        Ok(Self {
            projects_base,
            tmux_binary,
            log_dir,
            ..self
        })
    }
}

impl AgentCommands {
    fn merge(self, layer: AgentCommandsLayer) -> Self {
        Self {
            cc: layer.cc.unwrap_or(self.cc),
            cod: layer.cod.unwrap_or(self.cod),
            gmi: layer.gmi.unwrap_or(self.gmi),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, io::Write};

    use serial_test::serial;

    use super::*;
    use crate::tag::AgentType;

    fn write_config(dir: &tempfile::TempDir, body: &str) -> Result<PathBuf> {
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path)?;
        file.write_all(body.as_bytes())?;
        Ok(path)
    }

    #[test]
    fn test_load_partial_file_merges_over_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_config(
            &dir,
            "default_panes = 4\ncopy_lines = 50\n\n[agents]\ncc = \"claude --resume\"\n",
        )?;

        let config = Config::default().merge(load_toml_file(&path)?);
        assert_eq!(config.default_panes, 4);
        assert_eq!(config.copy_lines, 50);
        assert_eq!(config.capture_lines, 10_000);
        assert_eq!(config.agents.command(AgentType::Cc), "claude --resume");
        assert_eq!(config.agents.command(AgentType::Gmi), "gemini");
        Ok(())
    }

    #[test]
    fn test_malformed_toml_returns_parse_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_config(&dir, "default_panes = \n [[[")?;
        let err = load_toml_file(&path).err();
        assert!(matches!(
            err,
            Some(Error::Validation(crate::ValidationError::Parse(_)))
        ));
        Ok(())
    }

    #[test]
    fn test_unknown_key_rejected() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_config(&dir, "default_pane = 3\n")?;
        assert!(load_toml_file(&path).is_err());
        Ok(())
    }

    #[test]
    fn test_directory_path_rejected() -> Result<()> {
        let dir = tempfile::tempdir()?;
        assert!(load_toml_file(dir.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_env_overrides() -> Result<()> {
        let env: HashMap<&str, &str> = [
            (ENV_PROJECTS_BASE, "/srv/projects"),
            (ENV_TMUX, "/opt/bin/tmux"),
        ]
        .into_iter()
        .collect();

        let config = Config::default()
            .apply_env(|key| env.get(key).map(ToString::to_string))?;
        assert_eq!(config.projects_base, PathBuf::from("/srv/projects"));
        assert_eq!(config.tmux_binary, "/opt/bin/tmux");
        assert_eq!(config.log_dir, Config::default().log_dir);
        Ok(())
    }

    #[test]
    fn test_empty_env_override_rejected() {
        let result = Config::default().apply_env(|key| {
            (key == ENV_TMUX).then(String::new)
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/abs/path"), PathBuf::from("/abs/path"));
        if let Some(dirs) = directories::BaseDirs::new() {
            assert_eq!(expand_home("~/x"), dirs.home_dir().join("x"));
        }
    }

    #[test]
    #[serial]
    fn test_load_config_reads_process_env() -> Result<()> {
        let previous = std::env::var(ENV_PROJECTS_BASE).ok();
        std::env::set_var(ENV_PROJECTS_BASE, "/tmp/panepool-env-test");
        let loaded = load_config();
        match previous {
            Some(value) => std::env::set_var(ENV_PROJECTS_BASE, value),
            None => std::env::remove_var(ENV_PROJECTS_BASE),
        }
        assert_eq!(
            loaded?.projects_base,
            PathBuf::from("/tmp/panepool-env-test")
        );
        Ok(())
    }
}
